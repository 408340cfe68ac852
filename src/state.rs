//! State codes shared by every node kind.
//!
//! Codes are opaque integers. Only two values carry meaning across the
//! whole system: [`StateCode::INIT`], the state every node starts in, and
//! [`StateCode::EXIT`], the terminal sentinel. Everything else is owned
//! by the node kind that returns it.

/// A node's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StateCode(i32);

impl StateCode {
    /// The state of a freshly inserted node. Seen by exactly one transition.
    pub const INIT: StateCode = StateCode(0);

    /// The conventional steady state after initialization.
    pub const RUNNING: StateCode = StateCode(1);

    /// Terminal sentinel: this subtree is finished and its owner must exit too.
    pub const EXIT: StateCode = StateCode(-100);

    /// Create a state code from a raw value.
    ///
    /// Application codes should avoid the reserved values of `INIT`,
    /// `RUNNING` and `EXIT` unless they mean the same thing.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        StateCode(raw)
    }

    /// Return the raw value.
    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_init(self) -> bool {
        self == StateCode::INIT
    }

    #[inline]
    pub fn is_exit(self) -> bool {
        self == StateCode::EXIT
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            StateCode::INIT => write!(f, "Init"),
            StateCode::RUNNING => write!(f, "Running"),
            StateCode::EXIT => write!(f, "Exit"),
            StateCode(raw) => write!(f, "S{}", raw),
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────

/// Aggregate result of stepping a node's children for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Dispatch {
    /// Every live child was stepped and none asked to exit.
    Continue,
    /// A child returned `EXIT`; the remaining children were not stepped.
    Exit,
}

impl Dispatch {
    #[inline]
    pub fn is_exit(self) -> bool {
        matches!(self, Dispatch::Exit)
    }
}

impl From<Dispatch> for StateCode {
    /// `Continue` maps to the raw code `0` and `Exit` to the sentinel.
    ///
    /// `0` is also [`StateCode::INIT`]: a transition that returns the
    /// converted `Continue` as its next state re-enters `INIT` on the
    /// following step. Map `Continue` to the node's own running code
    /// instead.
    fn from(d: Dispatch) -> Self {
        match d {
            Dispatch::Continue => StateCode(0),
            Dispatch::Exit => StateCode::EXIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continue_converts_to_init_code() {
        assert_eq!(StateCode::from(Dispatch::Continue), StateCode::INIT);
        assert_eq!(StateCode::from(Dispatch::Exit), StateCode::EXIT);
    }

    #[test]
    fn test_reserved_codes_are_distinct() {
        assert_ne!(StateCode::INIT, StateCode::RUNNING);
        assert_ne!(StateCode::INIT, StateCode::EXIT);
        assert_ne!(StateCode::RUNNING, StateCode::EXIT);
        assert_eq!(StateCode::INIT.raw(), 0);
    }

    #[test]
    fn test_predicates() {
        assert!(StateCode::INIT.is_init());
        assert!(StateCode::EXIT.is_exit());
        assert!(!StateCode::new(7).is_exit());
    }

    #[test]
    fn test_display() {
        assert_eq!(StateCode::EXIT.to_string(), "Exit");
        assert_eq!(StateCode::new(4).to_string(), "S4");
    }

    #[test]
    fn test_dispatch_into_state() {
        assert_eq!(StateCode::from(Dispatch::Exit), StateCode::EXIT);
        assert!(!StateCode::from(Dispatch::Continue).is_exit());
    }
}
