//! `Behavior`: the transition contract every node kind implements.

use crate::state::StateCode;

use super::context::StepContext;

/// The per-kind half of a node: its data plus its transition function.
///
/// The other half (state code, parent link, children, soft-destroyed
/// marker) is kept by the [`Tree`](super::Tree) and cannot be touched
/// directly by the implementation.
///
/// # Contract
///
/// Implementations **must**:
/// - Handle `StateCode::INIT` exactly once (it is only ever seen by the
///   factory's first step). This is where children are usually created.
/// - Map every state code they do not recognize to `StateCode::EXIT`.
/// - Propagate `EXIT` when [`StepContext::do_child_states`] reports it.
/// - Use only `ctx.env()` for randomness, pacing and other outside effects.
///
/// A tree usually holds a single closed enum of node kinds so the
/// catch-all arm is checked by the compiler.
///
/// # Example
///
/// ```rust
/// use tickstep::node::{Behavior, StepContext, Tree};
/// use tickstep::StateCode;
///
/// struct Countdown(u32);
///
/// impl Behavior for Countdown {
///     type Env = ();
///
///     fn transition(&mut self, _ctx: &mut StepContext<'_, Self>, state: StateCode) -> StateCode {
///         match state {
///             StateCode::INIT => StateCode::RUNNING,
///             StateCode::RUNNING if self.0 == 0 => StateCode::EXIT,
///             StateCode::RUNNING => {
///                 self.0 -= 1;
///                 StateCode::RUNNING
///             }
///             _ => StateCode::EXIT,
///         }
///     }
/// }
///
/// let mut tree = Tree::new();
/// let root = tree.create(Countdown(1), &mut ()).unwrap();
/// assert_eq!(tree.step(root, &mut ()).unwrap(), StateCode::RUNNING);
/// assert_eq!(tree.step(root, &mut ()).unwrap(), StateCode::EXIT);
/// ```
pub trait Behavior: Sized {
    /// Environment threaded through every step (random source, pacer,
    /// counters...). Use `()` when a tree needs nothing.
    type Env;

    /// Map the current state to the next one.
    fn transition(&mut self, ctx: &mut StepContext<'_, Self>, state: StateCode) -> StateCode;

    /// Deterministic hash of this node's own data.
    ///
    /// Folded into [`Tree::state_hash`](super::Tree::state_hash). The
    /// default returns `0` (opt-out).
    fn state_hash(&self) -> u64 {
        0
    }
}
