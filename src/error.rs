//! Structured error types for tickstep.
//!
//! Normal termination is never an error: it travels as the `EXIT` state
//! code. `TreeError` covers structural misuse of the node tree, i.e.
//! programming faults that would silently corrupt ownership if tolerated.

use crate::node::NodeHandle;

/// The top-level error type for tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TreeError {
    // ── Handle errors ─────────────────────────────────────

    /// The handle refers to a node that has been destroyed (or never existed).
    StaleHandle(NodeHandle),

    /// The node is in the middle of its own transition and cannot be
    /// stepped again or torn down until it returns.
    NodeBusy(NodeHandle),

    /// The node already returned `EXIT`; further steps are undefined.
    AlreadyExited(NodeHandle),

    // ── Attachment errors ─────────────────────────────────

    /// The child already has a parent. Detach it with `remove_child` first.
    AlreadyAttached {
        child: NodeHandle,
        parent: NodeHandle,
    },

    /// A node cannot be its own child.
    SelfAttach(NodeHandle),

    /// Attaching `child` below `parent` would make `child` its own ancestor.
    CycleDetected {
        parent: NodeHandle,
        child: NodeHandle,
    },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::StaleHandle(h) => write!(f, "node {} does not exist", h),
            TreeError::NodeBusy(h) => write!(f, "node {} is mid-transition", h),
            TreeError::AlreadyExited(h) => write!(f, "node {} has already exited", h),
            TreeError::AlreadyAttached { child, parent } => {
                write!(f, "node {} is already a child of {}", child, parent)
            }
            TreeError::SelfAttach(h) => write!(f, "node {} cannot be its own child", h),
            TreeError::CycleDetected { parent, child } => write!(
                f,
                "attaching {} under {} would create a cycle",
                child, parent
            ),
        }
    }
}

impl std::error::Error for TreeError {}

/// Convenience alias for `Result<T, TreeError>`.
pub type TreeResult<T> = Result<T, TreeError>;
