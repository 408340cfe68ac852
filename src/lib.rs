//! # tickstep: tick-driven hierarchical state machines
//!
//! Nodes own child nodes; each node advances itself and its children by
//! one discrete step per invocation, and any node can halt the whole run
//! by returning the `EXIT` sentinel. Single-threaded and synchronous: a
//! run is a pure function of its seed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │         Driver           │ ← steps the root once per tick
//! │  ┌────────────────────┐  │
//! │  │      Tree<N>        │  │ ← arena: owns every node
//! │  │  ┌──────────────┐  │  │
//! │  │  │  Behavior     │  │  │ ← per-kind transition function
//! │  │  └──────────────┘  │  │
//! │  │  ┌──────────────┐  │  │
//! │  │  │ StepContext   │  │  │ ← do_child_states, create_child
//! │  │  └──────────────┘  │  │
//! │  └────────────────────┘  │
//! │  Env: rng, pacer, ...    │ ← threaded through every step
//! └──────────────────────────┘
//! ```

pub mod balance;
pub mod driver;
pub mod error;
pub mod hash;
pub mod node;
pub mod pace;
pub mod rng;
pub mod state;
pub mod time;

// Re-exports for convenience.
pub use driver::{Driver, DriverConfig, RunSummary};
pub use error::{TreeError, TreeResult};
pub use node::{Behavior, NodeHandle, StepContext, Tree};
pub use pace::{Pacer, SleepPacer, VirtualPacer};
pub use rng::DeterministicRng;
pub use state::{Dispatch, StateCode};
pub use time::VirtualTime;
