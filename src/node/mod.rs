//! The node tree: ownership, stepping and per-tick child dispatch.
//!
//! A node is split in two. Its *behavior* (data plus transition
//! function, see [`Behavior`]) belongs to the application. Its
//! *bookkeeping* (state code, parent link, ordered children,
//! soft-destroyed marker) belongs to the [`Tree`] arena, which is the
//! only owner of node storage and is addressed through [`NodeHandle`]s.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`handle`] | [`NodeHandle`] generational index |
//! | [`traits`] | [`Behavior`] trait |
//! | [`tree`] | [`Tree`] arena: attach, detach, destroy, step |
//! | [`context`] | [`StepContext`] and `do_child_states` dispatch |
//! | [`factory`] | `Tree::create` / `create_child` |

pub mod context;
pub mod factory;
pub mod handle;
pub mod traits;
pub mod tree;

pub use context::StepContext;
pub use handle::NodeHandle;
pub use traits::Behavior;
pub use tree::Tree;
