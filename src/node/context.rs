//! `StepContext`: what a transition can see and do while it runs.

use tracing::{trace, warn};

use crate::error::TreeResult;
use crate::state::Dispatch;

use super::handle::NodeHandle;
use super::traits::Behavior;
use super::tree::Tree;

/// Mutable context passed to [`Behavior::transition`].
///
/// Borrows the tree and the environment for the duration of one step.
/// The stepping node's own behavior is checked out while the context
/// exists, so `get(ctx.this())` reports it as busy.
pub struct StepContext<'a, N: Behavior> {
    tree: &'a mut Tree<N>,
    env: &'a mut N::Env,
    this: NodeHandle,
}

impl<'a, N: Behavior> StepContext<'a, N> {
    pub(crate) fn new(tree: &'a mut Tree<N>, env: &'a mut N::Env, this: NodeHandle) -> Self {
        StepContext { tree, env, this }
    }

    /// Handle of the node being stepped.
    #[inline]
    pub fn this(&self) -> NodeHandle {
        self.this
    }

    /// The environment threaded through the run.
    #[inline]
    pub fn env(&mut self) -> &mut N::Env {
        &mut *self.env
    }

    /// Read-only view of the whole tree.
    #[inline]
    pub fn tree(&self) -> &Tree<N> {
        &*self.tree
    }

    /// Children of the node being stepped, in insertion order.
    pub fn children(&self) -> &[NodeHandle] {
        self.tree.children(self.this).unwrap_or(&[])
    }

    pub fn get(&self, handle: NodeHandle) -> TreeResult<&N> {
        self.tree.get(handle)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> TreeResult<&mut N> {
        self.tree.get_mut(handle)
    }

    // ── Structure ─────────────────────────────────────────────

    /// See [`Tree::add_child`].
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<NodeHandle> {
        self.tree.add_child(parent, child)
    }

    /// See [`Tree::remove_child`].
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<()> {
        self.tree.remove_child(parent, child)
    }

    /// See [`Tree::destroy`]. Destroying the stepping node or any of its
    /// ancestors fails with `NodeBusy`.
    pub fn destroy(&mut self, handle: NodeHandle) -> TreeResult<Vec<(NodeHandle, N)>> {
        self.tree.destroy(handle)
    }

    /// See [`Tree::set_destroyed`].
    pub fn set_destroyed(&mut self, handle: NodeHandle, destroyed: bool) -> TreeResult<()> {
        self.tree.set_destroyed(handle, destroyed)
    }

    // ── Factory ───────────────────────────────────────────────

    /// Create and initialize a detached node. See [`Tree::create`].
    pub fn create(&mut self, behavior: N) -> TreeResult<NodeHandle> {
        self.tree.create(behavior, &mut *self.env)
    }

    /// Create and initialize a node, then attach it under `parent`.
    pub fn create_child(&mut self, parent: NodeHandle, behavior: N) -> TreeResult<NodeHandle> {
        self.tree.create_child(parent, behavior, &mut *self.env)
    }

    /// Create and initialize a node owned by the stepping node.
    pub fn spawn_child(&mut self, behavior: N) -> TreeResult<NodeHandle> {
        let parent = self.this;
        self.create_child(parent, behavior)
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Step every live child once, in insertion order.
    ///
    /// Soft-destroyed children are skipped. The first child to return
    /// `EXIT` stops the fan-out: later children are not stepped this tick
    /// and `Dispatch::Exit` is returned. A child that cannot be stepped
    /// (it already exited earlier) counts as an `EXIT`.
    pub fn do_child_states(&mut self) -> Dispatch {
        let children = self.children().to_vec();
        for child in children {
            match self.tree.is_destroyed(child) {
                Ok(false) => {}
                // Marked, or freed by an earlier sibling this tick.
                Ok(true) | Err(_) => continue,
            }
            match self.tree.step(child, &mut *self.env) {
                Ok(state) if state.is_exit() => {
                    trace!(parent = %self.this, %child, "child exit, short-circuit");
                    return Dispatch::Exit;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(parent = %self.this, %child, error = %err, "child not steppable, exiting");
                    return Dispatch::Exit;
                }
            }
        }
        Dispatch::Continue
    }
}
