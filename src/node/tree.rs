//! `Tree`: the arena that owns every node and enforces the tree invariants.

use tracing::{debug, trace};

use crate::error::{TreeError, TreeResult};
use crate::hash::hash_combine;
use crate::state::StateCode;

use super::context::StepContext;
use super::handle::NodeHandle;
use super::traits::Behavior;

/// Tree-side bookkeeping for one live node.
#[derive(Debug, Clone)]
struct Entry<N> {
    /// `None` while the node's own transition is running.
    behavior: Option<N>,
    state: StateCode,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    destroyed: bool,
}

#[derive(Debug, Clone)]
struct Slot<N> {
    generation: u32,
    entry: Option<Entry<N>>,
}

/// Owns a forest of nodes of kind `N`.
///
/// The arena is the single owner of node storage. A parent owns its
/// children only in the sense that destroying it destroys them; the
/// parent link is a plain handle used for detachment.
///
/// Invariants upheld by every public operation:
/// - if `c` is in `children(p)` then `parent(c) == Some(p)`;
/// - a node is a child of at most one parent, and never its own ancestor;
/// - `destroy` frees descendants deep-first before the node itself and
///   leaves no handle to a freed node in any child list.
///
/// Dropping the tree frees every node it still holds.
#[derive(Debug, Clone)]
pub struct Tree<N> {
    slots: Vec<Slot<N>>,
    free: Vec<u32>,
    len: usize,
}

impl<N> Tree<N> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Tree {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if `handle` refers to a live node.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.entry(handle).is_ok()
    }

    fn entry(&self, handle: NodeHandle) -> TreeResult<&Entry<N>> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(TreeError::StaleHandle(handle))
    }

    fn entry_mut(&mut self, handle: NodeHandle) -> TreeResult<&mut Entry<N>> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(TreeError::StaleHandle(handle))
    }

    /// Insert a detached node in the `INIT` state.
    ///
    /// Only the factory calls this, so every handle a caller sees belongs
    /// to a node that has already run its first step.
    pub(crate) fn insert(&mut self, behavior: N) -> NodeHandle {
        let entry = Entry {
            behavior: Some(behavior),
            state: StateCode::INIT,
            parent: None,
            children: Vec::new(),
            destroyed: false,
        };
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeHandle::from_parts(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeHandle::from_parts(index, 0)
            }
        }
    }

    fn release(&mut self, handle: NodeHandle) -> Option<Entry<N>> {
        let slot = self
            .slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        Some(entry)
    }

    // ── Accessors ─────────────────────────────────────────────

    /// Borrow a node's behavior.
    ///
    /// Fails with `NodeBusy` while that node's own transition is running.
    pub fn get(&self, handle: NodeHandle) -> TreeResult<&N> {
        self.entry(handle)?
            .behavior
            .as_ref()
            .ok_or(TreeError::NodeBusy(handle))
    }

    /// Mutably borrow a node's behavior.
    pub fn get_mut(&mut self, handle: NodeHandle) -> TreeResult<&mut N> {
        self.entry_mut(handle)?
            .behavior
            .as_mut()
            .ok_or(TreeError::NodeBusy(handle))
    }

    /// The node's current state code.
    pub fn state(&self, handle: NodeHandle) -> TreeResult<StateCode> {
        Ok(self.entry(handle)?.state)
    }

    /// The node's parent, or `None` for a detached root.
    pub fn parent(&self, handle: NodeHandle) -> TreeResult<Option<NodeHandle>> {
        Ok(self.entry(handle)?.parent)
    }

    /// The node's children, in insertion order.
    pub fn children(&self, handle: NodeHandle) -> TreeResult<&[NodeHandle]> {
        Ok(&self.entry(handle)?.children)
    }

    /// Every live node without a parent, in slot order.
    ///
    /// Nodes returned by [`Tree::create`] that were never attached show up
    /// here next to the real roots.
    pub fn roots(&self) -> Vec<NodeHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let entry = slot.entry.as_ref()?;
                entry
                    .parent
                    .is_none()
                    .then(|| NodeHandle::from_parts(index as u32, slot.generation))
            })
            .collect()
    }

    /// All descendants of `handle` in depth-first pre-order (excluding `handle`).
    pub fn descendants(&self, handle: NodeHandle) -> TreeResult<Vec<NodeHandle>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeHandle> = self.children(handle)?.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next)?.iter().rev().copied());
        }
        Ok(out)
    }

    // ── Soft-destroyed marker ─────────────────────────────────

    /// Set or clear the soft-destroyed marker.
    ///
    /// A marked node is skipped by its parent's dispatch. It stays
    /// attached and allocated.
    pub fn set_destroyed(&mut self, handle: NodeHandle, destroyed: bool) -> TreeResult<()> {
        self.entry_mut(handle)?.destroyed = destroyed;
        Ok(())
    }

    pub fn is_destroyed(&self, handle: NodeHandle) -> TreeResult<bool> {
        Ok(self.entry(handle)?.destroyed)
    }

    // ── Structure ─────────────────────────────────────────────

    /// Rebind the back-reference only. Child lists are left untouched.
    pub(crate) fn set_parent(
        &mut self,
        child: NodeHandle,
        parent: Option<NodeHandle>,
    ) -> TreeResult<()> {
        self.entry_mut(child)?.parent = parent;
        Ok(())
    }

    /// Append `child` to `parent`'s children and point its back-reference
    /// at `parent`. Returns `child`.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<NodeHandle> {
        self.entry(parent)?;
        let current = self.entry(child)?.parent;
        if parent == child {
            return Err(TreeError::SelfAttach(child));
        }
        if let Some(existing) = current {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(TreeError::CycleDetected { parent, child });
            }
            cursor = self.entry(ancestor)?.parent;
        }

        self.entry_mut(parent)?.children.push(child);
        self.set_parent(child, Some(parent))?;
        trace!(%parent, %child, "attached");
        Ok(child)
    }

    /// Remove the first occurrence of `child` from `parent`'s children.
    ///
    /// No-op if `child` is not there. If the child's back-reference
    /// pointed at `parent` it is cleared, leaving a detached root.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<()> {
        let children = &mut self.entry_mut(parent)?.children;
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return Ok(());
        };
        children.remove(pos);
        if let Ok(entry) = self.entry_mut(child) {
            if entry.parent == Some(parent) {
                entry.parent = None;
            }
        }
        trace!(%parent, %child, "detached");
        Ok(())
    }

    /// Destroy `handle` and its whole subtree.
    ///
    /// Children are destroyed first, recursively and in order; then the
    /// node is removed from its parent's children and freed. The retired
    /// behaviors are returned in teardown order.
    ///
    /// Destroying an already destroyed node is a no-op that returns an
    /// empty list. Fails with `NodeBusy`, without touching anything, if a
    /// node in the subtree is mid-transition.
    pub fn destroy(&mut self, handle: NodeHandle) -> TreeResult<Vec<(NodeHandle, N)>> {
        if !self.contains(handle) {
            return Ok(Vec::new());
        }
        for node in std::iter::once(handle).chain(self.descendants(handle)?) {
            if self.entry(node)?.behavior.is_none() {
                return Err(TreeError::NodeBusy(node));
            }
        }

        let mut retired = Vec::new();
        self.destroy_subtree(handle, &mut retired);
        debug!(node = %handle, freed = retired.len(), "destroyed");
        Ok(retired)
    }

    fn destroy_subtree(&mut self, handle: NodeHandle, retired: &mut Vec<(NodeHandle, N)>) {
        let children = match self.entry(handle) {
            Ok(entry) => entry.children.clone(),
            Err(_) => return,
        };
        for child in children {
            self.destroy_subtree(child, retired);
        }

        let Some(entry) = self.release(handle) else {
            return;
        };
        if let Some(parent) = entry.parent {
            if let Ok(parent_entry) = self.entry_mut(parent) {
                if let Some(pos) = parent_entry.children.iter().position(|c| *c == handle) {
                    parent_entry.children.remove(pos);
                }
            }
        }
        trace!(node = %handle, "freed");
        if let Some(behavior) = entry.behavior {
            retired.push((handle, behavior));
        }
    }
}

impl<N: Behavior> Tree<N> {
    /// Run one transition of `handle` and store the result.
    ///
    /// The behavior is moved out of its slot for the duration of the
    /// call, which is how re-entrant steps are detected (`NodeBusy`).
    pub fn step(&mut self, handle: NodeHandle, env: &mut N::Env) -> TreeResult<StateCode> {
        let entry = self.entry_mut(handle)?;
        if entry.state.is_exit() {
            return Err(TreeError::AlreadyExited(handle));
        }
        let current = entry.state;
        let mut behavior = entry.behavior.take().ok_or(TreeError::NodeBusy(handle))?;

        let next = {
            let mut ctx = StepContext::new(self, env, handle);
            behavior.transition(&mut ctx, current)
        };

        // A busy node cannot be destroyed, so the slot is still ours.
        let entry = self.entry_mut(handle)?;
        entry.behavior = Some(behavior);
        entry.state = next;
        if next.is_exit() {
            debug!(node = %handle, from = %current, "exit");
        }
        Ok(next)
    }

    /// Deterministic fingerprint of `handle`'s subtree: structure, state
    /// codes, soft-destroyed markers and each behavior's `state_hash`.
    pub fn state_hash(&self, handle: NodeHandle) -> TreeResult<u64> {
        let mut h = 0u64;
        for node in std::iter::once(handle).chain(self.descendants(handle)?) {
            let entry = self.entry(node)?;
            h = hash_combine(h, entry.state.raw() as u64);
            h = hash_combine(h, entry.children.len() as u64);
            h = hash_combine(h, entry.destroyed as u64);
            h = hash_combine(h, entry.behavior.as_ref().map_or(0, N::state_hash));
        }
        Ok(h)
    }
}

impl<N> Default for Tree<N> {
    fn default() -> Self {
        Self::new()
    }
}
