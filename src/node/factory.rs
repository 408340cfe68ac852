//! Node construction: allocate, then run the first step before anyone sees it.

use tracing::trace;

use crate::error::TreeResult;

use super::handle::NodeHandle;
use super::traits::Behavior;
use super::tree::Tree;

impl<N: Behavior> Tree<N> {
    /// Insert `behavior` as a new node and step it once, out of `INIT`.
    ///
    /// The node is returned detached. Attach it with [`Tree::add_child`]
    /// or use [`Tree::create_child`]; a node left detached is not leaked
    /// (the tree still owns it) but it is never stepped by anyone and
    /// shows up in [`Tree::roots`].
    pub fn create(&mut self, behavior: N, env: &mut N::Env) -> TreeResult<NodeHandle> {
        let handle = self.insert(behavior);
        let state = self.step(handle, env)?;
        trace!(node = %handle, %state, "created");
        Ok(handle)
    }

    /// Create a node and attach it under `parent` in one go.
    ///
    /// `parent` is validated before the node is built, so a stale parent
    /// never leaves an orphan behind.
    pub fn create_child(
        &mut self,
        parent: NodeHandle,
        behavior: N,
        env: &mut N::Env,
    ) -> TreeResult<NodeHandle> {
        self.children(parent)?;
        let child = self.create(behavior, env)?;
        match self.add_child(parent, child) {
            Ok(child) => Ok(child),
            Err(err) => {
                // The child's own init may have torn the parent down.
                self.destroy(child)?;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Behavior, StepContext, Tree};
    use crate::state::StateCode;

    /// Records how many transitions it has seen.
    struct Scripted {
        steps: u32,
    }

    impl Behavior for Scripted {
        type Env = ();

        fn transition(&mut self, _ctx: &mut StepContext<'_, Self>, state: StateCode) -> StateCode {
            self.steps += 1;
            match state {
                StateCode::INIT | StateCode::RUNNING => StateCode::RUNNING,
                _ => StateCode::EXIT,
            }
        }
    }

    #[test]
    fn test_create_runs_exactly_one_step() {
        let mut tree = Tree::new();
        let h = tree.create(Scripted { steps: 0 }, &mut ()).unwrap();
        assert_eq!(tree.get(h).unwrap().steps, 1);
        assert_ne!(tree.state(h).unwrap(), StateCode::INIT);
    }

    #[test]
    fn test_create_returns_detached_root() {
        let mut tree = Tree::new();
        let h = tree.create(Scripted { steps: 0 }, &mut ()).unwrap();
        assert_eq!(tree.parent(h).unwrap(), None);
        assert_eq!(tree.roots(), vec![h]);
    }

    #[test]
    fn test_create_child_attaches() {
        let mut tree = Tree::new();
        let root = tree.create(Scripted { steps: 0 }, &mut ()).unwrap();
        let child = tree.create_child(root, Scripted { steps: 0 }, &mut ()).unwrap();
        assert_eq!(tree.parent(child).unwrap(), Some(root));
        assert_eq!(tree.children(root).unwrap(), &[child]);
        assert_eq!(tree.get(child).unwrap().steps, 1);
    }

    #[test]
    fn test_create_child_with_stale_parent_builds_nothing() {
        let mut tree = Tree::new();
        let root = tree.create(Scripted { steps: 0 }, &mut ()).unwrap();
        tree.destroy(root).unwrap();
        assert!(tree.create_child(root, Scripted { steps: 0 }, &mut ()).is_err());
        assert!(tree.is_empty());
    }
}
