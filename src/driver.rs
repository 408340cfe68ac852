//! Driver loop.
//!
//! Owns the tree, the root node and the step environment. Each tick
//! steps the root exactly once; the run ends when the root returns
//! `EXIT`. The loop is purely synchronous and single-threaded, so a run
//! is a deterministic function of the seed.
//!
//! The environment is built from the [`DriverConfig`] when the driver is
//! created, so `config.seed` and `config.pace` are the values the run
//! actually uses.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::TreeResult;
use crate::node::{Behavior, NodeHandle, Tree};
use crate::state::StateCode;

// ── Config ────────────────────────────────────────────────────────────

/// Knobs shared by every driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Seed for the run's random source.
    pub seed: u64,
    /// Delay a node's wait state should pace between ticks.
    pub pace: Duration,
    /// Stop after this many ticks even if the root never exits.
    pub max_ticks: Option<u64>,
}

impl DriverConfig {
    /// Default pacing between ticks.
    pub const DEFAULT_PACE: Duration = Duration::from_millis(400);

    /// Seeded config with the default pace and no tick limit.
    pub fn new(seed: u64) -> Self {
        DriverConfig {
            seed,
            pace: Self::DEFAULT_PACE,
            max_ticks: None,
        }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

// ── RunSummary ────────────────────────────────────────────────────────

/// Outcome of [`Driver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Ticks executed, counting the one that returned `EXIT`.
    pub ticks: u64,
    /// The root's state when the run stopped.
    pub final_state: StateCode,
    /// [`Tree::state_hash`] of the root subtree at the end of the run.
    pub state_hash: u64,
}

impl RunSummary {
    /// `true` if the root reached `EXIT` (rather than hitting `max_ticks`).
    pub fn exited(&self) -> bool {
        self.final_state.is_exit()
    }
}

// ── Driver ────────────────────────────────────────────────────────────

/// Top-level driver for a tree of `N` nodes.
pub struct Driver<N: Behavior> {
    tree: Tree<N>,
    root: NodeHandle,
    env: N::Env,
    config: DriverConfig,
    ticks: u64,
}

impl<N: Behavior> Driver<N> {
    /// Build the env from `config`, then create the root through the
    /// factory (running its `INIT` step).
    pub fn new<F>(config: DriverConfig, root: N, make_env: F) -> TreeResult<Self>
    where
        F: FnOnce(&DriverConfig) -> N::Env,
    {
        let mut env = make_env(&config);
        let mut tree = Tree::new();
        let root = tree.create(root, &mut env)?;
        debug!(%root, seed = config.seed, pace_ms = config.pace.as_millis() as u64, "driver ready");
        Ok(Driver {
            tree,
            root,
            env,
            config,
            ticks: 0,
        })
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn tree(&self) -> &Tree<N> {
        &self.tree
    }

    pub fn env(&self) -> &N::Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut N::Env {
        &mut self.env
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The root's current state.
    pub fn state(&self) -> TreeResult<StateCode> {
        self.tree.state(self.root)
    }

    /// `true` once the root has returned `EXIT`.
    pub fn is_finished(&self) -> bool {
        self.state().map_or(true, StateCode::is_exit)
    }

    /// Step the root once.
    pub fn step(&mut self) -> TreeResult<StateCode> {
        let state = self.tree.step(self.root, &mut self.env)?;
        self.ticks += 1;
        Ok(state)
    }

    /// Step until the root exits or `max_ticks` is reached.
    pub fn run(&mut self) -> TreeResult<RunSummary> {
        let limit = self.config.max_ticks;
        self.run_bounded(limit)
    }

    /// Step at most `max_ticks` more times, stopping early on `EXIT`.
    pub fn run_for(&mut self, max_ticks: u64) -> TreeResult<RunSummary> {
        self.run_bounded(Some(max_ticks))
    }

    fn run_bounded(&mut self, limit: Option<u64>) -> TreeResult<RunSummary> {
        let start = self.ticks;
        let mut state = self.state()?;
        while !state.is_exit() {
            if limit.is_some_and(|max| self.ticks - start >= max) {
                break;
            }
            state = self.step()?;
        }
        let summary = RunSummary {
            ticks: self.ticks,
            final_state: state,
            state_hash: self.tree.state_hash(self.root)?,
        };
        info!(
            ticks = summary.ticks,
            final_state = %summary.final_state,
            state_hash = %format!("{:016x}", summary.state_hash),
            "run finished"
        );
        Ok(summary)
    }
}
