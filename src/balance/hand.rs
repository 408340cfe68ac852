//! Leaf nodes: `Hand` and `Commodity`.

use crate::node::StepContext;
use crate::state::StateCode;

use super::BalanceNode;

/// Carries weight for its human. Holds no children of its own.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    weight: i64,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: i64) {
        self.weight = weight;
    }

    pub(super) fn transition(&mut self, state: StateCode) -> StateCode {
        match state {
            StateCode::INIT => {
                self.weight = 0;
                StateCode::RUNNING
            }
            StateCode::RUNNING => StateCode::RUNNING,
            _ => StateCode::EXIT,
        }
    }
}

/// A parcel whose weight is rolled once, when it is created.
#[derive(Debug, Clone, Default)]
pub struct Commodity {
    weight: i64,
}

impl Commodity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub(super) fn transition(
        &mut self,
        ctx: &mut StepContext<'_, BalanceNode>,
        state: StateCode,
    ) -> StateCode {
        match state {
            StateCode::INIT => {
                let env = ctx.env();
                let max = env.config.max_commodity_weight.max(1);
                self.weight = env.rng.next_range(1, max + 1) as i64;
                StateCode::RUNNING
            }
            StateCode::RUNNING => StateCode::RUNNING,
            _ => StateCode::EXIT,
        }
    }
}
