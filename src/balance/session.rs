//! `Session`: the root node. It steps the human and hands out commodities between paced rounds.

use tracing::{info, warn};

use crate::error::{TreeError, TreeResult};
use crate::node::{NodeHandle, StepContext};
use crate::state::StateCode;

use super::hand::Commodity;
use super::human::{add_commodity, Human};
use super::BalanceNode;

/// Post-run bookkeeping slot; nothing to clear yet.
pub const CLEAR: StateCode = StateCode::new(2);
/// Render slot; rendering is not part of this crate.
pub const RENDER: StateCode = StateCode::new(3);
/// Pace before the next running tick.
pub const WAIT: StateCode = StateCode::new(4);

/// Root of a balance game. One running tick is followed by
/// `CLEAR -> RENDER -> WAIT` before the next.
#[derive(Debug, Clone, Default)]
pub struct Session {
    human: Option<NodeHandle>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn human(&self) -> Option<NodeHandle> {
        self.human
    }

    pub(super) fn transition(
        &mut self,
        ctx: &mut StepContext<'_, BalanceNode>,
        state: StateCode,
    ) -> StateCode {
        let result = match state {
            StateCode::INIT => ctx
                .spawn_child(BalanceNode::Human(Human::new()))
                .map(|human| {
                    self.human = Some(human);
                    StateCode::RUNNING
                }),
            StateCode::RUNNING => self.run(ctx),
            CLEAR => Ok(RENDER),
            RENDER => Ok(WAIT),
            WAIT => {
                let env = ctx.env();
                let period = env.pace;
                env.pacer.pace(period);
                env.paced += 1;
                Ok(StateCode::RUNNING)
            }
            _ => Ok(StateCode::EXIT),
        };
        result.unwrap_or_else(|err| {
            warn!(node = %ctx.this(), error = %err, "session fault");
            StateCode::EXIT
        })
    }

    fn run(&mut self, ctx: &mut StepContext<'_, BalanceNode>) -> TreeResult<StateCode> {
        if ctx.do_child_states().is_exit() {
            return Ok(StateCode::EXIT);
        }

        let human = self.human.ok_or(TreeError::StaleHandle(ctx.this()))?;
        let (steps, score) = ctx
            .get(human)?
            .as_human()
            .map(|h| (h.steps(), h.score()))
            .ok_or(TreeError::StaleHandle(human))?;
        info!(steps, score, "progress");

        if score >= ctx.env().config.win_score {
            info!(score, "win");
            return Ok(StateCode::EXIT);
        }

        let restock = ctx.env().config.restock_percent;
        if ctx.env().rng.chance(restock) {
            let commodity = ctx.create(BalanceNode::Commodity(Commodity::new()))?;
            if let Err(err) = add_commodity(ctx, human, commodity) {
                ctx.destroy(commodity)?;
                return Err(err);
            }
        }
        Ok(CLEAR)
    }
}
