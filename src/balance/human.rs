//! `Human`: balances two hands and falls over when leaning too far.

use tracing::{info, warn};

use crate::error::{TreeError, TreeResult};
use crate::node::{NodeHandle, StepContext};
use crate::state::StateCode;

use super::hand::Hand;
use super::BalanceNode;

/// Owns a left and a right [`Hand`], plus every commodity handed over.
#[derive(Debug, Clone, Default)]
pub struct Human {
    score: i64,
    steps: u64,
    lean: i64,
    hands: Option<(NodeHandle, NodeHandle)>,
}

impl Human {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of both hands' weights, accumulated every running tick.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Running ticks survived.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Signed drift; positive leans left.
    pub fn lean(&self) -> i64 {
        self.lean
    }

    /// `(left, right)` once initialized.
    pub fn hands(&self) -> Option<(NodeHandle, NodeHandle)> {
        self.hands
    }

    pub(super) fn transition(
        &mut self,
        ctx: &mut StepContext<'_, BalanceNode>,
        state: StateCode,
    ) -> StateCode {
        let result = match state {
            StateCode::INIT => self.init(ctx),
            StateCode::RUNNING => self.run(ctx),
            _ => Ok(StateCode::EXIT),
        };
        result.unwrap_or_else(|err| {
            warn!(node = %ctx.this(), error = %err, "human fault");
            StateCode::EXIT
        })
    }

    fn init(&mut self, ctx: &mut StepContext<'_, BalanceNode>) -> TreeResult<StateCode> {
        self.score = 0;
        self.steps = 0;
        self.lean = 0;
        let left = ctx.spawn_child(BalanceNode::Hand(Hand::new()))?;
        let right = ctx.spawn_child(BalanceNode::Hand(Hand::new()))?;
        self.hands = Some((left, right));
        Ok(StateCode::RUNNING)
    }

    fn run(&mut self, ctx: &mut StepContext<'_, BalanceNode>) -> TreeResult<StateCode> {
        let (left, right) = self.hands.ok_or(TreeError::StaleHandle(ctx.this()))?;
        self.steps += 1;

        let left_weight = hand_weight(ctx, left)?;
        let right_weight = hand_weight(ctx, right)?;
        self.lean += (left_weight - right_weight) / 10;
        info!(
            left = left_weight,
            right = right_weight,
            lean = self.lean,
            "hands"
        );

        if self.lean.abs() > ctx.env().config.fall_threshold {
            info!(steps = self.steps, "the human is down");
            return Ok(StateCode::EXIT);
        }

        self.score += left_weight + right_weight;
        Ok(StateCode::RUNNING)
    }
}

fn hand_weight(ctx: &StepContext<'_, BalanceNode>, hand: NodeHandle) -> TreeResult<i64> {
    ctx.get(hand)?
        .as_hand()
        .map(Hand::weight)
        .ok_or(TreeError::StaleHandle(hand))
}

/// Give `commodity` to `human`: the human takes ownership of the node and
/// its weight goes to a random hand.
///
/// The weight is only applied once the attach succeeded. On error the
/// hands are untouched and `commodity` is left where it was.
pub fn add_commodity(
    ctx: &mut StepContext<'_, BalanceNode>,
    human: NodeHandle,
    commodity: NodeHandle,
) -> TreeResult<()> {
    let weight = ctx
        .get(commodity)?
        .as_commodity()
        .map(|c| c.weight())
        .ok_or(TreeError::StaleHandle(commodity))?;
    let (left, right) = ctx
        .get(human)?
        .as_human()
        .and_then(Human::hands)
        .ok_or(TreeError::StaleHandle(human))?;
    for hand in [left, right] {
        if ctx.get(hand)?.as_hand().is_none() {
            return Err(TreeError::StaleHandle(hand));
        }
    }

    ctx.add_child(human, commodity)?;
    let hand = if ctx.env().rng.next_bool() { left } else { right };
    if let Some(h) = ctx.get_mut(hand)?.as_hand_mut() {
        h.set_weight(h.weight() + weight);
    }
    info!(weight, "add commodity");
    Ok(())
}
