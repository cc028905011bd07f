use async_trait::async_trait;
use puzzle_core::{
    ActionCategory, ActionParams, ActionResult, ActionTransition, GameState, MoveForward, Step,
    Turn, TurnSide, ValidationError,
};

use crate::api::AnimationKind;
use crate::catalog::{ActionContext, ActionError, ActionOutcome, GameAction};

pub struct MoveForwardAction;

#[async_trait]
impl GameAction for MoveForwardAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Movement
    }

    fn description(&self) -> &str {
        "Move forward in the facing direction"
    }

    fn validate(&self, state: &GameState, params: &ActionParams) -> Result<(), ValidationError> {
        MoveForward::new(params.steps).pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let requested = MoveForward::new(params.steps).steps;
        let origin = ctx.read(|state| state.player.position).await;
        let mut taken = 0;

        while taken < requested {
            let Ok((from, to)) = ctx
                .read(|state| Step::target(state).map(|to| (state.player.position, to)))
                .await
            else {
                break;
            };
            ctx.presenter().animate(AnimationKind::Walk, from, to).await;
            if ctx.write(|state| Step.apply(state)).await.is_err() {
                break;
            }
            taken += 1;
        }

        let to = ctx.read(|state| state.player.position).await;
        Ok(ActionOutcome::Completed(ActionResult::Moved {
            from: origin,
            to,
            steps: taken,
            requested,
        }))
    }
}

pub struct TurnAction {
    turn: Turn,
}

impl TurnAction {
    pub const LEFT: Self = Self { turn: Turn::LEFT };
    pub const RIGHT: Self = Self { turn: Turn::RIGHT };
}

#[async_trait]
impl GameAction for TurnAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Movement
    }

    fn description(&self) -> &str {
        match self.turn.side {
            TurnSide::Left => "Turn 90 degrees counter-clockwise",
            TurnSide::Right => "Turn 90 degrees clockwise",
        }
    }

    fn validate(&self, state: &GameState, _params: &ActionParams) -> Result<(), ValidationError> {
        self.turn.pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        _params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let result = ctx.write(|state| self.turn.apply(state)).await?;
        Ok(ActionOutcome::Completed(result))
    }
}
