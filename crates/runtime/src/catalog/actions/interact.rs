use async_trait::async_trait;
use puzzle_core::{
    ActionCategory, ActionParams, ActionTransition, Collect, DoorToggle, GameState, Push,
    ValidationError,
};
use tracing::debug;

use crate::api::{AnimationKind, ParticleKind, SoundCue};
use crate::catalog::{ActionContext, ActionError, ActionOutcome, GameAction};

pub struct PushAction;

#[async_trait]
impl GameAction for PushAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Interaction
    }

    fn description(&self) -> &str {
        "Push object in front of character"
    }

    fn validate(&self, state: &GameState, _params: &ActionParams) -> Result<(), ValidationError> {
        Push.pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        _params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let plan = ctx.read(Push::plan).await?;

        // The object slides visually while its logical tile stays put until
        // the animation has finished.
        ctx.write(|state| {
            state
                .world
                .update_object_position(&plan.object, plan.to, true)
        })
        .await
        .map_err(puzzle_core::TransitionError::from)?;
        ctx.presenter()
            .animate(AnimationKind::Push, plan.from, plan.to)
            .await;

        let result = ctx.write(|state| Push.apply(state)).await?;
        Ok(ActionOutcome::Completed(result))
    }
}

pub struct DoorAction {
    toggle: DoorToggle,
}

impl DoorAction {
    pub const OPEN: Self = Self {
        toggle: DoorToggle::OPEN,
    };
    pub const CLOSE: Self = Self {
        toggle: DoorToggle::CLOSE,
    };
}

#[async_trait]
impl GameAction for DoorAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Interaction
    }

    fn description(&self) -> &str {
        if self.toggle.open {
            "Open a door or container"
        } else {
            "Close a door or container"
        }
    }

    fn validate(&self, state: &GameState, _params: &ActionParams) -> Result<(), ValidationError> {
        self.toggle.pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        _params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let toggle = self.toggle;
        let position = ctx.read(|state| state.player.front()).await;

        if let Err(err) = ctx.read(|state| toggle.check_access(state)).await {
            if err.is_locked_resource() {
                debug!(target: "runtime::catalog", %err, "door refused");
                return Ok(ActionOutcome::Refused(err));
            }
            return Err(err.into());
        }

        let kind = if toggle.open {
            AnimationKind::DoorOpen
        } else {
            AnimationKind::DoorClose
        };
        ctx.presenter().animate(kind, position, position).await;
        ctx.presenter().play_sound(SoundCue::Door);

        let result = ctx.write(|state| toggle.apply(state)).await?;
        Ok(ActionOutcome::Completed(result))
    }
}

pub struct CollectAction;

#[async_trait]
impl GameAction for CollectAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Interaction
    }

    fn description(&self) -> &str {
        "Collect an item"
    }

    fn validate(&self, state: &GameState, params: &ActionParams) -> Result<(), ValidationError> {
        Collect::new(params.resource.clone()).pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let collect = Collect::new(params.resource.clone());
        let plan = ctx.read(|state| collect.plan(state)).await?;

        ctx.presenter()
            .animate(AnimationKind::Collect, plan.position, plan.position)
            .await;
        let result = ctx.write(|state| collect.apply(state)).await?;

        ctx.presenter()
            .emit_particles(ParticleKind::Collect, plan.position);
        ctx.presenter().play_sound(SoundCue::Collect);
        Ok(ActionOutcome::Completed(result))
    }
}
