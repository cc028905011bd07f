use async_trait::async_trait;
use puzzle_core::{
    ActionCategory, ActionParams, ActionTransition, Build, GameState, ValidationError,
};

use crate::api::{AnimationKind, ParticleKind, SoundCue};
use crate::catalog::{ActionContext, ActionError, ActionOutcome, GameAction};

pub struct BuildAction;

#[async_trait]
impl GameAction for BuildAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Construction
    }

    fn description(&self) -> &str {
        "Build a structure"
    }

    fn validate(&self, state: &GameState, params: &ActionParams) -> Result<(), ValidationError> {
        Build::new(params.object.clone()).pre_validate(state)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let build = Build::new(params.object.clone());
        let plan = ctx.read(|state| build.plan(state)).await?;

        ctx.presenter()
            .animate(AnimationKind::Build, plan.position, plan.position)
            .await;
        // Resources, terrain and the new object are committed together.
        let result = ctx.write(|state| build.apply(state)).await?;

        ctx.presenter()
            .emit_particles(ParticleKind::Construction, plan.position);
        ctx.presenter().play_sound(SoundCue::Build);
        Ok(ActionOutcome::Completed(result))
    }
}
