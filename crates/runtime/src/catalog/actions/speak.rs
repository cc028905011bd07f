use async_trait::async_trait;
use puzzle_core::{ActionCategory, ActionParams, ActionResult, GameState, Speak, ValidationError};

use crate::catalog::{ActionContext, ActionError, ActionOutcome, GameAction};

pub struct SpeakAction;

#[async_trait]
impl GameAction for SpeakAction {
    fn category(&self) -> ActionCategory {
        ActionCategory::Communication
    }

    fn description(&self) -> &str {
        "Display message above character"
    }

    fn validate(&self, _state: &GameState, _params: &ActionParams) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ActionError> {
        let speak = Speak::new(params.message.clone());
        ctx.presenter().show_speech_bubble(&speak.message).await;
        Ok(ActionOutcome::Completed(ActionResult::Spoke {
            message: speak.message,
        }))
    }
}
