use crate::action::{ActionResult, ActionTransition, TransitionError};
use crate::state::GameState;

/// Speech bubble text. Never touches the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Speak {
    pub message: String,
}

impl Speak {
    pub const PLACEHOLDER: &'static str = "...";

    pub fn new(message: Option<String>) -> Self {
        Self {
            message: message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| Self::PLACEHOLDER.to_owned()),
        }
    }
}

impl ActionTransition for Speak {
    type Result = ActionResult;

    fn apply(&self, _state: &mut GameState) -> Result<ActionResult, TransitionError> {
        Ok(ActionResult::Spoke {
            message: self.message.clone(),
        })
    }
}
