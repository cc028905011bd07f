//! User-facing feedback texts.

use puzzle_core::ValidationError;

/// Message shown when `name` fails its precondition check.
pub fn validation_message(name: &str) -> String {
    match name {
        "move_forward" => "The path ahead is blocked!".to_owned(),
        "push" => "There's nothing to push here, or the path is blocked!".to_owned(),
        "open" => "There's no door here, or it's already open!".to_owned(),
        "close" => "There's no door here, or it's already closed!".to_owned(),
        "collect" => "There's nothing to collect here!".to_owned(),
        "build" => "You can't build that here, or you lack resources!".to_owned(),
        _ => format!("Cannot perform {name} here!"),
    }
}

/// Message shown when an action is refused over a gated resource.
pub fn refusal_message(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingKey { .. } => "You need a key to open this door".to_owned(),
        ValidationError::Locked { .. } => "This door is locked".to_owned(),
        other => other.to_string(),
    }
}

pub fn unknown_action_message(name: &str) -> String {
    format!("Unknown action: {name}")
}

pub fn execution_error_message(error: &str) -> String {
    format!("Action failed: {error}")
}

pub const NOTHING_TO_UNDO: &str = "Nothing to undo!";

pub fn undo_message(name: &str) -> String {
    format!("Undid: {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_use_generic_fallback() {
        assert_eq!(validation_message("dance"), "Cannot perform dance here!");
        assert_eq!(validation_message("move_forward"), "The path ahead is blocked!");
    }

    #[test]
    fn key_refusal_mentions_key() {
        let err = ValidationError::MissingKey {
            door: "door_1".into(),
            key: "brass".into(),
        };
        assert_eq!(refusal_message(&err), "You need a key to open this door");
    }
}
