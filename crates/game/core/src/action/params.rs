use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loosely-typed action parameters as supplied by the command intake.
///
/// Canonical actions read the named fields; anything else is kept in `extra`
/// for custom actions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    #[must_use]
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_none()
            && self.object.is_none()
            && self.message.is_none()
            && self.resource.is_none()
            && self.extra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_keys_land_in_extra() {
        let params: ActionParams =
            serde_json::from_value(json!({"steps": 2, "speed": "fast"})).unwrap();
        assert_eq!(params.steps, Some(2));
        assert_eq!(params.extra.get("speed"), Some(&json!("fast")));
    }

    #[test]
    fn empty_params_serialize_to_empty_object() {
        let value = serde_json::to_value(ActionParams::new()).unwrap();
        assert_eq!(value, json!({}));
    }
}
