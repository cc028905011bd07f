use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{Direction, Position};

/// Grouping used by catalogs and UIs.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionCategory {
    Movement,
    Interaction,
    Construction,
    Communication,
}

/// What a successfully executed action did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionResult {
    Moved {
        from: Position,
        to: Position,
        /// Tiles actually walked; fewer than `requested` when a tile on the
        /// way was blocked.
        steps: u32,
        requested: u32,
    },
    Turned {
        facing: Direction,
    },
    Pushed {
        object: String,
        from: Position,
        to: Position,
    },
    DoorChanged {
        door: String,
        open: bool,
    },
    Collected {
        object: String,
        item: String,
        count: u32,
    },
    Built {
        object: String,
        kind: String,
        position: Position,
    },
    Spoke {
        message: String,
    },
    /// Result of a host-registered action.
    Custom {
        value: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_result_keeps_structure_kind_beside_outcome_tag() {
        let result = ActionResult::Built {
            object: "bridge_1".into(),
            kind: "bridge".into(),
            position: Position::new(3, 1),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "built");
        assert_eq!(json["kind"], "bridge");

        let back: ActionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
