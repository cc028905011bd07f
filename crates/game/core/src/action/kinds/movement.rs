use serde::{Deserialize, Serialize};

use crate::action::{ActionResult, ActionTransition, TransitionError, ValidationError};
use crate::state::{GameState, Position};

use super::ensure_available;

/// A single tile forward along the current facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step;

impl Step {
    pub fn target(state: &GameState) -> Result<Position, ValidationError> {
        let target = state.player.front();
        ensure_available(state, target)?;
        Ok(target)
    }
}

impl ActionTransition for Step {
    type Result = Position;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        Self::target(state).map(drop)
    }

    fn apply(&self, state: &mut GameState) -> Result<Position, TransitionError> {
        let target = Self::target(state)?;
        state.player.position = target;
        Ok(target)
    }
}

/// Repeated single-tile moves. Only the first tile is validated up front; a
/// blocked tile later on ends the walk early without failing the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveForward {
    pub steps: u32,
}

impl MoveForward {
    /// Missing or zero step counts mean a single step.
    pub fn new(steps: Option<u32>) -> Self {
        Self {
            steps: steps.unwrap_or(1).max(1),
        }
    }
}

impl ActionTransition for MoveForward {
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        Step.pre_validate(state)
    }

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        let from = state.player.position;
        let mut taken = 0;
        while taken < self.steps {
            if Step.apply(state).is_err() {
                break;
            }
            taken += 1;
        }
        Ok(ActionResult::Moved {
            from,
            to: state.player.position,
            steps: taken,
            requested: self.steps,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub side: TurnSide,
}

impl Turn {
    pub const LEFT: Self = Self {
        side: TurnSide::Left,
    };
    pub const RIGHT: Self = Self {
        side: TurnSide::Right,
    };
}

impl ActionTransition for Turn {
    type Result = ActionResult;

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        let facing = match self.side {
            TurnSide::Left => state.player.facing.turned_left(),
            TurnSide::Right => state.player.facing.turned_right(),
        };
        state.player.facing = facing;
        Ok(ActionResult::Turned { facing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::fixtures::room;
    use crate::state::{DOOR_KIND, Direction, TerrainKind, WorldObject};

    #[test]
    fn move_forward_walks_requested_tiles() {
        let mut state = room(5, 1);
        let result = MoveForward::new(Some(3)).apply(&mut state).unwrap();

        assert_eq!(state.player.position, Position::new(3, 0));
        assert_eq!(
            result,
            ActionResult::Moved {
                from: Position::ORIGIN,
                to: Position::new(3, 0),
                steps: 3,
                requested: 3,
            }
        );
    }

    #[test]
    fn blocked_intermediate_tile_halts_without_error() {
        let mut state = room(5, 1);
        state
            .world
            .add_object(WorldObject::new("door_1", DOOR_KIND, Position::new(2, 0)));

        let result = MoveForward::new(Some(4)).apply(&mut state).unwrap();

        assert_eq!(state.player.position, Position::new(1, 0));
        assert!(matches!(result, ActionResult::Moved { steps: 1, requested: 4, .. }));
    }

    #[test]
    fn first_tile_is_validated() {
        let mut state = room(3, 1);
        state.map.set(Position::new(1, 0), TerrainKind::Wall);

        let err = MoveForward::new(None).pre_validate(&state).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Impassable {
                position: Position::new(1, 0),
                terrain: TerrainKind::Wall
            }
        );
    }

    #[test]
    fn map_edge_rejects_step() {
        let mut state = room(1, 1);
        assert!(matches!(
            Step.apply(&mut state),
            Err(TransitionError::Rejected(ValidationError::OutOfBounds { .. }))
        ));
        assert_eq!(state.player.position, Position::ORIGIN);
    }

    #[test]
    fn zero_steps_means_one() {
        assert_eq!(MoveForward::new(Some(0)).steps, 1);
    }

    #[test]
    fn turning_updates_facing() {
        let mut state = room(1, 1);
        Turn::LEFT.apply(&mut state).unwrap();
        assert_eq!(state.player.facing, Direction::Up);
        Turn::RIGHT.apply(&mut state).unwrap();
        Turn::RIGHT.apply(&mut state).unwrap();
        assert_eq!(state.player.facing, Direction::Down);
    }
}
