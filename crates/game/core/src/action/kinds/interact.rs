use crate::action::{ActionResult, ActionTransition, TransitionError, ValidationError};
use crate::state::{GameState, ObjectFlags, Position, WorldObject};

use super::ensure_available;

// ===== push =====

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushPlan {
    pub object: String,
    pub from: Position,
    pub to: Position,
}

/// Pushes the object in front of the player one tile further along the same
/// line. The player does not move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Push;

impl Push {
    pub fn plan(state: &GameState) -> Result<PushPlan, ValidationError> {
        let from = state.player.front();
        let object = state
            .world
            .object_at(from)
            .filter(|object| object.is_pushable())
            .ok_or(ValidationError::NothingToPush { position: from })?;
        let to = state.player.position.beyond(from);
        ensure_available(state, to)?;
        Ok(PushPlan {
            object: object.id.clone(),
            from,
            to,
        })
    }
}

impl ActionTransition for Push {
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        Self::plan(state).map(drop)
    }

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        let plan = Self::plan(state)?;
        state.world.move_object(&plan.object, plan.to)?;
        Ok(ActionResult::Pushed {
            object: plan.object,
            from: plan.from,
            to: plan.to,
        })
    }
}

// ===== open / close =====

/// Flips the open state of the door in front of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorToggle {
    pub open: bool,
}

impl DoorToggle {
    pub const OPEN: Self = Self { open: true };
    pub const CLOSE: Self = Self { open: false };

    /// The door in front of the player, if it is in the opposite state.
    pub fn target(self, state: &GameState) -> Result<&WorldObject, ValidationError> {
        let position = state.player.front();
        let door = state
            .world
            .object_at(position)
            .filter(|object| object.is_door())
            .ok_or(ValidationError::NoDoor { position })?;
        match (self.open, door.is_open()) {
            (true, true) => Err(ValidationError::AlreadyOpen {
                door: door.id.clone(),
            }),
            (false, false) => Err(ValidationError::AlreadyClosed {
                door: door.id.clone(),
            }),
            _ => Ok(door),
        }
    }

    /// Key gate checked when opening. The key stays in the inventory.
    pub fn check_access(self, state: &GameState) -> Result<(), ValidationError> {
        let door = self.target(state)?;
        if !self.open {
            return Ok(());
        }
        if door.is_sealed() {
            return Err(ValidationError::Locked {
                door: door.id.clone(),
            });
        }
        if door.requires_key() {
            let key = door.key_id.clone().unwrap_or_default();
            if key.is_empty() || !state.world.has_item(&key, 1) {
                return Err(ValidationError::MissingKey {
                    door: door.id.clone(),
                    key,
                });
            }
        }
        Ok(())
    }
}

impl ActionTransition for DoorToggle {
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        self.target(state).map(drop)
    }

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        self.check_access(state)?;
        let door = self.target(state)?.id.clone();
        let open = self.open;
        state
            .world
            .update_object(&door, |object| object.flags.set(ObjectFlags::OPEN, open))?;
        Ok(ActionResult::DoorChanged { door, open })
    }
}

// ===== collect =====

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectPlan {
    pub object: String,
    pub item: String,
    pub position: Position,
}

/// Picks up the collectable object on the player's own tile, optionally
/// restricted to one item type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collect {
    pub resource: Option<String>,
}

impl Collect {
    pub fn new(resource: Option<String>) -> Self {
        Self { resource }
    }

    pub fn plan(&self, state: &GameState) -> Result<CollectPlan, ValidationError> {
        let position = state.player.position;
        let object = state
            .world
            .object_at(position)
            .filter(|object| object.is_collectable())
            .filter(|object| self.resource.as_ref().is_none_or(|kind| *kind == object.kind))
            .ok_or(ValidationError::NothingToCollect { position })?;
        Ok(CollectPlan {
            object: object.id.clone(),
            item: object.kind.clone(),
            position,
        })
    }
}

impl ActionTransition for Collect {
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        self.plan(state).map(drop)
    }

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        let plan = self.plan(state)?;
        state.world.add_to_inventory(&plan.object)?;
        state.mark_collected(plan.position, &plan.item);
        Ok(ActionResult::Collected {
            count: state.world.inventory().count(&plan.item),
            object: plan.object,
            item: plan.item,
        })
    }
}
