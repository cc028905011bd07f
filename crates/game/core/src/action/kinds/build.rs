use crate::action::{ActionResult, ActionTransition, TransitionError, ValidationError};
use crate::state::{GameState, ObjectFlags, Position, Requirements, TerrainKind, WorldObject};

use super::ensure_available;

/// Resources consumed by building `kind`. Unknown kinds need nothing and
/// therefore cannot be built.
pub fn build_requirements(kind: &str) -> Requirements {
    let pairs: &[(&str, u32)] = match kind {
        "bridge" => &[("wood", 3), ("nails", 5)],
        "road" => &[("stone", 2)],
        "house" => &[("wood", 10), ("stone", 5), ("nails", 20)],
        "fence" => &[("wood", 2), ("nails", 3)],
        _ => &[],
    };
    pairs
        .iter()
        .map(|(item, amount)| ((*item).to_owned(), *amount))
        .collect()
}

/// Terrain a kind must be built on. These kinds rewrite the tile to
/// [`TerrainKind::Path`] once built.
pub fn required_terrain(kind: &str) -> Option<TerrainKind> {
    match kind {
        "bridge" => Some(TerrainKind::Water),
        "road" => Some(TerrainKind::Grass),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub kind: String,
    pub position: Position,
    pub requirements: Requirements,
    pub rewrite: Option<TerrainKind>,
}

/// Constructs a structure on the tile in front of the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Build {
    pub kind: Option<String>,
}

impl Build {
    pub fn new(kind: Option<String>) -> Self {
        Self { kind }
    }

    pub fn plan(&self, state: &GameState) -> Result<BuildPlan, ValidationError> {
        let kind = self
            .kind
            .as_deref()
            .ok_or(ValidationError::MissingParameter("object"))?;
        let requirements = build_requirements(kind);
        if requirements.is_empty() {
            return Err(ValidationError::UnknownStructure {
                kind: kind.to_owned(),
            });
        }

        let position = state.player.front();
        let rewrite = match required_terrain(kind) {
            Some(required) => {
                let found = state.map.terrain(position);
                if found != Some(required) {
                    return Err(ValidationError::WrongTerrain {
                        kind: kind.to_owned(),
                        position,
                        required,
                        found,
                    });
                }
                Some(TerrainKind::Path)
            }
            None => {
                ensure_available(state, position)?;
                None
            }
        };
        // Lookups return the first object on a tile; a second one would be hidden.
        if let Some(object) = state.world.object_at(position) {
            return Err(ValidationError::Occupied {
                position,
                object: object.id.clone(),
            });
        }

        let inventory = state.world.inventory();
        if let Some((item, required)) = requirements
            .iter()
            .find(|(item, amount)| !inventory.has(item, **amount))
        {
            return Err(ValidationError::InsufficientResources {
                kind: kind.to_owned(),
                item: item.clone(),
                required: *required,
                available: inventory.count(item),
            });
        }

        Ok(BuildPlan {
            kind: kind.to_owned(),
            position,
            requirements,
            rewrite,
        })
    }
}

impl ActionTransition for Build {
    type Result = ActionResult;

    fn pre_validate(&self, state: &GameState) -> Result<(), ValidationError> {
        self.plan(state).map(drop)
    }

    fn apply(&self, state: &mut GameState) -> Result<ActionResult, TransitionError> {
        let plan = self.plan(state)?;
        state.world.consume_resources(&plan.requirements)?;
        if let Some(terrain) = plan.rewrite {
            state.map.set(plan.position, terrain);
        }
        let id = state.world.unique_object_id(&plan.kind);
        state.world.add_object(
            WorldObject::new(id.clone(), plan.kind.clone(), plan.position)
                .with_flags(ObjectFlags::BUILT),
        );
        Ok(ActionResult::Built {
            object: id,
            kind: plan.kind,
            position: plan.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::kinds::fixtures::room;

    fn bridge_site() -> GameState {
        let mut state = room(3, 1);
        state.map.set(Position::new(1, 0), TerrainKind::Water);
        state
    }

    #[test]
    fn bridge_on_water_consumes_resources_and_paves_tile() {
        let mut state = bridge_site();
        state.world.add_items("wood", 3);
        state.world.add_items("nails", 5);

        let result = Build::new(Some("bridge".into())).apply(&mut state).unwrap();

        assert_eq!(state.world.inventory().count("wood"), 0);
        assert_eq!(state.world.inventory().count("nails"), 0);
        assert_eq!(state.map.terrain(Position::new(1, 0)), Some(TerrainKind::Path));
        assert!(state.is_tile_available(Position::new(1, 0)));
        let ActionResult::Built { object, .. } = result else {
            panic!("unexpected result {result:?}");
        };
        let bridge = state.world.object(&object).unwrap();
        assert_eq!(bridge.kind, "bridge");
        assert!(bridge.is_built());
    }

    #[test]
    fn short_inventory_is_rejected_untouched() {
        let mut state = bridge_site();
        state.world.add_items("wood", 3);
        state.world.add_items("nails", 4);

        let err = Build::new(Some("bridge".into())).pre_validate(&state).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientResources {
                kind: "bridge".into(),
                item: "nails".into(),
                required: 5,
                available: 4
            }
        );
        assert!(Build::new(Some("bridge".into())).apply(&mut state).is_err());
        assert_eq!(state.world.inventory().count("wood"), 3);
        assert_eq!(state.map.terrain(Position::new(1, 0)), Some(TerrainKind::Water));
    }

    #[test]
    fn road_needs_grass() {
        let mut state = room(3, 1);
        state.world.add_items("stone", 2);
        assert!(matches!(
            Build::new(Some("road".into())).pre_validate(&state),
            Err(ValidationError::WrongTerrain { required: TerrainKind::Grass, .. })
        ));
        state.map.set(Position::new(1, 0), TerrainKind::Grass);
        assert!(Build::new(Some("road".into())).pre_validate(&state).is_ok());
    }

    #[test]
    fn fence_uses_general_branch_and_blocks_tile() {
        let mut state = room(3, 1);
        state.world.add_items("wood", 2);
        state.world.add_items("nails", 3);

        Build::new(Some("fence".into())).apply(&mut state).unwrap();

        assert!(!state.is_tile_available(Position::new(1, 0)));
        assert_eq!(state.map.terrain(Position::new(1, 0)), Some(TerrainKind::Floor));
    }

    #[test]
    fn structures_are_not_built_over_other_objects() {
        let mut state = room(3, 1);
        state.world.add_items("wood", 10);
        state.world.add_items("stone", 5);
        state.world.add_items("nails", 20);
        state.world.add_object(
            WorldObject::new("gem_1", "gem", Position::new(1, 0))
                .with_flags(ObjectFlags::COLLECTABLE),
        );

        for kind in ["house", "fence"] {
            assert_eq!(
                Build::new(Some(kind.into())).pre_validate(&state),
                Err(ValidationError::Occupied {
                    position: Position::new(1, 0),
                    object: "gem_1".into()
                })
            );
        }
        assert!(Build::new(Some("house".into())).apply(&mut state).is_err());
        assert_eq!(state.world.inventory().count("wood"), 10);

        let mut site = bridge_site();
        site.world.add_items("wood", 3);
        site.world.add_items("nails", 5);
        site.world
            .add_object(WorldObject::new("buoy_1", "buoy", Position::new(1, 0)));
        assert!(matches!(
            Build::new(Some("bridge".into())).pre_validate(&site),
            Err(ValidationError::Occupied { .. })
        ));
    }

    #[test]
    fn unknown_kind_never_validates() {
        let state = room(3, 1);
        assert_eq!(
            Build::new(Some("castle".into())).pre_validate(&state),
            Err(ValidationError::UnknownStructure {
                kind: "castle".into()
            })
        );
        assert_eq!(
            Build::new(None).pre_validate(&state),
            Err(ValidationError::MissingParameter("object"))
        );
    }
}
