use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{Collectible, Direction, ElementState, GameState, MissionState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub direction: Direction,
}

/// Read-only projection of the state that goal checks look at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub goal: Position,
    /// Level inventory overlaid with mission inventory; mission counts win
    /// where both hold the same item.
    pub inventory: BTreeMap<String, u32>,
    pub collectibles: Vec<Collectible>,
    pub code: String,
    pub mission: Option<MissionState>,
    pub element_states: BTreeMap<String, ElementState>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut inventory = state.world.inventory().as_map().clone();
        if let Some(mission) = &state.context.mission {
            inventory.extend(
                mission
                    .inventory
                    .iter()
                    .map(|(item, count)| (item.clone(), *count)),
            );
        }

        Self {
            player: PlayerView {
                position: state.player.position,
                direction: state.player.facing,
            },
            goal: state.goal,
            inventory,
            collectibles: state.collectibles.clone(),
            code: state.context.code.clone(),
            mission: state.context.mission.clone(),
            element_states: state.context.element_states.clone(),
        }
    }

    pub fn item_count(&self, item: &str) -> u32 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn collected(&self) -> impl Iterator<Item = &Collectible> + '_ {
        self.collectibles.iter().filter(|c| c.collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::state::{PlayerState, TileMap};

    #[test]
    fn mission_inventory_overrides_level_counts() {
        let mut state = GameState::new(
            TileMap::default(),
            PlayerState::default(),
            Position::ORIGIN,
            GameConfig::default(),
        );
        state.world.add_items("wood", 2);
        state.world.add_items("gem", 1);
        state.context.mission = Some(MissionState {
            inventory: [("wood".to_owned(), 7), ("stone".to_owned(), 3)].into(),
            ..MissionState::default()
        });

        let snapshot = Snapshot::capture(&state);

        assert_eq!(snapshot.item_count("wood"), 7);
        assert_eq!(snapshot.item_count("gem"), 1);
        assert_eq!(snapshot.item_count("stone"), 3);
        assert_eq!(snapshot.player.direction, Direction::Right);
    }
}
