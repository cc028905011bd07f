//! Level loader.
//!
//! A level file describes the terrain, the player start, the goal, the world
//! objects and collectibles placed on the map, the starting inventory and the
//! goal test suite. RON and JSON are accepted; the format is picked from the
//! file extension.
//!
//! `code_regex` tests use `regex` crate syntax, which has no lookaround or
//! backreferences.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail, ensure};
use puzzle_core::{
    Collectible, Direction, GameConfig, GameState, MapDimensions, ObjectFlags, PlayerState,
    Position, TerrainKind, TestSuite, TileMap, WorldObject,
};
use serde::Deserialize;
use serde_json::Value;

use crate::loaders::{LoadResult, read_file};

/// Level document as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    /// `(width, height)`. Ignored when `rows` is given.
    #[serde(default)]
    pub dimensions: (u32, u32),
    /// Terrain used for every tile not listed in `tiles`.
    #[serde(default)]
    pub terrain: TerrainKind,
    /// Full terrain grid, row by row.
    #[serde(default)]
    pub rows: Option<Vec<Vec<TerrainKind>>>,
    /// Per-tile overrides: `(x, y, terrain)`.
    #[serde(default)]
    pub tiles: Vec<(i32, i32, TerrainKind)>,
    pub player: PlayerSpec,
    pub goal: (i32, i32),
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpec>,
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    #[serde(default)]
    pub tests: TestSuite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSpec {
    pub position: (i32, i32),
    #[serde(default)]
    pub facing: Direction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSpec {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: String,
    pub position: (i32, i32),
    #[serde(default)]
    pub pushable: bool,
    #[serde(default)]
    pub collectable: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub locked: bool,
    /// Inventory item that opens this object. Implies a key requirement.
    #[serde(default)]
    pub key_id: Option<String>,
}

impl ObjectSpec {
    fn flags(&self) -> ObjectFlags {
        let mut flags = ObjectFlags::empty();
        flags.set(ObjectFlags::PUSHABLE, self.pushable);
        flags.set(ObjectFlags::COLLECTABLE, self.collectable);
        flags.set(ObjectFlags::OPEN, self.open);
        flags.set(ObjectFlags::LOCKED, self.locked);
        flags
    }

    fn into_object(self) -> WorldObject {
        let flags = self.flags();
        let object = WorldObject::new(self.id, self.kind, self.position.into()).with_flags(flags);
        match self.key_id {
            Some(key) => object.with_key(key),
            None => object,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectibleSpec {
    pub position: (i32, i32),
    #[serde(default = "default_collectible_kind")]
    pub kind: String,
}

fn default_collectible_kind() -> String {
    Collectible::DEFAULT_KIND.to_owned()
}

/// A level ready to hand to the runtime.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub state: GameState,
    pub tests: TestSuite,
}

impl LevelSpec {
    /// Validates the document and builds the initial game state.
    pub fn build(self, config: GameConfig) -> LoadResult<Level> {
        let mut map = match self.rows {
            Some(rows) => TileMap::from_rows(rows),
            None => {
                let (width, height) = self.dimensions;
                ensure!(
                    width > 0 && height > 0,
                    "level `{}` has empty dimensions {width}x{height}",
                    self.name
                );
                TileMap::filled(MapDimensions::new(width, height), self.terrain)
            }
        };
        for (x, y, terrain) in self.tiles {
            if !map.set(Position::new(x, y), terrain) {
                bail!("tile override ({x}, {y}) is outside level `{}`", self.name);
            }
        }

        let start = Position::from(self.player.position);
        ensure!(
            map.contains(start),
            "player start {start} is outside level `{}`",
            self.name
        );
        let goal = Position::from(self.goal);
        ensure!(
            map.contains(goal),
            "goal {goal} is outside level `{}`",
            self.name
        );

        let mut state = GameState::new(
            map,
            PlayerState::new(start, self.player.facing),
            goal,
            config,
        );

        for spec in self.objects {
            let position = Position::from(spec.position);
            ensure!(
                state.map.contains(position),
                "object `{}` at {position} is outside level `{}`",
                spec.id,
                self.name
            );
            let id = spec.id.clone();
            if state.world.add_object(spec.into_object()).is_some() {
                bail!("duplicate object `{id}` in level `{}`", self.name);
            }
        }
        state.collectibles = self
            .collectibles
            .into_iter()
            .map(|spec| Collectible::new(spec.position.into(), spec.kind))
            .collect();
        for (item, amount) in &self.inventory {
            state.world.add_items(item, *amount);
        }
        for (name, value) in self.variables {
            state.world.set_variable(name, value);
        }

        Ok(Level {
            name: self.name,
            state,
            tests: self.tests,
        })
    }
}

/// Loader for level files.
pub struct LevelLoader;

impl LevelLoader {
    /// Parse a level document. `.json` files are read as JSON, everything
    /// else as RON.
    pub fn load_spec(path: &Path) -> LoadResult<LevelSpec> {
        let content = read_file(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse level JSON {}", path.display()))
        } else {
            ron::from_str(&content)
                .with_context(|| format!("Failed to parse level RON {}", path.display()))
        }
    }

    /// Load and build a level.
    pub fn load(path: &Path, config: GameConfig) -> LoadResult<Level> {
        Self::load_spec(path)?
            .build(config)
            .with_context(|| format!("Invalid level {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use puzzle_core::TestSpec;
    use tempfile::Builder;

    use super::*;

    fn write_level(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const RON_LEVEL: &str = r#"(
        name: "river crossing",
        dimensions: (5, 3),
        terrain: grass,
        tiles: [(2, 1, water)],
        player: (position: (0, 1)),
        goal: (4, 1),
        objects: [
            (id: "door_1", kind: "door", position: (3, 0), key_id: Some("brass")),
            (id: "crate_1", kind: "crate", position: (1, 2), pushable: true),
        ],
        collectibles: [(position: (1, 0))],
        inventory: {"wood": 3, "nails": 5},
        tests: (pass_all: true, items: [{"type": "position", "target": "goal"}]),
    )"#;

    #[test]
    fn loads_ron_level() {
        let file = write_level(".ron", RON_LEVEL);
        let level = LevelLoader::load(file.path(), GameConfig::default()).unwrap();

        assert_eq!(level.name, "river crossing");
        let state = &level.state;
        assert_eq!(state.player.position, Position::new(0, 1));
        assert_eq!(state.player.facing, Direction::Right);
        assert_eq!(state.map.terrain(Position::new(2, 1)), Some(TerrainKind::Water));
        assert_eq!(state.map.terrain(Position::new(0, 0)), Some(TerrainKind::Grass));

        let door = state.world.object("door_1").unwrap();
        assert!(door.requires_key());
        assert_eq!(door.key_id.as_deref(), Some("brass"));
        assert!(state.world.object("crate_1").unwrap().is_pushable());

        assert_eq!(state.collectibles[0].kind, "gem");
        assert!(state.world.has_item("nails", 5));
        assert!(matches!(level.tests.items[0], TestSpec::Position(_)));
    }

    #[test]
    fn loads_json_level_with_rows() {
        let body = r#"{
            "name": "corridor",
            "rows": [["floor", "floor", "wall"], ["floor", "floor", "floor"]],
            "player": {"position": [0, 0], "facing": "down"},
            "goal": [2, 1],
            "tests": {"pass_all": false, "items": [{"type": "teleport"}]}
        }"#;
        let file = write_level(".json", body);
        let level = LevelLoader::load(file.path(), GameConfig::default()).unwrap();

        assert_eq!(level.state.map.dimensions(), MapDimensions::new(3, 2));
        assert_eq!(level.state.player.facing, Direction::Down);
        assert!(!level.tests.pass_all);
        assert_eq!(level.tests.items[0].kind(), "teleport");
    }

    #[test]
    fn rejects_out_of_bounds_goal() {
        let body = r#"(name: "bad", dimensions: (2, 2), player: (position: (0, 0)), goal: (5, 5))"#;
        let file = write_level(".ron", body);
        let err = LevelLoader::load(file.path(), GameConfig::default()).unwrap_err();

        assert!(format!("{err:#}").contains("goal (5, 5) is outside level `bad`"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let file = write_level(".ron", "(name: ");
        let err = LevelLoader::load_spec(file.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse level RON"));
    }
}
