use serde::{Deserialize, Serialize};

use super::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical terrain classes for map tiles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum TerrainKind {
    #[default]
    Floor,
    Grass,
    Path,
    Sand,
    Water,
    Wall,
    Void,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            TerrainKind::Floor | TerrainKind::Grass | TerrainKind::Path | TerrainKind::Sand
        )
    }
}

/// Rectangular terrain grid, row-major.
///
/// Unlike objects, terrain is mutable only through construction (bridges and
/// roads rewrite the tile they are built on).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
}

impl TileMap {
    /// Creates a map filled with `fill`.
    pub fn filled(dimensions: MapDimensions, fill: TerrainKind) -> Self {
        let len = dimensions.width as usize * dimensions.height as usize;
        Self {
            dimensions,
            tiles: vec![fill; len],
        }
    }

    /// Builds a map from rows of terrain. Rows shorter than the widest row
    /// are padded with [`TerrainKind::Void`].
    pub fn from_rows(rows: Vec<Vec<TerrainKind>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut map = Self::filled(MapDimensions::new(width, height), TerrainKind::Void);
        for (y, row) in rows.into_iter().enumerate() {
            for (x, terrain) in row.into_iter().enumerate() {
                map.set(Position::new(x as i32, y as i32), terrain);
            }
        }
        map
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.index(position).map(|index| self.tiles[index])
    }

    /// Rewrites a tile. Returns `false` if the position is out of bounds.
    pub fn set(&mut self, position: Position, terrain: TerrainKind) -> bool {
        match self.index(position) {
            Some(index) => {
                self.tiles[index] = terrain;
                true
            }
            None => false,
        }
    }

    pub fn is_passable(&self, position: Position) -> bool {
        self.terrain(position)
            .map(TerrainKind::is_passable)
            .unwrap_or(false)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        Some(position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::filled(MapDimensions::new(0, 0), TerrainKind::Void)
    }
}
