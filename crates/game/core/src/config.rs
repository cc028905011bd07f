/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum number of trigger passes per evaluation. Nested evaluation
    /// requests raised while a pass is running are coalesced into one extra
    /// pass; this bounds the chain when a trigger keeps re-satisfying itself.
    pub trigger_pass_limit: u32,

    /// Pixels per tile, used to express in-flight offsets.
    pub tile_size: u32,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TRIGGER_PASS_LIMIT: u32 = 8;
    pub const DEFAULT_TILE_SIZE: u32 = 32;

    pub fn new() -> Self {
        Self {
            trigger_pass_limit: Self::DEFAULT_TRIGGER_PASS_LIMIT,
            tile_size: Self::DEFAULT_TILE_SIZE,
        }
    }

    pub fn with_trigger_pass_limit(trigger_pass_limit: u32) -> Self {
        Self {
            trigger_pass_limit: trigger_pass_limit.max(1),
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
