//! Positioned, interactive entities: doors, crates, keys, gems, built structures.

use serde::{Deserialize, Serialize};

use super::Position;

bitflags::bitflags! {
    /// Behavioural flags carried by a [`WorldObject`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ObjectFlags: u8 {
        const PUSHABLE = 1 << 0;
        const COLLECTABLE = 1 << 1;
        const OPEN = 1 << 2;
        const LOCKED = 1 << 3;
        const REQUIRES_KEY = 1 << 4;
        const BUILT = 1 << 5;
    }
}

/// Object kind for doors. Kinds are free-form strings supplied by level data.
pub const DOOR_KIND: &str = "door";

/// In-flight presentation state. Excluded from logical equality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Logical position the current animation started from.
    pub anchor: Position,
    /// Pixel offset relative to `anchor`.
    pub offset: (f32, f32),
    pub opacity: f32,
}

impl VisualState {
    pub const fn at_rest(anchor: Position) -> Self {
        Self {
            anchor,
            offset: (0.0, 0.0),
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredObject")]
pub struct WorldObject {
    pub id: String,
    pub kind: String,
    pub position: Position,
    #[serde(default)]
    pub flags: ObjectFlags,
    /// Inventory item type that unlocks this object when `REQUIRES_KEY` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    pub visual: VisualState,
}

/// Serialized form of [`WorldObject`]; the visual state may be omitted and
/// then rests on the logical position.
#[derive(Deserialize)]
struct StoredObject {
    id: String,
    kind: String,
    position: Position,
    #[serde(default)]
    flags: ObjectFlags,
    #[serde(default)]
    key_id: Option<String>,
    #[serde(default)]
    visual: Option<VisualState>,
}

impl From<StoredObject> for WorldObject {
    fn from(stored: StoredObject) -> Self {
        Self {
            visual: stored
                .visual
                .unwrap_or(VisualState::at_rest(stored.position)),
            id: stored.id,
            kind: stored.kind,
            position: stored.position,
            flags: stored.flags,
            key_id: stored.key_id,
        }
    }
}

impl WorldObject {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position,
            flags: ObjectFlags::empty(),
            key_id: None,
            visual: VisualState::at_rest(position),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Marks the object as key-gated by `key_id`.
    #[must_use]
    pub fn with_key(mut self, key_id: impl Into<String>) -> Self {
        self.flags |= ObjectFlags::REQUIRES_KEY;
        self.key_id = Some(key_id.into());
        self
    }

    pub fn is_pushable(&self) -> bool {
        self.flags.contains(ObjectFlags::PUSHABLE)
    }

    pub fn is_collectable(&self) -> bool {
        self.flags.contains(ObjectFlags::COLLECTABLE)
    }

    pub fn is_open(&self) -> bool {
        self.flags.contains(ObjectFlags::OPEN)
    }

    pub fn is_built(&self) -> bool {
        self.flags.contains(ObjectFlags::BUILT)
    }

    pub fn requires_key(&self) -> bool {
        self.flags.contains(ObjectFlags::REQUIRES_KEY)
    }

    /// Locked without a key requirement: nothing in the inventory opens it.
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(ObjectFlags::LOCKED) && !self.requires_key()
    }

    pub fn is_door(&self) -> bool {
        self.kind == DOOR_KIND
    }

    /// Whether the object occupies its tile for movement purposes.
    ///
    /// Closed doors, pushable objects (crates, boxes) and built structures
    /// other than traversable ones block the tile.
    pub fn blocks_movement(&self) -> bool {
        if self.is_door() {
            return !self.is_open();
        }
        if self.is_pushable() || matches!(self.kind.as_str(), "box" | "crate") {
            return true;
        }
        self.is_built() && !is_traversable_structure(&self.kind)
    }
}

/// Logical equality: identity, kind, position, flags and key. The in-flight
/// visual state is ignored.
impl PartialEq for WorldObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.position == other.position
            && self.flags == other.flags
            && self.key_id == other.key_id
    }
}

impl Eq for WorldObject {}

/// Structures that can be walked over once built.
pub fn is_traversable_structure(kind: &str) -> bool {
    matches!(kind, "bridge" | "road")
}
