//! Authoritative store of objects, inventory, variables and triggers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::StateError;
use super::trigger::{Trigger, TriggerId, TriggerReport, TriggerSet};
use super::types::{Inventory, Position, Requirements, WorldObject};
use crate::config::GameConfig;

/// Plain-data export of the three persistent stores.
///
/// Triggers are closures and are never part of the export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub objects: Vec<(String, WorldObject)>,
    #[serde(default)]
    pub inventory: Vec<(String, u32)>,
    #[serde(default)]
    pub variables: Vec<(String, Value)>,
}

pub struct WorldState {
    pub(crate) config: GameConfig,
    /// Insertion-ordered; position lookups return the first match.
    objects: Vec<WorldObject>,
    inventory: Inventory,
    variables: BTreeMap<String, Value>,
    pub(crate) triggers: TriggerSet,
}

impl WorldState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
            inventory: Inventory::new(),
            variables: BTreeMap::new(),
            triggers: TriggerSet::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    // ===== objects =====

    /// Inserts an object, replacing any existing object with the same id in
    /// place. Returns the replaced object.
    pub fn add_object(&mut self, object: WorldObject) -> Option<WorldObject> {
        match self.objects.iter_mut().find(|o| o.id == object.id) {
            Some(slot) => Some(std::mem::replace(slot, object)),
            None => {
                self.objects.push(object);
                None
            }
        }
    }

    pub fn remove_object(&mut self, id: &str) -> Option<WorldObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, id: &str) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// First object (in insertion order) occupying `position`.
    pub fn object_at(&self, position: Position) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.position == position)
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> + '_ {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Objects inside the inclusive rectangle spanned by `a` and `b`.
    pub fn objects_in_area(&self, a: Position, b: Position) -> Vec<&WorldObject> {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        self.objects
            .iter()
            .filter(|o| {
                (min_x..=max_x).contains(&o.position.x) && (min_y..=max_y).contains(&o.position.y)
            })
            .collect()
    }

    pub fn doors(&self) -> Vec<&WorldObject> {
        self.objects.iter().filter(|o| o.is_door()).collect()
    }

    pub fn collectables(&self) -> Vec<&WorldObject> {
        self.objects.iter().filter(|o| o.is_collectable()).collect()
    }

    pub fn pushables(&self) -> Vec<&WorldObject> {
        self.objects.iter().filter(|o| o.is_pushable()).collect()
    }

    /// Whether the first object at `position` blocks movement onto it.
    pub fn is_blocked(&self, position: Position) -> bool {
        self.object_at(position)
            .is_some_and(WorldObject::blocks_movement)
    }

    pub fn update_object<F>(&mut self, id: &str, update: F) -> Result<(), StateError>
    where
        F: FnOnce(&mut WorldObject),
    {
        let object = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StateError::ObjectNotFound(id.to_owned()))?;
        update(object);
        Ok(())
    }

    /// Moves an object.
    ///
    /// A temporary update only shifts the in-flight visual offset (in pixels,
    /// relative to the logical position) and leaves the logical position
    /// untouched. A permanent update moves the object and resets its visual
    /// state to rest.
    pub fn update_object_position(
        &mut self,
        id: &str,
        position: Position,
        temporary: bool,
    ) -> Result<(), StateError> {
        let tile = self.config.tile_size as f32;
        self.update_object(id, |object| {
            if temporary {
                object.visual.anchor = object.position;
                object.visual.offset = (
                    (position.x - object.position.x) as f32 * tile,
                    (position.y - object.position.y) as f32 * tile,
                );
            } else {
                object.position = position;
                object.visual.anchor = position;
                object.visual.offset = (0.0, 0.0);
            }
        })
    }

    pub fn move_object(&mut self, id: &str, position: Position) -> Result<(), StateError> {
        self.update_object_position(id, position, false)
    }

    /// Returns `prefix_N` for the smallest `N >= 1` not used by any object.
    pub fn unique_object_id(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{prefix}_{n}"))
            .find(|candidate| self.object(candidate).is_none())
            .unwrap_or_else(|| prefix.to_owned())
    }

    // ===== inventory =====

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Removes the object from the store and adds one unit of its kind to the
    /// inventory. Returns the collected object.
    pub fn add_to_inventory(&mut self, id: &str) -> Result<WorldObject, StateError> {
        let object = self
            .remove_object(id)
            .ok_or_else(|| StateError::ObjectNotFound(id.to_owned()))?;
        self.inventory.add(&object.kind, 1);
        Ok(object)
    }

    pub fn add_items(&mut self, item: &str, amount: u32) {
        self.inventory.add(item, amount);
    }

    pub fn remove_from_inventory(&mut self, item: &str, amount: u32) -> Result<u32, StateError> {
        Ok(self.inventory.remove(item, amount)?)
    }

    pub fn has_item(&self, item: &str, amount: u32) -> bool {
        self.inventory.has(item, amount)
    }

    pub fn has_resources(&self, requirements: &Requirements) -> bool {
        self.inventory.has_all(requirements)
    }

    /// Deducts all requirements, or nothing when any one is short.
    pub fn consume_resources(&mut self, requirements: &Requirements) -> Result<(), StateError> {
        Ok(self.inventory.consume_all(requirements)?)
    }

    // ===== variables =====

    /// Stores a variable and immediately evaluates triggers.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) -> TriggerReport {
        self.variables.insert(name.into(), value);
        self.check_triggers()
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ===== triggers =====

    pub fn register_trigger(&mut self, trigger: Trigger) -> TriggerId {
        self.triggers.insert(trigger)
    }

    pub fn remove_trigger(&mut self, id: TriggerId) -> bool {
        self.triggers.remove(id)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn trigger_ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.triggers.ids()
    }

    /// `once` triggers that have fired and are no longer armed.
    pub fn spent_trigger_ids(&self) -> Vec<TriggerId> {
        self.triggers.spent_ids()
    }

    /// Re-arms every spent trigger missing from `keep_spent`. Used when
    /// rewinding to a point where those triggers had not fired yet.
    pub fn rearm_triggers(&mut self, keep_spent: &[TriggerId]) -> usize {
        self.triggers.rearm_except(keep_spent)
    }

    // ===== persistence =====

    pub fn serialize(&self) -> WorldData {
        WorldData {
            objects: self
                .objects
                .iter()
                .map(|o| (o.id.clone(), o.clone()))
                .collect(),
            inventory: self
                .inventory
                .iter()
                .map(|(item, count)| (item.to_owned(), count))
                .collect(),
            variables: self
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Replaces objects, inventory and variables wholesale. Registered
    /// triggers are left in place.
    pub fn deserialize(&mut self, data: WorldData) {
        self.objects.clear();
        for (id, mut object) in data.objects {
            object.id = id;
            self.add_object(object);
        }
        self.inventory = data.inventory.into_iter().collect();
        self.variables = data.variables.into_iter().collect();
    }

    /// Clears every store, triggers included.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.inventory.clear();
        self.variables.clear();
        self.triggers.clear();
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("objects", &self.objects)
            .field("inventory", &self.inventory)
            .field("variables", &self.variables)
            .field("triggers", &self.triggers.len())
            .finish()
    }
}

/// Human-readable dump used for debugging.
impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "objects ({}):", self.objects.len())?;
        for object in &self.objects {
            writeln!(
                f,
                "  {} [{}] at {} flags={:?}",
                object.id, object.kind, object.position, object.flags
            )?;
        }
        writeln!(f, "inventory:")?;
        for (item, count) in self.inventory.iter() {
            writeln!(f, "  {item}: {count}")?;
        }
        writeln!(f, "variables:")?;
        for (name, value) in &self.variables {
            writeln!(f, "  {name} = {value}")?;
        }
        write!(f, "triggers: {}", self.triggers.len())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::types::ObjectFlags;

    fn gem(id: &str, x: i32, y: i32) -> WorldObject {
        WorldObject::new(id, "gem", Position::new(x, y)).with_flags(ObjectFlags::COLLECTABLE)
    }

    #[test]
    fn object_at_returns_first_inserted_match() {
        let mut world = WorldState::default();
        world.add_object(gem("a", 1, 1));
        world.add_object(WorldObject::new("b", "crate", Position::new(1, 1)));

        assert_eq!(world.object_at(Position::new(1, 1)).map(|o| o.id.as_str()), Some("a"));
        assert!(world.object_at(Position::new(2, 2)).is_none());
    }

    #[test]
    fn add_object_replaces_same_id_in_place() {
        let mut world = WorldState::default();
        world.add_object(gem("a", 0, 0));
        world.add_object(gem("b", 1, 0));
        let replaced = world.add_object(gem("a", 5, 5));

        assert!(replaced.is_some());
        let ids: Vec<_> = world.objects().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(world.object("a").map(|o| o.position), Some(Position::new(5, 5)));
    }

    #[test]
    fn collecting_moves_object_into_inventory() {
        let mut world = WorldState::default();
        world.add_object(gem("gem_1", 2, 0));

        let collected = world.add_to_inventory("gem_1").unwrap();

        assert_eq!(collected.kind, "gem");
        assert!(world.object("gem_1").is_none());
        assert_eq!(world.inventory().count("gem"), 1);
        assert!(matches!(
            world.add_to_inventory("gem_1"),
            Err(StateError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn temporary_position_only_moves_visual_offset() {
        let mut world = WorldState::default();
        world.add_object(WorldObject::new("crate_1", "crate", Position::new(2, 2)));

        world
            .update_object_position("crate_1", Position::new(3, 2), true)
            .unwrap();
        let object = world.object("crate_1").unwrap();
        assert_eq!(object.position, Position::new(2, 2));
        assert_eq!(object.visual.offset, (32.0, 0.0));

        world.move_object("crate_1", Position::new(3, 2)).unwrap();
        let object = world.object("crate_1").unwrap();
        assert_eq!(object.position, Position::new(3, 2));
        assert_eq!(object.visual.offset, (0.0, 0.0));
    }

    #[test]
    fn serialize_then_deserialize_preserves_stores() {
        let mut world = WorldState::default();
        world.add_object(gem("gem_1", 1, 0));
        world.add_object(WorldObject::new("door_1", "door", Position::new(3, 0)).with_key("key"));
        world.add_items("wood", 4);
        world.set_variable("lever", json!({"pulled": true}));

        let data = world.serialize();
        let mut restored = WorldState::default();
        restored.add_items("stale", 9);
        restored.deserialize(data.clone());

        assert_eq!(restored.serialize(), data);
        assert_eq!(restored.inventory().count("stale"), 0);
    }

    #[test]
    fn deserialize_keeps_triggers() {
        let mut world = WorldState::default();
        world.register_trigger(Trigger::new(|_| false, |_| {}));
        world.deserialize(WorldData::default());
        assert_eq!(world.trigger_count(), 1);

        world.reset();
        assert_eq!(world.trigger_count(), 0);
    }

    #[test]
    fn unique_object_id_skips_taken_suffixes() {
        let mut world = WorldState::default();
        world.add_object(WorldObject::new("bridge_1", "bridge", Position::ORIGIN));
        assert_eq!(world.unique_object_id("bridge"), "bridge_2");
        assert_eq!(world.unique_object_id("road"), "road_1");
    }

    #[test]
    fn area_query_is_inclusive_and_order_insensitive() {
        let mut world = WorldState::default();
        world.add_object(gem("a", 0, 0));
        world.add_object(gem("b", 2, 2));
        world.add_object(gem("c", 3, 3));

        let hits = world.objects_in_area(Position::new(2, 2), Position::new(0, 0));
        assert_eq!(hits.len(), 2);
    }
}
