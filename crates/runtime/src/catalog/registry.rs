//! Name-keyed registry of actions.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::GameAction;
use super::actions::{
    BuildAction, CollectAction, DoorAction, MoveForwardAction, PushAction, SpeakAction, TurnAction,
};

/// Registry that maps action names to their implementations.
///
/// Registration is idempotent by name: registering an existing name replaces
/// the previous entry. Lookups of unknown names return `None`; there is no
/// fallback action.
#[derive(Clone, Default)]
pub struct ActionCatalog {
    entries: BTreeMap<String, Arc<dyn GameAction>>,
}

impl ActionCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the canonical actions registered.
    ///
    /// - `move_forward`, `turn_left`, `turn_right` (movement)
    /// - `push`, `open`, `close`, `collect` (interaction)
    /// - `build` (construction)
    /// - `speak` (communication)
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register("move_forward", MoveForwardAction);
        catalog.register("turn_left", TurnAction::LEFT);
        catalog.register("turn_right", TurnAction::RIGHT);
        catalog.register("push", PushAction);
        catalog.register("open", DoorAction::OPEN);
        catalog.register("close", DoorAction::CLOSE);
        catalog.register("collect", CollectAction);
        catalog.register("build", BuildAction);
        catalog.register("speak", SpeakAction);
        catalog
    }

    /// Inserts or replaces the action registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, action: impl GameAction + 'static) {
        self.register_arc(name, Arc::new(action));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, action: Arc<dyn GameAction>) {
        let name = name.into();
        let replaced = self.entries.insert(name.clone(), action).is_some();
        debug!(target: "runtime::catalog", action = %name, replaced, "registered action");
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn GameAction>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries, ordered by name.
    pub fn get_all(&self) -> impl Iterator<Item = (&str, &Arc<dyn GameAction>)> + '_ {
        self.entries
            .iter()
            .map(|(name, action)| (name.as_str(), action))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ActionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCatalog")
            .field("actions", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::ActionCategory;

    use super::*;

    #[test]
    fn defaults_cover_canonical_actions() {
        let catalog = ActionCatalog::with_defaults();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            [
                "build",
                "close",
                "collect",
                "move_forward",
                "open",
                "push",
                "speak",
                "turn_left",
                "turn_right"
            ]
        );
        assert_eq!(
            catalog.get("build").map(|a| a.category()),
            Some(ActionCategory::Construction)
        );
        assert!(catalog.get("fly").is_none());
    }

    #[test]
    fn register_overwrites_by_name() {
        let mut catalog = ActionCatalog::with_defaults();
        let before = catalog.len();
        catalog.register("push", SpeakAction);
        assert_eq!(catalog.len(), before);
        assert_eq!(
            catalog.get("push").map(|a| a.category()),
            Some(ActionCategory::Communication)
        );
    }
}
