//! Declarative goal checks as supplied by level data.
//!
//! Specs are decoded through a `serde_json::Value` so that a spec with an
//! unknown kind or bad parameters still loads; it becomes an [`TestSpec::Unknown`]
//! or [`TestSpec::Malformed`] entry that evaluates to a failed result.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::state::Position;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionTarget {
    /// Only `"goal"` is meaningful; other names fall back to `x`/`y` or the goal.
    Named(String),
    Pair([i32; 2]),
    Point(Position),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PositionTest {
    #[serde(default)]
    pub target: Option<PositionTarget>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
}

impl PositionTest {
    pub fn resolve(&self, goal: Position) -> Position {
        match &self.target {
            Some(PositionTarget::Named(name)) if name == "goal" => goal,
            Some(PositionTarget::Pair([x, y])) => Position::new(*x, *y),
            Some(PositionTarget::Point(point)) => *point,
            _ => match (self.x, self.y) {
                (Some(x), Some(y)) => Position::new(x, y),
                _ => goal,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InventoryTest {
    pub item: String,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub exact: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CollectiblesTest {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
}

/// Matches the session source text against `pattern`.
///
/// Patterns use the `regex` crate syntax: linear-time matching without
/// lookaround (`(?=`, `(?!`, `(?<=`, `(?<!`) or backreferences (`\1`). Such
/// patterns fail the test as "Invalid regex pattern".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CodeRegexTest {
    pub pattern: String,
    #[serde(default)]
    pub flags: Option<String>,
    /// Failure message override.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success_message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DirectionTest {
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

impl DirectionTest {
    pub fn expected(&self) -> Option<&str> {
        self.facing.as_deref().or(self.direction.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ElementStateTest {
    pub x: i32,
    pub y: i32,
    pub state: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestSpec {
    Position(PositionTest),
    Inventory(InventoryTest),
    Collectibles(CollectiblesTest),
    CodeRegex(CodeRegexTest),
    Direction(DirectionTest),
    ElementState(ElementStateTest),
    Unknown { kind: String },
    Malformed { kind: String, reason: String },
}

impl TestSpec {
    pub fn from_value(value: Value) -> Self {
        let Some(kind) = value.get("type").and_then(Value::as_str).map(str::to_owned) else {
            return TestSpec::Malformed {
                kind: String::new(),
                reason: "missing `type` field".to_owned(),
            };
        };

        let parsed = match kind.as_str() {
            "position" => serde_json::from_value(value).map(TestSpec::Position),
            "inventory" => serde_json::from_value(value).map(TestSpec::Inventory),
            "collectibles" => serde_json::from_value(value).map(TestSpec::Collectibles),
            "code_regex" => serde_json::from_value(value).map(TestSpec::CodeRegex),
            "direction" => serde_json::from_value(value).map(TestSpec::Direction),
            "element_state" => serde_json::from_value(value).map(TestSpec::ElementState),
            _ => return TestSpec::Unknown { kind },
        };
        parsed.unwrap_or_else(|err| TestSpec::Malformed {
            kind,
            reason: err.to_string(),
        })
    }

    /// Tag written to results (`"position"`, `"code_regex"`, ...).
    pub fn kind(&self) -> &str {
        match self {
            TestSpec::Position(_) => "position",
            TestSpec::Inventory(_) => "inventory",
            TestSpec::Collectibles(_) => "collectibles",
            TestSpec::CodeRegex(_) => "code_regex",
            TestSpec::Direction(_) => "direction",
            TestSpec::ElementState(_) => "element_state",
            TestSpec::Unknown { kind } | TestSpec::Malformed { kind, .. } => kind,
        }
    }
}

impl<'de> Deserialize<'de> for TestSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(TestSpec::from_value)
    }
}

/// Level test suite. With no items the evaluator falls back to the goal check.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TestSuite {
    #[serde(default = "default_pass_all")]
    pub pass_all: bool,
    #[serde(default)]
    pub items: Vec<TestSpec>,
}

fn default_pass_all() -> bool {
    true
}

impl TestSuite {
    pub fn new(items: Vec<TestSpec>) -> Self {
        Self {
            pass_all: true,
            items,
        }
    }

    #[must_use]
    pub fn any_of(mut self) -> Self {
        self.pass_all = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for TestSuite {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
