use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::snapshot::Snapshot;
use super::spec::{
    CodeRegexTest, CollectiblesTest, DirectionTest, ElementStateTest, InventoryTest, PositionTest,
    TestSpec, TestSuite,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    pub message: String,
    /// Diagnostic for specs that could not be evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    fn new(kind: &str, passed: bool, message: String) -> Self {
        Self {
            kind: kind.to_owned(),
            passed,
            expected: None,
            actual: None,
            message,
            error: None,
        }
    }

    fn compared(mut self, expected: Value, actual: Value) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }

    fn failed(kind: &str, message: String, error: Option<String>) -> Self {
        Self {
            error,
            ..Self::new(kind, false, message)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub passed: bool,
    pub pass_all: bool,
    pub items: Vec<TestResult>,
    /// No specs were supplied; `passed` is the player-on-goal check.
    pub default_goal_check: bool,
}

/// Evaluates a suite against a snapshot. Never fails: problems with a single
/// spec turn into a failed result for that spec.
pub fn evaluate(suite: &TestSuite, snapshot: &Snapshot) -> TestReport {
    if suite.items.is_empty() {
        return TestReport {
            passed: snapshot.player.position == snapshot.goal,
            pass_all: suite.pass_all,
            items: Vec::new(),
            default_goal_check: true,
        };
    }

    let items: Vec<TestResult> = suite
        .items
        .iter()
        .map(|spec| evaluate_spec(spec, snapshot))
        .collect();
    let passed = if suite.pass_all {
        items.iter().all(|result| result.passed)
    } else {
        items.iter().any(|result| result.passed)
    };

    TestReport {
        passed,
        pass_all: suite.pass_all,
        items,
        default_goal_check: false,
    }
}

pub fn evaluate_spec(spec: &TestSpec, snapshot: &Snapshot) -> TestResult {
    match spec {
        TestSpec::Position(test) => position(test, snapshot),
        TestSpec::Inventory(test) => inventory(test, snapshot),
        TestSpec::Collectibles(test) => collectibles(test, snapshot),
        TestSpec::CodeRegex(test) => code_regex(test, snapshot),
        TestSpec::Direction(test) => direction(test, snapshot),
        TestSpec::ElementState(test) => element_state(test, snapshot),
        TestSpec::Unknown { kind } => {
            TestResult::failed(kind, format!("Unknown test type: {kind}"), None)
        }
        TestSpec::Malformed { kind, reason } => TestResult::failed(
            kind,
            format!("Malformed {kind} test"),
            Some(reason.clone()),
        ),
    }
}

fn position(test: &PositionTest, snapshot: &Snapshot) -> TestResult {
    let target = test.resolve(snapshot.goal);
    let actual = snapshot.player.position;
    let passed = actual == target;
    let message = if passed {
        "Reached target position".to_owned()
    } else {
        format!("Expected position {target} but player is at {actual}")
    };
    TestResult::new("position", passed, message)
        .compared(json!(target), json!(actual))
}

fn inventory(test: &InventoryTest, snapshot: &Snapshot) -> TestResult {
    let count = snapshot.item_count(&test.item);
    let (passed, expected) = match (test.min, test.max, test.exact) {
        (Some(min), _, _) => (count >= min, format!("at least {min}")),
        (None, Some(max), _) => (count <= max, format!("at most {max}")),
        (None, None, Some(exact)) => (count == exact, format!("exactly {exact}")),
        (None, None, None) => (count >= 1, "at least 1".to_owned()),
    };
    let message = if passed {
        format!("Have {count} {}", test.item)
    } else {
        format!("Expected {expected} {}, but have {count}", test.item)
    };
    TestResult::new("inventory", passed, message).compared(json!(expected), json!(count))
}

fn collectibles(test: &CollectiblesTest, snapshot: &Snapshot) -> TestResult {
    let collected = snapshot.collected().count();
    let total = snapshot.collectibles.len();

    if test.all {
        let passed = total > 0 && collected == total;
        let message = if passed {
            "All collectibles gathered".to_owned()
        } else {
            format!("Collected {collected} of {total} items")
        };
        return TestResult::new("collectibles", passed, message)
            .compared(json!(total), json!(collected));
    }

    if let Some(count) = test.count {
        let passed = collected >= count;
        let message = if passed {
            format!("Collected {collected} items")
        } else {
            format!("Need {count} items, have {collected}")
        };
        return TestResult::new("collectibles", passed, message)
            .compared(json!(count), json!(collected));
    }

    if let Some(types) = &test.types {
        let have: BTreeSet<&str> = snapshot.collected().map(|c| c.kind.as_str()).collect();
        let missing: Vec<&str> = types
            .iter()
            .map(String::as_str)
            .filter(|kind| !have.contains(kind))
            .collect();
        let passed = missing.is_empty();
        let message = if passed {
            "All required item types collected".to_owned()
        } else {
            format!("Missing item types: {}", missing.join(", "))
        };
        return TestResult::new("collectibles", passed, message)
            .compared(json!(types), json!(have));
    }

    let passed = collected > 0;
    let message = if passed {
        "At least one item collected"
    } else {
        "No items collected"
    };
    TestResult::new("collectibles", passed, message.to_owned())
        .compared(json!(1), json!(collected))
}

fn code_regex(test: &CodeRegexTest, snapshot: &Snapshot) -> TestResult {
    let regex = match build_regex(&test.pattern, test.flags.as_deref().unwrap_or_default()) {
        Ok(regex) => regex,
        Err(reason) => {
            return TestResult::failed(
                "code_regex",
                format!("Invalid regex pattern: {}", test.pattern),
                Some(reason),
            );
        }
    };

    let passed = regex.is_match(&snapshot.code);
    let message = if passed {
        test.success_message
            .clone()
            .unwrap_or_else(|| "Code matches required pattern".to_owned())
    } else {
        test.message
            .clone()
            .unwrap_or_else(|| format!("Code does not match pattern: {}", test.pattern))
    };
    let mut result = TestResult::new("code_regex", passed, message);
    result.expected = Some(json!(test.pattern));
    result
}

/// Compiles a pattern with JavaScript-style flags. `g`, `y`, `u`, `d` and `v`
/// do not change a single match test and are accepted as no-ops.
fn build_regex(pattern: &str, flags: &str) -> Result<Regex, String> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'y' | 'u' | 'd' | 'v' => {}
            other => return Err(format!("unsupported regex flag `{other}`")),
        }
    }
    builder.build().map_err(|err| err.to_string())
}

fn direction(test: &DirectionTest, snapshot: &Snapshot) -> TestResult {
    let actual = snapshot.player.direction.as_ref();
    let Some(expected) = test.expected() else {
        return TestResult::failed(
            "direction",
            format!("Expected to face an unspecified direction, but facing {actual}"),
            Some("missing `facing` or `direction`".to_owned()),
        );
    };

    let passed = expected == actual;
    let message = if passed {
        format!("Facing {expected}")
    } else {
        format!("Expected to face {expected}, but facing {actual}")
    };
    TestResult::new("direction", passed, message).compared(json!(expected), json!(actual))
}

fn element_state(test: &ElementStateTest, snapshot: &Snapshot) -> TestResult {
    let key = format!("{},{}", test.x, test.y);
    let actual = snapshot
        .element_states
        .get(&key)
        .map(|state| state.kind.as_str());
    let passed = actual == Some(test.state.as_str());
    let message = if passed {
        format!("Element at ({}, {}) is {}", test.x, test.y, test.state)
    } else {
        format!(
            "Expected element at ({}, {}) to be {}",
            test.x, test.y, test.state
        )
    };
    TestResult::new("element_state", passed, message)
        .compared(json!(test.state), json!(actual.unwrap_or("unchanged")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::evaluation::PlayerView;
    use crate::state::{Collectible, Direction, ElementState, Position};

    fn snapshot() -> Snapshot {
        Snapshot {
            player: PlayerView {
                position: Position::new(2, 2),
                direction: Direction::Right,
            },
            goal: Position::new(5, 2),
            inventory: BTreeMap::new(),
            collectibles: Vec::new(),
            code: String::new(),
            mission: None,
            element_states: BTreeMap::new(),
        }
    }

    fn suite(items: Value) -> TestSuite {
        serde_json::from_value(json!({ "items": items })).unwrap()
    }

    #[test]
    fn partial_collection_fails_all_check() {
        let mut snap = snapshot();
        snap.collectibles = vec![
            Collectible {
                collected: true,
                ..Collectible::new(Position::new(1, 1), "gem")
            },
            Collectible::new(Position::new(3, 1), "gem"),
        ];

        let report = evaluate(&suite(json!([{"type": "collectibles", "all": true}])), &snap);

        assert!(!report.passed);
        assert_eq!(report.items[0].message, "Collected 1 of 2 items");
    }

    #[test]
    fn all_check_needs_at_least_one_collectible() {
        let report = evaluate(&suite(json!([{"type": "collectibles", "all": true}])), &snapshot());
        assert!(!report.passed);
    }

    #[test]
    fn empty_suite_falls_back_to_goal() {
        let mut snap = snapshot();
        let report = evaluate(&TestSuite::default(), &snap);
        assert!(report.default_goal_check);
        assert!(!report.passed);

        snap.player.position = snap.goal;
        assert!(evaluate(&TestSuite::default(), &snap).passed);
    }

    #[test]
    fn pass_all_false_needs_any() {
        let mut tests = suite(json!([
            {"type": "direction", "facing": "up"},
            {"type": "direction", "facing": "right"},
        ]));
        assert!(!evaluate(&tests, &snapshot()).passed);
        tests.pass_all = false;
        assert!(evaluate(&tests, &snapshot()).passed);
    }

    #[test]
    fn inventory_precedence_is_min_then_max_then_exact() {
        let mut snap = snapshot();
        snap.inventory.insert("gem".into(), 3);

        let report = evaluate(
            &suite(json!([
                {"type": "inventory", "item": "gem", "min": 2, "max": 1},
                {"type": "inventory", "item": "gem", "max": 2, "exact": 3},
                {"type": "inventory", "item": "key"},
            ])),
            &snap,
        );

        let passed: Vec<bool> = report.items.iter().map(|r| r.passed).collect();
        assert_eq!(passed, [true, false, false]);
        assert_eq!(report.items[1].message, "Expected at most 2 gem, but have 3");
        assert_eq!(report.items[2].expected, Some(json!("at least 1")));
    }

    #[test]
    fn position_message_reports_both_tiles() {
        let report = evaluate(&suite(json!([{"type": "position", "target": [4, 4]}])), &snapshot());
        assert_eq!(
            report.items[0].message,
            "Expected position (4, 4) but player is at (2, 2)"
        );
    }

    #[test]
    fn code_regex_honours_flags_and_overrides() {
        let mut snap = snapshot();
        snap.code = "for i in range(3):\n    Move_Forward()".into();

        let report = evaluate(
            &suite(json!([
                {"type": "code_regex", "pattern": "move_forward", "flags": "i",
                 "success_message": "Loop uses move"},
                {"type": "code_regex", "pattern": "while", "message": "Use a while loop"},
            ])),
            &snap,
        );

        assert!(report.items[0].passed);
        assert_eq!(report.items[0].message, "Loop uses move");
        assert!(!report.items[1].passed);
        assert_eq!(report.items[1].message, "Use a while loop");
    }

    #[test]
    fn invalid_regex_degrades_to_failed_record() {
        let report = evaluate(
            &suite(json!([{"type": "code_regex", "pattern": "(unclosed"}])),
            &snapshot(),
        );
        let result = &report.items[0];
        assert!(!result.passed);
        assert_eq!(result.message, "Invalid regex pattern: (unclosed");
        assert!(result.error.is_some());
    }

    #[test]
    fn lookaround_and_backreferences_are_rejected_as_invalid() {
        let mut snap = snapshot();
        snap.code = "move_forward(); move_forward();".into();

        let report = evaluate(
            &suite(json!([
                {"type": "code_regex", "pattern": "move(?=_forward)"},
                {"type": "code_regex", "pattern": "(move_forward).*\\1"},
            ])),
            &snap,
        );

        assert!(!report.passed);
        for result in &report.items {
            assert!(result.message.starts_with("Invalid regex pattern"));
            assert!(result.error.is_some());
        }
    }

    #[test]
    fn element_state_defaults_to_unchanged() {
        let mut snap = snapshot();
        let tests = suite(json!([{"type": "element_state", "x": 1, "y": 2, "state": "lit"}]));

        let report = evaluate(&tests, &snap);
        assert_eq!(report.items[0].actual, Some(json!("unchanged")));
        assert!(!report.passed);

        snap.element_states
            .insert(Position::new(1, 2).key(), ElementState::new("lit"));
        let report = evaluate(&tests, &snap);
        assert!(report.passed);
        assert_eq!(report.items[0].message, "Element at (1, 2) is lit");
    }

    #[test]
    fn unknown_and_malformed_specs_fail_without_panicking() {
        let report = evaluate(
            &suite(json!([
                {"type": "fly"},
                {"type": "inventory"},
                {"no_type": true},
            ])),
            &snapshot(),
        );
        assert_eq!(report.items.len(), 3);
        assert!(report.items.iter().all(|r| !r.passed));
        assert_eq!(report.items[0].message, "Unknown test type: fly");
        assert!(report.items[1].error.is_some());
    }

    #[test]
    fn missing_types_are_listed() {
        let mut snap = snapshot();
        snap.collectibles = vec![Collectible {
            collected: true,
            ..Collectible::new(Position::ORIGIN, "gem")
        }];
        let report = evaluate(
            &suite(json!([{"type": "collectibles", "types": ["gem", "coin", "star"]}])),
            &snap,
        );
        assert_eq!(report.items[0].message, "Missing item types: coin, star");
    }
}
