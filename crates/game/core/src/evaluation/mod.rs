//! Declarative goal checking.
//!
//! A [`Snapshot`] is captured from the live [`crate::GameState`] and handed to
//! [`evaluate`] together with the level's [`TestSuite`]. Evaluation is pure
//! and never fails; malformed specs show up as failed results.

mod evaluate;
mod snapshot;
mod spec;

pub use evaluate::{TestReport, TestResult, evaluate, evaluate_spec};
pub use snapshot::{PlayerView, Snapshot};
pub use spec::{
    CodeRegexTest, CollectiblesTest, DirectionTest, ElementStateTest, InventoryTest,
    PositionTarget, PositionTest, TestSpec, TestSuite,
};
