//! Events broadcast to runtime subscribers.
use puzzle_core::TestReport;
use serde::Serialize;

use crate::executor::ActionRecord;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// An action finished (successfully or not) and was appended to history.
    ActionRecorded { record: ActionRecord },

    /// The level's tests passed for the first time.
    LevelCompleted { report: TestReport },

    /// The last history entry was popped. `restored` is false when the entry
    /// carried no checkpoint (failed actions).
    UndoApplied { record: ActionRecord, restored: bool },
}
