//! Reactive rules evaluated against the world store.
//!
//! A trigger pairs a condition with an action. Evaluation runs in passes: each
//! pass walks the registered triggers in registration order and fires every
//! trigger whose condition holds. Evaluation requests raised from inside a
//! trigger action (for example through `set_variable`) do not recurse; they
//! are coalesced into one extra pass once the current pass completes, and the
//! number of passes is capped by `GameConfig::trigger_pass_limit`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::world::WorldState;

pub type TriggerCondition = Box<dyn Fn(&WorldState) -> bool + Send + Sync>;
pub type TriggerAction = Box<dyn FnMut(&mut WorldState) + Send + Sync>;

/// Generated identifier for a registered trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u64);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger_{}", self.0)
    }
}

pub struct Trigger {
    condition: TriggerCondition,
    action: TriggerAction,
    once: bool,
}

impl Trigger {
    /// Creates a trigger that stays registered after firing.
    pub fn new<C, A>(condition: C, action: A) -> Self
    where
        C: Fn(&WorldState) -> bool + Send + Sync + 'static,
        A: FnMut(&mut WorldState) + Send + Sync + 'static,
    {
        Self {
            condition: Box::new(condition),
            action: Box::new(action),
            once: false,
        }
    }

    /// Creates a trigger that removes itself after its first firing.
    pub fn once<C, A>(condition: C, action: A) -> Self
    where
        C: Fn(&WorldState) -> bool + Send + Sync + 'static,
        A: FnMut(&mut WorldState) + Send + Sync + 'static,
    {
        Self {
            once: true,
            ..Self::new(condition, action)
        }
    }

    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

/// Outcome of one `check_triggers` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TriggerReport {
    /// Trigger actions fired across all passes.
    pub fired: u32,
    /// Passes executed (0 when the request was deferred).
    pub passes: u32,
    /// The pass limit was reached while another re-check was still pending.
    pub saturated: bool,
    /// The call happened during an evaluation and was folded into it.
    pub deferred: bool,
}

impl TriggerReport {
    pub(crate) fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }
}

/// Registered triggers plus the bookkeeping for guarded evaluation.
#[derive(Default)]
pub(crate) struct TriggerSet {
    entries: Vec<(TriggerId, Trigger)>,
    /// `once` triggers that already fired, kept so a restore can re-arm them.
    spent: Vec<(TriggerId, Trigger)>,
    next_id: u64,
    evaluating: bool,
    recheck_requested: bool,
    /// Triggers taken out of `entries` for the running pass.
    in_pass: BTreeSet<TriggerId>,
    /// Removals requested for triggers taken out for the running pass.
    removed: BTreeSet<TriggerId>,
    /// Bumped by `clear`, so a pass can tell the set was reset under it.
    epoch: u64,
}

impl TriggerSet {
    pub(crate) fn insert(&mut self, trigger: Trigger) -> TriggerId {
        self.next_id += 1;
        let id = TriggerId(self.next_id);
        self.entries.push((id, trigger));
        id
    }

    /// Unregisters `id`. Returns `true` only when the trigger was armed.
    pub(crate) fn remove(&mut self, id: TriggerId) -> bool {
        if let Some(index) = self.entries.iter().position(|(entry, _)| *entry == id) {
            self.entries.remove(index);
            return true;
        }
        // A spent trigger is no longer armed; dropping it stops a later re-arm.
        self.spent.retain(|(entry, _)| *entry != id);
        if self.evaluating && self.in_pass.contains(&id) {
            return self.removed.insert(id);
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub(crate) fn spent_ids(&self) -> Vec<TriggerId> {
        self.spent.iter().map(|(id, _)| *id).collect()
    }

    /// Moves spent triggers not listed in `keep_spent` back into the armed
    /// set, in registration order. Returns how many were re-armed.
    pub(crate) fn rearm_except(&mut self, keep_spent: &[TriggerId]) -> usize {
        let (rearmed, spent): (Vec<_>, Vec<_>) = std::mem::take(&mut self.spent)
            .into_iter()
            .partition(|(id, _)| !keep_spent.contains(id));
        self.spent = spent;
        let count = rearmed.len();
        if count > 0 {
            self.entries.extend(rearmed);
            // Ids are handed out in increasing order.
            self.entries.sort_by_key(|(id, _)| *id);
        }
        count
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.spent.clear();
        self.in_pass.clear();
        self.removed.clear();
        self.recheck_requested = false;
        self.epoch += 1;
    }
}

impl WorldState {
    /// Evaluates all triggers, firing those whose condition holds.
    ///
    /// Re-entrant calls made by trigger actions return immediately with a
    /// `deferred` report and schedule one more pass instead.
    pub fn check_triggers(&mut self) -> TriggerReport {
        if self.triggers.evaluating {
            self.triggers.recheck_requested = true;
            return TriggerReport::deferred();
        }

        self.triggers.evaluating = true;
        let limit = self.config.trigger_pass_limit.max(1);
        let mut report = TriggerReport::default();

        loop {
            self.triggers.recheck_requested = false;
            report.passes += 1;
            report.fired += self.run_trigger_pass();

            if !self.triggers.recheck_requested {
                break;
            }
            if report.passes >= limit {
                self.triggers.recheck_requested = false;
                report.saturated = true;
                break;
            }
        }

        self.triggers.evaluating = false;
        report
    }

    fn run_trigger_pass(&mut self) -> u32 {
        let epoch = self.triggers.epoch;
        let pending = std::mem::take(&mut self.triggers.entries);
        self.triggers.in_pass = pending.iter().map(|(id, _)| *id).collect();
        let mut kept = Vec::with_capacity(pending.len());
        let mut fired = 0;

        for (id, mut trigger) in pending {
            if self.triggers.removed.remove(&id) {
                continue;
            }
            if (trigger.condition)(self) {
                (trigger.action)(self);
                fired += 1;
                if self.triggers.epoch != epoch {
                    // Reset from inside a trigger action: the rest of the pass is gone.
                    return fired;
                }
                if trigger.once {
                    if !self.triggers.removed.remove(&id) {
                        self.triggers.spent.push((id, trigger));
                    }
                    continue;
                }
            }
            kept.push((id, trigger));
        }

        self.triggers.in_pass.clear();
        let added = std::mem::take(&mut self.triggers.entries);
        let removed = std::mem::take(&mut self.triggers.removed);
        kept.retain(|(id, _)| !removed.contains(id));
        kept.extend(added);
        self.triggers.entries = kept;
        fired
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use serde_json::json;

    use super::*;

    fn counter() -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        let c = Arc::new(AtomicU32::new(0));
        (c.clone(), c)
    }

    #[test]
    fn once_trigger_fires_a_single_time() {
        let mut world = WorldState::default();
        let (count, seen) = counter();
        world.register_trigger(Trigger::once(
            |w| w.inventory().count("wood") >= 3,
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            },
        ));

        world.add_items("wood", 3);
        world.check_triggers();
        world.check_triggers();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(world.trigger_count(), 0);
    }

    #[test]
    fn persistent_trigger_fires_each_time_condition_holds() {
        let mut world = WorldState::default();
        let (count, seen) = counter();
        world.register_trigger(Trigger::new(
            |w| w.variable("lever").is_some(),
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            },
        ));

        world.check_triggers();
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        world.set_variable("lever", json!(true));
        world.check_triggers();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn self_resatisfying_trigger_is_bounded() {
        let mut world = WorldState::default();
        let (count, seen) = counter();
        world.register_trigger(Trigger::new(
            |_| true,
            move |w| {
                let n = count.fetch_add(1, Ordering::SeqCst);
                w.set_variable("ticks", json!(n + 1));
            },
        ));

        let report = world.check_triggers();

        let limit = world.config().trigger_pass_limit;
        assert!(report.saturated);
        assert_eq!(report.passes, limit);
        assert_eq!(seen.load(Ordering::SeqCst), limit);
        assert_eq!(world.variable("ticks"), Some(&json!(limit)));
    }

    #[test]
    fn nested_request_is_coalesced_into_one_recheck() {
        let mut world = WorldState::default();
        world.register_trigger(Trigger::once(
            |w| w.variable("stage").is_none(),
            |w| {
                w.set_variable("stage", json!(1));
            },
        ));
        world.register_trigger(Trigger::once(
            |w| w.variable("stage") == Some(&json!(1)) && w.variable("bonus").is_none(),
            |w| {
                w.set_variable("bonus", json!("unlocked"));
            },
        ));

        let report = world.check_triggers();

        // Second trigger already sees stage=1 in the first pass; the nested
        // requests add exactly one confirming pass.
        assert_eq!(report.fired, 2);
        assert_eq!(report.passes, 2);
        assert!(!report.saturated);
        assert_eq!(world.variable("bonus"), Some(&json!("unlocked")));
    }

    #[test]
    fn trigger_may_register_and_remove_triggers_mid_pass() {
        let mut world = WorldState::default();
        let victim = world.register_trigger(Trigger::new(|_| false, |_| {}));
        world.register_trigger(Trigger::once(
            |_| true,
            move |w| {
                w.remove_trigger(victim);
                w.register_trigger(Trigger::new(|_| false, |_| {}));
            },
        ));

        world.check_triggers();

        assert_eq!(world.trigger_count(), 1);
        assert!(world.trigger_ids().all(|id| id != victim));
    }

    #[test]
    fn removing_an_unknown_trigger_reports_false() {
        let mut world = WorldState::default();
        assert!(!world.remove_trigger(TriggerId(42)));
    }

    #[test]
    fn removing_a_trigger_that_is_not_in_the_pass_reports_false() {
        let mut world = WorldState::default();
        let outcome = Arc::new(std::sync::Mutex::new(None));
        let seen = outcome.clone();
        world.register_trigger(Trigger::once(
            |_| true,
            move |w| {
                *seen.lock().unwrap() = Some(w.remove_trigger(TriggerId(99)));
            },
        ));

        world.check_triggers();

        assert_eq!(*outcome.lock().unwrap(), Some(false));
    }

    #[test]
    fn reset_inside_a_trigger_action_stops_the_pass() {
        let mut world = WorldState::default();
        let (count, seen) = counter();
        world.register_trigger(Trigger::once(|_| true, |w| w.reset()));
        world.register_trigger(Trigger::new(
            |_| true,
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let report = world.check_triggers();

        assert_eq!(report.fired, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(world.trigger_count(), 0);
        assert!(world.triggers.spent_ids().is_empty());
    }

    #[test]
    fn spent_once_trigger_can_be_rearmed_in_registration_order() {
        let mut world = WorldState::default();
        let (count, seen) = counter();
        let first = world.register_trigger(Trigger::once(
            |w| w.inventory().count("key") > 0,
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            },
        ));
        let second = world.register_trigger(Trigger::new(|_| false, |_| {}));

        world.add_items("key", 1);
        world.check_triggers();
        assert_eq!(world.triggers.spent_ids(), vec![first]);

        assert_eq!(world.triggers.rearm_except(&[]), 1);
        assert_eq!(world.trigger_ids().collect::<Vec<_>>(), vec![first, second]);

        world.check_triggers();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
