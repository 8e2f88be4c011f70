//! Conditions: predicates waiting to trigger an action.
//!
//! When conditions are checked is chosen by `ConditionPolicy::trigger`;
//! what happens to a satisfied one by `ConditionPolicy::retention`.
//! The engine drives evaluation; this module only decides which
//! entries are due.

use crate::{action::Action, config::ConditionRetention, state::GameState};
use std::{fmt, rc::Rc};

pub type Predicate = Rc<dyn Fn(&GameState) -> bool>;

#[derive(Clone)]
pub struct Condition {
    name:      String,
    predicate: Predicate,
}

impl Condition {
    pub fn new(name: impl Into<String>, predicate: impl Fn(&GameState) -> bool + 'static) -> Self {
        Self { name: name.into(), predicate: Rc::new(predicate) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_met(&self, state: &GameState) -> bool {
        (self.predicate)(state)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct PendingCondition {
    pub condition: Condition,
    pub action:    Action,
    /// False after firing under `Rearm` until the predicate is seen false.
    armed:         bool,
}

impl PendingCondition {
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[derive(Debug, Default)]
pub struct ConditionRegistry {
    entries: Vec<PendingCondition>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: Condition, action: Action) {
        self.entries.push(PendingCondition { condition, action, armed: true });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingCondition> {
        self.entries.iter()
    }

    pub(crate) fn take(&mut self) -> Vec<PendingCondition> {
        std::mem::take(&mut self.entries)
    }

    /// Put `kept` back ahead of anything registered meanwhile.
    pub(crate) fn restore(&mut self, mut kept: Vec<PendingCondition>) {
        kept.append(&mut self.entries);
        self.entries = kept;
    }
}

/// A satisfied condition selected by `select_due`.
#[derive(Debug)]
pub(crate) enum DueCondition {
    /// Removed from the registry under `FireOnce`.
    Taken(PendingCondition),
    /// Still registered under `Rearm`, disarmed, at `index`.
    Disarmed { index: usize, name: String, action: Action },
}

impl DueCondition {
    pub(crate) fn into_parts(self) -> (String, Action) {
        match self {
            DueCondition::Taken(entry) => (entry.condition.name, entry.action),
            DueCondition::Disarmed { name, action, .. } => (name, action),
        }
    }
}

impl ConditionRegistry {
    /// Undo the selection of conditions whose actions never ran.
    /// Taken entries go back ahead of the registry; disarmed ones are
    /// armed again.
    pub(crate) fn reinstate(&mut self, unrun: Vec<DueCondition>) {
        let mut taken = Vec::new();
        for due in unrun {
            match due {
                DueCondition::Taken(entry) => taken.push(entry),
                DueCondition::Disarmed { index, .. } => {
                    if let Some(entry) = self.entries.get_mut(index) {
                        entry.armed = true;
                    }
                }
            }
        }
        self.restore(taken);
    }
}

/// Check every entry against `state` in registration order and return
/// the satisfied ones, in the same order.
///
/// Under `FireOnce` satisfied entries are removed from `entries`.
/// Under `Rearm` they stay, disarmed until the predicate is false again.
pub(crate) fn select_due(
    entries:   &mut Vec<PendingCondition>,
    state:     &GameState,
    retention: ConditionRetention,
) -> Vec<DueCondition> {
    let mut due = Vec::new();
    match retention {
        ConditionRetention::FireOnce => {
            let mut kept = Vec::with_capacity(entries.len());
            for entry in entries.drain(..) {
                if entry.condition.is_met(state) {
                    due.push(DueCondition::Taken(entry));
                } else {
                    kept.push(entry);
                }
            }
            *entries = kept;
        }
        ConditionRetention::Rearm => {
            for (index, entry) in entries.iter_mut().enumerate() {
                let met = entry.condition.is_met(state);
                if met && entry.armed {
                    entry.armed = false;
                    due.push(DueCondition::Disarmed {
                        index,
                        name:   entry.condition.name.clone(),
                        action: entry.action.clone(),
                    });
                } else if !met {
                    entry.armed = true;
                }
            }
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(name: &str) -> Condition {
        Condition::new(name, |_: &GameState| true)
    }

    #[test]
    fn rearm_disarms_satisfied_entries_and_reinstate_arms_them() {
        let state = GameState::new();
        let mut registry = ConditionRegistry::new();
        registry.push(always("a"), Action::message("a"));

        let mut entries = registry.take();
        let due = select_due(&mut entries, &state, ConditionRetention::Rearm);
        registry.restore(entries);

        assert_eq!(due.len(), 1);
        assert!(!registry.iter().all(PendingCondition::is_armed));

        registry.reinstate(due);
        assert!(registry.iter().all(PendingCondition::is_armed));
    }

    #[test]
    fn reinstate_puts_taken_entries_ahead_of_kept_ones() {
        let state = GameState::new();
        let mut registry = ConditionRegistry::new();
        registry.push(always("due"), Action::message("due"));
        registry.push(Condition::new("never", |_: &GameState| false), Action::message("never"));

        let mut entries = registry.take();
        let due = select_due(&mut entries, &state, ConditionRetention::FireOnce);
        registry.restore(entries);
        assert_eq!(registry.len(), 1);

        registry.reinstate(due);
        let names: Vec<&str> = registry.iter().map(|p| p.condition.name()).collect();
        assert_eq!(names, vec!["due", "never"]);
    }
}
