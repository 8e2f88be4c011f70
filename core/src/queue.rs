//! Delayed actions and the queue the clock drains every tick.
//!
//! RULE: Queue order is insertion order. Entries are never reordered
//! and there is no priority; an entry's fire tick depends only on its
//! own countdown.

use crate::{action::Action, engine::GameEngine, error::GameResult, types::Tick};
use std::collections::VecDeque;

/// An action wrapped with a countdown.
#[derive(Debug, Clone)]
pub struct DelayedAction {
    action: Box<Action>,
    delay:  Tick,
}

impl DelayedAction {
    pub fn new(action: Action, delay: Tick) -> Self {
        Self { action: Box::new(action), delay }
    }

    /// Remaining countdown before the next `perform` call.
    pub fn delay(&self) -> Tick {
        self.delay
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Decrement the countdown, then fire if it has reached zero.
    ///
    /// The decrement happens before the comparison, so a delay of 1
    /// fires on the first call and a delay of `d` on the `d`-th.
    /// Returns whether the wrapped action was performed.
    pub fn perform(&mut self, engine: &mut GameEngine) -> GameResult<bool> {
        self.delay = self.delay.saturating_sub(1);
        if self.delay == 0 {
            log::debug!(
                "tick={} delayed {} fired",
                engine.state.time(),
                self.action.kind()
            );
            self.action.perform(engine)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// FIFO queue of delayed actions.
///
/// While the engine drains the queue, entries move through three lanes:
/// `pending` (not yet counted down this tick), `retained` (counted down,
/// still waiting) and `entries` (pushed during the drain). Outside a
/// drain only `entries` is populated.
#[derive(Debug, Default)]
pub struct ActionQueue {
    entries:  Vec<DelayedAction>,
    pending:  VecDeque<DelayedAction>,
    retained: Vec<DelayedAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delayed: DelayedAction) {
        self.entries.push(delayed);
    }

    pub fn len(&self) -> usize {
        self.retained.len() + self.pending.len() + self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &DelayedAction> {
        self.retained
            .iter()
            .chain(self.pending.iter())
            .chain(self.entries.iter())
    }

    /// Start a drain pass: every queued entry becomes pending.
    pub(crate) fn begin_drain(&mut self) {
        self.settle();
        self.pending.extend(self.entries.drain(..));
    }

    /// Next entry to count down in the current pass.
    pub(crate) fn next_pending(&mut self) -> Option<DelayedAction> {
        self.pending.pop_front()
    }

    /// Keep an entry that was counted down but has not fired.
    pub(crate) fn retain(&mut self, entry: DelayedAction) {
        self.retained.push(entry);
    }

    /// End the current pass. Retained entries go first, then anything
    /// still pending, then entries pushed during the pass, in push order.
    pub(crate) fn settle(&mut self) {
        if self.retained.is_empty() && self.pending.is_empty() {
            return;
        }
        let mut settled = std::mem::take(&mut self.retained);
        settled.extend(self.pending.drain(..));
        settled.append(&mut self.entries);
        self.entries = settled;
    }
}
