//! The game engine: owns the state and drives time.
//!
//! TICK ORDER (fixed):
//!   1. Clock advances by exactly one.
//!   2. Delayed-action queue drains in insertion order.
//!   3. Conditions are evaluated (when the trigger is `every_tick`).
//!
//! RULES:
//!   - Everything is synchronous; nothing in here yields or spawns.
//!   - The engine has no opinion on timer cadence. A host calls `tick()`
//!     directly or feeds real time through `pump()`.
//!   - Nested dispatch is bounded by `EngineConfig::max_dispatch_depth`.

use crate::{
    action::Action,
    condition::select_due,
    config::{ConditionTrigger, EngineConfig},
    error::{GameError, GameResult},
    flag::Flag,
    snapshot::GameSnapshot,
    state::GameState,
    types::{ButtonId, Tick},
};

pub struct GameEngine {
    pub state:  GameState,
    pub config: EngineConfig,
    depth:      usize,
    evaluating: bool,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        let mut state = GameState::new();
        if config.start_paused {
            state.clock.pause();
        }
        if let Err(e) = state.clock.set_time_factor(config.time_factor) {
            log::warn!("ignoring configured time factor: {e}");
        }
        Self { state, config, depth: 0, evaluating: false }
    }

    /// Advance one tick and fire whatever is due.
    ///
    /// Called from inside a firing action (a queued `PassTime`), this
    /// first finishes the pass already in progress, so every queued
    /// entry is counted down once per tick.
    pub fn tick(&mut self) -> GameResult<()> {
        self.drain_queue()?;
        let now = self.state.clock.advance();
        self.state.queue.begin_drain();
        self.drain_queue()?;
        log::trace!("tick={now} done, {} queued", self.state.queue.len());

        if self.config.conditions.trigger == ConditionTrigger::EveryTick {
            self.evaluate_conditions()?;
        }
        Ok(())
    }

    /// Count down every pending entry. On error the un-attempted
    /// entries stay queued with their delays untouched.
    fn drain_queue(&mut self) -> GameResult<()> {
        while let Some(mut entry) = self.state.queue.next_pending() {
            match entry.perform(self) {
                Ok(true) => {}
                Ok(false) => self.state.queue.retain(entry),
                Err(e) => {
                    self.state.queue.settle();
                    return Err(e);
                }
            }
        }
        self.state.queue.settle();
        Ok(())
    }

    /// Perform `actions` in order, right now, bypassing the queue.
    pub fn perform_actions(&mut self, actions: impl IntoIterator<Item = Action>) -> GameResult<()> {
        for mut action in actions {
            action.perform(self)?;
        }
        if self.depth == 0 && self.config.conditions.trigger == ConditionTrigger::EveryDispatch {
            self.evaluate_conditions()?;
        }
        Ok(())
    }

    /// Dispatch a button's actions as the UI would on a click.
    /// The button must be enabled and visible.
    pub fn press_button(&mut self, id: ButtonId) -> GameResult<()> {
        let button = self.state.buttons.get(id)?;
        if !button.visible() || !self.state.buttons.is_active(id) {
            return Err(GameError::ButtonUnavailable { button: id });
        }
        log::debug!("tick={} pressed {id} ({})", self.state.time(), button.label());
        let action = Action::from_list(button.actions().to_vec());
        self.perform_actions([action])
    }

    /// Check pending conditions and run the actions of satisfied ones.
    /// Returns how many fired. Does nothing when called re-entrantly
    /// from inside a firing condition's action. If an action fails,
    /// the satisfied conditions whose actions did not run yet are put
    /// back and re-armed.
    pub fn evaluate_conditions(&mut self) -> GameResult<usize> {
        if self.evaluating || self.state.conditions.is_empty() {
            return Ok(0);
        }
        let mut entries = self.state.conditions.take();
        let due = select_due(&mut entries, &self.state, self.config.conditions.retention);
        self.state.conditions.restore(entries);

        let fired = due.len();
        self.evaluating = true;
        let mut due = due.into_iter();
        while let Some(entry) = due.next() {
            let (name, mut action) = entry.into_parts();
            log::debug!("tick={} condition '{name}' fired", self.state.time());
            if let Err(e) = action.perform(self) {
                self.state.conditions.reinstate(due.collect());
                self.evaluating = false;
                return Err(e);
            }
        }
        self.evaluating = false;
        Ok(fired)
    }

    /// Feed elapsed real time. Runs the ticks due under the current
    /// time factor and returns how many ran. Nothing runs while paused.
    pub fn pump(&mut self, elapsed_ms: u64) -> GameResult<Tick> {
        let due = self.state.clock.accrue(elapsed_ms, self.config.tick_interval_ms);
        for _ in 0..due {
            self.tick()?;
        }
        Ok(due)
    }

    /// Returns the new pause state.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.state.clock.toggle_pause();
        log::debug!("tick={} paused={paused}", self.state.time());
        paused
    }

    pub fn set_time_factor(&mut self, factor: f64) -> GameResult<()> {
        self.state.clock.set_time_factor(factor)?;
        log::debug!("tick={} time_factor={factor}", self.state.time());
        Ok(())
    }

    /// Typed flag read.
    pub fn flag<T: 'static>(&self, flag: &Flag<T>) -> Option<&T> {
        self.state.flags.get(flag)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.config.message_display_limit)
    }

    pub(crate) fn enter_dispatch(&mut self) -> GameResult<()> {
        if self.depth >= self.config.max_dispatch_depth {
            return Err(GameError::DispatchDepthExceeded { limit: self.config.max_dispatch_depth });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_dispatch(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
