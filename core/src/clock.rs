//! Simulation clock: owns tick state, time factor, and pause.
//!
//! `advance()` is the only way time moves and it always moves by one.
//! Pause and time factor only affect how real time is converted into
//! ticks by `accrue()`; a paused clock can still be advanced directly.

use crate::{
    error::{GameError, GameResult},
    types::Tick,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameClock {
    pub time:        Tick,
    pub paused:      bool,
    time_factor:     f64,
    /// Real milliseconds accrued but not yet spent on a whole tick.
    carry_ms:        f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            time:        0,
            paused:      false,
            time_factor: 1.0,
            carry_ms:    0.0,
        }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.time += 1;
        self.time
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    /// Flip the pause state. Returns the new value of `paused`.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn time_factor(&self) -> f64 {
        self.time_factor
    }

    pub fn set_time_factor(&mut self, factor: f64) -> GameResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GameError::InvalidTimeFactor(factor));
        }
        self.time_factor = factor;
        Ok(())
    }

    /// Convert `elapsed_ms` of real time into whole ticks due.
    /// The fractional remainder carries into the next call.
    /// Nothing accrues while paused.
    pub fn accrue(&mut self, elapsed_ms: u64, tick_interval_ms: u64) -> u64 {
        if self.paused || tick_interval_ms == 0 {
            return 0;
        }
        self.carry_ms += elapsed_ms as f64 * self.time_factor;
        let interval = tick_interval_ms as f64;
        let due = (self.carry_ms / interval).floor();
        self.carry_ms -= due * interval;
        due as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_by_exactly_one() {
        let mut clock = GameClock::new();
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.time, 2);
    }

    #[test]
    fn accrue_carries_remainder() {
        let mut clock = GameClock::new();
        assert_eq!(clock.accrue(1500, 1000), 1);
        assert_eq!(clock.accrue(600, 1000), 1);
        assert_eq!(clock.accrue(50, 1000), 0);
    }

    #[test]
    fn accrue_scales_by_time_factor() {
        let mut clock = GameClock::new();
        clock.set_time_factor(4.0).unwrap();
        assert_eq!(clock.accrue(1000, 1000), 4);
    }

    #[test]
    fn paused_clock_accrues_nothing() {
        let mut clock = GameClock::new();
        clock.pause();
        assert_eq!(clock.accrue(10_000, 1000), 0);
        clock.resume();
        assert_eq!(clock.accrue(1000, 1000), 1);
    }

    #[test]
    fn rejects_bad_time_factors() {
        let mut clock = GameClock::new();
        assert!(clock.set_time_factor(0.0).is_err());
        assert!(clock.set_time_factor(-2.0).is_err());
        assert!(clock.set_time_factor(f64::NAN).is_err());
        assert_eq!(clock.time_factor(), 1.0);
    }
}
