//! Host cadences driven from the draw loop.
//!
//! `draw_web()` runs at ~60fps with a variable frame delta. Each [`Interval`]
//! accumulates that delta and reports when its period has elapsed, so the
//! generation tick, view refresh and autosave can share one loop without
//! separate timers.
//!
//! Intervals only decide *when* to run. The generation tick itself measures
//! real elapsed time from the game state, so coalesced firings lose nothing.

use crate::config::GameConfig;

pub struct Interval {
    period_ms: f64,
    /// Milliseconds accumulated toward the next firing
    accumulator: f64,
    /// Timestamp of the previous poll (ms), None before the first frame
    last_timestamp: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp and return how many whole periods elapsed.
    ///
    /// The first call only records the timestamp. A clock that goes
    /// backwards contributes nothing.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let fires = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= fires as f64 * self.period_ms;
        fires
    }
}

/// Which cadences fired this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Due {
    pub tick: bool,
    pub refresh: bool,
    pub autosave: bool,
}

/// The three host cadences: generation tick, view refresh, autosave.
pub struct Schedule {
    tick: Interval,
    refresh: Interval,
    autosave: Interval,
}

impl Schedule {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tick: Interval::new(config.tick_interval_ms),
            refresh: Interval::new(config.refresh_interval_ms),
            autosave: Interval::new(config.autosave_interval_ms),
        }
    }

    /// Several periods elapsing in one frame collapse into a single firing.
    pub fn poll(&mut self, now_ms: f64) -> Due {
        Due {
            tick: self.tick.update(now_ms) > 0,
            refresh: self.refresh.update(now_ms) > 0,
            autosave: self.autosave.update(now_ms) > 0,
        }
    }
}
