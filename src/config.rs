//! Host configuration: cadences, storage key and offline catch-up.

use crate::games::dao::save::STORAGE_KEY;

/// Generation tick period.
pub const TICK_INTERVAL_MS: f64 = 100.0;
/// Item view refresh period.
pub const REFRESH_INTERVAL_MS: f64 = 500.0;
/// Autosave period.
pub const AUTOSAVE_INTERVAL_MS: f64 = 30_000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub tick_interval_ms: f64,
    pub refresh_interval_ms: f64,
    pub autosave_interval_ms: f64,
    pub storage_key: String,
    /// Upper bound on the time a single tick may credit. `None` credits the
    /// full gap, so a long absence is paid out in one tick.
    pub max_catch_up_ms: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            refresh_interval_ms: REFRESH_INTERVAL_MS,
            autosave_interval_ms: AUTOSAVE_INTERVAL_MS,
            storage_key: STORAGE_KEY.to_string(),
            max_catch_up_ms: None,
        }
    }
}
