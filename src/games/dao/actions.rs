//! Semantic action IDs for Dao of Zero click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Core ────────────────────────────────────────────────────────
pub const CULTIVATE: u16 = 0;
pub const SAVE_NOW: u16 = 1;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_UPGRADES: u16 = 10;
pub const TAB_TECHNIQUES: u16 = 11;
pub const TAB_ACTIONS: u16 = 12;
pub const TAB_SETTINGS: u16 = 13;

// ── Catalog items (base + catalog index) ────────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;
pub const RESEARCH_BASE: u16 = 200;
pub const EXECUTE_ACTION_BASE: u16 = 300;

/// Width of each catalog ID block.
pub const BLOCK_SIZE: u16 = 100;

// ── Settings ────────────────────────────────────────────────────
pub const TOGGLE_AUTOSAVE: u16 = 400;
pub const EXPORT_SAVE: u16 = 401;
pub const IMPORT_SAVE: u16 = 402;
pub const RESET_GAME: u16 = 403;
