//! Save/load errors. Gameplay commands report failure as `false` instead.

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save data is not valid JSON for this game: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("save version {saved} is older than the oldest supported ({min_compatible})")]
    IncompatibleVersion { saved: u32, min_compatible: u32 },

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("no save data found")]
    NoSave,
}
