//! Error types for the sous_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sous_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Recipe rejected at session creation (no steps, bad step keys)
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// Unknown or already evicted session id
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Operation on a session that has already walked past its last step
    #[error("Session already completed: {0}")]
    SessionAlreadyCompleted(Uuid),

    /// Timer duration not positive or longer than the countdown allows
    #[error("Invalid timer duration: {0} seconds")]
    InvalidDuration(i64),

    /// Step index outside the sequence. Indicates a bug in the engine.
    #[error("Step index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
