//! Error types for engine startup
use thiserror::Error;

/// Engine errors
///
/// Only stream acquisition can fail. Everything that happens once the engine
/// is running degrades to a neutral value instead of erroring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The host or the user refused access to the audio stream
    #[error("Audio stream permission denied: {0}")]
    PermissionDenied(String),

    /// No audio stream could be opened
    #[error("Audio stream unavailable: {0}")]
    StreamUnavailable(String),
}

impl EngineError {
    /// Whether retrying acquisition can never succeed for this session
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
