//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No session is loaded
    #[error("No item loaded")]
    NoItemLoaded,

    /// Library has no items to select from
    #[error("Library is empty")]
    EmptyLibrary,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Playback resource broker refused exclusive output
    #[error("Playback focus denied")]
    FocusDenied,

    /// Operation not valid in the current phase
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Decode/render session error
    #[error(transparent)]
    Session(#[from] duet_core::DuetError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
