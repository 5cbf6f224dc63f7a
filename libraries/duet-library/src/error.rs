//! Error types for library loading and playlists

use duet_core::DuetError;
use thiserror::Error;

/// Errors raised while reaching the remote data source
#[derive(Error, Debug)]
pub enum LibraryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Remote returned an error response
    #[error("Remote error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid remote URL
    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse remote response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Remote is offline or unreachable
    #[error("Remote unreachable: {0}")]
    Unreachable(String),
}

impl From<LibraryError> for DuetError {
    fn from(err: LibraryError) -> Self {
        DuetError::remote(err.to_string())
    }
}

/// Result type for remote operations
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Playlist edits the user can get wrong
///
/// Every variant is reported inline and leaves the store untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    /// Name is empty or whitespace
    #[error("Playlist name cannot be empty")]
    EmptyName,

    /// Name already taken
    #[error("A playlist named \"{0}\" already exists")]
    DuplicateName(String),

    /// No playlist with that name
    #[error("No playlist named \"{0}\"")]
    NotFound(String),

    /// The default playlist mirrors the library and cannot be edited
    #[error("The default playlist cannot be edited")]
    DefaultPlaylistReadOnly,
}
