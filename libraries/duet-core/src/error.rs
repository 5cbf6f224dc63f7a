/// Core error types for Duet Player
use thiserror::Error;

/// Result type alias using `DuetError`
pub type Result<T> = std::result::Result<T, DuetError>;

/// Error type returned by platform collaborators
#[derive(Error, Debug)]
pub enum DuetError {
    /// Media index or session could not be opened for lack of permission
    #[error("Permission denied")]
    PermissionDenied,

    /// Permission denied with context
    #[error("Permission denied: {0}")]
    PermissionDeniedWithContext(String),

    /// Decode/render session errors
    #[error("Session error: {0}")]
    Session(String),

    /// Remote data source errors
    #[error("Remote error: {0}")]
    Remote(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DuetError {
    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a remote error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDeniedWithContext(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error means the platform refused access
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::PermissionDenied | Self::PermissionDeniedWithContext(_) => true,
            Self::Io(err) => err.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}
