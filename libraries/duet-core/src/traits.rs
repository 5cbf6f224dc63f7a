/// Collaborator traits for Duet Player
///
/// Each trait is a seam to something the host platform owns. The playback and
/// library crates only talk to these traits.
use crate::error::Result;
use crate::types::{FocusGrant, MediaItem, MediaKind, SessionId};
use async_trait::async_trait;
use std::time::Duration;

/// Platform media index
///
/// Read-only enumeration of media stored on the device.
pub trait MediaIndex: Send {
    /// List every local item of the given kind
    ///
    /// # Errors
    /// Returns `DuetError::PermissionDenied` when the platform refuses access,
    /// or an I/O error when enumeration fails
    fn query(&self, kind: MediaKind) -> Result<Vec<MediaItem>>;
}

/// Remote data source
///
/// Keyed read of published items. There is no write path.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch every published item of the given kind
    ///
    /// # Errors
    /// Returns an error if the remote is unreachable or returns garbage
    async fn fetch(&self, kind: MediaKind) -> Result<Vec<MediaItem>>;
}

/// Playback-resource broker
///
/// Arbitrates exclusive output. Loss, duck, and gain signals are delivered
/// asynchronously by the host as `FocusChange` values.
pub trait FocusBroker: Send {
    /// Ask for exclusive output
    fn request(&mut self) -> FocusGrant;

    /// Give exclusive output back
    ///
    /// Must be safe to call when focus is not held.
    fn abandon(&mut self);
}

/// Opens decode/render sessions
///
/// `open` only starts preparation. Implementations report readiness and
/// completion later as session events tagged with the given `SessionId`.
pub trait SessionFactory: Send {
    /// Begin preparing a session for `item`
    ///
    /// # Errors
    /// Returns an error if the locator cannot be opened at all
    fn open(&mut self, session: SessionId, item: &MediaItem) -> Result<Box<dyn PlaybackSession>>;
}

/// Handle to one active decode/render session
pub trait PlaybackSession: Send {
    /// Start or resume rendering
    ///
    /// # Errors
    /// Returns an error if the session cannot start
    fn start(&mut self) -> Result<()>;

    /// Pause rendering, keeping the position
    ///
    /// # Errors
    /// Returns an error if the session cannot pause
    fn pause(&mut self) -> Result<()>;

    /// Jump to an absolute position
    ///
    /// # Errors
    /// Returns an error if the session cannot seek
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current rendering position
    fn position(&self) -> Duration;

    /// Set output volume (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, volume: f32);

    /// Free the decoder and output resources
    ///
    /// Called exactly once before the handle is dropped.
    fn release(&mut self);
}
