//! Domain types for Duet Player

mod media;
mod session;

pub use media::{MediaItem, MediaKind};
pub use session::{FocusChange, FocusGrant, SessionId};
