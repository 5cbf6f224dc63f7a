//! Duet Player Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! the music and video screens.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `MediaItem`, `MediaKind`, `SessionId`
//! - **Collaborator Traits**: `MediaIndex`, `RemoteCatalog`, `FocusBroker`,
//!   `SessionFactory`, `PlaybackSession`
//! - **Error Handling**: Unified `DuetError` and `Result` types
//!
//! Everything the host platform owns (media index, remote data source, decode
//! pipeline, focus arbitration) sits behind a trait so the playback and
//! library crates stay free of platform code.
//!
//! # Example
//!
//! ```rust
//! use duet_core::{MediaItem, MediaKind};
//! use std::time::Duration;
//!
//! let song = MediaItem::new("song-1", "My Favorite Song", "/music/song.mp3", MediaKind::Audio);
//! let clip = MediaItem::new("42", "Holiday", "https://cdn.example.com/holiday.mp4", MediaKind::Video)
//!     .with_duration(Duration::from_secs(95));
//!
//! assert!(song.duration.is_none());
//! assert_eq!(clip.duration, Some(Duration::from_secs(95)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use error::{DuetError, Result};
pub use format::format_duration;
pub use traits::{FocusBroker, MediaIndex, PlaybackSession, RemoteCatalog, SessionFactory};
pub use types::{FocusChange, FocusGrant, MediaItem, MediaKind, SessionId};
