//! Duet Player library loading
//!
//! Assembles the flat list of playable items for a screen and keeps the
//! music screen's playlists.
//!
//! # Features
//!
//! - **Local index**: walk a media folder and keep files with known extensions
//! - **Remote catalog**: read published items from a realtime-database REST endpoint
//! - **Merge**: remote items first, then local ones, duplicates kept
//! - **Playlists**: a read-only default playlist plus named user playlists
//!
//! # Example
//!
//! ```rust,ignore
//! use duet_core::MediaKind;
//! use duet_library::{DirectoryIndex, LibraryLoader, RealtimeDbCatalog, RemoteConfig};
//! use std::sync::Arc;
//!
//! let catalog = RealtimeDbCatalog::new(RemoteConfig::new("https://example.firebaseio.com"))?;
//! let loader = LibraryLoader::new(Box::new(DirectoryIndex::new("/home/me/Music")))
//!     .with_remote(Arc::new(catalog));
//!
//! let load = loader.load(MediaKind::Audio).await;
//! println!("{} remote + {} local", load.remote_count, load.local_count);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod index;
pub mod loader;
pub mod playlist;
pub mod remote;

pub use error::{LibraryError, PlaylistError, Result};
pub use index::{has_extension, DirectoryIndex};
pub use loader::{fetch_from, merge, LibraryLoad, LibraryLoader, LocalLoad};
pub use playlist::{AddOutcome, Playlist, PlaylistStore, DEFAULT_PLAYLIST};
pub use remote::{parse_records, RealtimeDbCatalog, RemoteConfig};
