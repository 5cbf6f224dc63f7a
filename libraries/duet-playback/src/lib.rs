//! Duet Player - Playback Control
//!
//! Platform-agnostic playback state machine shared by the music and video
//! screens.
//!
//! This crate provides:
//! - One live decode session at a time (released before the next opens)
//! - Transport: select, play/pause, seek, restart, next, previous, shuffle
//! - Loop flag and circular advance on completion
//! - Playback focus handling (pause on loss, duck, resume on gain)
//! - A cooperative progress ticker armed only while playing
//!
//! # Architecture
//!
//! `duet-playback` never touches a decoder, an output device, or a clock
//! thread. The host supplies a `SessionFactory` and a `FocusBroker`, feeds
//! asynchronous signals back in as `SessionEvent`s, and drains
//! `PlaybackEvent`s for rendering. Every event that belongs to a released
//! session is dropped, so late callbacks after a reselect or teardown are
//! harmless.
//!
//! # Example
//!
//! ```rust,no_run
//! use duet_core::{FocusBroker, FocusGrant, MediaItem, MediaKind, PlaybackSession, SessionFactory, SessionId};
//! use duet_playback::{PlaybackConfig, PlaybackController, SessionEvent};
//! use std::time::Duration;
//!
//! # struct MySession;
//! # impl PlaybackSession for MySession {
//! #     fn start(&mut self) -> duet_core::Result<()> { Ok(()) }
//! #     fn pause(&mut self) -> duet_core::Result<()> { Ok(()) }
//! #     fn seek(&mut self, _: Duration) -> duet_core::Result<()> { Ok(()) }
//! #     fn position(&self) -> Duration { Duration::ZERO }
//! #     fn set_volume(&mut self, _: f32) {}
//! #     fn release(&mut self) {}
//! # }
//! # struct MyFactory;
//! # impl SessionFactory for MyFactory {
//! #     fn open(&mut self, _: SessionId, _: &MediaItem) -> duet_core::Result<Box<dyn PlaybackSession>> {
//! #         Ok(Box::new(MySession))
//! #     }
//! # }
//! # struct MyBroker;
//! # impl FocusBroker for MyBroker {
//! #     fn request(&mut self) -> FocusGrant { FocusGrant::Granted }
//! #     fn abandon(&mut self) {}
//! # }
//! let mut controller = PlaybackController::new(
//!     &PlaybackConfig::default(),
//!     Box::new(MyFactory),
//!     Box::new(MyBroker),
//! );
//!
//! controller.set_library(vec![
//!     MediaItem::new("a", "Song A", "/music/a.mp3", MediaKind::Audio),
//!     MediaItem::new("b", "Song B", "/music/b.mp3", MediaKind::Audio),
//! ]);
//!
//! controller.select(0).ok();
//! // The platform later reports readiness:
//! // controller.handle(SessionEvent::Prepared { session, duration }).ok();
//! for event in controller.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

mod controller;
mod error;
mod events;
mod shuffle;
mod ticker;
pub mod types;
mod volume;

// Public exports
pub use controller::{PlaybackController, ProgressUpdate};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, SessionEvent};
pub use shuffle::random_index;
pub use ticker::{progress_percent, ProgressTicker};
pub use types::{PlaybackConfig, PlaybackPhase, PlaybackSnapshot};
pub use volume::Volume;
