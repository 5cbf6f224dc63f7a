//! Playback Events
//!
//! Two directions:
//! - `SessionEvent` flows in from the platform (session ready, session
//!   finished, session failed, focus changed) and drives the state machine.
//! - `PlaybackEvent` flows out to the presentation layer, queued by the
//!   controller and drained after each operation.

use crate::types::PlaybackPhase;
use duet_core::{FocusChange, SessionId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inbound signal from a decode session or the focus broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Session finished preparing and knows its duration
    Prepared {
        /// Session that became ready
        session: SessionId,
        /// Total duration of the item
        duration: Duration,
    },

    /// Session rendered to the end
    Completed {
        /// Session that finished
        session: SessionId,
    },

    /// Session hit an unrecoverable decode/render error
    Failed {
        /// Session that failed
        session: SessionId,
        /// Error message
        message: String,
    },

    /// Playback focus changed
    FocusChanged(FocusChange),
}

impl SessionEvent {
    /// Session this event belongs to, if it is session-scoped
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::Prepared { session, .. }
            | Self::Completed { session }
            | Self::Failed { session, .. } => Some(*session),
            Self::FocusChanged(_) => None,
        }
    }
}

/// Outbound notification for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Phase changed
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
    },

    /// A new item was selected and its session is preparing
    ItemChanged {
        /// Library index of the item
        index: usize,
        /// Item identifier
        item_id: String,
        /// Item title
        title: String,
    },

    /// An item rendered to the end
    ItemFinished {
        /// Library index of the item
        index: usize,
    },

    /// Periodic progress refresh
    PositionUpdate {
        /// Elapsed position in milliseconds
        position_ms: u64,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Display ratio 0-100
        percent: f32,
    },

    /// Loop flag toggled
    LoopChanged {
        /// New loop flag
        enabled: bool,
    },

    /// Output volume changed (ducking)
    VolumeChanged {
        /// Effective volume
        volume: f32,
    },

    /// Library replaced
    LibraryChanged {
        /// New library length
        length: usize,
    },

    /// Something the user should be told about
    Notice {
        /// Message
        message: String,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}
