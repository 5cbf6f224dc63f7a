//! Core types for playback control

use duet_core::MediaItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No session
    Idle,

    /// Session opened, waiting for the prepared event
    Preparing,

    /// Rendering
    Playing,

    /// Paused mid-item
    Paused,

    /// Reached the end with nowhere to advance
    Completed,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Progress refresh interval in milliseconds (default: 1000)
    pub tick_interval_ms: u64,

    /// Volume while another app holds transient focus (default: 0.3)
    pub duck_volume: f32,

    /// Normal output volume (default: 1.0)
    pub full_volume: f32,

    /// Initial loop flag (default: false)
    pub loop_enabled: bool,
}

impl PlaybackConfig {
    /// Progress refresh interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            duck_volume: 0.3,
            full_volume: 1.0,
            loop_enabled: false,
        }
    }
}

/// Read-only view of controller state for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Current phase
    pub phase: PlaybackPhase,

    /// Index of the current item in the library
    pub current_index: Option<usize>,

    /// The current item
    pub current_item: Option<MediaItem>,

    /// Elapsed position
    pub position: Duration,

    /// Total duration reported by the session (zero until prepared)
    pub total: Duration,

    /// Display ratio 0-100
    pub progress_percent: f32,

    /// Loop current item on completion
    pub loop_enabled: bool,

    /// Effective output volume
    pub volume: f32,
}

impl PlaybackSnapshot {
    /// Whether the session is rendering
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}
