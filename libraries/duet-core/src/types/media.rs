/// Media item domain types
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which screen a media item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Music track
    Audio,
    /// Video clip
    Video,
}

impl MediaKind {
    /// Path under which the remote data source keeps items of this kind
    pub fn remote_path(&self) -> &'static str {
        match self {
            Self::Audio => "music",
            Self::Video => "video",
        }
    }

    /// File extensions the local index accepts for this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Audio => &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"],
            Self::Video => &["mp4", "mkv", "webm", "mov", "avi", "m4v"],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// A playable item
///
/// Created once at library load time and never mutated. Two items are the same
/// item when every field matches, so the same title from two sources stays two
/// distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItem {
    /// Identifier from the source (file path locally, record key remotely)
    pub id: String,

    /// Display title
    pub title: String,

    /// Path or URI handed to the decode session
    pub locator: String,

    /// Known duration, if the source reports one
    pub duration: Option<Duration>,

    /// Audio or video
    pub kind: MediaKind,
}

impl MediaItem {
    /// Create a media item without a known duration
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        locator: impl Into<String>,
        kind: MediaKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            locator: locator.into(),
            duration: None,
            kind,
        }
    }

    /// Attach a known duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Whether the locator points at a network resource
    pub fn is_remote(&self) -> bool {
        self.locator.starts_with("http://") || self.locator.starts_with("https://")
    }
}

impl fmt::Display for MediaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
