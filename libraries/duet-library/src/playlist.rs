//! Named playlists over the music library
//!
//! The store always holds the default playlist, which is the whole library
//! and only ever replaced wholesale. User playlists are kept in creation
//! order.

use crate::error::PlaylistError;
use duet_core::MediaItem;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the playlist that mirrors the library
pub const DEFAULT_PLAYLIST: &str = "Default Playlist";

/// A user playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique name
    pub name: String,

    /// Items in play order
    pub items: Vec<MediaItem>,
}

/// Result of adding an item to a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended to the end
    Added,
    /// Already in the playlist; nothing changed
    AlreadyPresent,
}

/// Playlist store with an implicit default playlist
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    library: Vec<MediaItem>,
    playlists: Vec<Playlist>,
    selected: String,
}

impl Default for PlaylistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistStore {
    /// Create a store holding only an empty default playlist
    pub fn new() -> Self {
        Self {
            library: Vec::new(),
            playlists: Vec::new(),
            selected: DEFAULT_PLAYLIST.to_string(),
        }
    }

    /// Replace the default playlist with a freshly loaded library
    pub fn replace_library(&mut self, items: Vec<MediaItem>) {
        debug!(items = items.len(), "Default playlist replaced");
        self.library = items;
    }

    /// The full library
    pub fn library(&self) -> &[MediaItem] {
        &self.library
    }

    /// Create an empty playlist and select it
    pub fn create(&mut self, name: &str) -> Result<(), PlaylistError> {
        if name.trim().is_empty() {
            return Err(PlaylistError::EmptyName);
        }
        if self.contains(name) {
            return Err(PlaylistError::DuplicateName(name.to_string()));
        }

        self.playlists.push(Playlist {
            name: name.to_string(),
            items: Vec::new(),
        });
        self.selected = name.to_string();
        debug!(playlist = name, "Playlist created");
        Ok(())
    }

    /// Delete a playlist
    ///
    /// The default playlist and unknown names are left alone. Deleting the
    /// selected playlist selects the default one. Returns whether anything
    /// was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        if name == DEFAULT_PLAYLIST {
            return false;
        }
        let Some(position) = self.position(name) else {
            return false;
        };

        self.playlists.remove(position);
        if self.selected == name {
            self.selected = DEFAULT_PLAYLIST.to_string();
        }
        debug!(playlist = name, "Playlist deleted");
        true
    }

    /// Append an item unless it is already there
    pub fn add_item(&mut self, name: &str, item: MediaItem) -> Result<AddOutcome, PlaylistError> {
        let playlist = self.user_playlist_mut(name)?;
        if playlist.items.contains(&item) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        playlist.items.push(item);
        Ok(AddOutcome::Added)
    }

    /// Remove the first occurrence of an item
    ///
    /// Returns whether the item was found.
    pub fn remove_item(&mut self, name: &str, item: &MediaItem) -> Result<bool, PlaylistError> {
        let playlist = self.user_playlist_mut(name)?;
        match playlist.items.iter().position(|candidate| candidate == item) {
            Some(position) => {
                playlist.items.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Choose which playlist is displayed
    pub fn select(&mut self, name: &str) -> Result<(), PlaylistError> {
        if !self.contains(name) {
            return Err(PlaylistError::NotFound(name.to_string()));
        }
        self.selected = name.to_string();
        Ok(())
    }

    /// Name of the displayed playlist
    pub fn selected_name(&self) -> &str {
        &self.selected
    }

    /// Whether the default playlist is displayed
    pub fn is_default_selected(&self) -> bool {
        self.selected == DEFAULT_PLAYLIST
    }

    /// Items of the displayed playlist
    pub fn displayed(&self) -> &[MediaItem] {
        self.get(&self.selected).unwrap_or(&self.library)
    }

    /// Items of a playlist by name
    pub fn get(&self, name: &str) -> Option<&[MediaItem]> {
        if name == DEFAULT_PLAYLIST {
            return Some(&self.library);
        }
        self.playlists
            .iter()
            .find(|playlist| playlist.name == name)
            .map(|playlist| playlist.items.as_slice())
    }

    /// Playlist names, default first, then in creation order
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(DEFAULT_PLAYLIST)
            .chain(self.playlists.iter().map(|playlist| playlist.name.as_str()))
            .collect()
    }

    /// Names of playlists that accept edits
    pub fn user_playlist_names(&self) -> Vec<&str> {
        self.playlists
            .iter()
            .map(|playlist| playlist.name.as_str())
            .collect()
    }

    /// Number of playlists including the default one
    pub fn len(&self) -> usize {
        self.playlists.len() + 1
    }

    /// Always false; the default playlist is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether a playlist with this name exists
    pub fn contains(&self, name: &str) -> bool {
        name == DEFAULT_PLAYLIST || self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.playlists
            .iter()
            .position(|playlist| playlist.name == name)
    }

    fn user_playlist_mut(&mut self, name: &str) -> Result<&mut Playlist, PlaylistError> {
        if name == DEFAULT_PLAYLIST {
            return Err(PlaylistError::DefaultPlaylistReadOnly);
        }
        self.playlists
            .iter_mut()
            .find(|playlist| playlist.name == name)
            .ok_or_else(|| PlaylistError::NotFound(name.to_string()))
    }
}
