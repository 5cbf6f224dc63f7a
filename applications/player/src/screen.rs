//! Music and video screens
//!
//! A screen owns one playback controller and, for music, the playlist store.
//! It turns intents into controller and store calls and queues text lines
//! for the terminal. Nothing here blocks; the host loop feeds in stdin
//! lines, session events, remote results, and ticks.

use crate::focus::FocusArbiter;
use crate::intent::{Intent, HELP};
use duet_core::{format_duration, MediaItem, MediaKind};
use duet_library::{merge, AddOutcome, LocalLoad, PlaylistStore, DEFAULT_PLAYLIST};
use duet_playback::{
    PlaybackController, PlaybackError, PlaybackEvent, PlaybackPhase, SessionEvent,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// What the host loop should do after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const PERMISSION_NOTICE: &str =
    "Storage access was refused; local media cannot be listed. Grant read access to the media folder and reopen the screen.";

const BAR_WIDTH: usize = 20;

pub struct Screen {
    kind: MediaKind,
    controller: PlaybackController,
    focus: FocusArbiter,

    /// Music only
    playlists: Option<PlaylistStore>,

    local: Vec<MediaItem>,
    remote: Vec<MediaItem>,
    permission_notice_shown: bool,

    output: Vec<String>,
}

impl Screen {
    pub fn new(kind: MediaKind, controller: PlaybackController, focus: FocusArbiter) -> Self {
        let playlists = match kind {
            MediaKind::Audio => Some(PlaylistStore::new()),
            MediaKind::Video => None,
        };

        Self {
            kind,
            controller,
            focus,
            playlists,
            local: Vec::new(),
            remote: Vec::new(),
            permission_notice_shown: false,
            output: Vec::new(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn playlists(&self) -> Option<&PlaylistStore> {
        self.playlists.as_ref()
    }

    // ===== Library =====

    /// Show the local half of the library
    pub fn load_local(&mut self, local: LocalLoad) {
        if local.permission_denied && !self.permission_notice_shown {
            self.permission_notice_shown = true;
            self.say(PERMISSION_NOTICE);
        }
        self.local = local.items;
        self.refresh_library();
        self.render_list();
    }

    /// Merge in the remote half once it arrives
    ///
    /// A failure was already logged by the fetch; the local list stays.
    pub fn on_remote(&mut self, result: Result<Vec<MediaItem>, String>) {
        match result {
            Ok(items) if items.is_empty() => {}
            Ok(items) => {
                self.say(format!("{} more from the remote library", items.len()));
                self.remote = items;
                self.refresh_library();
                self.render_list();
            }
            Err(message) => debug!(%message, "Remote items dropped"),
        }
    }

    /// The controller always walks the full library, whatever is displayed
    fn refresh_library(&mut self) {
        let items = merge(self.remote.clone(), self.local.clone());
        if let Some(store) = &mut self.playlists {
            store.replace_library(items.clone());
        }
        self.controller.set_library(items);
        self.render_events();
    }

    /// Items currently listed
    pub fn displayed(&self) -> &[MediaItem] {
        match &self.playlists {
            Some(store) => store.displayed(),
            None => self.controller.library(),
        }
    }

    // ===== Host loop inputs =====

    /// Parse and apply one terminal line
    pub fn dispatch_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Intent>() {
            Ok(intent) => self.apply(intent),
            Err(err) => {
                self.say(err.to_string());
                Flow::Continue
            }
        }
    }

    /// Apply an inbound session or focus event
    pub fn on_session_event(&mut self, event: SessionEvent) {
        if let Err(err) = self.controller.handle(event) {
            self.report(&err);
        }
        self.render_events();
    }

    /// When the host should wake up for the next progress refresh
    pub fn next_tick_deadline(&self) -> Option<Instant> {
        self.controller.next_tick_deadline()
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.controller.poll_tick(now);
        self.render_events();
    }

    /// Release the session and focus on screen exit
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.controller.drain_events();
    }

    /// Take the queued output lines
    pub fn drain_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ===== Intents =====

    pub fn apply(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::List => self.render_list(),
            Intent::Status => self.render_status(),
            Intent::Play(number) => self.play(number),
            Intent::TogglePlayPause => {
                let result = self.controller.toggle_play_pause();
                self.settle(result);
            }
            Intent::Seek(percent) => {
                let result = self.controller.seek(percent / 100.0).map(|_| ());
                self.settle(result);
            }
            Intent::Restart => {
                let result = self.controller.restart();
                self.settle(result);
            }
            Intent::Next => {
                let result = self.controller.next();
                self.settle(result);
            }
            Intent::Previous => {
                let result = self.controller.previous();
                self.settle(result);
            }
            Intent::ToggleLoop => {
                self.controller.toggle_loop();
                self.render_events();
            }
            Intent::Shuffle => {
                let result = self.controller.shuffle();
                self.settle(result);
            }
            Intent::Focus(change) => {
                if !self.focus.interrupt(change) {
                    self.say("Nothing is holding the output");
                }
            }
            Intent::ListPlaylists => self.list_playlists(),
            Intent::CreatePlaylist(name) => self.create_playlist(&name),
            Intent::DeletePlaylist(name) => self.delete_playlist(&name),
            Intent::OpenPlaylist(name) => self.open_playlist(&name),
            Intent::AddToPlaylist { item, playlist } => self.add_to_playlist(item, &playlist),
            Intent::RemoveFromPlaylist(item) => self.remove_from_playlist(item),
            Intent::Help => self.say(HELP),
            Intent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn play(&mut self, number: usize) {
        let Some(item) = number
            .checked_sub(1)
            .and_then(|index| self.displayed().get(index))
        else {
            self.say(format!("No item {number}"));
            return;
        };

        // A playlist entry plays at its position in the full library
        let Some(index) = self
            .controller
            .library()
            .iter()
            .position(|candidate| candidate == item)
        else {
            let message = format!("\"{}\" is no longer in the library", item.title);
            self.say(message);
            return;
        };

        let result = self.controller.select(index);
        self.settle(result);
    }

    fn settle(&mut self, result: duet_playback::Result<()>) {
        if let Err(err) = result {
            self.report(&err);
        }
        self.render_events();
    }

    fn report(&mut self, err: &PlaybackError) {
        match err {
            // The controller already queued a notice for these
            PlaybackError::FocusDenied => {}
            PlaybackError::Session(_) if self.controller.has_pending_events() => {}
            PlaybackError::NoItemLoaded => self.say("Nothing is playing"),
            PlaybackError::EmptyLibrary => self.say("The list is empty"),
            other => self.say(other.to_string()),
        }
    }

    // ===== Playlists =====

    fn with_store(&mut self) -> Option<&mut PlaylistStore> {
        if self.playlists.is_none() {
            self.say("Playlists are only available on the music screen");
        }
        self.playlists.as_mut()
    }

    fn list_playlists(&mut self) {
        let Some(store) = self.with_store() else {
            return;
        };
        let lines: Vec<String> = store
            .names()
            .into_iter()
            .map(|name| {
                let marker = if name == store.selected_name() { '*' } else { ' ' };
                let count = store.get(name).map_or(0, <[MediaItem]>::len);
                format!("{marker} {name} ({count})")
            })
            .collect();
        self.output.extend(lines);
    }

    fn create_playlist(&mut self, name: &str) {
        let Some(store) = self.with_store() else {
            return;
        };
        match store.create(name) {
            Ok(()) => {
                self.say(format!("Created playlist \"{name}\""));
                self.render_list();
            }
            Err(err) => self.say(err.to_string()),
        }
    }

    fn delete_playlist(&mut self, name: &str) {
        let Some(store) = self.with_store() else {
            return;
        };
        if !store.delete(name) {
            let message = if name == DEFAULT_PLAYLIST {
                "The default playlist cannot be deleted".to_string()
            } else {
                format!("No playlist named \"{name}\"")
            };
            self.say(message);
            return;
        }
        self.say(format!("Deleted playlist \"{name}\""));
    }

    fn open_playlist(&mut self, name: &str) {
        let Some(store) = self.with_store() else {
            return;
        };
        match store.select(name) {
            Ok(()) => self.render_list(),
            Err(err) => self.say(err.to_string()),
        }
    }

    fn add_to_playlist(&mut self, number: usize, playlist: &str) {
        let Some(store) = self.with_store() else {
            return;
        };
        let Some(item) = number
            .checked_sub(1)
            .and_then(|index| store.displayed().get(index))
            .cloned() else {
            self.say(format!("No item {number}"));
            return;
        };
        let title = item.title.clone();
        match store.add_item(playlist, item) {
            Ok(AddOutcome::Added) => {
                self.say(format!("Added \"{title}\" to \"{playlist}\""));
            }
            Ok(AddOutcome::AlreadyPresent) => {
                self.say(format!("\"{title}\" is already in \"{playlist}\""));
            }
            Err(err) => self.say(err.to_string()),
        }
    }

    fn remove_from_playlist(&mut self, number: usize) {
        let Some(store) = self.with_store() else {
            return;
        };
        let name = store.selected_name().to_string();
        let Some(item) = number
            .checked_sub(1)
            .and_then(|index| store.displayed().get(index))
            .cloned() else {
            self.say(format!("No item {number}"));
            return;
        };
        match store.remove_item(&name, &item) {
            Ok(_) => {
                self.say(format!("Removed \"{}\" from \"{name}\"", item.title));
                self.render_list();
            }
            Err(err) => self.say(err.to_string()),
        }
    }

    // ===== Rendering =====

    fn say(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    fn render_list(&mut self) {
        let heading = match (&self.playlists, self.kind) {
            (Some(store), _) => format!("== Music: {} ==", store.selected_name()),
            (None, MediaKind::Video) => "== Videos ==".to_string(),
            (None, MediaKind::Audio) => "== Music ==".to_string(),
        };

        let playing = self.current_in_display();
        let mut lines = vec![heading];
        if self.displayed().is_empty() {
            lines.push("  (nothing here yet)".to_string());
        }
        for (index, item) in self.displayed().iter().enumerate() {
            let marker = if playing == Some(index) { '>' } else { ' ' };
            let line = match (self.kind, item.duration) {
                (MediaKind::Video, Some(duration)) => format!(
                    "{marker}{:>3}. {}  ({})",
                    index + 1,
                    item.title,
                    format_duration(duration)
                ),
                _ => format!("{marker}{:>3}. {}", index + 1, item.title),
            };
            lines.push(line);
        }
        self.output.extend(lines);
    }

    /// Index of the playing item within the displayed list
    fn current_in_display(&self) -> Option<usize> {
        let current = self.controller.current_item()?;
        self.displayed().iter().position(|item| item == current)
    }

    fn render_status(&mut self) {
        let snapshot = self.controller.snapshot();
        let line = match &snapshot.current_item {
            Some(item) => format!(
                "{}: {}  {}  loop {}",
                snapshot.phase,
                item.title,
                progress_line(snapshot.position, snapshot.total, snapshot.progress_percent),
                if snapshot.loop_enabled { "on" } else { "off" }
            ),
            None => format!(
                "{}  loop {}",
                snapshot.phase,
                if snapshot.loop_enabled { "on" } else { "off" }
            ),
        };
        self.say(line);
    }

    fn render_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                PlaybackEvent::ItemChanged { index, title, .. } => {
                    self.say(format!("Now playing {}. {title}", index + 1));
                }
                PlaybackEvent::StateChanged { phase } => match phase {
                    PlaybackPhase::Paused => self.say("Paused"),
                    PlaybackPhase::Completed => self.say("Finished"),
                    PlaybackPhase::Playing => self.say(progress_line(
                        self.controller.position(),
                        self.controller.total(),
                        self.controller.snapshot().progress_percent,
                    )),
                    PlaybackPhase::Idle | PlaybackPhase::Preparing => {}
                },
                PlaybackEvent::PositionUpdate {
                    position_ms,
                    duration_ms,
                    percent,
                } => self.say(progress_line(
                    Duration::from_millis(position_ms),
                    Duration::from_millis(duration_ms),
                    percent,
                )),
                PlaybackEvent::LoopChanged { enabled } => {
                    self.say(if enabled { "Loop on" } else { "Loop off" });
                }
                PlaybackEvent::VolumeChanged { volume } => {
                    self.say(format!("Volume {:.0}%", volume * 100.0));
                }
                PlaybackEvent::Notice { message } => self.say(message),
                PlaybackEvent::Error { message } => self.say(format!("Error: {message}")),
                PlaybackEvent::ItemFinished { .. } | PlaybackEvent::LibraryChanged { .. } => {}
            }
        }
    }
}

/// `01:05 / 03:20 [######--------------] 32%`
pub fn progress_line(position: Duration, total: Duration, percent: f32) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f32).round() as usize;
    format!(
        "{} / {} [{}{}] {:.0}%",
        format_duration(position),
        format_duration(total),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}
