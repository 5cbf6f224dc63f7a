//! Playback controller - the per-screen state machine
//!
//! Owns at most one decode session, the playback focus, and the progress
//! ticker. Transport operations and inbound `SessionEvent`s are the only
//! things that mutate state.
//!
//! ```text
//! Idle -> Preparing -> Playing <-> Paused -> Completed
//!   ^__________________ teardown from anywhere ______|
//! ```

use crate::{
    error::{PlaybackError, Result},
    events::{PlaybackEvent, SessionEvent},
    shuffle::random_index,
    ticker::{progress_percent, ProgressTicker},
    types::{PlaybackConfig, PlaybackPhase, PlaybackSnapshot},
    volume::Volume,
};
use duet_core::{
    FocusBroker, FocusChange, FocusGrant, MediaItem, PlaybackSession, SessionFactory, SessionId,
};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The live session and the id its events carry
struct ActiveSession {
    id: SessionId,
    handle: Box<dyn PlaybackSession>,
}

/// Progress values produced by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Elapsed position
    pub position: Duration,
    /// Total duration
    pub total: Duration,
    /// Display ratio 0-100
    pub percent: f32,
}

/// Per-screen playback state machine
///
/// Orchestrates:
/// - Session lifecycle (one live session, released before the next opens)
/// - Playback focus (requested on every selection, abandoned on teardown)
/// - Completion handling (loop, circular advance, stop on single item)
/// - Progress ticking (armed only while playing)
/// - Ducking on transient focus loss
pub struct PlaybackController {
    library: Vec<MediaItem>,

    // State
    phase: PlaybackPhase,
    current: Option<usize>,
    position: Duration,
    total: Duration,
    progress: f32,
    loop_enabled: bool,

    // Session and focus
    factory: Box<dyn SessionFactory>,
    focus: Box<dyn FocusBroker>,
    session: Option<ActiveSession>,
    last_session_id: SessionId,
    focus_held: bool,
    focus_suspended: bool,
    resume_on_gain: bool,

    volume: Volume,
    ticker: ProgressTicker,
    clock: fn() -> Instant,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller in `Idle` with an empty library
    pub fn new(
        config: &PlaybackConfig,
        factory: Box<dyn SessionFactory>,
        focus: Box<dyn FocusBroker>,
    ) -> Self {
        Self {
            library: Vec::new(),
            phase: PlaybackPhase::Idle,
            current: None,
            position: Duration::ZERO,
            total: Duration::ZERO,
            progress: 0.0,
            loop_enabled: config.loop_enabled,
            factory,
            focus,
            session: None,
            last_session_id: SessionId::new(0),
            focus_held: false,
            focus_suspended: false,
            resume_on_gain: false,
            volume: Volume::new(config.full_volume, config.duck_volume),
            ticker: ProgressTicker::new(config.tick_interval()),
            clock: Instant::now,
            pending_events: Vec::new(),
        }
    }

    /// Use another time source for arming the progress ticker
    ///
    /// Must be the same clock the host passes to `poll_tick`.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> Instant) -> Self {
        self.clock = clock;
        self
    }

    // ===== Library =====

    /// Replace the library wholesale
    ///
    /// The current item keeps playing if an equal item exists in the new
    /// library; otherwise its session is released and the controller goes
    /// back to `Idle`.
    pub fn set_library(&mut self, items: Vec<MediaItem>) {
        let remapped = self
            .current_item()
            .and_then(|item| items.iter().position(|candidate| candidate == item));

        self.library = items;

        match (self.current, remapped) {
            (Some(old), Some(new)) => {
                if old != new {
                    debug!(old, new, "Current item moved in reloaded library");
                }
                self.current = Some(new);
            }
            (Some(_), None) => {
                info!("Current item left the library, stopping");
                self.release_session();
                self.reset_progress();
                self.current = None;
                self.set_phase(PlaybackPhase::Idle);
            }
            (None, _) => {}
        }

        self.emit(PlaybackEvent::LibraryChanged {
            length: self.library.len(),
        });
    }

    /// Items the controller navigates over
    pub fn library(&self) -> &[MediaItem] {
        &self.library
    }

    // ===== Transport =====

    /// Select an item and start preparing it
    ///
    /// Releases any prior session and resets progress before asking for
    /// focus. On denial the controller stays `Idle` with nothing selected.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.library.is_empty() {
            return Err(PlaybackError::EmptyLibrary);
        }
        let item = self
            .library
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        self.release_session();
        self.reset_progress();
        self.current = None;
        self.resume_on_gain = false;
        self.set_phase(PlaybackPhase::Idle);

        info!(
            target: "media_event",
            item = %item.title,
            kind = %item.kind,
            event_type = "selected",
            "Media event"
        );

        if self.focus.request() == FocusGrant::Denied {
            warn!(item = %item.title, "Playback focus denied, selection abandoned");
            self.emit(PlaybackEvent::Notice {
                message: format!("Could not start \"{}\": audio output is busy", item.title),
            });
            return Err(PlaybackError::FocusDenied);
        }
        self.focus_held = true;
        self.focus_suspended = false;

        let id = self.last_session_id.next();
        self.last_session_id = id;

        let mut handle = match self.factory.open(id, &item) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(item = %item.title, error = %err, "Failed to open session");
                self.release_focus();
                self.emit(PlaybackEvent::Error {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };
        handle.set_volume(self.volume.gain());

        debug!(session = %id, index, "Session opened");
        self.session = Some(ActiveSession { id, handle });
        self.current = Some(index);
        self.set_phase(PlaybackPhase::Preparing);
        self.emit(PlaybackEvent::ItemChanged {
            index,
            item_id: item.id,
            title: item.title,
        });

        Ok(())
    }

    /// Flip between playing and paused
    ///
    /// From `Completed` this restarts the finished item from the beginning.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.phase {
            PlaybackPhase::Playing => {
                self.session_mut()?.pause()?;
                self.resume_on_gain = false;
                self.set_phase(PlaybackPhase::Paused);
                Ok(())
            }
            PlaybackPhase::Paused => {
                self.session_mut()?.start()?;
                self.resume_on_gain = false;
                self.set_phase(PlaybackPhase::Playing);
                Ok(())
            }
            PlaybackPhase::Completed => self.restart_from_zero(),
            PlaybackPhase::Idle | PlaybackPhase::Preparing => Err(PlaybackError::InvalidOperation(
                format!("cannot toggle playback while {}", self.phase),
            )),
        }
    }

    /// Seek to a fraction of the total duration
    ///
    /// The fraction is clamped to 0.0-1.0 (NaN counts as 0.0). Returns the
    /// absolute position that was sought to.
    pub fn seek(&mut self, fraction: f64) -> Result<Duration> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let position = self.total.mul_f64(fraction);

        self.session_mut()?.seek(position)?;
        self.position = position;
        self.progress = progress_percent(self.position, self.total);
        self.emit_position();

        Ok(position)
    }

    /// Jump back to the start of the current item
    pub fn restart(&mut self) -> Result<()> {
        self.seek(0.0).map(|_| ())
    }

    /// Select the following item, wrapping around
    pub fn next(&mut self) -> Result<()> {
        self.advance()
    }

    /// Select the item after the current one, wrapping around
    ///
    /// Steps forward exactly like `next`; the screens have always behaved
    /// this way and callers rely on it.
    pub fn previous(&mut self) -> Result<()> {
        self.advance()
    }

    /// Flip the loop flag, returning the new value
    pub fn toggle_loop(&mut self) -> bool {
        self.loop_enabled = !self.loop_enabled;
        self.emit(PlaybackEvent::LoopChanged {
            enabled: self.loop_enabled,
        });
        self.loop_enabled
    }

    /// Select a uniformly random item from the whole library
    pub fn shuffle(&mut self) -> Result<()> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Select a random item using the given RNG
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let index = random_index(rng, self.library.len()).ok_or(PlaybackError::EmptyLibrary)?;
        self.select(index)
    }

    /// Release everything and return to `Idle`
    ///
    /// Safe to call any number of times.
    pub fn teardown(&mut self) {
        self.release_session();
        self.release_focus();
        self.ticker.disarm();
        self.current = None;
        self.reset_progress();
        self.resume_on_gain = false;
        self.volume.restore();
        self.set_phase(PlaybackPhase::Idle);
    }

    // ===== Inbound events =====

    /// Apply an inbound session or focus event
    ///
    /// Session-scoped events for anything but the live session are ignored.
    pub fn handle(&mut self, event: SessionEvent) -> Result<()> {
        if let Some(session) = event.session() {
            if !self.is_live(session) {
                debug!(session = %session, ?event, "Ignoring event for released session");
                return Ok(());
            }
        }

        match event {
            SessionEvent::Prepared { duration, .. } => self.on_prepared(duration),
            SessionEvent::Completed { .. } => self.on_completed(),
            SessionEvent::Failed { message, .. } => {
                self.on_failed(message);
                Ok(())
            }
            SessionEvent::FocusChanged(change) => self.on_focus_changed(change),
        }
    }

    fn on_prepared(&mut self, duration: Duration) -> Result<()> {
        if self.phase != PlaybackPhase::Preparing {
            debug!(phase = %self.phase, "Duplicate prepared event ignored");
            return Ok(());
        }

        self.total = duration;
        self.position = Duration::ZERO;
        self.progress = 0.0;

        if self.focus_suspended {
            // Focus went away while preparing; wait for it to come back.
            self.resume_on_gain = true;
            self.set_phase(PlaybackPhase::Paused);
            return Ok(());
        }

        self.session_mut()?.start()?;
        self.set_phase(PlaybackPhase::Playing);
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        let Some(index) = self.current else {
            return Ok(());
        };

        if let Some(item) = self.library.get(index) {
            info!(
                target: "media_event",
                item = %item.title,
                kind = %item.kind,
                event_type = "completed",
                "Media event"
            );
        }
        self.emit(PlaybackEvent::ItemFinished { index });

        if self.loop_enabled {
            return self.restart_from_zero();
        }

        let next = (index + 1) % self.library.len().max(1);
        if next == index {
            self.position = self.total;
            self.progress = progress_percent(self.position, self.total);
            self.set_phase(PlaybackPhase::Completed);
            return Ok(());
        }

        self.select(next)
    }

    fn on_failed(&mut self, message: String) {
        warn!(error = %message, "Session failed");
        self.release_session();
        self.release_focus();
        self.reset_progress();
        self.set_phase(PlaybackPhase::Idle);
        self.emit(PlaybackEvent::Error { message });
    }

    fn on_focus_changed(&mut self, change: FocusChange) -> Result<()> {
        debug!(?change, phase = %self.phase, "Focus changed");
        match change {
            FocusChange::Loss | FocusChange::LossTransient => {
                self.focus_suspended = true;
                if self.phase == PlaybackPhase::Playing {
                    self.session_mut()?.pause()?;
                    self.resume_on_gain = true;
                    self.set_phase(PlaybackPhase::Paused);
                }
            }
            FocusChange::LossTransientCanDuck => {
                self.volume.duck();
                self.apply_volume();
            }
            FocusChange::Gain => {
                self.focus_suspended = false;
                if self.volume.is_ducked() {
                    self.volume.restore();
                    self.apply_volume();
                }
                if self.resume_on_gain && self.phase == PlaybackPhase::Paused {
                    self.session_mut()?.start()?;
                    self.set_phase(PlaybackPhase::Playing);
                }
                self.resume_on_gain = false;
            }
        }
        Ok(())
    }

    // ===== Progress =====

    /// When the host should next call `poll_tick`
    pub fn next_tick_deadline(&self) -> Option<Instant> {
        self.ticker.next_deadline()
    }

    /// Refresh progress if the ticker is due at `now`
    pub fn poll_tick(&mut self, now: Instant) -> Option<ProgressUpdate> {
        if self.ticker.poll(now) {
            self.refresh_progress()
        } else {
            None
        }
    }

    /// Read the session position and recompute the display ratio
    ///
    /// Only does anything while playing.
    pub fn refresh_progress(&mut self) -> Option<ProgressUpdate> {
        if self.phase != PlaybackPhase::Playing {
            return None;
        }
        let position = self.session.as_ref()?.handle.position();

        self.position = if self.total.is_zero() {
            position
        } else {
            position.min(self.total)
        };
        self.progress = progress_percent(self.position, self.total);
        self.emit_position();

        Some(ProgressUpdate {
            position: self.position,
            total: self.total,
            percent: self.progress,
        })
    }

    // ===== State Queries =====

    /// Current phase
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Library index of the current item
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current item
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.current.and_then(|index| self.library.get(index))
    }

    /// Whether the session is rendering
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// Loop flag
    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Elapsed position as of the last tick or seek
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Total duration of the current item (zero until prepared)
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Whether a session is loaded
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the progress ticker is armed
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Copy of everything the presentation layer renders
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            current_index: self.current,
            current_item: self.current_item().cloned(),
            position: self.position,
            total: self.total,
            progress_percent: self.progress,
            loop_enabled: self.loop_enabled,
            volume: self.volume.gain(),
        }
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn advance(&mut self) -> Result<()> {
        if self.library.is_empty() {
            return Err(PlaybackError::EmptyLibrary);
        }
        let index = self
            .current
            .map_or(0, |index| (index + 1) % self.library.len());
        self.select(index)
    }

    fn restart_from_zero(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session.seek(Duration::ZERO)?;
        session.start()?;
        self.position = Duration::ZERO;
        self.progress = 0.0;
        self.set_phase(PlaybackPhase::Playing);
        self.emit_position();
        Ok(())
    }

    fn is_live(&self, session: SessionId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|active| active.id == session)
    }

    fn session_mut(&mut self) -> Result<&mut (dyn PlaybackSession + 'static)> {
        self.session
            .as_mut()
            .map(|active| active.handle.as_mut())
            .ok_or(PlaybackError::NoItemLoaded)
    }

    fn release_session(&mut self) {
        if let Some(mut active) = self.session.take() {
            debug!(session = %active.id, "Releasing session");
            active.handle.release();
        }
    }

    fn release_focus(&mut self) {
        if self.focus_held {
            self.focus.abandon();
            self.focus_held = false;
        }
        self.focus_suspended = false;
    }

    fn reset_progress(&mut self) {
        self.position = Duration::ZERO;
        self.total = Duration::ZERO;
        self.progress = 0.0;
    }

    fn apply_volume(&mut self) {
        let gain = self.volume.gain();
        if let Some(active) = self.session.as_mut() {
            active.handle.set_volume(gain);
        }
        self.emit(PlaybackEvent::VolumeChanged { volume: gain });
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        if phase == PlaybackPhase::Playing {
            self.ticker.arm((self.clock)());
        } else {
            self.ticker.disarm();
        }

        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "Phase transition");
            self.phase = phase;
            self.emit(PlaybackEvent::StateChanged { phase });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: duration_ms(self.position),
            duration_ms: duration_ms(self.total),
            percent: self.progress,
        });
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
