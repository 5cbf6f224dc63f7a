//! Clock-driven stand-in for a decode/render pipeline
//!
//! A simulated session "renders" by letting a clock run. Preparation is
//! instant: `open` sends `Prepared` straight away. While running, a timer
//! task sends `Completed` when the clock reaches the item's duration.

use duet_core::{DuetError, MediaItem, PlaybackSession, SessionFactory, SessionId};
use duet_playback::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Runtime clock as a std instant
///
/// Sessions, the controller ticker, and the host loop all read this, so a
/// paused runtime clock stops every one of them together.
pub fn runtime_now() -> std::time::Instant {
    Instant::now().into_std()
}

/// Opens simulated sessions that report back on an event channel
pub struct SimulatedFactory {
    events: UnboundedSender<SessionEvent>,
    default_duration: Duration,
}

impl SimulatedFactory {
    /// `default_duration` is used for items whose source reports none (or zero)
    pub fn new(events: UnboundedSender<SessionEvent>, default_duration: Duration) -> Self {
        Self {
            events,
            default_duration,
        }
    }
}

impl SessionFactory for SimulatedFactory {
    fn open(
        &mut self,
        session: SessionId,
        item: &MediaItem,
    ) -> duet_core::Result<Box<dyn PlaybackSession>> {
        if item.locator.is_empty() {
            return Err(DuetError::session(format!("\"{}\" has no locator", item.title)));
        }

        let duration = item
            .duration
            .filter(|duration| !duration.is_zero())
            .unwrap_or(self.default_duration);

        debug!(%session, title = %item.title, ?duration, "Opening simulated session");
        if self
            .events
            .send(SessionEvent::Prepared { session, duration })
            .is_err()
        {
            debug!(%session, "Event receiver gone; session will never prepare");
        }

        Ok(Box::new(SimulatedSession::new(
            session,
            duration,
            self.events.clone(),
        )))
    }
}

/// Play-head that advances with the tokio clock while running
#[derive(Debug, Clone, Copy)]
struct PlayHead {
    offset: Duration,
    running_since: Option<Instant>,
    duration: Duration,
}

impl PlayHead {
    fn position(&self) -> Duration {
        let elapsed = self
            .running_since
            .map_or(Duration::ZERO, |since| since.elapsed());
        (self.offset + elapsed).min(self.duration)
    }

    fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.position())
    }
}

/// One simulated decode session
pub struct SimulatedSession {
    id: SessionId,
    head: PlayHead,
    volume: f32,
    events: UnboundedSender<SessionEvent>,
    completion: Option<JoinHandle<()>>,
}

impl SimulatedSession {
    fn new(id: SessionId, duration: Duration, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            id,
            head: PlayHead {
                offset: Duration::ZERO,
                running_since: None,
                duration,
            },
            volume: 1.0,
            events,
            completion: None,
        }
    }

    /// Current output volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn is_running(&self) -> bool {
        self.head.running_since.is_some()
    }

    fn schedule_completion(&mut self) -> duet_core::Result<()> {
        self.cancel_completion();

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DuetError::session(format!("no runtime for session timer: {e}")))?;

        let remaining = self.head.remaining();
        let session = self.id;
        let events = self.events.clone();
        self.completion = Some(runtime.spawn(async move {
            tokio::time::sleep(remaining).await;
            let _ = events.send(SessionEvent::Completed { session });
        }));
        Ok(())
    }

    fn cancel_completion(&mut self) {
        if let Some(task) = self.completion.take() {
            task.abort();
        }
    }

    fn freeze(&mut self) {
        self.head.offset = self.head.position();
        self.head.running_since = None;
    }
}

impl PlaybackSession for SimulatedSession {
    fn start(&mut self) -> duet_core::Result<()> {
        if !self.is_running() {
            self.head.running_since = Some(Instant::now());
        }
        trace!(session = %self.id, position = ?self.head.position(), "Start");
        self.schedule_completion()
    }

    fn pause(&mut self) -> duet_core::Result<()> {
        self.freeze();
        self.cancel_completion();
        trace!(session = %self.id, position = ?self.head.position(), "Pause");
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> duet_core::Result<()> {
        self.head.offset = position.min(self.head.duration);
        if self.is_running() {
            self.head.running_since = Some(Instant::now());
            self.schedule_completion()?;
        }
        trace!(session = %self.id, ?position, "Seek");
        Ok(())
    }

    fn position(&self) -> Duration {
        self.head.position()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn release(&mut self) {
        self.freeze();
        self.cancel_completion();
        debug!(session = %self.id, "Simulated session released");
    }
}

impl Drop for SimulatedSession {
    fn drop(&mut self) {
        self.cancel_completion();
    }
}
