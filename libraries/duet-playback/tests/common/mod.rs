//! Shared test doubles for the playback integration suites

#![allow(dead_code)]

use duet_core::{
    DuetError, FocusBroker, FocusGrant, MediaItem, MediaKind, PlaybackSession, SessionFactory,
    SessionId,
};
use duet_playback::{PlaybackConfig, PlaybackController, SessionEvent};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Everything the mock platform observed
#[derive(Debug, Default)]
pub struct Recorder {
    pub opened: Vec<(SessionId, String)>,
    pub released: Vec<SessionId>,
    pub starts: usize,
    pub pauses: usize,
    pub seeks: Vec<Duration>,
    pub volumes: Vec<f32>,
    pub focus_requests: usize,
    pub focus_abandons: usize,
    pub position: Duration,
}

pub type Shared = Arc<Mutex<Recorder>>;

pub struct MockSession {
    id: SessionId,
    rec: Shared,
    fail_seek: bool,
}

impl PlaybackSession for MockSession {
    fn start(&mut self) -> duet_core::Result<()> {
        self.rec.lock().unwrap().starts += 1;
        Ok(())
    }

    fn pause(&mut self) -> duet_core::Result<()> {
        self.rec.lock().unwrap().pauses += 1;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> duet_core::Result<()> {
        if self.fail_seek {
            return Err(DuetError::session("seek unsupported"));
        }
        let mut rec = self.rec.lock().unwrap();
        rec.seeks.push(position);
        rec.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.rec.lock().unwrap().position
    }

    fn set_volume(&mut self, volume: f32) {
        self.rec.lock().unwrap().volumes.push(volume);
    }

    fn release(&mut self) {
        self.rec.lock().unwrap().released.push(self.id);
    }
}

pub struct MockFactory {
    rec: Shared,
    fail_open: bool,
    fail_seek: bool,
}

impl SessionFactory for MockFactory {
    fn open(
        &mut self,
        session: SessionId,
        item: &MediaItem,
    ) -> duet_core::Result<Box<dyn PlaybackSession>> {
        if self.fail_open {
            return Err(DuetError::session(format!("cannot open {}", item.locator)));
        }
        let mut rec = self.rec.lock().unwrap();
        rec.opened.push((session, item.id.clone()));
        rec.position = Duration::ZERO;
        Ok(Box::new(MockSession {
            id: session,
            rec: Arc::clone(&self.rec),
            fail_seek: self.fail_seek,
        }))
    }
}

/// Broker that answers from a script, then keeps granting
pub struct ScriptedBroker {
    rec: Shared,
    answers: Vec<FocusGrant>,
}

impl FocusBroker for ScriptedBroker {
    fn request(&mut self) -> FocusGrant {
        self.rec.lock().unwrap().focus_requests += 1;
        if self.answers.is_empty() {
            FocusGrant::Granted
        } else {
            self.answers.remove(0)
        }
    }

    fn abandon(&mut self) {
        self.rec.lock().unwrap().focus_abandons += 1;
    }
}

pub struct Harness {
    pub controller: PlaybackController,
    pub rec: Shared,
}

impl Harness {
    pub fn new(items: usize) -> Self {
        Self::build(items, Vec::new(), false, false)
    }

    pub fn with_focus_answers(items: usize, answers: Vec<FocusGrant>) -> Self {
        Self::build(items, answers, false, false)
    }

    pub fn failing_open(items: usize) -> Self {
        Self::build(items, Vec::new(), true, false)
    }

    pub fn failing_seek(items: usize) -> Self {
        Self::build(items, Vec::new(), false, true)
    }

    pub fn with_clock(items: usize, clock: fn() -> Instant) -> Self {
        let Self { controller, rec } = Self::new(items);
        Self {
            controller: controller.with_clock(clock),
            rec,
        }
    }

    fn build(items: usize, answers: Vec<FocusGrant>, fail_open: bool, fail_seek: bool) -> Self {
        let rec = Shared::default();
        let mut controller = PlaybackController::new(
            &PlaybackConfig::default(),
            Box::new(MockFactory {
                rec: Arc::clone(&rec),
                fail_open,
                fail_seek,
            }),
            Box::new(ScriptedBroker {
                rec: Arc::clone(&rec),
                answers,
            }),
        );
        controller.set_library(library(items));
        controller.drain_events();
        Self { controller, rec }
    }

    /// Id of the most recently opened session
    pub fn last_session(&self) -> SessionId {
        self.rec.lock().unwrap().opened.last().expect("no session opened").0
    }

    /// Report the live session as prepared
    pub fn prepare(&mut self, duration: Duration) {
        let session = self.last_session();
        self.controller
            .handle(SessionEvent::Prepared { session, duration })
            .unwrap();
    }

    /// Report the live session as finished
    pub fn complete(&mut self) {
        let session = self.last_session();
        self.controller
            .handle(SessionEvent::Completed { session })
            .unwrap();
    }

    /// Select and prepare in one go
    pub fn play(&mut self, index: usize, duration: Duration) {
        self.controller.select(index).unwrap();
        self.prepare(duration);
    }

    pub fn set_position(&self, position: Duration) {
        self.rec.lock().unwrap().position = position;
    }
}

pub fn item(index: usize) -> MediaItem {
    MediaItem::new(
        format!("track-{index}"),
        format!("Track {index}"),
        format!("/music/track-{index}.mp3"),
        MediaKind::Audio,
    )
}

pub fn library(len: usize) -> Vec<MediaItem> {
    (0..len).map(item).collect()
}
