//! In-process playback focus broker
//!
//! One `FocusArbiter` hands out `FocusClient`s. Only one client holds focus
//! at a time; a request from another client takes it over and the previous
//! holder is told it lost focus. `interrupt` plays the part of another
//! application grabbing or returning the output.

use duet_core::{FocusBroker, FocusChange, FocusGrant};
use duet_playback::SessionEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

#[derive(Default)]
struct ArbiterState {
    next_client: u64,
    holder: Option<u64>,
    /// Focus is held outside this process; requests are denied
    external_hold: bool,
    listeners: HashMap<u64, UnboundedSender<SessionEvent>>,
}

impl ArbiterState {
    fn notify(&self, client: u64, change: FocusChange) -> bool {
        self.listeners
            .get(&client)
            .is_some_and(|listener| listener.send(SessionEvent::FocusChanged(change)).is_ok())
    }
}

/// Shared focus arbiter
#[derive(Clone, Default)]
pub struct FocusArbiter {
    state: Arc<Mutex<ArbiterState>>,
}

impl FocusArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client whose focus changes are sent to `listener`
    pub fn client(&self, listener: UnboundedSender<SessionEvent>) -> FocusClient {
        let mut state = self.lock();
        let id = state.next_client;
        state.next_client += 1;
        state.listeners.insert(id, listener);
        FocusClient {
            id,
            arbiter: self.clone(),
        }
    }

    /// Simulate another application changing focus
    ///
    /// `Loss` and `LossTransient` take focus away from this process until a
    /// `Gain`; a duck request leaves it grantable. Returns whether a holder
    /// was told.
    pub fn interrupt(&self, change: FocusChange) -> bool {
        let mut state = self.lock();
        state.external_hold = matches!(change, FocusChange::Loss | FocusChange::LossTransient);
        debug!(?change, external_hold = state.external_hold, "Focus interrupted");
        match state.holder {
            Some(holder) => state.notify(holder, change),
            None => false,
        }
    }

    /// Whether any client holds focus
    pub fn is_held(&self) -> bool {
        self.lock().holder.is_some()
    }

    /// Whether focus is currently held outside this process
    pub fn is_interrupted(&self) -> bool {
        self.lock().external_hold
    }

    fn lock(&self) -> MutexGuard<'_, ArbiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One controller's handle on the arbiter
pub struct FocusClient {
    id: u64,
    arbiter: FocusArbiter,
}

impl FocusBroker for FocusClient {
    fn request(&mut self) -> FocusGrant {
        let mut state = self.arbiter.lock();
        if state.external_hold {
            debug!(client = self.id, "Focus denied");
            return FocusGrant::Denied;
        }

        if let Some(previous) = state.holder.filter(|holder| *holder != self.id) {
            state.notify(previous, FocusChange::Loss);
        }
        state.holder = Some(self.id);
        FocusGrant::Granted
    }

    fn abandon(&mut self) {
        let mut state = self.arbiter.lock();
        if state.holder == Some(self.id) {
            state.holder = None;
        }
    }
}

impl Drop for FocusClient {
    fn drop(&mut self) {
        let mut state = self.arbiter.lock();
        state.listeners.remove(&self.id);
        if state.holder == Some(self.id) {
            state.holder = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_grant_and_abandon() {
        let arbiter = FocusArbiter::new();
        let (tx, _rx) = unbounded_channel();
        let mut client = arbiter.client(tx);

        assert_eq!(client.request(), FocusGrant::Granted);
        assert!(arbiter.is_held());

        client.abandon();
        assert!(!arbiter.is_held());

        // Abandoning without holding is harmless
        client.abandon();
    }

    #[test]
    fn test_second_client_takes_over() {
        let arbiter = FocusArbiter::new();
        let (tx_a, mut rx_a) = unbounded_channel();
        let (tx_b, mut rx_b) = unbounded_channel();
        let mut a = arbiter.client(tx_a);
        let mut b = arbiter.client(tx_b);

        assert_eq!(a.request(), FocusGrant::Granted);
        assert_eq!(b.request(), FocusGrant::Granted);

        assert_eq!(
            rx_a.try_recv().unwrap(),
            SessionEvent::FocusChanged(FocusChange::Loss)
        );
        assert!(rx_b.try_recv().is_err());

        // A's abandon must not clear B's hold
        a.abandon();
        assert!(arbiter.is_held());
    }

    #[test]
    fn test_interrupt_denies_until_gain() {
        let arbiter = FocusArbiter::new();
        let (tx, mut rx) = unbounded_channel();
        let mut client = arbiter.client(tx);
        client.request();

        assert!(arbiter.interrupt(FocusChange::LossTransient));
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::FocusChanged(FocusChange::LossTransient)
        );
        assert_eq!(client.request(), FocusGrant::Denied);

        assert!(arbiter.interrupt(FocusChange::Gain));
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::FocusChanged(FocusChange::Gain)
        );
        assert_eq!(client.request(), FocusGrant::Granted);
    }

    #[test]
    fn test_dropped_client_releases_focus() {
        let arbiter = FocusArbiter::new();
        let (tx, _rx) = unbounded_channel();
        let mut client = arbiter.client(tx);
        client.request();

        drop(client);
        assert!(!arbiter.is_held());
        assert!(!arbiter.interrupt(FocusChange::Loss));
    }
}
