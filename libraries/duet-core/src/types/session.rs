/// Session and focus types shared between the controller and its collaborators
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token identifying one opened decode session
///
/// Minted by the controller each time it opens a session. Events carrying any
/// other id than the live one belong to a released session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a session id from a raw counter value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The id following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Answer from the playback-resource broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusGrant {
    /// Exclusive output granted
    Granted,
    /// Another owner keeps the output
    Denied,
}

/// Asynchronous signal from the playback-resource broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusChange {
    /// Focus lost for an unknown time
    Loss,
    /// Focus lost briefly (e.g. a notification)
    LossTransient,
    /// Focus lost briefly, playback may continue quietly
    LossTransientCanDuck,
    /// Focus (re)gained
    Gain,
}
