//! Duet Player terminal front end
//!
//! Wires the playback controller and library loader to desktop stand-ins for
//! the platform: a directory index, an HTTP catalog, a clock-driven session,
//! and an in-process focus broker.

pub mod app;
pub mod config;
pub mod error;
pub mod focus;
pub mod intent;
pub mod screen;
pub mod simulated;

pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use focus::{FocusArbiter, FocusClient};
pub use intent::{Intent, IntentError};
pub use screen::{Flow, Screen};
pub use simulated::{runtime_now, SimulatedFactory, SimulatedSession};
