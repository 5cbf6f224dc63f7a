//! Output volume with ducking
//!
//! While another app holds transient focus the session keeps playing at a
//! lowered level. Regaining focus restores the level that was set before.

/// Volume controller with a duck state
#[derive(Debug, Clone)]
pub struct Volume {
    /// Normal level (0.0-1.0)
    level: f32,

    /// Level while ducked (0.0-1.0)
    duck_level: f32,

    /// Duck state (preserves `level`)
    ducked: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// Both levels are clamped to 0.0-1.0.
    pub fn new(level: f32, duck_level: f32) -> Self {
        Self {
            level: clamp_unit(level),
            duck_level: clamp_unit(duck_level),
            ducked: false,
        }
    }

    /// Lower output to the duck level
    pub fn duck(&mut self) {
        self.ducked = true;
    }

    /// Return to the normal level
    pub fn restore(&mut self) {
        self.ducked = false;
    }

    /// Check if ducked
    pub fn is_ducked(&self) -> bool {
        self.ducked
    }

    /// Normal level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Effective gain handed to the session
    pub fn gain(&self) -> f32 {
        if self.ducked {
            self.duck_level.min(self.level)
        } else {
            self.level
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
