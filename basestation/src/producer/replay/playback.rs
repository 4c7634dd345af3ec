//! Playback direction and speed.

use std::fmt;

/// Direction the replay moves through the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Forward,
    Backward,
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

/// Default upper bound of the speed ladder.
pub const DEFAULT_MAX_SPEED: u32 = 16;

/// Mode and speed multiplier of a replay.
///
/// Speed lives on the ladder `1, 2, 4, ..., max_speed`. Pressing the button
/// for the current direction doubles the speed; pressing the other one
/// reverses direction without changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    mode: PlaybackMode,
    speed: u32,
    max_speed: u32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED)
    }
}

impl PlaybackState {
    /// Forward at normal speed. `max_speed` is clamped to at least 1.
    pub fn new(max_speed: u32) -> Self {
        Self {
            mode: PlaybackMode::Forward,
            speed: 1,
            max_speed: max_speed.max(1),
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn max_speed(&self) -> u32 {
        self.max_speed
    }

    pub fn is_going_forward(&self) -> bool {
        self.mode == PlaybackMode::Forward
    }

    pub fn fast_forward(&mut self) {
        self.advance(PlaybackMode::Forward);
    }

    pub fn rewind(&mut self) {
        self.advance(PlaybackMode::Backward);
    }

    fn advance(&mut self, direction: PlaybackMode) {
        if self.mode == direction {
            self.speed = self.speed.saturating_mul(2).min(self.max_speed);
        } else {
            self.mode = direction;
        }
    }
}
