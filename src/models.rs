//! Data models for the control overlay
//!
//! The overlay state is a flat set of UI flags. Everything the widget
//! reports back arrives as a [`Progress`] payload, and everything the
//! overlay pushes to the widget leaves as [`PlaybackProps`].

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Overlay State
// =============================================================================

/// Flat UI state of the player overlay
///
/// Created at mount with [`PlayerUIState::default`] (or config overrides),
/// mutated in place by the overlay handlers, discarded on exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUIState {
    /// Playback requested
    pub playing: bool,
    /// Audio muted
    pub muted: bool,
    /// Volume, 0.0 - 1.0
    pub volume: f64,
    /// Playback speed multiplier
    pub playback_rate: f64,
    /// Played fraction of the duration, 0.0 - 1.0
    pub played: f64,
    /// Played position in seconds
    pub played_seconds: f64,
    /// Buffered fraction of the duration, 0.0 - 1.0
    pub loaded: f64,
    /// Buffered position in seconds
    pub loaded_seconds: f64,
    /// Seek slider is being dragged
    pub seeking: bool,
    /// Last fullscreen state read back from the fullscreen API
    pub full_screen: bool,
}

impl Default for PlayerUIState {
    fn default() -> Self {
        Self {
            playing: true,
            muted: true,
            volume: 0.5,
            playback_rate: 1.0,
            played: 0.0,
            played_seconds: 0.0,
            loaded: 0.0,
            loaded_seconds: 0.0,
            seeking: false,
            full_screen: true,
        }
    }
}

impl PlayerUIState {
    /// Merge a progress payload into the state
    pub fn merge_progress(&mut self, progress: &Progress) {
        self.played = progress.played;
        self.played_seconds = progress.played_seconds;
        self.loaded = progress.loaded;
        self.loaded_seconds = progress.loaded_seconds;
    }

    /// Props mirrored into the widget
    pub fn props(&self) -> PlaybackProps {
        PlaybackProps {
            playing: self.playing,
            muted: self.muted,
            volume: self.volume,
            playback_rate: self.playback_rate,
        }
    }
}

// =============================================================================
// Widget Payloads
// =============================================================================

/// Periodic progress report from the playback widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Played fraction, 0.0 - 1.0
    pub played: f64,
    /// Played seconds
    pub played_seconds: f64,
    /// Buffered fraction, 0.0 - 1.0
    pub loaded: f64,
    /// Buffered seconds
    pub loaded_seconds: f64,
}

impl Progress {
    /// Build a progress payload from positions in seconds
    ///
    /// Fractions are zero while the duration is unknown.
    pub fn from_seconds(played_seconds: f64, loaded_seconds: f64, duration: Option<f64>) -> Self {
        let fraction = |secs: f64| match duration {
            Some(d) if d.is_finite() && d > 0.0 => (secs / d).clamp(0.0, 1.0),
            _ => 0.0,
        };

        Self {
            played: fraction(played_seconds),
            played_seconds,
            loaded: fraction(loaded_seconds),
            loaded_seconds,
        }
    }
}

/// Props pushed to the playback widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProps {
    pub playing: bool,
    pub muted: bool,
    pub volume: f64,
    pub playback_rate: f64,
}

/// Absolute seek target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTo {
    /// Position in seconds
    Seconds(f64),
    /// Fraction of the duration, 0.0 - 1.0
    Fraction(f64),
}

impl fmt::Display for SeekTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekTo::Seconds(secs) => write!(f, "{:.1}s", secs),
            SeekTo::Fraction(frac) => write!(f, "{:.1}%", frac * 100.0),
        }
    }
}

// =============================================================================
// Playback Rate
// =============================================================================

/// Playback rate presets cycled by the settings button
pub const PLAYBACK_RATE_PRESETS: &[f64] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Next preset above `current`, wrapping to the slowest preset
pub fn next_playback_rate(current: f64) -> f64 {
    PLAYBACK_RATE_PRESETS
        .iter()
        .copied()
        .find(|&rate| rate > current + 0.001)
        .unwrap_or(PLAYBACK_RATE_PRESETS[0])
}
