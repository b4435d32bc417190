//! Simulated playback widget
//!
//! Keeps its own playback clock instead of talking to a player process.
//! Used by `--demo` and by tests that need a widget with real seek and
//! clamping behavior.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::{FullscreenApi, MediaWidget, WidgetError, WidgetEvent};
use crate::models::{PlaybackProps, Progress, SeekTo};

/// Seconds buffered ahead of the playhead
const BUFFER_AHEAD_SECS: f64 = 30.0;

/// In-memory widget with a simulated clock
#[derive(Debug, Clone)]
pub struct MemoryWidget {
    duration: f64,
    position: f64,
    props: PlaybackProps,
    fullscreen: bool,
    subtitles: bool,
    playlist_len: usize,
    playlist_index: usize,
    interval: Duration,
    last_tick: Option<Instant>,
    pending: VecDeque<WidgetEvent>,
}

impl MemoryWidget {
    /// Create a paused-at-zero widget for media of `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            position: 0.0,
            props: PlaybackProps {
                playing: false,
                muted: false,
                volume: 1.0,
                playback_rate: 1.0,
            },
            fullscreen: false,
            subtitles: true,
            playlist_len: 1,
            playlist_index: 0,
            interval: Duration::from_secs(1),
            last_tick: None,
            pending: VecDeque::new(),
        }
    }

    /// Set the progress callback interval used by `poll_event`
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Simulate a playlist of `len` entries
    pub fn with_playlist(mut self, len: usize) -> Self {
        self.playlist_len = len.max(1);
        self
    }

    /// Props last applied by `sync`
    pub fn props(&self) -> &PlaybackProps {
        &self.props
    }

    pub fn playlist_index(&self) -> usize {
        self.playlist_index
    }

    pub fn subtitles_visible(&self) -> bool {
        self.subtitles
    }

    /// Flip fullscreen from outside the overlay
    pub fn external_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        self.pending.push_back(WidgetEvent::FullscreenChanged(fullscreen));
    }

    /// Advance the clock by `elapsed` wall time and report progress
    pub fn advance(&mut self, elapsed: Duration) -> Progress {
        if self.props.playing {
            let step = elapsed.as_secs_f64() * self.props.playback_rate;
            self.position = (self.position + step).min(self.duration);
        }
        self.progress()
    }

    /// Current progress payload
    pub fn progress(&self) -> Progress {
        let loaded = (self.position + BUFFER_AHEAD_SECS).min(self.duration);
        Progress::from_seconds(self.position, loaded, Some(self.duration))
    }
}

impl MediaWidget for MemoryWidget {
    fn sync(&mut self, props: &PlaybackProps) -> Result<(), WidgetError> {
        self.props = *props;
        Ok(())
    }

    fn seek_to(&mut self, target: SeekTo) -> Result<(), WidgetError> {
        let secs = match target {
            SeekTo::Seconds(secs) => secs,
            SeekTo::Fraction(frac) => frac * self.duration,
        };
        self.position = secs.clamp(0.0, self.duration);
        Ok(())
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.position)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn play_next(&mut self) -> Result<(), WidgetError> {
        if self.playlist_index + 1 >= self.playlist_len {
            return Err(WidgetError::Command("no next playlist entry".into()));
        }
        self.playlist_index += 1;
        self.position = 0.0;
        Ok(())
    }

    fn toggle_subtitles(&mut self) -> Result<(), WidgetError> {
        self.subtitles = !self.subtitles;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<WidgetEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let now = Instant::now();
        let last = *self.last_tick.get_or_insert(now);
        let elapsed = now.duration_since(last);
        if elapsed < self.interval {
            return None;
        }
        self.last_tick = Some(now);
        Some(WidgetEvent::Progress(self.advance(elapsed)))
    }
}

impl FullscreenApi for MemoryWidget {
    fn toggle_fullscreen(&mut self) -> Result<(), WidgetError> {
        self.fullscreen = !self.fullscreen;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}
