//! Player control overlay
//!
//! [`ControlOverlay`] owns the flat UI state and the auto-hide counter.
//! Handlers mutate the state directly; the few that need the playback
//! widget or the fullscreen API take it as an explicit argument.

pub mod auto_hide;
pub mod format;
pub mod layout;

pub use auto_hide::{AutoHide, DEFAULT_AUTO_HIDE_TICKS};
pub use format::format_clock;
pub use layout::{Breakpoints, IconSize, LayoutDecision, ScreenClass};

use crate::models::{next_playback_rate, PlaybackProps, PlayerUIState, Progress, SeekTo};
use crate::widget::{FullscreenApi, MediaWidget};
use tracing::{debug, warn};

/// Default relative seek, in seconds
pub const DEFAULT_SEEK_STEP_SECS: f64 = 10.0;

/// Control overlay state and handlers
#[derive(Debug, Clone)]
pub struct ControlOverlay {
    state: PlayerUIState,
    auto_hide: AutoHide,
    seek_step: f64,
}

impl Default for ControlOverlay {
    fn default() -> Self {
        Self::new(
            PlayerUIState::default(),
            DEFAULT_AUTO_HIDE_TICKS,
            DEFAULT_SEEK_STEP_SECS,
        )
    }
}

impl ControlOverlay {
    pub fn new(state: PlayerUIState, auto_hide_ticks: u32, seek_step: f64) -> Self {
        Self {
            state,
            auto_hide: AutoHide::new(auto_hide_ticks),
            seek_step,
        }
    }

    pub fn state(&self) -> &PlayerUIState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.auto_hide.is_visible()
    }

    pub fn auto_hide(&self) -> &AutoHide {
        &self.auto_hide
    }

    pub fn seek_step(&self) -> f64 {
        self.seek_step
    }

    /// Props to mirror into the widget
    pub fn props(&self) -> PlaybackProps {
        self.state.props()
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    pub fn play_pause(&mut self) {
        self.state.playing = !self.state.playing;
        debug!(playing = self.state.playing, "play/pause");
    }

    /// Seek back by the seek step
    pub fn rewind<W: MediaWidget + ?Sized>(&mut self, widget: &mut W) {
        self.seek_relative(widget, -self.seek_step);
    }

    /// Seek forward by the seek step
    pub fn fast_forward<W: MediaWidget + ?Sized>(&mut self, widget: &mut W) {
        self.seek_relative(widget, self.seek_step);
    }

    fn seek_relative<W: MediaWidget + ?Sized>(&mut self, widget: &mut W, delta: f64) {
        let Some(now) = widget.current_time() else {
            debug!("relative seek skipped, no current time");
            return;
        };
        if let Err(e) = widget.seek_to(SeekTo::Seconds(now + delta)) {
            warn!(error = %e, "relative seek failed");
        }
    }

    pub fn cycle_playback_rate(&mut self) {
        self.state.playback_rate = next_playback_rate(self.state.playback_rate);
        debug!(rate = self.state.playback_rate, "playback rate");
    }

    // -------------------------------------------------------------------------
    // Volume
    // -------------------------------------------------------------------------

    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        debug!(muted = self.state.muted, "mute toggled");
    }

    /// Volume slider moved, `value` in 0 - 100
    pub fn volume_change(&mut self, value: f64) {
        let value = value.clamp(0.0, 100.0);
        self.state.volume = value / 100.0;
        self.state.muted = value == 0.0;
    }

    /// Volume slider released, `value` in 0 - 100
    pub fn volume_commit(&mut self, value: f64) {
        self.volume_change(value);
        debug!(volume = self.state.volume, muted = self.state.muted, "volume set");
    }

    // -------------------------------------------------------------------------
    // Seek slider
    // -------------------------------------------------------------------------

    /// Seek slider moved, `value` in 0 - 100
    pub fn seek_change(&mut self, value: f64) {
        self.state.played = value.clamp(0.0, 100.0) / 100.0;
    }

    pub fn seek_mouse_down(&mut self) {
        self.state.seeking = true;
    }

    /// Seek slider released, `value` in 0 - 100
    pub fn seek_mouse_up<W: MediaWidget + ?Sized>(&mut self, value: f64, widget: &mut W) {
        self.end_seek();
        let target = SeekTo::Fraction(value.clamp(0.0, 100.0) / 100.0);
        debug!(%target, "seek committed");
        if let Err(e) = widget.seek_to(target) {
            warn!(error = %e, "seek failed");
        }
    }

    /// Release the drag without seeking (no widget mounted)
    pub fn end_seek(&mut self) {
        self.state.seeking = false;
    }

    // -------------------------------------------------------------------------
    // Fullscreen
    // -------------------------------------------------------------------------

    pub fn toggle_fullscreen<F: FullscreenApi + ?Sized>(&mut self, screen: &mut F) {
        if let Err(e) = screen.toggle_fullscreen() {
            warn!(error = %e, "fullscreen toggle failed");
        }
        self.state.full_screen = screen.is_fullscreen();
        debug!(full_screen = self.state.full_screen, "fullscreen toggled");
    }

    /// Fullscreen changed outside the overlay
    pub fn fullscreen_changed(&mut self, full_screen: bool) {
        self.state.full_screen = full_screen;
    }

    // -------------------------------------------------------------------------
    // Widget callbacks and pointer
    // -------------------------------------------------------------------------

    /// Progress callback from the widget
    pub fn progress(&mut self, update: Progress) {
        self.auto_hide.tick();
        if !self.state.seeking {
            self.state.merge_progress(&update);
        }
    }

    pub fn pointer_move(&mut self) {
        self.auto_hide.reveal();
    }

    // -------------------------------------------------------------------------
    // Labels
    // -------------------------------------------------------------------------

    /// Elapsed time label, `00:00` without a widget
    pub fn elapsed_label<W: MediaWidget + ?Sized>(widget: Option<&W>) -> String {
        format_clock(widget.and_then(|w| w.current_time()))
    }

    /// Total duration label, `00:00` without a widget
    pub fn duration_label<W: MediaWidget + ?Sized>(widget: Option<&W>) -> String {
        format_clock(widget.and_then(|w| w.duration()))
    }
}
