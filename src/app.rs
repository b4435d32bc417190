//! App state and input routing
//!
//! Owns the control overlay and the (possibly not yet mounted) playback
//! widget, and turns keyboard, mouse and widget events into overlay
//! handler calls.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::overlay::{Breakpoints, ControlOverlay, LayoutDecision};
use crate::ui::{slider_value, Control, HitMap};
use crate::widget::{FullscreenApi, MediaWidget, WidgetEvent};

/// Volume change per arrow key, in slider units
const VOLUME_KEY_STEP: f64 = 5.0;

/// Slider currently held by the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    Seek(Rect),
    Volume(Rect),
}

/// Main application state
pub struct App<W> {
    /// Overlay state and handlers
    pub overlay: ControlOverlay,
    /// Playback widget, `None` until mounted
    pub widget: Option<W>,
    /// Responsive layout thresholds
    pub breakpoints: Breakpoints,
    /// Title line
    pub title: String,
    /// Secondary line under the title
    pub subtitle: Option<String>,
    /// Control rectangles from the last frame
    pub hit_map: HitMap,
    /// Active slider drag
    pub drag: Option<Drag>,
    /// Whether the app is running
    pub running: bool,
    /// Why the widget went away, if it did
    pub exit_reason: Option<String>,
}

impl<W: MediaWidget + FullscreenApi> App<W> {
    pub fn new(overlay: ControlOverlay, breakpoints: Breakpoints, title: impl Into<String>) -> Self {
        Self {
            overlay,
            widget: None,
            breakpoints,
            title: title.into(),
            subtitle: None,
            hit_map: HitMap::default(),
            drag: None,
            running: true,
            exit_reason: None,
        }
    }

    /// Overlay and breakpoints from config, no widget mounted yet
    pub fn from_config(config: &Config, title: impl Into<String>) -> Self {
        let overlay = ControlOverlay::new(
            config.defaults.initial_state(),
            config.overlay.auto_hide_ticks,
            config.overlay.seek_step_secs,
        );
        Self::new(overlay, config.breakpoints, title)
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    /// Mount the playback widget
    pub fn attach_widget(&mut self, widget: W) {
        self.widget = Some(widget);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn layout(&self, width: u16) -> LayoutDecision {
        LayoutDecision::derive(width, &self.breakpoints)
    }

    pub fn elapsed_label(&self) -> String {
        ControlOverlay::elapsed_label(self.widget.as_ref())
    }

    pub fn duration_label(&self) -> String {
        ControlOverlay::duration_label(self.widget.as_ref())
    }

    // -------------------------------------------------------------------------
    // Widget
    // -------------------------------------------------------------------------

    /// Push current props to the widget
    pub fn sync_widget(&mut self) {
        let props = self.overlay.props();
        if let Some(widget) = self.widget.as_mut() {
            if let Err(e) = widget.sync(&props) {
                warn!(error = %e, "widget sync failed");
            }
        }
    }

    /// Drain and handle pending widget events
    pub fn pump_widget_events(&mut self) {
        while let Some(event) = self.widget.as_mut().and_then(|w| w.poll_event()) {
            self.handle_widget_event(event);
        }
    }

    pub fn handle_widget_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Progress(progress) => self.overlay.progress(progress),
            WidgetEvent::FullscreenChanged(full_screen) => {
                self.overlay.fullscreen_changed(full_screen)
            }
            WidgetEvent::Closed(reason) => {
                info!(reason = ?reason, "widget closed");
                self.exit_reason = reason;
                self.widget = None;
                self.quit();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Handle a terminal event, returns true if it was consumed
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            // Only handle key press events (ignore releases on Windows)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => false,
        }
    }

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        // Keyboard use counts as pointer activity
        self.overlay.pointer_move();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char(' ') | KeyCode::Char('k') => self.activate(Control::PlayPause),
            KeyCode::Left | KeyCode::Char('j') => self.activate(Control::Rewind),
            KeyCode::Right | KeyCode::Char('l') => self.activate(Control::FastForward),
            KeyCode::Char('m') => self.activate(Control::Mute),
            KeyCode::Char('f') => self.activate(Control::Fullscreen),
            KeyCode::Char('n') => self.activate(Control::NextEpisode),
            KeyCode::Char('s') => self.activate(Control::Settings),
            KeyCode::Char('c') => self.activate(Control::Subtitles),
            KeyCode::Up => self.nudge_volume(VOLUME_KEY_STEP),
            KeyCode::Down => self.nudge_volume(-VOLUME_KEY_STEP),
            _ => return false,
        }
        true
    }

    fn nudge_volume(&mut self, delta: f64) {
        let value = (self.overlay.state().volume * 100.0).round() + delta;
        self.overlay.volume_change(value);
        self.overlay.volume_commit(value);
    }

    /// Handle mouse event, returns true if event was consumed
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        // Every pointer event implies movement
        let was_visible = self.overlay.is_visible();
        self.overlay.pointer_move();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Hidden controls don't take clicks
                if !was_visible {
                    return true;
                }
                self.press(mouse.column, mouse.row)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                match self.drag {
                    Some(Drag::Seek(rect)) => self.overlay.seek_change(slider_value(rect, mouse.column)),
                    Some(Drag::Volume(rect)) => {
                        self.overlay.volume_change(slider_value(rect, mouse.column))
                    }
                    None => {}
                }
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.release(mouse.column);
                true
            }
            MouseEventKind::Moved => true,
            _ => false,
        }
    }

    fn press(&mut self, column: u16, row: u16) -> bool {
        let Some((control, rect)) = self.hit_map.hit(column, row) else {
            return false;
        };

        match control {
            Control::SeekBar => {
                self.overlay.seek_mouse_down();
                self.overlay.seek_change(slider_value(rect, column));
                self.drag = Some(Drag::Seek(rect));
            }
            Control::VolumeSlider => {
                self.overlay.volume_change(slider_value(rect, column));
                self.drag = Some(Drag::Volume(rect));
            }
            other => self.activate(other),
        }
        true
    }

    fn release(&mut self, column: u16) {
        match self.drag.take() {
            Some(Drag::Seek(rect)) => {
                let value = slider_value(rect, column);
                match self.widget.as_mut() {
                    Some(widget) => self.overlay.seek_mouse_up(value, widget),
                    None => self.overlay.end_seek(),
                }
            }
            Some(Drag::Volume(rect)) => self.overlay.volume_commit(slider_value(rect, column)),
            None => {}
        }
    }

    /// Dispatch a button
    pub fn activate(&mut self, control: Control) {
        debug!(?control, "control activated");
        match control {
            Control::PlayPause => self.overlay.play_pause(),
            Control::Mute => self.overlay.toggle_mute(),
            Control::Settings => self.overlay.cycle_playback_rate(),
            Control::Rewind => {
                if let Some(widget) = self.widget.as_mut() {
                    self.overlay.rewind(widget);
                }
            }
            Control::FastForward => {
                if let Some(widget) = self.widget.as_mut() {
                    self.overlay.fast_forward(widget);
                }
            }
            Control::Fullscreen => {
                if let Some(widget) = self.widget.as_mut() {
                    self.overlay.toggle_fullscreen(widget);
                }
            }
            Control::NextEpisode => {
                if let Some(Err(e)) = self.widget.as_mut().map(|w| w.play_next()) {
                    warn!(error = %e, "next episode failed");
                }
            }
            Control::Subtitles => {
                if let Some(Err(e)) = self.widget.as_mut().map(|w| w.toggle_subtitles()) {
                    warn!(error = %e, "subtitle toggle failed");
                }
            }
            // Sliders are driven by press/drag/release
            Control::SeekBar | Control::VolumeSlider => {}
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
