//! Embedded playback widget
//!
//! - `mpv`: mpv process driven over its JSON IPC socket
//! - `ipc`: line-delimited JSON client for that socket
//! - `memory`: simulated widget with its own playback clock (demo mode, tests)

pub mod ipc;
pub mod memory;
pub mod mpv;

pub use memory::MemoryWidget;
pub use mpv::MpvWidget;

use crate::models::{PlaybackProps, Progress, SeekTo};
use thiserror::Error;

/// Errors from playback widget operations
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[source] std::io::Error),
    #[error("Timed out connecting to player IPC at {0}")]
    IpcTimeout(String),
    #[error("Player exited before IPC connected ({0})")]
    ExitedEarly(String),
    #[error("Player IPC failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed IPC message: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("Player rejected command: {0}")]
    Command(String),
    #[error("Player session closed")]
    Closed,
}

/// Events raised by a widget between handler calls
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Periodic progress callback
    Progress(Progress),
    /// Fullscreen state changed outside the overlay
    FullscreenChanged(bool),
    /// Widget went away, with an optional reason
    Closed(Option<String>),
}

/// Media playback widget consumed by the overlay
pub trait MediaWidget {
    /// Apply changed playback props
    fn sync(&mut self, props: &PlaybackProps) -> Result<(), WidgetError>;

    /// Seek to an absolute position; the widget clamps out-of-range targets
    fn seek_to(&mut self, target: SeekTo) -> Result<(), WidgetError>;

    /// Current playback position in seconds, if known
    fn current_time(&self) -> Option<f64>;

    /// Media duration in seconds, if known
    fn duration(&self) -> Option<f64>;

    /// Advance to the next playlist entry
    fn play_next(&mut self) -> Result<(), WidgetError>;

    /// Show or hide subtitles
    fn toggle_subtitles(&mut self) -> Result<(), WidgetError>;

    /// Next pending event, if any
    fn poll_event(&mut self) -> Option<WidgetEvent>;
}

/// Platform fullscreen API
pub trait FullscreenApi {
    /// Toggle fullscreen on the player surface
    fn toggle_fullscreen(&mut self) -> Result<(), WidgetError>;

    /// Fullscreen state after the last toggle or report
    fn is_fullscreen(&self) -> bool;
}
