//! cinedeck - Video player controls in your terminal
//!
//! A control overlay for an embedded playback widget: play/pause, rewind,
//! fast forward, seek and volume sliders, playback rate and fullscreen, with
//! auto-hide and a layout that adapts to the terminal width.
//!
//! # Modules
//!
//! - `models` - Overlay state, progress reports, playback props
//! - `overlay` - Control overlay handlers, auto-hide, responsive layout
//! - `widget` - Playback widget traits, mpv over JSON IPC, simulated widget
//! - `ui` - Overlay rendering and mouse hit-testing
//! - `app` - Application state and input routing
//! - `config`, `cli`, `logging` - Configuration, flags and log setup

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod overlay;
pub mod ui;
pub mod widget;

// Re-export commonly used types
pub use models::{PlaybackProps, PlayerUIState, Progress, SeekTo};

pub use app::App;
pub use config::Config;
pub use overlay::{format_clock, ControlOverlay, LayoutDecision};
pub use widget::{FullscreenApi, MediaWidget, MemoryWidget, MpvWidget, WidgetError, WidgetEvent};
