//! Terminal UI components
//!
//! Built with ratatui. The overlay is redrawn every tick; the hit map from
//! the last frame routes mouse clicks back to controls.

pub mod controls;
pub mod theme;

pub use controls::{render, slider_value, Control, HitMap};
pub use theme::Theme;
