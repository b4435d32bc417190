//! Responsive layout decisions
//!
//! Terminal width picks a screen class, and the screen class picks which
//! control clusters render and how large their icons are. Nothing here
//! has state; every frame derives its decision from the current width.

use serde::{Deserialize, Serialize};

/// Width thresholds in terminal columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Tablet and up
    pub sm: u16,
    /// Desktop and up
    pub lg: u16,
    /// Widest terminal that still hides the volume slider
    pub compact_volume_max: u16,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            sm: 60,
            lg: 128,
            compact_volume_max: 68,
        }
    }
}

/// Screen class derived from width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenClass {
    Desktop,
    Tablet,
    Mobile,
}

impl ScreenClass {
    pub fn from_width(width: u16, bp: &Breakpoints) -> Self {
        if width >= bp.lg {
            ScreenClass::Desktop
        } else if width >= bp.sm {
            ScreenClass::Tablet
        } else {
            ScreenClass::Mobile
        }
    }
}

/// Icon size for control glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small,
    Medium,
    Large,
}

impl IconSize {
    /// Pad a glyph to this size
    pub fn render(&self, glyph: &str) -> String {
        match self {
            IconSize::Small => glyph.to_string(),
            IconSize::Medium => format!(" {} ", glyph),
            IconSize::Large => format!("[ {} ]", glyph),
        }
    }
}

/// What to render at a given width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDecision {
    pub screen: ScreenClass,
    pub icon_size: IconSize,
    pub show_bottom_cluster: bool,
    pub show_middle_cluster: bool,
    pub show_volume_slider: bool,
}

impl LayoutDecision {
    pub fn derive(width: u16, bp: &Breakpoints) -> Self {
        let screen = ScreenClass::from_width(width, bp);
        let icon_size = match screen {
            ScreenClass::Desktop => IconSize::Large,
            ScreenClass::Tablet => IconSize::Medium,
            ScreenClass::Mobile => IconSize::Small,
        };
        let compact = screen == ScreenClass::Mobile;

        Self {
            screen,
            icon_size,
            show_bottom_cluster: !compact,
            show_middle_cluster: compact,
            show_volume_slider: width > bp.compact_volume_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_class_boundaries() {
        let bp = Breakpoints::default();
        assert_eq!(ScreenClass::from_width(0, &bp), ScreenClass::Mobile);
        assert_eq!(ScreenClass::from_width(59, &bp), ScreenClass::Mobile);
        assert_eq!(ScreenClass::from_width(60, &bp), ScreenClass::Tablet);
        assert_eq!(ScreenClass::from_width(127, &bp), ScreenClass::Tablet);
        assert_eq!(ScreenClass::from_width(128, &bp), ScreenClass::Desktop);
    }

    #[test]
    fn test_desktop_layout() {
        let layout = LayoutDecision::derive(200, &Breakpoints::default());
        assert_eq!(layout.icon_size, IconSize::Large);
        assert!(layout.show_bottom_cluster);
        assert!(!layout.show_middle_cluster);
        assert!(layout.show_volume_slider);
    }

    #[test]
    fn test_tablet_layout_hides_volume_slider_when_narrow() {
        let bp = Breakpoints::default();

        let narrow = LayoutDecision::derive(68, &bp);
        assert_eq!(narrow.icon_size, IconSize::Medium);
        assert!(narrow.show_bottom_cluster);
        assert!(!narrow.show_volume_slider);

        let wider = LayoutDecision::derive(69, &bp);
        assert!(wider.show_volume_slider);
    }

    #[test]
    fn test_mobile_layout() {
        let layout = LayoutDecision::derive(40, &Breakpoints::default());
        assert_eq!(layout.icon_size, IconSize::Small);
        assert!(!layout.show_bottom_cluster);
        assert!(layout.show_middle_cluster);
    }

    #[test]
    fn test_icon_size_render() {
        assert_eq!(IconSize::Small.render("▶"), "▶");
        assert_eq!(IconSize::Medium.render("▶"), " ▶ ");
        assert_eq!(IconSize::Large.render("▶"), "[ ▶ ]");
    }
}
