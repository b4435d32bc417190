//! Overlay theme for cinedeck
//!
//! Color palette and style helpers for the control overlay: a dark scrim,
//! gray icons that brighten when active, white text and an indigo slider
//! track.

use ratatui::style::{Color, Modifier, Style};

/// Overlay color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0f0f0f (scrim over the video)
    pub const BACKGROUND: Color = Color::Rgb(0x0f, 0x0f, 0x0f);

    /// Text: #ffffff
    pub const TEXT: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Transport icons: #777777
    pub const ICON: Color = Color::Rgb(0x77, 0x77, 0x77);

    /// Bottom cluster icons: #999999
    pub const ICON_BOTTOM: Color = Color::Rgb(0x99, 0x99, 0x99);

    /// Active icon: #ffffff
    pub const ICON_ACTIVE: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Slider track: #7986cb (indigo)
    pub const TRACK: Color = Color::Rgb(0x79, 0x86, 0xcb);

    /// Buffered portion of the seek slider: #bbbbbb
    pub const BUFFER: Color = Color::Rgb(0xbb, 0xbb, 0xbb);

    /// Slider rail: #555555
    pub const RAIL: Color = Color::Rgb(0x55, 0x55, 0x55);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Title line
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Subtitle line under the title
    pub fn subtitle() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Middle cluster transport icon
    pub fn control_icon() -> Style {
        Style::default().fg(Self::ICON)
    }

    /// Bottom cluster icon
    pub fn bottom_icon() -> Style {
        Style::default().fg(Self::ICON_BOTTOM)
    }

    /// Icon for a control in its "on" state
    pub fn active_icon() -> Style {
        Style::default()
            .fg(Self::ICON_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    /// Played part of a slider
    pub fn track() -> Style {
        Style::default().fg(Self::TRACK)
    }

    /// Slider thumb
    pub fn thumb() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Buffered part of the seek slider
    pub fn buffer() -> Style {
        Style::default().fg(Self::BUFFER)
    }

    /// Unplayed rail
    pub fn rail() -> Style {
        Style::default().fg(Self::RAIL)
    }

    /// Elapsed time label
    pub fn time_label() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Tooltip shown above the seek thumb while dragging
    pub fn tooltip() -> Style {
        Style::default()
            .fg(Self::readable_on(Self::TEXT))
            .bg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Hint shown while the controls are hidden
    pub fn hint() -> Style {
        Style::default().fg(Self::ICON)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CONTRAST
    // ═══════════════════════════════════════════════════════════════════════

    /// Minimum WCAG contrast for body text
    pub const AA_NORMAL: f64 = 4.5;

    /// Minimum WCAG contrast for large glyphs
    pub const AA_LARGE: f64 = 3.0;

    /// Contrast ratio between two palette colors, 1.0 - 21.0
    ///
    /// Non-RGB colors have no known luminance and compare as 1.0.
    pub fn contrast(fg: Color, bg: Color) -> f64 {
        match (luminance(fg), luminance(bg)) {
            (Some(a), Some(b)) => (a.max(b) + 0.05) / (a.min(b) + 0.05),
            _ => 1.0,
        }
    }

    /// Text or scrim color, whichever reads better on `bg`
    pub fn readable_on(bg: Color) -> Color {
        if Self::contrast(Self::TEXT, bg) >= Self::contrast(Self::BACKGROUND, bg) {
            Self::TEXT
        } else {
            Self::BACKGROUND
        }
    }
}

/// WCAG relative luminance of an RGB color
fn luminance(color: Color) -> Option<f64> {
    let Color::Rgb(r, g, b) = color else {
        return None;
    };
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Some(0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_values() {
        assert_eq!(Theme::BACKGROUND, Color::Rgb(0x0f, 0x0f, 0x0f));
        assert_eq!(Theme::ICON, Color::Rgb(0x77, 0x77, 0x77));
        assert_eq!(Theme::ICON_BOTTOM, Color::Rgb(0x99, 0x99, 0x99));
        assert_eq!(Theme::TEXT, Color::Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn test_text_contrast_against_background() {
        for color in [Theme::TEXT, Theme::ICON_BOTTOM, Theme::TRACK] {
            assert!(Theme::contrast(color, Theme::BACKGROUND) >= Theme::AA_NORMAL);
        }
    }

    #[test]
    fn test_icon_contrast_large() {
        let ratio = Theme::contrast(Theme::ICON, Theme::BACKGROUND);
        assert!(
            ratio >= Theme::AA_LARGE,
            "Transport icons should meet WCAG AA for large text (got {:.2}:1)",
            ratio
        );
    }

    #[test]
    fn test_tooltip_uses_scrim_on_white() {
        assert_eq!(Theme::readable_on(Theme::TEXT), Theme::BACKGROUND);
        assert_eq!(Theme::readable_on(Theme::BACKGROUND), Theme::TEXT);
        assert_eq!(Theme::tooltip().fg, Some(Theme::BACKGROUND));
    }

    #[test]
    fn test_contrast_extremes() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert!((Theme::contrast(black, white) - 21.0).abs() < 0.1);
        assert!((Theme::contrast(white, black) - 21.0).abs() < 0.1);
        assert!((Theme::contrast(Theme::RAIL, Theme::RAIL) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_named_colors_have_no_contrast() {
        assert_eq!(Theme::contrast(Color::White, Theme::BACKGROUND), 1.0);
    }
}
