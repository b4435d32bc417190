//! Control overlay rendering
//!
//! Draws the title cluster, the mobile transport cluster, the seek slider
//! and the bottom control clusters, and records where each control landed
//! so mouse events can be hit-tested against the last frame.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::app::App;
use crate::models::PlayerUIState;
use crate::overlay::{IconSize, LayoutDecision, ScreenClass};
use crate::widget::{FullscreenApi, MediaWidget};

/// Width of the volume slider in columns
const VOLUME_SLIDER_WIDTH: u16 = 10;

/// Clickable controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Rewind,
    PlayPause,
    FastForward,
    Mute,
    VolumeSlider,
    SeekBar,
    NextEpisode,
    Settings,
    Subtitles,
    Fullscreen,
}

/// Where each control was drawn in the last frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitMap {
    regions: Vec<(Rect, Control)>,
}

impl HitMap {
    pub fn push(&mut self, rect: Rect, control: Control) {
        self.regions.push((rect, control));
    }

    /// Control under a cell, topmost first
    pub fn hit(&self, column: u16, row: u16) -> Option<(Control, Rect)> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x.saturating_add(rect.width)
                    && row >= rect.y
                    && row < rect.y.saturating_add(rect.height)
            })
            .map(|&(rect, control)| (control, rect))
    }

    /// Rectangle of the first region for a control
    pub fn rect_of(&self, control: Control) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, c)| *c == control)
            .map(|(rect, _)| *rect)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }
}

/// Map a column inside a slider to its 0 - 100 value
pub fn slider_value(rect: Rect, column: u16) -> f64 {
    let span = rect.width.saturating_sub(1);
    if span == 0 {
        return 0.0;
    }
    let offset = column.saturating_sub(rect.x).min(span);
    f64::from(offset) * 100.0 / f64::from(span)
}

/// Column offset of a 0 - 100 value inside a slider of `width`
fn slider_column(value: f64, width: u16) -> u16 {
    let span = width.saturating_sub(1);
    ((value.clamp(0.0, 100.0) / 100.0) * f64::from(span)).round() as u16
}

// =============================================================================
// Icons
// =============================================================================

fn play_pause_glyph(state: &PlayerUIState) -> &'static str {
    if state.playing {
        "⏸"
    } else {
        "▶"
    }
}

fn mute_glyph(state: &PlayerUIState) -> &'static str {
    if state.muted {
        "🔇"
    } else {
        "🔊"
    }
}

fn fullscreen_glyph(state: &PlayerUIState) -> &'static str {
    if state.full_screen {
        "⛶"
    } else {
        "⇲"
    }
}

/// Lay out a row of controls starting at `x`, recording hit regions
fn row_items(
    items: &[(Control, String, Style)],
    x: u16,
    y: u16,
    max_x: u16,
    hits: &mut HitMap,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = x;
    for (i, (control, text, style)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
            cursor = cursor.saturating_add(1);
        }
        let span = Span::styled(text.clone(), *style);
        let width = span.width() as u16;
        if cursor.saturating_add(width) > max_x {
            break;
        }
        hits.push(Rect::new(cursor, y, width, 1), *control);
        cursor = cursor.saturating_add(width);
        spans.push(span);
    }
    spans
}

fn row_width(items: &[(Control, String, Style)]) -> u16 {
    let gaps = items.len().saturating_sub(1);
    let widths: usize = items
        .iter()
        .map(|(_, text, _)| Span::raw(text.as_str()).width())
        .sum();
    (widths + gaps) as u16
}

// =============================================================================
// Rendering
// =============================================================================

/// Render the overlay and return the control hit map
pub fn render<W: MediaWidget + FullscreenApi>(frame: &mut Frame, app: &App<W>) -> HitMap {
    let area = frame.area();
    let mut hits = HitMap::default();
    if area.is_empty() {
        return hits;
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    if !app.overlay.is_visible() {
        render_hint(frame, area);
        return hits;
    }

    let layout = app.layout(area.width);
    let state = app.overlay.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Middle controls
            Constraint::Length(1), // Seek tooltip
            Constraint::Length(1), // Seek slider
            Constraint::Length(1), // Bottom controls
        ])
        .split(area);

    // Short terminals squeeze rows to zero height
    if !chunks[0].is_empty() {
        render_title(frame, chunks[0], app, &layout);
    }
    if layout.show_middle_cluster && !chunks[1].is_empty() {
        render_middle(frame, chunks[1], state, &layout, &mut hits);
    }
    if !chunks[3].is_empty() {
        render_seek(frame, chunks[2], chunks[3], app, &layout, &mut hits);
    }
    if layout.show_bottom_cluster && !chunks[4].is_empty() {
        render_bottom(frame, chunks[4], state, &layout, &mut hits);
    }

    hits
}

fn render_hint(frame: &mut Frame, area: Rect) {
    let y = area.y + area.height.saturating_sub(1);
    let hint = Paragraph::new("move the mouse or press a key for controls")
        .style(Theme::hint())
        .alignment(Alignment::Center);
    frame.render_widget(hint, Rect::new(area.x, y, area.width, 1.min(area.height)));
}

fn render_title<W: MediaWidget + FullscreenApi>(
    frame: &mut Frame,
    area: Rect,
    app: &App<W>,
    layout: &LayoutDecision,
) {
    let mut lines = vec![Line::from(Span::styled(app.title.clone(), Theme::title()))];
    if let Some(subtitle) = &app.subtitle {
        // Small screens keep only the title
        if layout.icon_size != IconSize::Small {
            lines.push(Line::from(Span::styled(subtitle.clone(), Theme::subtitle())));
        }
    }
    let inner = Rect::new(
        area.x.saturating_add(2),
        area.y.saturating_add(1),
        area.width.saturating_sub(4),
        area.height.saturating_sub(1),
    );
    if inner.is_empty() {
        return;
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_middle(
    frame: &mut Frame,
    area: Rect,
    state: &PlayerUIState,
    layout: &LayoutDecision,
    hits: &mut HitMap,
) {
    let size = layout.icon_size;
    let items = vec![
        (Control::Rewind, size.render("⏪"), Theme::control_icon()),
        (
            Control::PlayPause,
            size.render(play_pause_glyph(state)),
            Theme::active_icon(),
        ),
        (Control::FastForward, size.render("⏩"), Theme::control_icon()),
    ];

    let width = row_width(&items);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 2;
    let spans = row_items(&items, x, y, area.x + area.width, hits);
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(x, y, width.min(area.width), 1),
    );
}

fn render_seek<W: MediaWidget + FullscreenApi>(
    frame: &mut Frame,
    tooltip_area: Rect,
    area: Rect,
    app: &App<W>,
    layout: &LayoutDecision,
    hits: &mut HitMap,
) {
    let state = app.overlay.state();
    let elapsed = app.elapsed_label();
    let label = if layout.screen == ScreenClass::Desktop {
        format!("{} / {}", elapsed, app.duration_label())
    } else {
        elapsed.clone()
    };

    let label_width = Span::raw(label.as_str()).width() as u16;
    let bar_x = area.x.saturating_add(2);
    let bar_width = area.width.saturating_sub(label_width + 5);
    if bar_width < 2 {
        return;
    }
    let bar = Rect::new(bar_x, area.y, bar_width, 1);
    hits.push(bar, Control::SeekBar);

    let thumb = slider_column(state.played * 100.0, bar_width);
    let buffered = slider_column(state.loaded * 100.0, bar_width);
    let track: Vec<Span> = (0..bar_width)
        .map(|i| {
            if i == thumb {
                Span::styled("●", Theme::thumb())
            } else if i < thumb {
                Span::styled("━", Theme::track())
            } else if i <= buffered {
                Span::styled("─", Theme::buffer())
            } else {
                Span::styled("─", Theme::rail())
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(track)), bar);

    let label_rect = Rect::new(bar_x + bar_width + 1, area.y, label_width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(label, Theme::time_label())),
        label_rect,
    );

    // Value label above the thumb while dragging
    if state.seeking && !tooltip_area.is_empty() {
        let tip = format!(" {} ", elapsed);
        let tip_width = Span::raw(tip.as_str()).width() as u16;
        let tip_x = (bar_x + thumb)
            .saturating_sub(tip_width / 2)
            .max(tooltip_area.x)
            .min(tooltip_area.x + tooltip_area.width.saturating_sub(tip_width));
        frame.render_widget(
            Paragraph::new(Span::styled(tip, Theme::tooltip())),
            Rect::new(tip_x, tooltip_area.y, tip_width.min(tooltip_area.width), 1),
        );
    }
}

fn render_bottom(
    frame: &mut Frame,
    area: Rect,
    state: &PlayerUIState,
    layout: &LayoutDecision,
    hits: &mut HitMap,
) {
    let size = layout.icon_size;
    let glyph_style = |on: bool| {
        if on {
            Theme::active_icon()
        } else {
            Theme::bottom_icon()
        }
    };

    let left = vec![
        (
            Control::PlayPause,
            size.render(play_pause_glyph(state)),
            Theme::bottom_icon(),
        ),
        (Control::Rewind, size.render("⏪"), Theme::control_icon()),
        (Control::FastForward, size.render("⏩"), Theme::control_icon()),
        (
            Control::Mute,
            size.render(mute_glyph(state)),
            glyph_style(state.muted),
        ),
    ];

    let start = area.x.saturating_add(2);
    let max_x = area.x + area.width;
    let mut spans = vec![Span::raw(" ".repeat((start - area.x) as usize))];
    spans.extend(row_items(&left, start, area.y, max_x, hits));
    let mut cursor = start + row_width(&left);

    if layout.show_volume_slider && cursor + 1 + VOLUME_SLIDER_WIDTH <= max_x {
        spans.push(Span::raw(" "));
        cursor += 1;
        let slider = Rect::new(cursor, area.y, VOLUME_SLIDER_WIDTH, 1);
        hits.push(slider, Control::VolumeSlider);
        let level = slider_column(state.volume * 100.0, VOLUME_SLIDER_WIDTH);
        for i in 0..VOLUME_SLIDER_WIDTH {
            spans.push(if i == level {
                Span::styled("●", Theme::thumb())
            } else if i < level {
                Span::styled("━", Theme::track())
            } else {
                Span::styled("─", Theme::rail())
            });
        }
        cursor += VOLUME_SLIDER_WIDTH;
    }

    let right = vec![
        (
            Control::NextEpisode,
            format!("{} Next Episode", size.render("⏭")),
            Theme::bottom_icon(),
        ),
        (
            Control::Settings,
            format!("{} {}x", size.render("⚙"), state.playback_rate),
            Theme::bottom_icon(),
        ),
        (Control::Subtitles, size.render("💬"), Theme::bottom_icon()),
        (
            Control::Fullscreen,
            size.render(fullscreen_glyph(state)),
            Theme::bottom_icon(),
        ),
    ];
    let right_width = row_width(&right);
    let right_x = max_x.saturating_sub(right_width + 2);
    if right_x > cursor {
        spans.push(Span::raw(" ".repeat((right_x - cursor) as usize)));
        spans.extend(row_items(&right, right_x, area.y, max_x, hits));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
