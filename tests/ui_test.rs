//! UI rendering tests for cinedeck
//!
//! Renders the overlay into a `TestBackend` at desktop, tablet and mobile
//! widths and checks what was drawn and where the controls landed.
//!
//! ## Test Cases
//! - desktop: large icons, bottom and right clusters, total duration label
//! - tablet: no total duration, volume slider only above the compact width
//! - mobile: middle transport cluster instead of the bottom clusters
//! - hidden: only the hint line, no clickable controls
//! - seeking: tooltip with the elapsed time above the slider
//! - clicks: hit map from a real frame routes back to handlers

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use cinedeck::models::{Progress, SeekTo};
use cinedeck::overlay::{Breakpoints, ControlOverlay};
use cinedeck::ui::Theme;
use cinedeck::ui::{self, Control, HitMap};
use cinedeck::widget::{MediaWidget, MemoryWidget};
use cinedeck::App;

const HEIGHT: u16 = 20;

fn app() -> App<MemoryWidget> {
    let mut app = App::new(ControlOverlay::default(), Breakpoints::default(), "Big Buck Bunny")
        .with_subtitle(Some("Blender Foundation".to_string()));
    let mut widget = MemoryWidget::new(120.0);
    widget.seek_to(SeekTo::Seconds(30.0)).unwrap();
    app.attach_widget(widget);
    app
}

fn draw(app: &App<MemoryWidget>, width: u16) -> (Buffer, HitMap) {
    draw_sized(app, width, HEIGHT)
}

fn draw_sized(app: &App<MemoryWidget>, width: u16, height: u16) -> (Buffer, HitMap) {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut hits = HitMap::default();
    terminal
        .draw(|frame| hits = ui::render(frame, app))
        .unwrap();
    (terminal.backend().buffer().clone(), hits)
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn screen_text(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| row_text(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn has(hits: &HitMap, control: Control) -> bool {
    hits.rect_of(control).is_some()
}

// =============================================================================
// RESPONSIVE LAYOUT
// =============================================================================

#[test]
fn test_desktop_layout() {
    let app = app();
    let (buffer, hits) = draw(&app, 140);
    let text = screen_text(&buffer);

    assert!(text.contains("Big Buck Bunny"));
    assert!(text.contains("Blender Foundation"));
    assert!(text.contains("Next Episode"));
    assert!(text.contains("1x"));
    assert!(text.contains("00:30 / 02:00"));
    assert!(text.contains("[ "), "desktop icons render large");

    for control in [
        Control::PlayPause,
        Control::Rewind,
        Control::FastForward,
        Control::Mute,
        Control::VolumeSlider,
        Control::SeekBar,
        Control::NextEpisode,
        Control::Settings,
        Control::Subtitles,
        Control::Fullscreen,
    ] {
        assert!(has(&hits, control), "{:?} missing on desktop", control);
    }
}

#[test]
fn test_tablet_layout() {
    let app = app();
    let (buffer, hits) = draw(&app, 100);
    let text = screen_text(&buffer);

    assert!(text.contains("00:30"));
    assert!(!text.contains("/ 02:00"), "total duration is desktop only");
    assert!(!text.contains("[ "), "tablet icons are not large");
    assert!(has(&hits, Control::VolumeSlider));
    assert!(has(&hits, Control::Fullscreen));
}

#[test]
fn test_compact_width_hides_volume_slider() {
    let app = app();
    let (_, hits) = draw(&app, 64);
    assert!(has(&hits, Control::Mute));
    assert!(!has(&hits, Control::VolumeSlider));

    let (_, hits) = draw(&app, 69);
    assert!(has(&hits, Control::VolumeSlider));
}

#[test]
fn test_mobile_layout() {
    let app = app();
    let (buffer, hits) = draw(&app, 50);
    let text = screen_text(&buffer);

    assert!(text.contains("Big Buck Bunny"));
    assert!(!text.contains("Blender Foundation"));
    assert!(!text.contains("Next Episode"));
    assert!(has(&hits, Control::Rewind));
    assert!(has(&hits, Control::PlayPause));
    assert!(has(&hits, Control::FastForward));
    assert!(has(&hits, Control::SeekBar));
    assert!(!has(&hits, Control::Fullscreen));
    assert!(!has(&hits, Control::VolumeSlider));

    // Middle cluster sits above the seek row
    let seek = hits.rect_of(Control::SeekBar).unwrap();
    let play = hits.rect_of(Control::PlayPause).unwrap();
    assert!(play.y < seek.y);
}

#[test]
fn test_tiny_terminals_render_without_panic() {
    let mut app = app();
    app.overlay.seek_mouse_down();

    for width in [2, 5, 20, 40, 64, 100, 140, 200] {
        for height in 0..=4 {
            let (buffer, hits) = draw_sized(&app, width, height);
            for control in [
                Control::PlayPause,
                Control::Rewind,
                Control::FastForward,
                Control::Mute,
                Control::VolumeSlider,
                Control::SeekBar,
                Control::Fullscreen,
            ] {
                if let Some(rect) = hits.rect_of(control) {
                    assert_eq!(
                        rect.intersection(buffer.area),
                        rect,
                        "{:?} outside a {}x{} frame",
                        control,
                        width,
                        height
                    );
                }
            }
        }
    }
}

#[test]
fn test_hidden_overlay_on_tiny_terminals() {
    let mut app = app();
    for _ in 0..5 {
        app.overlay.progress(Progress::default());
    }
    for height in 0..=2 {
        let (_, hits) = draw_sized(&app, 40, height);
        assert!(hits.is_empty());
    }
}

// =============================================================================
// STATE-DEPENDENT GLYPHS
// =============================================================================

#[test]
fn test_play_pause_glyph_follows_state() {
    let mut app = app();
    let (buffer, _) = draw(&app, 140);
    assert!(screen_text(&buffer).contains('⏸'));

    app.overlay.play_pause();
    let (buffer, _) = draw(&app, 140);
    let text = screen_text(&buffer);
    assert!(text.contains('▶'));
    assert!(!text.contains('⏸'));
}

#[test]
fn test_fullscreen_glyph_follows_state() {
    let mut app = app();
    let (buffer, _) = draw(&app, 140);
    assert!(screen_text(&buffer).contains('⛶'));

    app.overlay.fullscreen_changed(false);
    let (buffer, _) = draw(&app, 140);
    assert!(screen_text(&buffer).contains('⇲'));
}

#[test]
fn test_rate_label_follows_state() {
    let mut app = app();
    app.overlay.cycle_playback_rate();
    let (buffer, _) = draw(&app, 140);
    assert!(screen_text(&buffer).contains("1.25x"));
}

// =============================================================================
// HIDDEN / SEEKING
// =============================================================================

#[test]
fn test_hidden_overlay_renders_hint_only() {
    let mut app = app();
    for _ in 0..5 {
        app.overlay.progress(Progress::default());
    }
    assert!(!app.overlay.is_visible());

    let (buffer, hits) = draw(&app, 140);
    let text = screen_text(&buffer);
    assert!(hits.is_empty());
    assert!(!text.contains("Big Buck Bunny"));
    assert!(row_text(&buffer, HEIGHT - 1).contains("move the mouse"));
}

#[test]
fn test_seek_tooltip_while_dragging() {
    let mut app = app();
    let (buffer, hits) = draw(&app, 140);
    let seek = hits.rect_of(Control::SeekBar).unwrap();
    assert!(!row_text(&buffer, seek.y - 1).contains("00:30"));

    app.overlay.seek_mouse_down();
    let (buffer, _) = draw(&app, 140);
    assert!(row_text(&buffer, seek.y - 1).contains("00:30"));
}

#[test]
fn test_seek_thumb_tracks_played_fraction() {
    let mut app = app();
    app.overlay.progress(Progress::from_seconds(60.0, 90.0, Some(120.0)));
    let (buffer, hits) = draw(&app, 140);
    let seek = hits.rect_of(Control::SeekBar).unwrap();

    let thumb = (seek.x..seek.x + seek.width)
        .find(|&x| buffer[(x, seek.y)].symbol() == "●")
        .expect("thumb drawn");
    let middle = seek.x + (seek.width - 1) / 2;
    assert!(thumb.abs_diff(middle) <= 1);
}

// =============================================================================
// CLICK ROUTING
// =============================================================================

fn click(app: &mut App<MemoryWidget>, column: u16, row: u16) {
    for kind in [
        MouseEventKind::Down(MouseButton::Left),
        MouseEventKind::Up(MouseButton::Left),
    ] {
        app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        });
    }
}

#[test]
fn test_clicks_route_through_rendered_hit_map() {
    let mut app = app();
    let (_, hits) = draw(&app, 140);
    app.hit_map = hits.clone();

    let mute = hits.rect_of(Control::Mute).unwrap();
    click(&mut app, mute.x, mute.y);
    assert!(!app.overlay.state().muted);

    let ff = hits.rect_of(Control::FastForward).unwrap();
    click(&mut app, ff.x, ff.y);
    assert_eq!(app.widget.as_ref().unwrap().current_time(), Some(40.0));

    let seek = hits.rect_of(Control::SeekBar).unwrap();
    click(&mut app, seek.x + seek.width - 1, seek.y);
    assert_eq!(app.widget.as_ref().unwrap().current_time(), Some(120.0));
    assert!(!app.overlay.state().seeking);

    let volume = hits.rect_of(Control::VolumeSlider).unwrap();
    click(&mut app, volume.x, volume.y);
    assert_eq!(app.overlay.state().volume, 0.0);
    assert!(app.overlay.state().muted);
}

// =============================================================================
// THEME
// =============================================================================

#[test]
fn test_theme_colors_readable_on_scrim() {
    for (name, color) in [
        ("TEXT", Theme::TEXT),
        ("ICON_BOTTOM", Theme::ICON_BOTTOM),
        ("ICON_ACTIVE", Theme::ICON_ACTIVE),
        ("TRACK", Theme::TRACK),
        ("BUFFER", Theme::BUFFER),
    ] {
        let ratio = Theme::contrast(color, Theme::BACKGROUND);
        assert!(ratio >= Theme::AA_NORMAL, "{} contrast {:.2}:1 below AA", name, ratio);
    }
}

#[test]
fn test_tooltip_readable() {
    let style = Theme::tooltip();
    let (fg, bg) = (style.fg.unwrap(), style.bg.unwrap());
    assert!(Theme::contrast(fg, bg) >= Theme::AA_NORMAL);
}
