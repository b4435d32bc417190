//! CLI - Command Line Interface for cinedeck
//!
//! Flags override the config file; anything not given on the command line
//! keeps its configured value.
//!
//! # Examples
//!
//! ```bash
//! # Play a file with controls over it
//! cinedeck ~/Videos/pilot.mkv --title "Pilot" --subtitle "S01E01"
//!
//! # Start playing with sound on
//! cinedeck https://example.com/stream.m3u8 --unmuted --volume 80
//!
//! # Try the controls against a simulated 2 minute clip
//! cinedeck --demo 120
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::widget::WidgetError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for the binary (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// mpv binary not found
    PlayerNotFound = 3,
    /// mpv started but its IPC socket failed
    IpcFailed = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&WidgetError> for ExitCode {
    fn from(err: &WidgetError) -> ExitCode {
        match err {
            WidgetError::NotFound(_) => ExitCode::PlayerNotFound,
            WidgetError::IpcTimeout(_)
            | WidgetError::ExitedEarly(_)
            | WidgetError::Protocol(_)
            | WidgetError::Closed => ExitCode::IpcFailed,
            _ => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// cinedeck - video player controls in your terminal
///
/// Launches mpv on the given files or URLs and draws play/pause, seeking,
/// volume and fullscreen controls in the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "cinedeck",
    version,
    about = "Video player controls in your terminal",
    long_about = "Launches mpv on the given files or URLs and draws a control \
                  overlay in the terminal: play/pause, rewind, fast forward, \
                  seek and volume sliders, playback rate and fullscreen.\n\n\
                  The controls hide after a few seconds of playback and come \
                  back on mouse movement or any key press.",
    after_help = "KEYS:\n\
                  space/k  play/pause      ←/j →/l  rewind/fast forward\n\
                  m        mute            ↑/↓      volume\n\
                  f        fullscreen      n        next episode\n\
                  s        playback rate   c        subtitles\n\
                  q/Esc    quit"
)]
pub struct Cli {
    /// Files or URLs to play, in playlist order
    #[arg(value_name = "URL", required_unless_present = "demo")]
    pub urls: Vec<String>,

    /// Title line (defaults to the first URL's file name)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Secondary line under the title
    #[arg(long, short = 's')]
    pub subtitle: Option<String>,

    /// Path to the mpv binary
    #[arg(long)]
    pub mpv: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Progress ticks before the controls hide
    #[arg(long)]
    pub auto_hide_ticks: Option<u32>,

    /// Rewind / fast-forward step in seconds
    #[arg(long, value_parser = parse_positive_secs)]
    pub seek_step: Option<f64>,

    /// Initial volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Start with sound on
    #[arg(long)]
    pub unmuted: bool,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Run against a simulated clip of this many seconds instead of mpv
    #[arg(long, value_name = "SECONDS", value_parser = parse_positive_secs)]
    pub demo: Option<f64>,

    /// Log filter used when RUST_LOG is unset (e.g. debug, cinedeck=trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Fold command line overrides into the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(mpv) = &self.mpv {
            config.player.mpv_path = mpv.clone();
        }
        if let Some(ticks) = self.auto_hide_ticks {
            config.overlay.auto_hide_ticks = ticks;
        }
        if let Some(step) = self.seek_step {
            config.overlay.seek_step_secs = step;
        }
        if let Some(volume) = self.volume {
            config.defaults.volume = f64::from(volume) / 100.0;
        }
        if self.unmuted {
            config.defaults.muted = false;
        }
        if self.paused {
            config.defaults.playing = false;
        }
    }

    /// Load the config named by `--config`, or the default one
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Title line, falling back to the first URL's last path segment
    pub fn effective_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        match self.urls.first() {
            Some(url) => title_from_url(url),
            None => "cinedeck demo".to_string(),
        }
    }
}

fn title_from_url(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    trimmed
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}

fn parse_positive_secs(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("'{}' must be a positive number of seconds", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_urls_required_without_demo() {
        assert!(Cli::try_parse_from(["cinedeck"]).is_err());
        assert!(Cli::try_parse_from(["cinedeck", "--demo", "60"]).is_ok());
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "cinedeck",
            "movie.mkv",
            "--mpv",
            "/opt/mpv",
            "--auto-hide-ticks",
            "5",
            "--seek-step",
            "30",
            "--volume",
            "80",
            "--unmuted",
            "--paused",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.player.mpv_path, "/opt/mpv");
        assert_eq!(config.overlay.auto_hide_ticks, 5);
        assert_eq!(config.overlay.seek_step_secs, 30.0);
        assert_eq!(config.defaults.volume, 0.8);
        assert!(!config.defaults.muted);
        assert!(!config.defaults.playing);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::parse_from(["cinedeck", "movie.mkv"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["cinedeck", "a.mkv", "--volume", "150"]).is_err());
        assert!(Cli::try_parse_from(["cinedeck", "a.mkv", "--seek-step", "0"]).is_err());
        assert!(Cli::try_parse_from(["cinedeck", "--demo", "-5"]).is_err());
        assert!(Cli::try_parse_from(["cinedeck", "--demo", "abc"]).is_err());
    }

    #[test]
    fn test_effective_title() {
        let cli = Cli::parse_from(["cinedeck", "https://cdn.example.com/shows/pilot.mp4?token=1"]);
        assert_eq!(cli.effective_title(), "pilot.mp4");

        let cli = Cli::parse_from(["cinedeck", "/home/me/Videos/clip.webm"]);
        assert_eq!(cli.effective_title(), "clip.webm");

        let cli = Cli::parse_from(["cinedeck", "a.mkv", "--title", "Pilot"]);
        assert_eq!(cli.effective_title(), "Pilot");

        let cli = Cli::parse_from(["cinedeck", "--demo", "60"]);
        assert_eq!(cli.effective_title(), "cinedeck demo");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::PlayerNotFound), 3);
        assert_eq!(i32::from(ExitCode::IpcFailed), 4);
    }

    #[test]
    fn test_widget_error_codes() {
        let err = WidgetError::NotFound("mpv".into());
        assert_eq!(ExitCode::from(&err), ExitCode::PlayerNotFound);

        let err = WidgetError::IpcTimeout("/tmp/x.sock".into());
        assert_eq!(ExitCode::from(&err), ExitCode::IpcFailed);

        let err = WidgetError::Command("bad".into());
        assert_eq!(ExitCode::from(&err), ExitCode::Error);
    }
}
