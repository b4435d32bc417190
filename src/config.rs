//! Configuration management for cinedeck
//!
//! Config is stored at ~/.config/cinedeck/config.toml. Every section and
//! field is optional; anything missing falls back to the built-in default.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::PlayerUIState;
use crate::overlay::{Breakpoints, DEFAULT_AUTO_HIDE_TICKS, DEFAULT_SEEK_STEP_SECS};

/// Overlay behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Visible progress ticks before the controls hide
    pub auto_hide_ticks: u32,
    /// Rewind / fast-forward step
    pub seek_step_secs: f64,
    /// Widget progress callback interval
    pub progress_interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            auto_hide_ticks: DEFAULT_AUTO_HIDE_TICKS,
            seek_step_secs: DEFAULT_SEEK_STEP_SECS,
            progress_interval_ms: 1000,
        }
    }
}

impl OverlayConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }
}

/// Initial overlay state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub playing: bool,
    pub muted: bool,
    pub volume: f64,
    pub playback_rate: f64,
    pub full_screen: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let state = PlayerUIState::default();
        Self {
            playing: state.playing,
            muted: state.muted,
            volume: state.volume,
            playback_rate: state.playback_rate,
            full_screen: state.full_screen,
        }
    }
}

impl DefaultsConfig {
    /// Mount-time overlay state
    pub fn initial_state(&self) -> PlayerUIState {
        PlayerUIState {
            playing: self.playing,
            muted: self.muted,
            volume: self.volume.clamp(0.0, 1.0),
            playback_rate: self.playback_rate,
            full_screen: self.full_screen,
            ..PlayerUIState::default()
        }
    }
}

/// mpv process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv binary
    pub mpv_path: String,
    /// Extra arguments passed before the playlist
    pub extra_args: Vec<String>,
    /// How long to wait for the IPC socket
    pub ipc_timeout_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mpv_path: "mpv".to_string(),
            extra_args: Vec::new(),
            ipc_timeout_ms: 6000,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file; defaults to the cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub overlay: OverlayConfig,
    pub defaults: DefaultsConfig,
    pub breakpoints: Breakpoints,
    pub player: PlayerConfig,
}

impl Config {
    /// Get config file path (~/.config/cinedeck/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinedeck").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Log file path with fallback to ~/.cache/cinedeck/cinedeck.log
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|p| p.join("cinedeck").join("cinedeck.log"))
        })
    }
}
