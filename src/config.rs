//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{media, playback};
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory receiving temporary playback preview files
    pub preview_dir: PathBuf,
    /// How often the lyric cursor polls the playback position
    pub poll_interval: Duration,
    /// File name assigned to audio imported without one
    pub default_audio_name: String,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Use `dir` for playback preview files.
    #[must_use]
    pub fn with_preview_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preview_dir = dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            preview_dir: default_preview_dir(),
            poll_interval: Duration::from_millis(playback::DEFAULT_POLL_INTERVAL_MS),
            default_audio_name: media::DEFAULT_AUDIO_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(path) = env::var("MUSICPAK_PREVIEW_DIR") {
            config.preview_dir = PathBuf::from(shellexpand::tilde(&path).to_string());
        }

        if let Ok(ms) = env::var("MUSICPAK_POLL_INTERVAL_MS") {
            let ms = ms.trim().parse::<u64>().map_err(|_| {
                Error::config(
                    format!("MUSICPAK_POLL_INTERVAL_MS is not a number: {ms:?}"),
                    "Set it to a whole number of milliseconds, e.g. 100",
                )
            })?;
            config.poll_interval =
                Duration::from_millis(ms.max(playback::MIN_POLL_INTERVAL_MS));
        }

        if let Ok(name) = env::var("MUSICPAK_DEFAULT_AUDIO_NAME") {
            if !name.trim().is_empty() {
                config.default_audio_name = name.trim().to_string();
            }
        }

        Ok(config)
    }
}

/// Preview files go to the user cache dir, or the system temp dir without one.
fn default_preview_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(
        || env::temp_dir().join(playback::PREVIEW_SUBDIR),
        |d| d.join(playback::PREVIEW_SUBDIR),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app_name(), "musicpak");
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.default_audio_name, "audio.mp3");
        assert!(config.preview_dir.ends_with("preview"));
    }
}
