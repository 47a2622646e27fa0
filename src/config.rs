// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{FacingMode, StreamConstraints};
use crate::constants::{DEFAULT_SAVE_FOLDER, DEFAULT_UPLOAD_URL, UPLOAD_URL_ENV, timing};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// When the session asks for the camera
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquireTrigger {
    /// Request access as soon as the session starts
    #[default]
    OnStart,
    /// Wait for the user to press "Open Camera"
    OnDemand,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint receiving submitted stills
    pub upload_url: String,
    /// Whether the camera is requested on start or on demand
    pub acquire: AcquireTrigger,
    /// Switch to full-screen preview once access is granted
    pub auto_full_screen: bool,
    /// Preferred camera facing
    pub facing_mode: FacingMode,
    /// Ask the device for continuous autofocus when it supports it
    pub continuous_focus: bool,
    /// HTTP timeout for a submission
    pub upload_timeout_secs: u64,
    /// Where saved stills go (defaults to ~/Pictures/stillcam)
    pub photo_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            acquire: AcquireTrigger::default(),
            auto_full_screen: true,
            facing_mode: FacingMode::default(),
            continuous_focus: true,
            upload_timeout_secs: timing::DEFAULT_UPLOAD_TIMEOUT_SECS,
            photo_dir: None,
        }
    }
}

impl Config {
    /// Location of the user config file (`~/.config/stillcam/config.json`)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.json"))
    }

    /// Load the user config, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.override_upload_url(std::env::var(UPLOAD_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Replace the upload URL when an override is present and non-blank
    pub fn override_upload_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            info!(url = %url, "Upload URL overridden");
            self.upload_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upload_endpoint().map(|_| ())
    }

    /// Parsed upload endpoint; only http(s) URLs are accepted
    pub fn upload_endpoint(&self) -> Result<reqwest::Url, ConfigError> {
        let url = reqwest::Url::parse(&self.upload_url)
            .map_err(|_| ConfigError::InvalidUploadUrl(self.upload_url.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidUploadUrl(self.upload_url.clone())),
        }
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs.max(1))
    }

    /// Acquisition constraints derived from the config
    pub fn constraints(&self) -> StreamConstraints {
        StreamConstraints {
            facing_mode: self.facing_mode,
            continuous_focus: self.continuous_focus,
        }
    }

    /// Directory for saved stills
    pub fn photo_directory(&self) -> PathBuf {
        self.photo_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
                .join(DEFAULT_SAVE_FOLDER)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"acquire": "on-demand"}"#).unwrap();
        assert_eq!(config.acquire, AcquireTrigger::OnDemand);
        assert_eq!(config.upload_url, DEFAULT_UPLOAD_URL);
        assert!(config.auto_full_screen);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = Config::default();
        config.override_upload_url(Some("   ".to_string()));
        assert_eq!(config.upload_url, DEFAULT_UPLOAD_URL);

        config.override_upload_url(Some("http://127.0.0.1:9000/upload".to_string()));
        assert_eq!(config.upload_url, "http://127.0.0.1:9000/upload");
    }

    #[test]
    fn test_non_http_endpoint_is_rejected() {
        let config = Config {
            upload_url: "ftp://example.com/upload".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUploadUrl(_))
        ));
    }

    #[test]
    fn test_upload_timeout_never_zero() {
        let config = Config {
            upload_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.upload_timeout(), Duration::from_secs(1));
    }
}
