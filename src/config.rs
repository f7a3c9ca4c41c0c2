//! Configuration file handling for qrscan.
//!
//! Loads configuration from `~/.config/qrscan/config.toml` or a custom path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::camera::{CameraSettings, Resolution};

/// Configuration file structure for qrscan.
/// Loaded from ~/.config/qrscan/config.toml.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScannerConfig {
    /// Fixed wait between capture iterations, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    /// Copy each newly decoded payload to the clipboard as it appears
    #[serde(default)]
    pub auto_copy: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            auto_copy: false,
        }
    }
}

fn default_width() -> u32 {
    Resolution::MEDIUM.width
}

fn default_height() -> u32 {
    Resolution::MEDIUM.height
}

fn default_fps() -> u32 {
    30
}

fn default_pacing_ms() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Camera settings derived from the `[camera]` section.
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.camera.device,
            resolution: Resolution {
                width: self.camera.width,
                height: self.camera.height,
            },
            fps: self.camera.fps,
        }
    }

    /// Pacing interval derived from the `[scanner]` section.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.scanner.pacing_ms)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("qrscan").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/qrscan/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/qrscan.toml"))).unwrap();
        assert_eq!(config.camera.device, 0);
        assert_eq!(config.scanner.pacing_ms, 60);
        assert_eq!(config.pacing(), Duration::from_millis(60));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[camera]\ndevice = 2\nwidth = 1280\nheight = 720\n\n[scanner]\npacing_ms = 33\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.camera.device, 2);
        assert_eq!(config.camera_settings().resolution, Resolution::HIGH);
        assert_eq!(config.pacing(), Duration::from_millis(33));
        // Omitted keys fall back to their defaults
        assert_eq!(config.camera.fps, 30);
        assert!(!config.scanner.auto_copy);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        match Config::load(Some(file.path())) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("Expected parse error, got {:?}", other.map(|_| ())),
        }
    }
}
