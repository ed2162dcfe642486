//! Configuration file handling for dogcam.
//!
//! Loads configuration from `~/.config/dogcam/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for dogcam.
/// Loaded from ~/.config/dogcam/config.toml (or a custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// External camera command settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// Still-image capture command, must accept
    /// `--output <path> --timeout <ms> --width <W> --height <H>`.
    #[serde(default = "default_still_command")]
    pub still_command: String,
    /// Live preview command, must accept `--timeout <ms>`.
    #[serde(default = "default_preview_command")]
    pub preview_command: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// How long the capture command may run before it gives up.
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u32,
    /// How long a preview window stays open.
    #[serde(default = "default_preview_timeout_ms")]
    pub preview_timeout_ms: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            still_command: default_still_command(),
            preview_command: default_preview_command(),
            width: default_width(),
            height: default_height(),
            capture_timeout_ms: default_capture_timeout_ms(),
            preview_timeout_ms: default_preview_timeout_ms(),
        }
    }
}

/// Image library settings: where photos land and which dogs exist.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// The two subjects the session toggles between. The first entry is
    /// the subject selected at startup.
    #[serde(default = "default_subjects")]
    pub subjects: [String; 2],
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            root: default_root(),
            subjects: default_subjects(),
        }
    }
}

fn default_still_command() -> String {
    "libcamera-still".to_string()
}

fn default_preview_command() -> String {
    "libcamera-hello".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    960
}

fn default_capture_timeout_ms() -> u32 {
    2000
}

fn default_preview_timeout_ms() -> u32 {
    5000
}

fn default_root() -> PathBuf {
    PathBuf::from("dog_images")
}

fn default_subjects() -> [String; 2] {
    ["gomi".to_string(), "millie".to_string()]
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// With an explicit path the file must exist and parse. With no path,
    /// the default location is tried and a missing file falls back to
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::read_file(p),
            None => {
                let p = default_path();
                if p.exists() {
                    Self::read_file(&p)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
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
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("dogcam")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.camera.still_command, "libcamera-still");
        assert_eq!(config.camera.preview_command, "libcamera-hello");
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.camera.height, 960);
        assert_eq!(config.camera.capture_timeout_ms, 2000);
        assert_eq!(config.camera.preview_timeout_ms, 5000);
        assert_eq!(config.library.root, PathBuf::from("dog_images"));
        assert_eq!(config.library.subjects, ["gomi", "millie"]);
    }

    #[test]
    fn test_load_no_path_missing_file_uses_defaults() {
        // Default path almost certainly doesn't exist in the test env,
        // but even if it does, load must not error.
        let config = Config::load(None);
        assert!(config.is_ok());
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/dogcam.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[camera]").unwrap();
        writeln!(file, "height = 1280").unwrap();
        writeln!(file, "[library]").unwrap();
        writeln!(file, "subjects = [\"rex\", \"fido\"]").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.camera.height, 1280);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.camera.still_command, "libcamera-still");
        assert_eq!(config.library.subjects, ["rex", "fido"]);
        assert_eq!(config.library.root, PathBuf::from("dog_images"));
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
