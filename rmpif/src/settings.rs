//! Bridge settings
//!
//! The panel's port name lives on the first line of `rmpif.cfg`. Optional
//! tuning lives in `rmpif.json` next to it; both are only ever read.

use std::path::{Path, PathBuf};

use rmp_engine::{EngineConfig, SerialConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the endpoint file
pub const ENDPOINT_FILE: &str = "rmpif.cfg";

/// Name of the optional tuning file
pub const SETTINGS_FILE: &str = "rmpif.json";

/// Errors loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No path given and no config directory could be determined
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Settings file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for [`Settings`]
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tuning for the engine and the serial line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Engine timing, buffer sizes and simulator names
    pub engine: EngineConfig,
    /// Serial line parameters
    pub serial: SerialConfig,
}

impl Settings {
    /// Get the XDG config directory for rmpif
    /// Uses $XDG_CONFIG_HOME/rmpif on Linux/macOS, falls back to ~/.config/rmpif
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("rmpif"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("rmpif"))
    }

    /// Resolve the endpoint file, preferring an explicit path
    pub fn endpoint_path(explicit: Option<PathBuf>) -> Result<PathBuf, SettingsError> {
        match explicit {
            Some(path) => Ok(path),
            None => Self::config_dir()
                .map(|dir| dir.join(ENDPOINT_FILE))
                .ok_or(SettingsError::NoConfigDir),
        }
    }

    /// Load the tuning file sitting next to `endpoint_path`
    ///
    /// A missing file yields the defaults.
    pub fn load_beside(endpoint_path: &Path) -> Result<Self, SettingsError> {
        let path = endpoint_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_FILE);
        Self::load(&path)
    }

    /// Load settings from `path`, or the defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{Settings, SettingsError};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rmpif-settings-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = temp_dir("missing");
        let settings = Settings::load_beside(&dir.join("rmpif.cfg")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let dir = temp_dir("partial");
        std::fs::write(
            dir.join("rmpif.json"),
            r#"{ "engine": { "trim_reload_ticks": 5 }, "serial": { "baud_rate": 9600 } }"#,
        )
        .unwrap();

        let settings = Settings::load_beside(&dir.join("rmpif.cfg")).unwrap();
        assert_eq!(settings.engine.trim_reload_ticks, 5);
        assert_eq!(settings.engine.heartbeat_interval_ms, 5_000);
        assert_eq!(settings.serial.baud_rate, 9600);
        assert_eq!(
            settings.engine.bindings.trim_up,
            "sim/flight_controls/pitch_trim_up"
        );
    }

    #[test]
    fn test_bad_json() {
        let dir = temp_dir("bad-json");
        let path = dir.join("rmpif.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_endpoint_path_wins() {
        let path = Settings::endpoint_path(Some("/tmp/panel.cfg".into())).unwrap();
        assert_eq!(path, Path::new("/tmp/panel.cfg"));
    }
}
