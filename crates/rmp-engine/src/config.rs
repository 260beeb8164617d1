//! Engine and serial configuration

use std::path::Path;
use std::time::Duration;

use rmp_protocol::DEFAULT_LINE_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::SimBindings;
use crate::trim::DEFAULT_TRIM_RELOAD;

/// Protocol engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum time between heartbeats (ms)
    pub heartbeat_interval_ms: u64,
    /// Delay requested from the scheduler while the link is healthy (ms)
    pub tick_interval_ms: u64,
    /// Delay requested from the scheduler once the link has faulted (ms)
    pub fault_backoff_ms: u64,
    /// Ticks a trim command stays held after the last wheel detent
    pub trim_reload_ticks: u8,
    /// Longest line accepted from the panel
    pub line_capacity: usize,
    /// Bytes read from the transport per tick
    pub read_chunk: usize,
    /// Simulator variable and command names
    pub bindings: SimBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: 5_000,
            tick_interval_ms: 100,
            fault_backoff_ms: 60_000,
            trim_reload_ticks: DEFAULT_TRIM_RELOAD,
            line_capacity: DEFAULT_LINE_CAPACITY,
            read_chunk: 100,
            bindings: SimBindings::default(),
        }
    }
}

impl EngineConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn fault_backoff(&self) -> Duration {
        Duration::from_millis(self.fault_backoff_ms)
    }
}

/// Serial line settings for the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Baud rate
    pub baud_rate: u32,
    /// Read/write timeout (ms); kept short so a tick never stalls the host
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            timeout_ms: 5,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Read the transport endpoint (e.g. `COM3`, `/dev/ttyACM0`) from `path`
///
/// Only the first line is used; surrounding whitespace and line endings are
/// stripped.
pub fn read_endpoint(path: &Path) -> Result<String, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let endpoint = text.lines().next().unwrap_or_default().trim();
    if endpoint.is_empty() {
        return Err(ConfigError::EmptyEndpoint(path.to_path_buf()));
    }
    Ok(endpoint.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{read_endpoint, EngineConfig};
    use crate::error::ConfigError;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rmpif-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_endpoint_first_line() {
        let path = temp_file("cfg-first-line", "COM3\r\nignored\n");
        assert_eq!(read_endpoint(&path).unwrap(), "COM3");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_endpoint_without_newline() {
        let path = temp_file("cfg-no-newline", "/dev/ttyACM0");
        assert_eq!(read_endpoint(&path).unwrap(), "/dev/ttyACM0");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_endpoint_empty() {
        let path = temp_file("cfg-empty", "\n");
        assert!(matches!(
            read_endpoint(&path),
            Err(ConfigError::EmptyEndpoint(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_endpoint_missing() {
        let path = std::env::temp_dir().join("rmpif-definitely-missing.cfg");
        assert!(matches!(
            read_endpoint(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_default_intervals() {
        let config = EngineConfig::default();
        assert_eq!(config.heartbeat_interval().as_secs(), 5);
        assert_eq!(config.fault_backoff().as_secs(), 60);
        assert_eq!(config.tick_interval().as_millis(), 100);
        assert_eq!(config.trim_reload_ticks, 3);
        assert_eq!(config.line_capacity, 100);
    }
}
