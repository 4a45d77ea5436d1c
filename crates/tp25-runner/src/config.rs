//! Runner configuration, loaded from YAML.
//!
//! ```yaml
//! device:
//!   name: Thermopro
//!   initial_temperatures: [215, 650]
//!   bcd_check: nibble
//! transport:
//!   bind: 127.0.0.1
//!   port: 7025
//! notify_interval_ms: 3000
//! ```
//!
//! Every field is optional.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tp25_device::DeviceConfig;

use crate::error::RunnerError;

/// Default TCP port of the transport listener.
pub const DEFAULT_PORT: u16 = 7025;
/// Default period of unsolicited temperature reports.
pub const DEFAULT_NOTIFY_INTERVAL_MS: u64 = 3000;

/// Transport listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Address to bind.
    pub bind: String,
    /// Port to bind; 0 picks a free port.
    pub port: u16,
    /// Notifications buffered for a slow client before sends fail.
    pub queue_depth: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            queue_depth: 32,
        }
    }
}

/// Complete emulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// The emulated device.
    pub device: DeviceConfig,
    /// The transport listener.
    pub transport: TransportConfig,
    /// Period of unsolicited temperature reports in milliseconds.
    pub notify_interval_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            device: DeviceConfig::default(),
            transport: TransportConfig::default(),
            notify_interval_ms: DEFAULT_NOTIFY_INTERVAL_MS,
        }
    }
}

impl RunnerConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, RunnerError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RunnerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Reject values the emulator cannot run with.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.notify_interval_ms == 0 {
            return Err(RunnerError::InvalidConfig(
                "notify_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.transport.queue_depth == 0 {
            return Err(RunnerError::InvalidConfig(
                "transport.queue_depth must be greater than zero".to_string(),
            ));
        }
        self.device.validate()?;
        Ok(())
    }

    /// Period of unsolicited temperature reports.
    pub fn notify_interval(&self) -> Duration {
        Duration::from_millis(self.notify_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tp25_protocol::BcdCheck;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = RunnerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.notify_interval(), Duration::from_secs(3));
        assert_eq!(config.transport.port, 7025);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document() {
        let yaml = r#"
device:
  name: Smoker
  bcd_check: byte_field
transport:
  port: 0
notify_interval_ms: 250
"#;
        let config = RunnerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.device.name, "Smoker");
        assert_eq!(config.device.bcd_check, BcdCheck::ByteField);
        assert_eq!(config.transport.bind, "127.0.0.1");
        assert_eq!(config.transport.port, 0);
        assert_eq!(config.notify_interval_ms, 250);
    }

    #[test]
    fn test_validate() {
        let config = RunnerConfig {
            notify_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RunnerError::InvalidConfig(_))));

        let mut config = RunnerConfig::default();
        config.device.initial_temperatures = vec![0; 8];
        assert!(matches!(config.validate(), Err(RunnerError::Device(_))));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            RunnerConfig::from_yaml("notify_interval_ms: soon"),
            Err(RunnerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RunnerConfig::load(Path::new("/nonexistent/tp25.yaml")).unwrap_err();
        assert!(matches!(err, RunnerError::ConfigRead { .. }));
    }
}
