//! Device configuration.

use serde::{Deserialize, Serialize};
use tp25_protocol::{BcdCheck, PROBE_COUNT};

use crate::error::DeviceError;

/// Configuration of the emulated thermometer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Advertised device name, also used as the `device` metric label.
    pub name: String,
    /// Starting temperatures in tenths of a degree for probes 1, 2, ...
    /// Probes without an entry start at 20.0°.
    pub initial_temperatures: Vec<u16>,
    /// Rule used to validate BCD alarm thresholds.
    pub bcd_check: BcdCheck,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            name: "Thermopro".to_string(),
            initial_temperatures: Vec::new(),
            bcd_check: BcdCheck::default(),
        }
    }
}

impl DeviceConfig {
    /// Check the configuration for values the device cannot represent.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.name.is_empty() {
            return Err(DeviceError::InvalidConfig("device name is empty".to_string()));
        }
        if self.initial_temperatures.len() > PROBE_COUNT {
            return Err(DeviceError::InvalidConfig(format!(
                "{} initial temperatures given, the device has {} probes",
                self.initial_temperatures.len(),
                PROBE_COUNT
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: DeviceConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DeviceConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
name: Grill
initial_temperatures: [215, 650]
bcd_check: byte_field
"#;
        let config: DeviceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Grill");
        assert_eq!(config.initial_temperatures, vec![215, 650]);
        assert_eq!(config.bcd_check, BcdCheck::ByteField);
    }

    #[test]
    fn test_validate_rejects_too_many_probes() {
        let config = DeviceConfig {
            initial_temperatures: vec![200; 7],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DeviceError::InvalidConfig(_))));
    }
}
