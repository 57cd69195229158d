//! Gateway configuration.
//!
//! Configuration comes from an optional YAML file, with command-line flags applied on
//! top by the binary. Every field has a default except the device path.
//!
//! ```yaml
//! device: /dev/ttyUSB0
//! raw_log: data_raw.dat
//! energy_log: data_energy.dat
//! chunk_size: 255
//! max_message_len: 255
//! devices:
//!   1: energy_meter
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decoder::{DeviceTable, ENERGY_METER_DEVICE_ID};
use crate::framing::DEFAULT_MAX_MESSAGE_LEN;
use crate::types::DeviceKind;
use crate::{GatewayError, Result};

/// Default raw message log file.
pub const DEFAULT_RAW_LOG: &str = "data_raw.dat";

/// Default serial read size.
pub const DEFAULT_CHUNK_SIZE: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Serial device path, or a capture file when replaying.
    pub device: Option<PathBuf>,
    /// Raw message log, appended before every decode.
    pub raw_log: PathBuf,
    /// Accepted readings log. Disabled when absent.
    pub energy_log: Option<PathBuf>,
    /// Maximum bytes per read.
    pub chunk_size: usize,
    /// Assembler length cap; `null` for unbounded.
    pub max_message_len: Option<usize>,
    /// Device id to device kind.
    pub devices: BTreeMap<u16, DeviceKind>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            device: None,
            raw_log: PathBuf::from(DEFAULT_RAW_LOG),
            energy_log: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_message_len: Some(DEFAULT_MAX_MESSAGE_LEN),
            devices: BTreeMap::from([(ENERGY_METER_DEVICE_ID, DeviceKind::EnergyMeter)]),
        }
    }
}

impl GatewayConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml =
            std::fs::read_to_string(path).map_err(|e| GatewayError::file_error(path, e))?;
        Self::from_yaml(&yaml)
    }

    /// Check the settings are usable for a run.
    pub fn validate(&self) -> Result<()> {
        if self.device.is_none() {
            return Err(GatewayError::config("no serial device given"));
        }
        if self.chunk_size == 0 {
            return Err(GatewayError::config("chunk_size must be at least 1"));
        }
        if self.max_message_len == Some(0) {
            return Err(GatewayError::config("max_message_len must be at least 1 or null"));
        }
        if self.devices.is_empty() {
            return Err(GatewayError::config("devices table is empty"));
        }
        Ok(())
    }

    /// Decoder dispatch table built from `devices`.
    pub fn device_table(&self) -> DeviceTable {
        self.devices.iter().map(|(&id, &kind)| (id, kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_gateway() {
        let config = GatewayConfig::default();
        assert_eq!(config.raw_log, PathBuf::from("data_raw.dat"));
        assert_eq!(config.chunk_size, 255);
        assert_eq!(config.max_message_len, Some(255));
        assert_eq!(config.device_table(), DeviceTable::default());
        assert!(config.energy_log.is_none());
    }

    #[test]
    fn parses_full_document() {
        let config = GatewayConfig::from_yaml(
            "device: /dev/ttyUSB0\n\
             raw_log: /var/log/meter/raw.dat\n\
             energy_log: /var/log/meter/energy.dat\n\
             chunk_size: 64\n\
             max_message_len: null\n\
             devices:\n  1: energy_meter\n  9: energy_meter\n",
        )
        .expect("valid yaml");

        assert_eq!(config.device, Some(PathBuf::from("/dev/ttyUSB0")));
        assert_eq!(config.energy_log, Some(PathBuf::from("/var/log/meter/energy.dat")));
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.max_message_len, None);
        assert_eq!(config.device_table().lookup(9), Some(DeviceKind::EnergyMeter));
        config.validate().expect("valid config");
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = GatewayConfig::from_yaml("device: /dev/ttyACM0\n").expect("valid yaml");
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.devices.len(), 1);
    }

    #[test]
    fn rejects_unknown_fields_and_kinds() {
        assert!(matches!(
            GatewayConfig::from_yaml("baud: 57600\n"),
            Err(GatewayError::Config { .. })
        ));
        assert!(matches!(
            GatewayConfig::from_yaml("devices:\n  2: weather_station\n"),
            Err(GatewayError::Config { .. })
        ));
    }

    #[test]
    fn validation_catches_unusable_settings() {
        let missing_device = GatewayConfig::default();
        assert!(missing_device.validate().is_err());

        let base = GatewayConfig { device: Some("/dev/ttyUSB0".into()), ..Default::default() };
        base.validate().expect("base is valid");

        let zero_chunk = GatewayConfig { chunk_size: 0, ..base.clone() };
        assert!(zero_chunk.validate().is_err());

        let zero_cap = GatewayConfig { max_message_len: Some(0), ..base.clone() };
        assert!(zero_cap.validate().is_err());

        let no_devices = GatewayConfig { devices: BTreeMap::new(), ..base };
        assert!(no_devices.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = GatewayConfig::load(dir.path().join("meterlink.yaml")).unwrap_err();
        assert!(matches!(err, GatewayError::File { .. }));
    }
}
