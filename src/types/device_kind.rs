//! Device kinds known to the decoder

use serde::{Deserialize, Serialize};

/// Sensor class behind a device id.
///
/// Each kind knows how many payload tokens follow the 7-token header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Electricity energy meter: sequence, mains frequency, total power, total energy.
    EnergyMeter,
}

impl DeviceKind {
    /// Number of payload tokens this kind requires after the header.
    pub fn payload_tokens(self) -> usize {
        match self {
            // 4 sequence + 2 frequency + 4 power + 4 energy
            DeviceKind::EnergyMeter => 14,
        }
    }

    /// Human-readable name used in logs.
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::EnergyMeter => "electricity energy meter",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
