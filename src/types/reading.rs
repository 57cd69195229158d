//! Decoded sensor readings

use chrono::{DateTime, Local};

use super::DeviceKind;

/// A fully decoded energy-meter sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReading {
    pub device_kind: DeviceKind,
    pub device_id: u16,
    pub house_id: u16,
    pub sequence_number: u32,
    /// Mains frequency in Hz.
    pub frequency_hz: f64,
    /// Cumulative power in W.
    pub total_power_w: f64,
    /// Cumulative energy in kWh.
    pub total_energy_kwh: f64,
    pub timestamp: DateTime<Local>,
}

/// Successful decoder result.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The device id maps to a known kind and its payload decoded.
    Reading(DecodedReading),
    /// No handler is registered for this device id.
    UnknownDevice { device_id: u16, raw: String },
}
