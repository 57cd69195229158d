//! Positional decoding of gateway messages.
//!
//! A message body is a run of whitespace-separated tokens. The first seven form a
//! fixed header:
//!
//! | index | meaning                         |
//! |-------|---------------------------------|
//! | 0     | literal `OK` marker             |
//! | 1     | payload length in bytes         |
//! | 2     | link-layer header byte          |
//! | 3, 4  | house id, low then high byte    |
//! | 5, 6  | device id, low then high byte   |
//!
//! The device id selects a [`DeviceKind`] through the [`DeviceTable`], which fixes how
//! many payload tokens follow and how they are interpreted.

mod device_table;
mod tokens;

pub use device_table::{DeviceTable, ENERGY_METER_DEVICE_ID};

use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::types::{Decoded, DecodedReading, DeviceKind, Message};
use tokens::{Tokens, compose_le};

/// Tokens in the fixed header.
pub const HEADER_TOKENS: usize = 7;

/// Expected value of token 0.
pub const OK_MARKER: &str = "OK";

/// Scale applied to frequency, power and energy counters.
const COUNTER_SCALE: f64 = 10.0;

/// Turns complete messages into typed readings.
#[derive(Debug, Clone, Default)]
pub struct MessageDecoder {
    table: DeviceTable,
}

impl MessageDecoder {
    pub fn new(table: DeviceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DeviceTable {
        &self.table
    }

    /// Decode one message.
    ///
    /// Unregistered device ids are not an error: they come back as
    /// [`Decoded::UnknownDevice`] with the raw text.
    pub fn decode(&self, message: &Message) -> Result<Decoded, DecodeError> {
        let text = message.text();
        let tokens = Tokens::split(&text);
        tokens.require(HEADER_TOKENS)?;

        if tokens.get(0) != Some(OK_MARKER) {
            trace!(marker = ?tokens.get(0), "Message does not start with OK marker");
        }

        let payload_len = tokens.byte(1)?;
        let link_header = tokens.byte(2)?;
        let house_id = compose_le(&tokens.bytes::<2>(3)?) as u16;
        let device_id = compose_le(&tokens.bytes::<2>(5)?) as u16;

        debug!(device_id, house_id, payload_len, link_header, "Decoding message");

        let Some(kind) = self.table.lookup(device_id) else {
            return Ok(Decoded::UnknownDevice { device_id, raw: text.to_string() });
        };

        tokens.require(HEADER_TOKENS + kind.payload_tokens())?;

        let reading = match kind {
            DeviceKind::EnergyMeter => {
                decode_energy_meter(&tokens, device_id, house_id, message)?
            }
        };

        Ok(Decoded::Reading(reading))
    }
}

fn decode_energy_meter(
    tokens: &Tokens<'_>,
    device_id: u16,
    house_id: u16,
    message: &Message,
) -> Result<DecodedReading, DecodeError> {
    let mut at = HEADER_TOKENS;

    let sequence_number = compose_le(&tokens.bytes::<4>(at)?);
    at += 4;
    let frequency = compose_le(&tokens.bytes::<2>(at)?);
    at += 2;
    let power = compose_le(&tokens.bytes::<4>(at)?);
    at += 4;
    let energy = compose_le(&tokens.bytes::<4>(at)?);

    Ok(DecodedReading {
        device_kind: DeviceKind::EnergyMeter,
        device_id,
        house_id,
        sequence_number,
        frequency_hz: f64::from(frequency) / COUNTER_SCALE,
        total_power_w: f64::from(power) / COUNTER_SCALE,
        total_energy_kwh: f64::from(energy) / COUNTER_SCALE,
        timestamp: message.captured_at(),
    })
}
