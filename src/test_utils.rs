//! Test utilities: message builders, scripted sources and a recording sink
//!
//! Shared by unit tests, the integration tests and the benchmarks.

#![cfg(any(test, feature = "benchmark"))]

use std::collections::VecDeque;

use chrono::{DateTime, Local, TimeZone};

use crate::sink::{Outcome, Sink};
use crate::source::ByteSource;
use crate::types::{Boundary, DecodedReading, DeviceKind, Message};
use crate::{GatewayError, Result};

/// Fixed capture time used across tests: Mon Oct 19 12:00:00 2026, local time.
pub fn at() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("fixture time is unambiguous")
}

/// Terminated message with the given body text.
pub fn message(text: &str) -> Message {
    message_with_boundary(text, Boundary::Terminator)
}

pub fn message_with_boundary(text: &str, boundary: Boundary) -> Message {
    Message::new(text.as_bytes().to_vec(), boundary, at())
}

/// Body text of an energy-meter message from house 1, device 1.
pub fn energy_meter_text(sequence: u32, frequency: u16, power: u32, energy: u32) -> String {
    let mut tokens = vec!["OK".to_string(), "14".into(), "1".into()];
    tokens.extend(["1", "0", "1", "0"].map(String::from));
    let payload = sequence
        .to_le_bytes()
        .into_iter()
        .chain(frequency.to_le_bytes())
        .chain(power.to_le_bytes())
        .chain(energy.to_le_bytes());
    tokens.extend(payload.map(|b| b.to_string()));
    tokens.join(" ")
}

/// Wire bytes of an energy-meter message, terminator included.
pub fn energy_meter_frame(sequence: u32, frequency: u16, power: u32, energy: u32) -> Vec<u8> {
    let mut frame = energy_meter_text(sequence, frequency, power, energy).into_bytes();
    frame.push(crate::framing::TERMINATOR);
    frame
}

pub fn energy_meter_message(sequence: u32, frequency: u16, power: u32, energy: u32) -> Message {
    message(&energy_meter_text(sequence, frequency, power, energy))
}

/// A plausible reading: 50 Hz, 1234.5 W, 678.9 kWh.
pub fn sample_reading(sequence_number: u32) -> DecodedReading {
    DecodedReading {
        device_kind: DeviceKind::EnergyMeter,
        device_id: 1,
        house_id: 1,
        sequence_number,
        frequency_hz: 50.0,
        total_power_w: 1234.5,
        total_energy_kwh: 678.9,
        timestamp: at(),
    }
}

/// Byte source that replays a fixed script of chunks and errors.
pub struct ScriptedSource {
    script: VecDeque<Result<Vec<u8>>>,
    hang_when_empty: bool,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<u8>>>) -> Self {
        Self { script: script.into(), hang_when_empty: false }
    }

    /// Never end: once the script runs out, wait forever like an idle serial line.
    pub fn hang_when_empty(mut self) -> Self {
        self.hang_when_empty = true;
        self
    }
}

#[async_trait::async_trait]
impl ByteSource for ScriptedSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.script.pop_front() {
            Some(step) => step.map(Some),
            None if self.hang_when_empty => std::future::pending().await,
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        "<script>".to_string()
    }
}

/// One call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Raw(String),
    Report(Outcome),
}

/// Sink that keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    fail: bool,
}

impl RecordingSink {
    /// Sink whose every call fails.
    pub fn failing() -> Self {
        Self { events: Vec::new(), fail: true }
    }

    pub fn raw_texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Raw(text) => Some(text.clone()),
                SinkEvent::Report(_) => None,
            })
            .collect()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Report(outcome) => Some(outcome.clone()),
                SinkEvent::Raw(_) => None,
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(GatewayError::sink_failed(
                "recording sink",
                std::io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }
}

impl Sink for RecordingSink {
    fn record_raw(&mut self, message: &Message) -> Result<()> {
        self.check()?;
        self.events.push(SinkEvent::Raw(message.text().into_owned()));
        Ok(())
    }

    fn report(&mut self, outcome: &Outcome) -> Result<()> {
        self.check()?;
        self.events.push(SinkEvent::Report(outcome.clone()));
        Ok(())
    }
}
