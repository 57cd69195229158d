//! Output side of the pipeline.
//!
//! A [`Sink`] receives every completed message twice: once raw, before any decode
//! attempt, and once as an [`Outcome`] after decoding and deduplication. The raw call
//! always comes first; it is the audit trail of record.

mod raw_log;
mod report;

pub use raw_log::{RawLog, format_raw_record};
pub use report::{EnergyLog, format_energy_record, format_report};

use std::io::{self, Write};
use std::path::Path;

use crate::error::DecodeError;
use crate::types::{DecodedReading, Message};
use crate::{GatewayError, Result};

/// What became of one message after decoding.
///
/// Duplicate readings never become an `Outcome`; they are dropped silently.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new reading passed the sequence filter.
    Reading(DecodedReading),
    /// No handler for this device id.
    UnknownDevice { device_id: u16, raw: String },
    /// The message could not be decoded.
    Failed { raw: String, error: DecodeError },
}

/// Destination for raw messages and decoded outcomes.
pub trait Sink {
    /// Persist a completed message verbatim. Called before decoding.
    fn record_raw(&mut self, message: &Message) -> Result<()>;

    /// Report the result of decoding a message.
    fn report(&mut self, outcome: &Outcome) -> Result<()>;
}

/// Raw log file, optional energy log file, and a report stream (stdout by default).
pub struct FileSink<W: Write = io::Stdout> {
    raw: RawLog,
    energy: Option<EnergyLog>,
    out: W,
}

impl FileSink<io::Stdout> {
    /// Open the log files and report to stdout.
    pub fn open(raw_log: &Path, energy_log: Option<&Path>) -> Result<Self> {
        Self::with_output(raw_log, energy_log, io::stdout())
    }
}

impl<W: Write> FileSink<W> {
    /// Open the log files and report to `out`.
    pub fn with_output(raw_log: &Path, energy_log: Option<&Path>, out: W) -> Result<Self> {
        let raw = RawLog::open(raw_log)?;
        let energy = energy_log.map(EnergyLog::open).transpose()?;
        Ok(Self { raw, energy, out })
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for FileSink<W> {
    fn record_raw(&mut self, message: &Message) -> Result<()> {
        self.raw.append(message)
    }

    fn report(&mut self, outcome: &Outcome) -> Result<()> {
        if let (Outcome::Reading(reading), Some(energy)) = (outcome, self.energy.as_mut()) {
            energy.append(reading)?;
        }

        writeln!(self.out, "{}", format_report(outcome))
            .and_then(|()| self.out.flush())
            .map_err(|e| GatewayError::sink_failed("report output", e))
    }
}
