//! Human-readable reports and the energy log

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Outcome;
use super::raw_log::open_append;
use crate::types::{DecodedReading, format_capture_time};
use crate::{GatewayError, Result};

/// One report line for an outcome, without trailing newline.
pub fn format_report(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Reading(r) => format!(
            "seq nr {}; frequency: {:.1} Hz; power: {:.1} W; energy: {:.1} kWh @ {}",
            r.sequence_number,
            r.frequency_hz,
            r.total_power_w,
            r.total_energy_kwh,
            format_capture_time(&r.timestamp)
        ),
        Outcome::UnknownDevice { raw, .. } => format!("Unknown message {}", raw),
        Outcome::Failed { raw, error } => {
            format!("Undecodable message ({}): {}: {}", error.kind(), raw, error)
        }
    }
}

/// One energy log record: `<seq>;<freq>;<power>;<energy> @ <timestamp>\n`.
pub fn format_energy_record(reading: &DecodedReading) -> String {
    format!(
        "{};{:.1};{:.1};{:.1} @ {}\n",
        reading.sequence_number,
        reading.frequency_hz,
        reading.total_power_w,
        reading.total_energy_kwh,
        format_capture_time(&reading.timestamp)
    )
}

/// Flat append-only file of accepted energy-meter readings.
#[derive(Debug)]
pub struct EnergyLog {
    path: PathBuf,
    file: File,
}

impl EnergyLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        info!("Appending energy readings to {}", path.display());
        Ok(Self { path, file })
    }

    pub fn append(&mut self, reading: &DecodedReading) -> Result<()> {
        let record = format_energy_record(reading);
        self.file.write_all(record.as_bytes()).and_then(|()| self.file.flush()).map_err(|e| {
            GatewayError::sink_failed(format!("energy log {}", self.path.display()), e)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
