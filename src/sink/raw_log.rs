//! Append-only raw message log

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::types::{Message, format_capture_time};
use crate::{GatewayError, Result};

/// Open `path` for appending, creating it if needed.
pub(crate) fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| GatewayError::file_error(path, e))
}

/// Format one raw log record: `<body> @ <timestamp>\n`.
///
/// The body bytes are copied as received, including any that are not valid UTF-8.
pub fn format_raw_record(message: &Message) -> Vec<u8> {
    let suffix = format!(" @ {}\n", format_capture_time(&message.captured_at()));
    let mut record = Vec::with_capacity(message.len() + suffix.len());
    record.extend_from_slice(message.body());
    record.extend_from_slice(suffix.as_bytes());
    record
}

/// The audit trail of record: every completed message, verbatim, before decoding.
#[derive(Debug)]
pub struct RawLog {
    path: PathBuf,
    file: File,
}

impl RawLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        info!("Appending raw messages to {}", path.display());
        Ok(Self { path, file })
    }

    /// Append and flush one record.
    pub fn append(&mut self, message: &Message) -> Result<()> {
        let record = format_raw_record(message);
        self.file
            .write_all(&record)
            .and_then(|()| self.file.flush())
            .map_err(|e| GatewayError::sink_failed(format!("raw log {}", self.path.display()), e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, message};
    use crate::types::Boundary;

    #[test]
    fn record_layout() {
        let msg = message("OK 14 1 1 0 2 0");
        assert_eq!(format_raw_record(&msg), b"OK 14 1 1 0 2 0 @ Mon Oct 19 12:00:00 2026\n");
    }

    #[test]
    fn non_utf8_bytes_are_written_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data_raw.dat");
        let body = vec![b'O', b'K', b' ', 0xFF, 0x80, b'1'];

        let mut log = RawLog::open(&path).expect("open raw log");
        log.append(&Message::new(body.clone(), Boundary::Terminator, at())).expect("append");

        let mut expected = body;
        expected.extend_from_slice(b" @ Mon Oct 19 12:00:00 2026\n");
        assert_eq!(std::fs::read(&path).expect("read back"), expected);
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data_raw.dat");
        std::fs::write(&path, "earlier\n").expect("seed file");

        let mut log = RawLog::open(&path).expect("open raw log");
        log.append(&message("a")).expect("append");
        log.append(&message("")).expect("append empty");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(
            contents,
            "earlier\na @ Mon Oct 19 12:00:00 2026\n @ Mon Oct 19 12:00:00 2026\n"
        );
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = RawLog::open(dir.path().join("missing").join("raw.dat")).unwrap_err();
        assert!(matches!(err, GatewayError::File { .. }));
    }
}
