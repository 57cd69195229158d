//! Finalized wire messages

use std::borrow::Cow;

use chrono::{DateTime, Local};

/// `asctime(3)`-style timestamp layout used in every log record.
pub const CAPTURE_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Format a capture timestamp the way the log files expect it.
pub fn format_capture_time(at: &DateTime<Local>) -> String {
    at.format(CAPTURE_TIME_FORMAT).to_string()
}

/// What closed a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The terminator byte was seen.
    Terminator,
    /// A chunk started with the sentinel byte and flushed the pending bytes.
    Resync,
    /// The accumulator hit its length cap.
    Overflow,
}

/// One complete message handed from the assembler to the decoder.
///
/// The body never contains the terminator byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    body: Vec<u8>,
    boundary: Boundary,
    captured_at: DateTime<Local>,
}

impl Message {
    /// Create a message from raw body bytes.
    pub fn new(body: Vec<u8>, boundary: Boundary, captured_at: DateTime<Local>) -> Self {
        Self { body, boundary, captured_at }
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text. Non-UTF-8 bytes are replaced, which is harmless since the protocol is ASCII.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Capture time of the chunk that completed this message.
    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}
