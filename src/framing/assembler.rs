//! Byte-stream to message reassembly

use chrono::{DateTime, Local};
use tracing::{trace, warn};

use crate::types::{Boundary, Message};

/// Byte that ends a message.
pub const TERMINATOR: u8 = b'E';

/// Byte that triggers a resync when it opens a chunk.
pub const SENTINEL: u8 = b'O';

/// Default accumulator cap, matching the gateway's 255-byte read buffer.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 255;

/// Reassembles messages from arbitrarily chunked serial input.
///
/// Two rules close a message:
///
/// 1. A chunk whose *first* byte is [`SENTINEL`] flushes whatever is pending (even nothing)
///    before that chunk is scanned. The sentinel itself is kept and starts the next message.
/// 2. Every [`TERMINATOR`] byte flushes the pending bytes. The terminator is dropped.
///
/// Rule 1 only looks at byte 0 of each chunk, so a sentinel that lands mid-chunk does
/// nothing. This looks like a framing bug in the gateway protocol but it is the observed
/// behavior and is kept as-is until the intended framing is confirmed.
///
/// ```rust
/// use chrono::Local;
/// use meterlink::FrameAssembler;
///
/// let mut assembler = FrameAssembler::new();
/// let now = Local::now();
///
/// assert_eq!(assembler.feed(b"OK 14 1", now).count(), 1); // resync flush of nothing
/// let messages: Vec<_> = assembler.feed(b" 1 0E", now).collect();
/// assert_eq!(messages[0].text(), "OK 14 1 1 0");
/// ```
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    max_len: Option<usize>,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Assembler with the default length cap.
    pub fn new() -> Self {
        Self::with_max_len(Some(DEFAULT_MAX_MESSAGE_LEN))
    }

    /// Assembler with an explicit cap. `None` lets the accumulator grow without bound.
    ///
    /// When the accumulator reaches the cap it is flushed as an [`Boundary::Overflow`]
    /// message; it will not decode, but it still reaches the raw log.
    pub fn with_max_len(max_len: Option<usize>) -> Self {
        let capacity = max_len.unwrap_or(DEFAULT_MAX_MESSAGE_LEN).min(4096);
        Self { buffer: Vec::with_capacity(capacity), max_len }
    }

    /// Feed one chunk and iterate the messages it completes.
    ///
    /// The iterator is lazy: bytes are consumed as it is advanced. Bytes of a chunk whose
    /// `Feed` is dropped early are never seen, so always drain it.
    pub fn feed<'a>(&'a mut self, chunk: &'a [u8], captured_at: DateTime<Local>) -> Feed<'a> {
        let resync = chunk.first() == Some(&SENTINEL);
        trace!(len = chunk.len(), pending = self.buffer.len(), resync, "Feeding chunk");
        Feed { assembler: self, chunk, position: 0, resync, captured_at }
    }

    /// Number of bytes waiting for a terminator.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial message.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    fn finalize(&mut self, boundary: Boundary, captured_at: DateTime<Local>) -> Message {
        let body = std::mem::take(&mut self.buffer);
        Message::new(body, boundary, captured_at)
    }

    fn is_full(&self) -> bool {
        self.max_len.is_some_and(|max| self.buffer.len() >= max)
    }
}

/// Lazy iterator over the messages completed by one chunk.
#[must_use = "a Feed consumes its chunk only as it is iterated"]
pub struct Feed<'a> {
    assembler: &'a mut FrameAssembler,
    chunk: &'a [u8],
    position: usize,
    resync: bool,
    captured_at: DateTime<Local>,
}

impl Iterator for Feed<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        if self.resync {
            self.resync = false;
            trace!(pending = self.assembler.pending_len(), "Sentinel opens chunk, resyncing");
            return Some(self.assembler.finalize(Boundary::Resync, self.captured_at));
        }

        while let Some(&byte) = self.chunk.get(self.position) {
            self.position += 1;

            if byte == TERMINATOR {
                return Some(self.assembler.finalize(Boundary::Terminator, self.captured_at));
            }

            self.assembler.buffer.push(byte);
            if self.assembler.is_full() {
                warn!(
                    len = self.assembler.pending_len(),
                    "Message exceeded length cap without terminator, flushing"
                );
                return Some(self.assembler.finalize(Boundary::Overflow, self.captured_at));
            }
        }

        None
    }
}
