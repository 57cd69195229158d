//! Byte source trait for gateway input

use crate::Result;

/// Supplier of raw byte chunks.
///
/// Chunk boundaries are arbitrary: a chunk may hold part of a message, several
/// messages, or nothing useful at all. Only arrival order is meaningful.
#[async_trait::async_trait]
pub trait ByteSource: Send + 'static {
    /// Wait for the next chunk.
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - New bytes arrived
    /// - `Ok(None)` - Source ended (end of file, device hangup)
    /// - `Err(e)` - Read failed; retryable errors are retried by the driver
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;

    /// Short description for logs, usually the path.
    fn describe(&self) -> String;
}
