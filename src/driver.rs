//! Driver runs the read/process loop for one byte source

use std::time::Duration;

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::Result;
use crate::pipeline::{Pipeline, PipelineStats};
use crate::sink::Sink;
use crate::source::ByteSource;

/// Consecutive retryable read failures tolerated before giving up.
pub const MAX_READ_ERRORS: u32 = 10;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// The cancellation token fired.
    Cancelled,
    /// The source reported end of stream.
    SourceExhausted,
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub end: RunEnd,
    pub chunks: u64,
    pub bytes: u64,
    pub stats: PipelineStats,
    /// Bytes of the unfinished message thrown away at shutdown.
    pub discarded_partial: usize,
}

/// Runs a byte source through a pipeline until cancelled or exhausted.
///
/// The loop is single-task: one read in flight, processing happens inline between
/// reads. Cancellation is checked once per iteration and raced against the pending
/// read, so a silent line never blocks shutdown.
pub struct Driver;

impl Driver {
    pub async fn run<B, S>(
        mut source: B,
        pipeline: &mut Pipeline<S>,
        cancel: &CancellationToken,
    ) -> Result<RunSummary>
    where
        B: ByteSource,
        S: Sink,
    {
        info!("Reading from {}", source.describe());
        let mut chunks = 0u64;
        let mut bytes = 0u64;
        let mut error_count = 0u32;

        let end = loop {
            if cancel.is_cancelled() {
                info!("Driver cancelled");
                break RunEnd::Cancelled;
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Driver cancelled during read");
                    break RunEnd::Cancelled;
                }
                result = source.next_chunk() => result,
            };

            match result {
                Ok(Some(chunk)) => {
                    error_count = 0;
                    chunks += 1;
                    bytes += chunk.len() as u64;

                    let completed = pipeline.process_chunk(&chunk, Local::now())?;
                    trace!(
                        "Chunk {}: {} bytes, {} messages, {} pending",
                        chunks,
                        chunk.len(),
                        completed,
                        pipeline.pending_len()
                    );
                }
                Ok(None) => {
                    info!("Source ended after {} chunks", chunks);
                    break RunEnd::SourceExhausted;
                }
                Err(e) if e.is_retryable() => {
                    error_count += 1;
                    error!("Read error ({}/{}): {}", error_count, MAX_READ_ERRORS, e);

                    if error_count >= MAX_READ_ERRORS {
                        error!("Too many read errors, shutting down");
                        return Err(e);
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Driver cancelled during backoff");
                            break RunEnd::Cancelled;
                        }
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
                Err(e) => {
                    error!("Fatal read error: {}", e);
                    return Err(e);
                }
            }
        };

        let discarded_partial = pipeline.discard_pending();
        if discarded_partial > 0 {
            debug!("Discarding {} bytes of unfinished message", discarded_partial);
        }

        Ok(RunSummary { end, chunks, bytes, stats: pipeline.stats(), discarded_partial })
    }
}
