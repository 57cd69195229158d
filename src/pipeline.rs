//! Chunk-to-report processing for one byte stream

use chrono::{DateTime, Local};
use tracing::{debug, trace, warn};

use crate::decoder::MessageDecoder;
use crate::filter::SequenceFilter;
use crate::framing::FrameAssembler;
use crate::sink::{Outcome, Sink};
use crate::types::{Boundary, Decoded, Message};
use crate::Result;

/// Per-outcome message counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Messages completed by the assembler (all boundaries).
    pub messages: u64,
    /// Readings accepted by the sequence filter and reported.
    pub readings: u64,
    /// Readings dropped as retransmissions.
    pub duplicates: u64,
    pub unknown_devices: u64,
    pub decode_failures: u64,
    /// Messages flushed by the length cap.
    pub overflows: u64,
}

/// Owns the assembler, decoder, filter and sink for one stream.
///
/// For every completed message the sink sees the raw text first, then the outcome.
pub struct Pipeline<S: Sink> {
    assembler: FrameAssembler,
    decoder: MessageDecoder,
    filter: SequenceFilter,
    sink: S,
    stats: PipelineStats,
}

impl<S: Sink> Pipeline<S> {
    pub fn new(assembler: FrameAssembler, decoder: MessageDecoder, sink: S) -> Self {
        Self { assembler, decoder, filter: SequenceFilter::new(), sink, stats: PipelineStats::default() }
    }

    /// Pipeline with default assembler cap and device table.
    pub fn with_sink(sink: S) -> Self {
        Self::new(FrameAssembler::new(), MessageDecoder::default(), sink)
    }

    /// Feed one chunk and handle every message it completes.
    ///
    /// Decode problems are reported through the sink and never returned; only sink
    /// failures produce an error.
    pub fn process_chunk(&mut self, chunk: &[u8], captured_at: DateTime<Local>) -> Result<usize> {
        let mut completed = 0;
        // The assembler borrow must end before handling, so collect this chunk's messages.
        let messages: Vec<Message> = self.assembler.feed(chunk, captured_at).collect();
        for message in messages {
            self.handle(&message)?;
            completed += 1;
        }
        Ok(completed)
    }

    /// Handle one completed message.
    pub fn handle(&mut self, message: &Message) -> Result<()> {
        self.stats.messages += 1;
        if message.boundary() == Boundary::Overflow {
            self.stats.overflows += 1;
        }

        self.sink.record_raw(message)?;

        let outcome = match self.decoder.decode(message) {
            Ok(Decoded::Reading(reading)) => {
                if !self.filter.accept(reading.device_id, reading.sequence_number) {
                    trace!(
                        device_id = reading.device_id,
                        seq = reading.sequence_number,
                        "Dropping retransmitted reading"
                    );
                    self.stats.duplicates += 1;
                    return Ok(());
                }
                debug!(
                    device_id = reading.device_id,
                    kind = %reading.device_kind,
                    seq = reading.sequence_number,
                    "Accepted reading"
                );
                self.stats.readings += 1;
                Outcome::Reading(reading)
            }
            Ok(Decoded::UnknownDevice { device_id, raw }) => {
                debug!(device_id, "No handler for device");
                self.stats.unknown_devices += 1;
                Outcome::UnknownDevice { device_id, raw }
            }
            Err(error) => {
                warn!(boundary = ?message.boundary(), "Failed to decode message: {}", error);
                self.stats.decode_failures += 1;
                Outcome::Failed { raw: message.text().into_owned(), error }
            }
        };

        self.sink.report(&outcome)
    }

    /// Bytes of the partial message currently held by the assembler.
    pub fn pending_len(&self) -> usize {
        self.assembler.pending_len()
    }

    /// Drop the partial message without reporting it. Returns how many bytes were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let pending = self.assembler.pending_len();
        self.assembler.reset();
        pending
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn filter(&self) -> &SequenceFilter {
        &self.filter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
