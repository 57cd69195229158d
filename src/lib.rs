//! Serial gateway ingestion for RF power-meter telemetry.
//!
//! A radio gateway on a serial port prints one text message per received packet.
//! Meterlink reassembles those messages from the raw byte stream, decodes the
//! positional token protocol into typed readings, drops retransmitted samples and
//! appends everything to flat log files.
//!
//! # Pipeline
//!
//! ```text
//! ByteSource -> FrameAssembler -> MessageDecoder -> SequenceFilter -> Sink
//! ```
//!
//! - [`ByteSource`]: serial device ([`SerialSource`]) or captured dump ([`ReplaySource`])
//! - [`FrameAssembler`]: sentinel/terminator framing over arbitrary chunk boundaries
//! - [`MessageDecoder`]: header parse and per-device payload dispatch
//! - [`SequenceFilter`]: per-device deduplication of retransmissions
//! - [`Sink`]: raw log first, then the decoded outcome ([`FileSink`])
//!
//! [`Pipeline`] wires these together and [`Driver`] runs the read loop under a
//! cancellation token.
//!
//! # Example
//!
//! ```rust,no_run
//! use meterlink::{Driver, FileSink, Pipeline, ReplaySource};
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> meterlink::Result<()> {
//!     let source = ReplaySource::open("capture.bin", 255).await?;
//!     let sink = FileSink::open(Path::new("data_raw.dat"), None)?;
//!     let mut pipeline = Pipeline::with_sink(sink);
//!
//!     let summary = Driver::run(source, &mut pipeline, &CancellationToken::new()).await?;
//!     println!("{} readings", summary.stats.readings);
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Decoding core
pub mod decoder;
pub mod filter;
pub mod framing;

// I/O boundary
pub mod config;
pub mod sink;
pub mod source;
pub mod sources;

// Processing loop
pub mod driver;
pub mod pipeline;

pub use error::*;
pub use types::*;

pub use config::GatewayConfig;
pub use decoder::{DeviceTable, MessageDecoder};
pub use driver::{Driver, RunEnd, RunSummary};
pub use filter::SequenceFilter;
pub use framing::FrameAssembler;
pub use pipeline::{Pipeline, PipelineStats};
pub use sink::{FileSink, Outcome, Sink};
pub use source::ByteSource;
pub use sources::{ReplaySource, SerialSource};
