//! Meterlink CLI
//!
//! Ingest a serial gateway stream into flat log files.
//!
//! # Usage
//!
//! ```bash
//! # Listen on a serial port (configure it first: stty -F /dev/ttyUSB0 57600 raw -echo)
//! meterlink /dev/ttyUSB0
//!
//! # Also keep a log of accepted readings
//! meterlink /dev/ttyUSB0 --energy-log data_energy.dat
//!
//! # Re-run a captured byte dump
//! meterlink --replay capture.bin --raw-log /tmp/raw.dat
//!
//! # Take settings from a file
//! meterlink --config meterlink.yaml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use meterlink::{
    Driver, FileSink, FrameAssembler, GatewayConfig, MessageDecoder, Pipeline, ReplaySource,
    RunSummary, SerialSource,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "meterlink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ingest RF power-meter telemetry from a serial gateway")]
#[command(long_about = None)]
struct Cli {
    /// Serial device path (e.g. /dev/ttyUSB0), or a capture file with --replay
    device: Option<PathBuf>,

    /// YAML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw message log file
    #[arg(long)]
    raw_log: Option<PathBuf>,

    /// Accepted readings log file
    #[arg(long)]
    energy_log: Option<PathBuf>,

    /// Maximum bytes per read
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Flush a message after this many bytes without a terminator (0 = unbounded)
    #[arg(long)]
    max_message_len: Option<usize>,

    /// Treat DEVICE as a captured byte dump and stop at its end
    #[arg(long)]
    replay: bool,

    /// Verbose mode (per-message debug logs)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the reading reports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose { EnvFilter::new("meterlink=debug") } else { EnvFilter::new("meterlink=info") }
    });
    fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();

    let config = build_config(&cli)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let result = runtime.block_on(run(config, cli.replay));

    // A tty read parked on the blocking pool cannot be interrupted; don't wait on it.
    runtime.shutdown_timeout(Duration::from_millis(100));

    let summary = result?;
    info!(
        end = ?summary.end,
        chunks = summary.chunks,
        bytes = summary.bytes,
        messages = summary.stats.messages,
        readings = summary.stats.readings,
        duplicates = summary.stats.duplicates,
        unknown = summary.stats.unknown_devices,
        failures = summary.stats.decode_failures,
        discarded = summary.discarded_partial,
        "Shutdown complete"
    );

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GatewayConfig> {
    let mut config = match &cli.config {
        Some(path) => GatewayConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GatewayConfig::default(),
    };

    if let Some(device) = &cli.device {
        config.device = Some(device.clone());
    }
    if let Some(raw_log) = &cli.raw_log {
        config.raw_log = raw_log.clone();
    }
    if let Some(energy_log) = &cli.energy_log {
        config.energy_log = Some(energy_log.clone());
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(max) = cli.max_message_len {
        config.max_message_len = if max == 0 { None } else { Some(max) };
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run(config: GatewayConfig, replay: bool) -> Result<RunSummary> {
    let Some(device) = config.device.clone() else {
        bail!("no serial device given");
    };

    let sink = FileSink::open(&config.raw_log, config.energy_log.as_deref())
        .context("Failed to open log files")?;
    let assembler = FrameAssembler::with_max_len(config.max_message_len);
    let decoder = MessageDecoder::new(config.device_table());
    let mut pipeline = Pipeline::new(assembler, decoder, sink);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping");
            trigger.cancel();
        }
    });

    let summary = if replay {
        let source = ReplaySource::open(&device, config.chunk_size)
            .await
            .context("Failed to open capture")?;
        Driver::run(source, &mut pipeline, &cancel).await
    } else {
        let source = SerialSource::open(&device, config.chunk_size)
            .await
            .with_context(|| format!("Failed to open {}", device.display()))?;
        Driver::run(source, &mut pipeline, &cancel).await
    };

    summary.context("Gateway loop failed")
}
