//! End-to-end runs: replayed bytes through the pipeline into real log files.

use meterlink::{
    Driver, FileSink, FrameAssembler, GatewayConfig, MessageDecoder, Pipeline, ReplaySource,
    RunEnd,
};
use tokio_util::sync::CancellationToken;

/// Gateway wire text for an energy meter in house 1, device `device_id`, terminator included.
fn energy_frame(device_id: u8, sequence: u32, frequency: u16, power: u32, energy: u32) -> Vec<u8> {
    let header = ["OK".to_string(), "14".into(), "1".into(), "1".into(), "0".into()];
    let payload = sequence
        .to_le_bytes()
        .into_iter()
        .chain(frequency.to_le_bytes())
        .chain(power.to_le_bytes())
        .chain(energy.to_le_bytes());
    let tokens: Vec<String> = header
        .into_iter()
        .chain([device_id.to_string(), "0".into()])
        .chain(payload.map(|b| b.to_string()))
        .collect();
    let mut frame = tokens.join(" ").into_bytes();
    frame.push(b'E');
    frame
}

fn session_bytes() -> Vec<u8> {
    let mut stream = energy_frame(1, 1, 500, 12345, 6789);
    stream.extend(energy_frame(1, 1, 500, 12345, 6789));
    stream.extend(energy_frame(1, 2, 501, 12400, 6790));
    stream.extend_from_slice(b"OK 3 1 1 0 2 0 7E");
    stream.extend_from_slice(b"OK 14 1");
    stream
}

#[tokio::test]
async fn replayed_session_lands_in_all_logs() {
    let _ = tracing_subscriber::fmt::try_init();

    let dir = tempfile::tempdir().expect("tempdir");
    let raw_path = dir.path().join("data_raw.dat");
    let energy_path = dir.path().join("data_energy.dat");

    let sink = FileSink::with_output(&raw_path, Some(&energy_path), Vec::new()).expect("sink");
    let mut pipeline = Pipeline::with_sink(sink);
    let source = ReplaySource::from_bytes(session_bytes(), 4096);

    let summary = Driver::run(source, &mut pipeline, &CancellationToken::new())
        .await
        .expect("run");

    assert_eq!(summary.end, RunEnd::SourceExhausted);
    assert_eq!(summary.chunks, 1);
    // The chunk opens with the sentinel, which flushes an empty message first.
    assert_eq!(summary.stats.messages, 5);
    assert_eq!(summary.stats.readings, 2);
    assert_eq!(summary.stats.duplicates, 1);
    assert_eq!(summary.stats.unknown_devices, 1);
    assert_eq!(summary.stats.decode_failures, 1);
    assert_eq!(summary.discarded_partial, "OK 14 1".len());

    let raw = std::fs::read_to_string(&raw_path).expect("raw log");
    let raw_lines: Vec<_> = raw.lines().collect();
    assert_eq!(raw_lines.len(), 5);
    assert!(raw_lines[1].starts_with("OK 14 1 1 0 1 0 1 0 0 0 244 1 "));
    assert_eq!(raw_lines[1].split(" @ ").next(), raw_lines[2].split(" @ ").next());
    assert!(raw_lines[4].starts_with("OK 3 1 1 0 2 0 7 @ "));

    let energy = std::fs::read_to_string(&energy_path).expect("energy log");
    let energy_lines: Vec<_> = energy.lines().collect();
    assert_eq!(energy_lines.len(), 2);
    assert!(energy_lines[0].starts_with("1;50.0;1234.5;678.9 @ "));
    assert!(energy_lines[1].starts_with("2;50.1;1240.0;679.0 @ "));

    let out = String::from_utf8(pipeline.into_sink().into_output()).expect("utf8 report");
    let reports: Vec<_> = out.lines().collect();
    assert_eq!(reports.len(), 4);
    assert!(reports[0].starts_with("Undecodable message (truncated)"));
    assert!(reports[1].starts_with("seq nr 1; frequency: 50.0 Hz; power: 1234.5 W; energy: 678.9 kWh @ "));
    assert!(reports[2].starts_with("seq nr 2; "));
    assert_eq!(reports[3], "Unknown message OK 3 1 1 0 2 0 7");
}

#[tokio::test]
async fn capture_file_replay_appends_to_existing_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let capture = dir.path().join("capture.bin");
    let raw_path = dir.path().join("raw.dat");
    std::fs::write(&capture, energy_frame(1, 9, 500, 10, 20)).expect("write capture");
    std::fs::write(&raw_path, "previous run @ Sun Oct 18 23:59:59 2026\n").expect("seed log");

    let sink = FileSink::with_output(&raw_path, None, Vec::new()).expect("sink");
    let mut pipeline = Pipeline::with_sink(sink);
    let source = ReplaySource::open(&capture, 255).await.expect("open capture");

    let summary = Driver::run(source, &mut pipeline, &CancellationToken::new())
        .await
        .expect("run");
    assert_eq!(summary.stats.readings, 1);

    let raw = std::fs::read_to_string(&raw_path).expect("raw log");
    let lines: Vec<_> = raw.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "previous run @ Sun Oct 18 23:59:59 2026");
}

#[tokio::test]
async fn configured_device_table_drives_dispatch() {
    let config = GatewayConfig::from_yaml(
        "device: capture.bin\n\
         max_message_len: 64\n\
         devices:\n  9: energy_meter\n",
    )
    .expect("config");
    config.validate().expect("valid");

    let dir = tempfile::tempdir().expect("tempdir");
    let sink = FileSink::with_output(&dir.path().join("raw.dat"), None, Vec::new()).expect("sink");
    let mut pipeline = Pipeline::new(
        FrameAssembler::with_max_len(config.max_message_len),
        MessageDecoder::new(config.device_table()),
        sink,
    );

    let mut stream = energy_frame(1, 1, 500, 10, 20);
    stream.extend(energy_frame(9, 1, 500, 10, 20));
    let source = ReplaySource::from_bytes(stream, config.chunk_size);

    let summary = Driver::run(source, &mut pipeline, &CancellationToken::new())
        .await
        .expect("run");

    assert_eq!(summary.stats.unknown_devices, 1);
    assert_eq!(summary.stats.readings, 1);
    assert_eq!(pipeline.filter().last_seen(9), Some(1));
    assert_eq!(pipeline.filter().last_seen(1), None);
}

#[tokio::test]
async fn missing_capture_is_a_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ReplaySource::open(dir.path().join("absent.bin"), 255)
        .await
        .err()
        .expect("missing file must fail");
    assert!(matches!(err, meterlink::GatewayError::File { .. }));
}
