//! Benchmarks for the per-chunk hot path
//!
//! Covers:
//! - Frame assembly over a long stream at serial-sized and byte-sized chunks
//! - Message decoding of a full energy-meter frame
//! - The whole pipeline into an in-memory sink

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use meterlink::test_utils::{RecordingSink, at, energy_meter_frame, energy_meter_message};
use meterlink::{FrameAssembler, MessageDecoder, Pipeline};
use std::hint::black_box;

/// A stream of `count` energy-meter frames with increasing sequence numbers.
fn stream(count: u32) -> Vec<u8> {
    (0..count).flat_map(|seq| energy_meter_frame(seq, 500, 12_345, 6_789)).collect()
}

fn bench_assembly(c: &mut Criterion) {
    let data = stream(1_000);
    let mut group = c.benchmark_group("frame_assembly");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [1usize, 16, 255] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &size| {
            let captured_at = at();
            b.iter(|| {
                let mut assembler = FrameAssembler::new();
                let mut messages = 0usize;
                for chunk in data.chunks(size) {
                    messages += assembler.feed(black_box(chunk), captured_at).count();
                }
                black_box(messages)
            })
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let decoder = MessageDecoder::default();
    let message = energy_meter_message(42, 500, 12_345, 6_789);

    c.bench_function("decode_energy_meter", |b| {
        b.iter(|| black_box(decoder.decode(black_box(&message))))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let data = stream(1_000);
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("process_chunks_255", |b| {
        let captured_at = at();
        b.iter(|| {
            let mut pipeline = Pipeline::with_sink(RecordingSink::default());
            for chunk in data.chunks(255) {
                pipeline.process_chunk(chunk, captured_at).expect("recording sink never fails");
            }
            black_box(pipeline.stats())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_assembly, bench_decode, bench_pipeline);
criterion_main!(benches);
