//! Benchmarks for packet decoding and directory reads
//!
//! Fixtures are synthetic packets generated into a temporary directory, so the
//! benchmarks run anywhere without recorded station data.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use redvox_m::packet::redvox_packet_m::{StationInformation, TimingInformation};
use redvox_m::test_utils::{PacketDir, encode_packet};
use redvox_m::{ReadFilter, RedvoxPacketM, deserialize_bytes, read_unstructured};
use std::hint::black_box;

/// Roughly one 51.2s audio packet worth of opaque sensor bytes
const SENSOR_BYTES: usize = 800 * 1024;

fn synthetic_packet(station: usize, start_mach: f64) -> RedvoxPacketM {
    RedvoxPacketM {
        api: 1000.0,
        station_information: Some(StationInformation {
            id: format!("{:010}", station),
            ..Default::default()
        }),
        timing_information: Some(TimingInformation {
            packet_start_mach_timestamp: start_mach,
            ..Default::default()
        }),
        sensors: (0..SENSOR_BYTES).map(|i| (i % 97) as u8).collect(),
        ..Default::default()
    }
}

fn bench_deserialize_bytes(c: &mut Criterion) {
    let frame = encode_packet(&synthetic_packet(1, 1_609_459_200_000_000.0))
        .expect("Failed to encode packet");

    let mut group = c.benchmark_group("deserialize");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("bytes", |b| b.iter(|| deserialize_bytes(black_box(&frame))));
    group.finish();
}

fn bench_read_unstructured(c: &mut Criterion) {
    let dir = PacketDir::new().expect("Failed to create temp directory");
    for i in 0..64usize {
        let start_micros = 1_609_459_200_000_000u64 + (i as u64) * 51_200_000;
        let name = format!("{:02}/{:010}_{}.rdvxm", i % 8, i % 4, start_micros);
        dir.write_packet(&name, &synthetic_packet(i % 4, start_micros as f64))
            .expect("Failed to write fixture");
    }
    dir.write_raw("README.md", b"unrelated").expect("Failed to write README");

    let all = ReadFilter::default();
    let one_station = ReadFilter::default().with_device_ids([format!("{:010}", 2)]);

    let mut group = c.benchmark_group("read_unstructured");
    group.sample_size(20);
    group.bench_function("all_packets", |b| {
        b.iter(|| read_unstructured(black_box(dir.path()), black_box(&all)))
    });
    group.bench_function("one_station", |b| {
        b.iter(|| read_unstructured(black_box(dir.path()), black_box(&one_station)))
    });
    group.finish();
}

criterion_group!(benches, bench_deserialize_bytes, bench_read_unstructured);
criterion_main!(benches);
