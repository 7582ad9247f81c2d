//! Benchmarks for the IR codec hot paths
//!
//! Covers the three per-event operations: encode, decode, and a scan that
//! decodes while filtering.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use timber_ir::{
    deserialize_preamble, EpochTimeMs, Serializer, TimestampInfo, TimestampInterval, WildcardQuery,
};

const LINES: &[&str] = &[
    "INFO  connection 4821 opened from host-17 in 3.25 ms",
    "WARN  retry 3 of 5 for request id req_8842f1 backoff 250",
    "ERROR task 992 failed checksum deadbeef expected 1a2b3c4d",
    "DEBUG cache hit ratio 0.8731 over 100000 lookups",
];

fn info() -> TimestampInfo {
    TimestampInfo::new("yyyy-MM-dd HH:mm:ss,SSS", "java::SimpleDateFormat", "UTC")
}

fn sample_events(count: usize) -> Vec<(String, EpochTimeMs)> {
    (0..count)
        .map(|i| {
            let line = LINES[i % LINES.len()];
            (format!("{line} seq {i}"), 1_700_000_000_000 + i as EpochTimeMs)
        })
        .collect()
}

fn build_stream(events: &[(String, EpochTimeMs)]) -> Vec<u8> {
    let mut serializer = Serializer::eight_byte(info());
    let mut stream = serializer.serialize_preamble().unwrap().to_vec();
    for (message, timestamp) in events {
        stream.extend_from_slice(serializer.serialize_log_event(message, *timestamp).unwrap());
    }
    stream.extend_from_slice(serializer.serialize_end_of_stream());
    stream
}

fn bench_encode(c: &mut Criterion) {
    let events = sample_events(1_000);
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("serialize_1000_events", |b| {
        b.iter(|| {
            let mut serializer = Serializer::eight_byte(info());
            let mut total = serializer.serialize_preamble().unwrap().len();
            for (message, timestamp) in &events {
                total += serializer
                    .serialize_log_event(black_box(message), *timestamp)
                    .unwrap()
                    .len();
            }
            black_box(total)
        })
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let events = sample_events(1_000);
    let stream = build_stream(&events);
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("deserialize_1000_events", |b| {
        b.iter(|| {
            let (mut deserializer, _, mut pos) = deserialize_preamble(&stream).unwrap();
            for _ in 0..events.len() {
                let (event, consumed) = deserializer
                    .deserialize_log_event(black_box(&stream[pos..]))
                    .unwrap();
                black_box(event.timestamp);
                pos += consumed;
            }
        })
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let events = sample_events(1_000);
    let stream = build_stream(&events);
    let queries = vec![
        WildcardQuery::new("*checksum deadbeef*seq 998*", true),
        WildcardQuery::new("*no such line*", true),
    ];
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("scan_1000_events_late_match", |b| {
        b.iter(|| {
            let (mut deserializer, _, pos) = deserialize_preamble(&stream).unwrap();
            let (hit, _) = deserializer
                .scan(&stream[pos..], &TimestampInterval::all(), &queries)
                .unwrap();
            black_box(hit.map(|h| h.timestamp))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_scan);
criterion_main!(benches);
