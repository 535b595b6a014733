use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use fingerprint_frame::core::canonical::canonicalize_and_hash;
use fingerprint_frame::core::component::{ComponentSet, ComponentValue};
use fingerprint_frame::core::frame::{decode_bytes, encode_bytes};
use fingerprint_frame::core::murmur::murmur3_x64_128;
use fingerprint_frame::utils::random::RngSource;
use serde_json::json;

#[allow(clippy::unwrap_used)]
fn bench_frame_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode_decode");
    let payload_sizes = [64usize, 512, 4096, 65536];

    for &size in &payload_sizes {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            let mut rng = RngSource::seeded(1);
            b.iter_batched(
                || vec![b'a'; size],
                |payload| encode_bytes(&payload, &[3, 7], 3, 7, &mut rng).unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let frame = encode_bytes(&vec![b'a'; size], &[3, 7], 3, 7, &mut RngSource::seeded(1)).unwrap();
            b.iter(|| {
                let decoded = decode_bytes(&frame, &[3, 7], 7);
                assert!(decoded.is_ok());
            })
        });
    }

    group.finish();
}

fn bench_visitor_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("visitor_id");
    let set = ComponentSet::new()
        .with("timezone", "America/New_York")
        .with("colorDepth", 24)
        .with("languages", ComponentValue::from(json!([["en-US"], ["en"]])))
        .with("screenResolution", vec![1920, 1080])
        .with("audio", 124.04347527516074)
        .with("plugins", ComponentValue::from(json!([{"name": "PDF Viewer", "mimeTypes": [{"type": "application/pdf", "suffixes": "pdf"}]}])))
        .with_error("canvas")
        .with("cpuClass", ComponentValue::Absent);

    group.bench_function("canonicalize_and_hash", |b| {
        b.iter(|| canonicalize_and_hash(&set))
    });

    let data = vec![0x5Au8; 4096];
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("murmur3_4096b", |b| b.iter(|| murmur3_x64_128(&data, 0)));

    group.finish();
}

criterion_group!(benches, bench_frame_encode_decode, bench_visitor_id);
criterion_main!(benches);
