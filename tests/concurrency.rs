//! Concurrency tests: shared codec, shared client and shared metrics under load

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fingerprint_frame::config::CodecConfig;
use fingerprint_frame::core::frame::FrameCodec;
use fingerprint_frame::service::{AttestationClient, Exchange};
use fingerprint_frame::transport::{MemoryTransport, TransportResponse};
use fingerprint_frame::utils::metrics::Metrics;
use fingerprint_frame::utils::random::RngSource;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_encode_decode_heavy() {
    let iterations = 2_000usize;
    let codec = Arc::new(FrameCodec::default());

    let mut tasks = JoinSet::new();
    for worker in 0..8u64 {
        let codec = codec.clone();
        tasks.spawn(async move {
            let mut rng = RngSource::seeded(worker);
            for i in 0..iterations {
                let payload = json!({"worker": worker, "i": i, "pad": "x".repeat(i % 97)});
                let frame = codec.encode(&payload, &mut rng).unwrap();
                let decoded: Value = codec.decode(&frame).unwrap();
                assert_eq!(decoded, payload);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_share_client() {
    let transport = MemoryTransport::new(|req| Ok(TransportResponse::new(200, req.body)));
    let metrics = Arc::new(Metrics::new());
    let client = Arc::new(
        AttestationClient::new(&CodecConfig::default(), transport)
            .unwrap()
            .with_metrics(metrics.clone()),
    );

    let mut tasks = JoinSet::new();
    for task in 0..16u64 {
        let client = client.clone();
        tasks.spawn(async move {
            for i in 0..50u64 {
                let payload = json!([task, i]);
                let exchange: Exchange<Value> = client.submit(&payload).await.unwrap();
                assert_eq!(exchange.payload, payload);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.frames_encoded, 800);
    assert_eq!(snapshot.frames_decoded, 800);
    assert_eq!(snapshot.bytes_sent, snapshot.bytes_received);
    assert_eq!(client.transport().request_count(), 800);
}
