//! Integration tests for frame exchange over the in-memory transport

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fingerprint_frame::config::CodecConfig;
use fingerprint_frame::core::frame::FrameCodec;
use fingerprint_frame::error::FingerprintError;
use fingerprint_frame::service::{AttestationClient, Exchange};
use fingerprint_frame::transport::{MemoryTransport, TransportResponse};
use fingerprint_frame::utils::random::{ConstantSource, RngSource};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq)]
struct ServerReply {
    #[serde(rename = "requestId")]
    request_id: String,
    #[serde(default)]
    error: Option<String>,
}

/// Endpoint stub that decodes the request and answers with a framed reply.
fn verifier(status: u16, reply: Value) -> MemoryTransport {
    let codec = FrameCodec::default();
    MemoryTransport::new(move |req| {
        let _request: Value = codec.decode(&req.body)?;
        let body = codec.encode(&reply, &mut RngSource::seeded(99))?;
        Ok(TransportResponse::new(status, body))
    })
}

#[tokio::test]
async fn test_success_reply_decoded() {
    let transport = verifier(200, json!({"requestId": "1708102555327.NLOjmg"}));
    let client = AttestationClient::new(&CodecConfig::default(), transport).unwrap();

    let exchange: Exchange<ServerReply> = client.submit(&json!({"c": "fixture"})).await.unwrap();
    assert!(exchange.is_success());
    assert_eq!(exchange.payload.request_id, "1708102555327.NLOjmg");
    assert_eq!(exchange.payload.error, None);
}

#[tokio::test]
async fn test_error_status_body_still_decoded() {
    let transport = verifier(
        403,
        json!({"requestId": "r-1", "error": "Forbidden (Origin Not Allowed)"}),
    );
    let client = AttestationClient::new(&CodecConfig::default(), transport).unwrap();

    let exchange: Exchange<ServerReply> = client.submit(&json!({})).await.unwrap();
    assert_eq!(exchange.status, 403);
    assert!(!exchange.is_success());
    assert_eq!(
        exchange.payload.error.as_deref(),
        Some("Forbidden (Origin Not Allowed)")
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_transport_times_out() {
    let transport = MemoryTransport::new(|req| Ok(TransportResponse::new(200, req.body)))
        .with_latency(Duration::from_secs(30));
    let config = CodecConfig::default_with_overrides(|c| c.transport.timeout = Duration::from_secs(1));
    let client = AttestationClient::new(&config, transport).unwrap();

    let err = client.submit::<_, Value>(&json!(1)).await.unwrap_err();
    assert!(matches!(err, FingerprintError::Timeout));
    assert_eq!(client.metrics().snapshot().timeouts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_handler_not_run_after_deadline() {
    let calls = Arc::new(AtomicU64::new(0));
    let seen = calls.clone();
    let transport = MemoryTransport::new(move |req| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(TransportResponse::new(200, req.body))
    })
    .with_latency(Duration::from_secs(30));
    let config = CodecConfig::default_with_overrides(|c| c.transport.timeout = Duration::from_secs(1));
    let client = AttestationClient::new(&config, transport).unwrap();

    let err = client.submit::<_, Value>(&json!(1)).await.unwrap_err();
    assert!(matches!(err, FingerprintError::Timeout));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = MemoryTransport::new(|_| {
        Err(FingerprintError::TransportError("connection reset".into()))
    });
    let client = AttestationClient::new(&CodecConfig::default(), transport).unwrap();

    let err = client.submit::<_, Value>(&json!(1)).await.unwrap_err();
    assert!(matches!(err, FingerprintError::TransportError(_)));
    assert_eq!(client.metrics().snapshot().transport_errors, 1);
}

#[tokio::test]
async fn test_unframed_reply_is_validation_failure() {
    let transport = MemoryTransport::new(|_| Ok(TransportResponse::new(502, &b"Bad Gateway"[..])));
    let client = AttestationClient::new(&CodecConfig::default(), transport).unwrap();

    let err = client.submit::<_, Value>(&json!(1)).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(client.metrics().snapshot().validation_failures, 1);
}

#[tokio::test]
async fn test_oversized_reply_rejected() {
    let transport = MemoryTransport::new(|_| Ok(TransportResponse::new(200, vec![0u8; 4096])));
    let config = CodecConfig::default_with_overrides(|c| c.transport.max_response_size = 1024);
    let client = AttestationClient::new(&config, transport).unwrap();

    let err = client.submit::<_, Value>(&json!(1)).await.unwrap_err();
    assert!(matches!(err, FingerprintError::TransportError(msg) if msg.contains("too large")));
}

#[tokio::test]
async fn test_wrong_reply_shape_is_parse_failure() {
    let transport = verifier(200, json!({"unexpected": true}));
    let client = AttestationClient::new(&CodecConfig::default(), transport).unwrap();

    let err = client.submit::<_, ServerReply>(&json!(1)).await.unwrap_err();
    assert!(err.is_parse());
    assert_eq!(client.metrics().snapshot().parse_failures, 1);
}

#[tokio::test]
async fn test_custom_headers_forwarded() {
    let transport = MemoryTransport::new(|req| {
        let origin = req.header("origin").unwrap_or_default().to_string();
        let body = FrameCodec::default().encode(&json!({"origin": origin}), &mut ConstantSource(0))?;
        Ok(TransportResponse::new(200, body))
    });
    let config = CodecConfig::default_with_overrides(|c| {
        c.transport
            .headers
            .insert("Origin".into(), "https://shop.example.test".into());
    });
    let client = AttestationClient::with_random(&config, transport, ConstantSource(1)).unwrap();

    let exchange: Exchange<Value> = client.submit(&json!(null)).await.unwrap();
    assert_eq!(exchange.payload, json!({"origin": "https://shop.example.test"}));
}
