//! In-process transport.
//!
//! Runs a handler closure instead of a network round-trip, optionally after a fixed
//! delay so deadline handling can be exercised.

use crate::error::Result;
use crate::transport::{Transport, TransportRequest, TransportResponse};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

type HandlerFn = dyn Fn(TransportRequest) -> Result<TransportResponse> + Send + Sync + 'static;

pub struct MemoryTransport {
    handler: Box<HandlerFn>,
    latency: Option<Duration>,
    requests: AtomicU64,
}

impl MemoryTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> Result<TransportResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            latency: None,
            requests: AtomicU64::new(0),
        }
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests seen so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("latency", &self.latency)
            .field("requests", &self.request_count())
            .finish()
    }
}

impl Transport for MemoryTransport {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send {
        // The handler runs on first poll, inside any deadline wrapped around this future
        async move {
            self.requests.fetch_add(1, Ordering::Relaxed);
            trace!(endpoint = %request.endpoint, bytes = request.body.len(), "memory transport request");
            if let Some(delay) = self.latency {
                tokio::time::sleep(delay).await;
            }
            (self.handler)(request)
        }
    }
}
