//! # Transport Seam
//!
//! The frame codec never talks to the network. An outbound exchange is delegated to
//! a [`Transport`], which takes an encoded frame plus opaque request metadata and
//! hands back whatever body the endpoint answered with.
//!
//! A non-success status is NOT a transport failure: the remote side encodes error
//! bodies in the same frame format as success bodies, so the caller decodes both.
//! `Err` is reserved for failures that produced no body at all.
//!
//! ## Implementations
//! - **Memory**: in-process handler, used by tests and local tooling

pub mod memory;

pub use memory::MemoryTransport;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;

/// An encoded frame on its way to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw answer from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound collaborator that carries one frame per call.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest)
        -> impl Future<Output = Result<TransportResponse>> + Send;
}
