//! Frame exchange with a verification endpoint.
//!
//! One [`AttestationClient::submit`] call encodes a payload into a fresh frame, hands it
//! to the transport under a deadline, and decodes whatever body comes back. Error
//! statuses carry framed bodies too, so the body is decoded regardless of status and
//! the status is reported alongside the payload.

use crate::config::{CodecConfig, TransportConfig};
use crate::core::frame::FrameCodec;
use crate::error::{constants, FingerprintError, Result};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::utils::metrics::{Metrics, Timer};
use crate::utils::random::{RandomSource, RngSource};
use crate::utils::timeout::with_timeout_error;

use bytes::Bytes;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

/// Decoded answer to one submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange<T> {
    pub status: u16,
    pub payload: T,
}

impl<T> Exchange<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct AttestationClient<T, R = RngSource<StdRng>> {
    codec: FrameCodec,
    transport_config: TransportConfig,
    transport: T,
    rng: Mutex<R>,
    metrics: Arc<Metrics>,
}

impl<T: Transport> AttestationClient<T> {
    /// Client drawing frame randomness from an OS-seeded generator.
    pub fn new(config: &CodecConfig, transport: T) -> Result<Self> {
        Self::with_random(config, transport, RngSource::from_os_seed())
    }
}

impl<T, R> AttestationClient<T, R>
where
    T: Transport,
    R: RandomSource + Send,
{
    /// # Errors
    /// `ConfigError` if the configuration fails validation.
    pub fn with_random(config: &CodecConfig, transport: T, rng: R) -> Result<Self> {
        config.validate_strict()?;
        Ok(Self {
            codec: FrameCodec::new(config.frame.clone())?,
            transport_config: config.transport.clone(),
            transport,
            rng: Mutex::new(rng),
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Record into a shared collector instead of a private one.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode a frame without sending it.
    pub fn encode_frame<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Bytes> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| FingerprintError::Custom(constants::ERR_LOCK_POISONED.into()))?;
        self.codec.encode(payload, &mut *rng)
    }

    /// Decode a response body, recording the outcome.
    pub fn decode_response<Resp: DeserializeOwned>(&self, body: &[u8]) -> Result<Resp> {
        match self.codec.decode(body) {
            Ok(payload) => {
                self.metrics.frame_decoded();
                Ok(payload)
            }
            Err(e) => {
                if e.is_validation() {
                    self.metrics.validation_failure();
                } else if e.is_parse() {
                    self.metrics.parse_failure();
                }
                warn!(error = %e, bytes = body.len(), "Response frame rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, payload), fields(endpoint = %self.transport_config.endpoint), level = "debug")]
    pub async fn submit<P, Resp>(&self, payload: &P) -> Result<Exchange<Resp>>
    where
        P: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let _timer = Timer::start("submit");

        // The rng lock is released inside encode_frame, before any await
        let frame = self.encode_frame(payload)?;
        self.metrics.frame_sent(frame.len() as u64);
        debug!(bytes = frame.len(), "Frame encoded");

        let request = TransportRequest {
            endpoint: self.transport_config.endpoint.clone(),
            headers: self.request_headers(),
            body: frame,
        };

        let response = self.send(request).await?;
        self.metrics.response_received(response.body.len() as u64);

        if response.body.len() > self.transport_config.max_response_size {
            self.metrics.validation_failure();
            warn!(
                bytes = response.body.len(),
                limit = self.transport_config.max_response_size,
                "Response body over size limit"
            );
            return Err(FingerprintError::TransportError(format!(
                "Response too large: {} bytes (max: {})",
                response.body.len(),
                self.transport_config.max_response_size
            )));
        }

        if !response.is_success() {
            debug!(status = response.status, "Endpoint answered with error status");
        }

        let payload = self.decode_response(&response.body)?;
        Ok(Exchange {
            status: response.status,
            payload,
        })
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let deadline = self.transport_config.timeout;
        match with_timeout_error(deadline, self.transport.send(request)).await {
            Ok(response) => Ok(response),
            Err(FingerprintError::Timeout) => {
                self.metrics.timeout();
                warn!(
                    timeout_ms = deadline.as_millis(),
                    "{}",
                    constants::ERR_TRANSPORT_TIMEOUT
                );
                Err(FingerprintError::Timeout)
            }
            Err(e) => {
                self.metrics.transport_error();
                warn!(error = %e, "Transport failed");
                Err(e)
            }
        }
    }

    fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.transport_config.headers.len() + 1);
        headers.push((
            "Content-Type".to_string(),
            self.transport_config.content_type.clone(),
        ));
        headers.extend(
            self.transport_config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        headers
    }
}
