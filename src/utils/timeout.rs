//! Timeout helpers for the transport layer.
//!
//! The codec itself never blocks; only the exchange with the remote endpoint is
//! bounded in time.

use crate::error::{FingerprintError, Result};
use std::future::Future;
use std::time::Duration;

/// Default deadline for a single frame exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Smallest deadline accepted by configuration validation
pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

/// Await `future`, failing with [`FingerprintError::Timeout`] once `duration` elapses.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| FingerprintError::Timeout)
}

/// Like [`with_timeout`] for futures that already return a crate `Result`.
pub async fn with_timeout_error<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    with_timeout(duration, future).await?
}
