//! Observability and Metrics
//!
//! Counters for fingerprint computation and frame exchange.
//!
//! Uses atomic counters for thread-safe metrics collection. The pure codec functions
//! never touch these; the service layer records around them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for fingerprinting and frame exchange
#[derive(Debug)]
pub struct Metrics {
    /// Fingerprint identifiers computed
    pub fingerprints_computed: AtomicU64,
    /// Frames produced by encode
    pub frames_encoded: AtomicU64,
    /// Frames successfully decoded
    pub frames_decoded: AtomicU64,
    /// Total frame bytes handed to the transport
    pub bytes_sent: AtomicU64,
    /// Total response bytes received from the transport
    pub bytes_received: AtomicU64,
    /// Decodes rejected by header/length validation
    pub validation_failures: AtomicU64,
    /// Decodes whose payload did not parse
    pub parse_failures: AtomicU64,
    /// Transport-level failures (no response body)
    pub transport_errors: AtomicU64,
    /// Exchanges that hit the deadline
    pub timeouts: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            fingerprints_computed: AtomicU64::new(0),
            frames_encoded: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a computed fingerprint
    pub fn fingerprint_computed(&self) {
        self.fingerprints_computed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encoded frame handed to the transport
    pub fn frame_sent(&self, byte_count: u64) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a response body received from the transport
    pub fn response_received(&self, byte_count: u64) {
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a successfully decoded frame
    pub fn frame_decoded(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame rejected by validation
    pub fn validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a payload that failed to parse
    pub fn parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transport failure
    pub fn transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an exchange timeout
    pub fn timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fingerprints_computed: self.fingerprints_computed.load(Ordering::Relaxed),
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            fingerprints_computed = snapshot.fingerprints_computed,
            frames_encoded = snapshot.frames_encoded,
            frames_decoded = snapshot.frames_decoded,
            bytes_sent = snapshot.bytes_sent,
            bytes_received = snapshot.bytes_received,
            validation_failures = snapshot.validation_failures,
            parse_failures = snapshot.parse_failures,
            transport_errors = snapshot.transport_errors,
            timeouts = snapshot.timeouts,
            uptime_seconds = snapshot.uptime_seconds,
            "Frame exchange metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub fingerprints_computed: u64,
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub validation_failures: u64,
    pub parse_failures: u64,
    pub transport_errors: u64,
    pub timeouts: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.frame_sent(19);
        metrics.frame_sent(21);
        metrics.response_received(64);
        metrics.frame_decoded();
        metrics.validation_failure();
        metrics.parse_failure();
        metrics.transport_error();
        metrics.timeout();
        metrics.fingerprint_computed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_encoded, 2);
        assert_eq!(snapshot.bytes_sent, 40);
        assert_eq!(snapshot.bytes_received, 64);
        assert_eq!(snapshot.frames_decoded, 1);
        assert_eq!(snapshot.validation_failures, 1);
        assert_eq!(snapshot.parse_failures, 1);
        assert_eq!(snapshot.transport_errors, 1);
        assert_eq!(snapshot.timeouts, 1);
        assert_eq!(snapshot.fingerprints_computed, 1);
    }

    #[test]
    fn test_global_metrics_is_shared() {
        let before = global_metrics().snapshot().fingerprints_computed;
        global_metrics().fingerprint_computed();
        assert!(global_metrics().snapshot().fingerprints_computed > before);
    }
}
