//! # Error Types
//!
//! Error handling for fingerprinting and frame exchange.
//!
//! ## Error Categories
//! - **Validation Errors**: a received frame is malformed or was produced with a
//!   different frame configuration (see [`FrameViolation`])
//! - **Parse Errors**: the de-obfuscated payload is not valid structured text
//! - **Transport Errors**: the outbound collaborator failed or timed out
//! - **Configuration Errors**: invalid frame, transport or logging settings
//!
//! Validation and parse failures are terminal for the decode call that raised them;
//! nothing in this crate retries them.
//!
//! ## Example Usage
//! ```rust
//! use fingerprint_frame::core::frame;
//! use fingerprint_frame::error::FingerprintError;
//!
//! let result = frame::decode::<serde_json::Value>(&[0x01], &[3, 7], 7);
//! match result {
//!     Err(FingerprintError::Validation(violation)) => println!("bad frame: {violation}"),
//!     Err(other) => println!("other failure: {other}"),
//!     Ok(value) => println!("payload: {value}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Static messages for error paths that carry no dynamic detail.
pub mod constants {
    /// Synchronization errors
    pub const ERR_LOCK_POISONED: &str = "Synchronization primitive poisoned";

    /// Frame configuration errors
    pub const ERR_ZERO_KEYSTREAM: &str = "Keystream length must be greater than 0";
    pub const ERR_FRAME_TOO_LARGE: &str = "Frame length overflows the address space";

    /// Payload errors
    pub const ERR_PAYLOAD_NOT_UTF8: &str = "Recovered payload is not valid UTF-8";

    /// Transport errors
    pub const ERR_TRANSPORT_TIMEOUT: &str = "Transport did not answer before the deadline";

    /// Logging errors
    pub const ERR_SUBSCRIBER_INSTALLED: &str = "A global tracing subscriber is already installed";
}

/// The specific structural check a received frame failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameViolation {
    #[error("frame too short: {len} bytes, at least {required} required")]
    Truncated { len: usize, required: usize },

    #[error("header byte {index} mismatch: expected {expected}, found {found}")]
    HeaderMismatch { index: usize, expected: u8, found: u8 },
}

// FingerprintError is the primary error type for all crate operations
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame is malformed or uses a different configuration: {0}")]
    Validation(#[from] FrameViolation),

    #[error("Payload corrupt or configuration mismatch: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Timeout occurred")]
    Timeout,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl FingerprintError {
    /// True for header/length failures raised while decoding a frame.
    pub fn is_validation(&self) -> bool {
        matches!(self, FingerprintError::Validation(_))
    }

    /// True when the frame was structurally sound but its payload did not parse.
    pub fn is_parse(&self) -> bool {
        matches!(self, FingerprintError::Parse(_))
    }
}

/// Type alias for Results using FingerprintError
pub type Result<T> = std::result::Result<T, FingerprintError>;
