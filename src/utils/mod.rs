//! # Utility Modules
//!
//! Supporting utilities for randomness, logging, timing and metrics.
//!
//! ## Components
//! - **Random**: the injectable byte source the frame codec draws seeds, padding and
//!   keystreams from
//! - **Logging**: Structured logging configuration
//! - **Timeout**: Async timeout wrappers for the transport layer
//! - **Metrics**: Thread-safe observability counters

pub mod logging;
pub mod metrics;
pub mod random;
pub mod timeout;

// Re-export public types for advanced users
pub use random::{ConstantSource, RandomSource, RngSource, SequenceSource};
