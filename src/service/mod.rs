//! # Service Layer
//!
//! Ties the pure codec pieces to their collaborators.
//!
//! ## Components
//! - **Fingerprint**: pulls a component set from a source and derives the visitor id
//! - **Exchange**: encodes a payload, hands it to a transport, decodes the answer
//!
//! Metrics and tracing live here; [`crate::core`] stays free of side effects.

pub mod exchange;
pub mod fingerprint;

pub use exchange::{AttestationClient, Exchange};
pub use fingerprint::{create_visitor_id, ComponentSource, FingerprintReport};
