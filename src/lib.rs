//! # fingerprint-frame
//!
//! Two small, self-contained pieces used by a client that reports a synthesized
//! environment fingerprint to a verification endpoint:
//!
//! - **Canonicalization** ([`core::canonical`]): a set of named components becomes a
//!   stable string and a 128-bit murmur3 identifier.
//! - **Frame codec** ([`core::frame`]): a structured payload becomes an obfuscated
//!   binary frame (seed byte, header pattern, padding, repeating XOR keystream) and back.
//!
//! The frame codec is obfuscation, NOT encryption. The keystream travels inside the
//! frame it protects; anyone holding the frame recovers the payload.
//!
//! The [`service`] layer wires both to a [`transport::Transport`] with metrics and
//! tracing around every exchange.
//!
//! ## Example
//! ```
//! use fingerprint_frame::core::canonical::canonicalize_and_hash;
//! use fingerprint_frame::core::component::ComponentSet;
//!
//! let set = ComponentSet::new()
//!     .with("timezone", "America/New_York")
//!     .with("colorDepth", 24);
//! let result = canonicalize_and_hash(&set);
//! assert_eq!(result.canonical, r#"colorDepth:24|timezone:"America/New_York""#);
//! assert_eq!(result.fingerprint_id.to_hex(), "b5d4048cba93a01b0db1afb808d64e9f");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod transport;
pub mod utils;

pub use crate::config::{CodecConfig, FrameConfig, LoggingConfig, TransportConfig};
pub use crate::core::canonical::{canonicalize_and_hash, Canonicalized};
pub use crate::core::component::{Component, ComponentSet, ComponentValue};
pub use crate::core::frame::{FrameCodec, FrameLayout};
pub use crate::core::murmur::FingerprintId;
pub use crate::error::{FingerprintError, FrameViolation, Result};
