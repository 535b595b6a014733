//! # Core Components
//!
//! The two pure pieces of the crate and the data they share.
//!
//! ## Components
//! - **Component**: component values and sets
//! - **Canonical**: component set → canonical string → fingerprint identifier
//! - **Murmur**: murmur3 x64 128-bit hashing
//! - **Serialization**: the canonical structured-text encoding
//! - **Frame**: obfuscated binary frame encode/decode
//!
//! Nothing here performs I/O or logging, and no state survives between calls except
//! what lives inside a caller-supplied random source.

pub mod canonical;
pub mod component;
pub mod frame;
pub mod murmur;
pub mod serialization;
