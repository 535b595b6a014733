//! # Component Canonicalization
//!
//! Turns a [`ComponentSet`] into a stable string and a 128-bit identifier.
//!
//! ## Canonical String
//! ```text
//! name1:token1|name2:token2|...
//! ```
//! - components appear in byte-wise name order
//! - `:`, `|` and `\` in a name are escaped with a backslash
//! - the token is `error` for an errored component, `undefined` for an absent value,
//!   and the canonical structured text of the value otherwise
//!
//! The identifier is murmur3 x64 128 (seed 0) of the canonical string's UTF-8 bytes.

use crate::core::component::{Component, ComponentSet};
use crate::core::murmur::{hash_str, FingerprintId};
use crate::core::serialization::canonical_json;

/// Token emitted for a component whose collector failed
pub const ERROR_TOKEN: &str = "error";

/// Token emitted for a component with no value at all
pub const ABSENT_TOKEN: &str = "undefined";

/// Canonical string plus the identifier derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalized {
    pub canonical: String,
    pub fingerprint_id: FingerprintId,
}

/// Canonicalize `components` and hash the result. Never fails.
pub fn canonicalize_and_hash(components: &ComponentSet) -> Canonicalized {
    let canonical = canonical_string(components);
    let fingerprint_id = hash_str(&canonical);
    Canonicalized {
        canonical,
        fingerprint_id,
    }
}

/// The canonical string alone.
pub fn canonical_string(components: &ComponentSet) -> String {
    let mut out = String::new();
    // ComponentSet iterates in byte-wise name order
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        escape_name(&mut out, &component.name);
        out.push(':');
        out.push_str(&value_token(component));
    }
    out
}

/// The token a single component contributes after its `name:` prefix.
pub fn value_token(component: &Component) -> String {
    if component.is_error {
        return ERROR_TOKEN.to_string();
    }
    match component.value.to_json() {
        Some(value) => canonical_json(&value),
        None => ABSENT_TOKEN.to_string(),
    }
}

fn escape_name(out: &mut String, name: &str) {
    for ch in name.chars() {
        if matches!(ch, ':' | '|' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
}
