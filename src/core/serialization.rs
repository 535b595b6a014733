//! # Canonical Serialization
//!
//! The one structured-text encoding used everywhere bytes must be reproducible: the
//! value tokens inside a fingerprint's canonical string and the payload bytes inside
//! an obfuscated frame.
//!
//! ## Rules
//! - JSON text with no insignificant whitespace
//! - object keys sorted byte-wise, at every depth
//! - strings escaped as `serde_json` escapes them: `"` `\` and `\b \f \n \r \t`
//!   by name, remaining control characters as lowercase `\u00XX`, everything else
//!   (including `/` and non-ASCII) literal
//! - integers in plain decimal
//! - floats in ECMAScript `Number::toString` form: integral values carry no fraction
//!   (`24.0` → `24`), magnitudes outside `[1e-6, 1e21)` use exponent form with an
//!   explicit sign (`1e+21`, `1.5e-7`), and `-0` prints as `0`
//! - non-finite floats are `null` (they never reach the writer: `serde_json` already
//!   maps them to `Value::Null`)
//!
//! Sorting is done explicitly here, so the output does not depend on whether
//! `serde_json`'s `preserve_order` feature is enabled somewhere in the build.
//!
//! ## Numbers on the way back
//! Parsing uses `serde_json`'s `float_roundtrip` mode, so a typed `f64` comes back as
//! the exact double that was written. Untyped [`Value`] payloads follow JavaScript
//! number semantics instead: `24.0` is written as `24` and reads back as the integer
//! `24`. Compare such payloads with [`canonical_eq`], not `==`.

use crate::error::{constants, FingerprintError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Number, Value};

/// Serialize any `Serialize` value to canonical text.
///
/// # Errors
/// Returns `SerializeError` if the value cannot be represented as structured data
/// (for instance a map with non-string keys).
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value =
        serde_json::to_value(value).map_err(|e| FingerprintError::SerializeError(e.to_string()))?;
    Ok(canonical_json(&value))
}

/// Canonical text as UTF-8 bytes.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    to_canonical_string(value).map(String::into_bytes)
}

/// Parse UTF-8 structured text into `T`.
///
/// # Errors
/// Returns `Parse` for invalid UTF-8, malformed text, or text that does not match `T`.
pub fn from_canonical_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| FingerprintError::Parse(constants::ERR_PAYLOAD_NOT_UTF8.into()))?;
    serde_json::from_str(text).map_err(|e| FingerprintError::Parse(e.to_string()))
}

/// Render an already-built structured value. Infallible.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Equality under the canonical encoding, where `24.0` and `24` are the same number.
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    canonical_json(a) == canonical_json(b)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&format_number(n)),
        // Display of a string Value is its escaped JSON literal
        Value::String(_) => out.push_str(&value.to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_str(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_str(out: &mut String, s: &str) {
    out.push_str(&Value::from(s).to_string());
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format_f64(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// ECMAScript-style shortest round-trip rendering of a double.
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // Display is shortest round-trip and never uses exponent form
        return format!("{value}");
    }

    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_keys_sorted_at_every_depth() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [{"y": true, "x": null}]});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":[{"x":null,"y":true}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn test_struct_fields_are_sorted_too() {
        #[derive(Serialize)]
        struct Probe {
            zeta: u8,
            alpha: &'static str,
        }
        let text = to_canonical_string(&Probe {
            zeta: 1,
            alpha: "a",
        })
        .expect("serialize");
        assert_eq!(text, r#"{"alpha":"a","zeta":1}"#);
    }

    #[test]
    fn test_float_formatting_matches_ecmascript() {
        assert_eq!(format_f64(24.0), "24");
        assert_eq!(format_f64(-0.0), "0");
        assert_eq!(format_f64(0.25), "0.25");
        assert_eq!(format_f64(1.4473588658278522), "1.4473588658278522");
        assert_eq!(format_f64(0.000001), "0.000001");
        assert_eq!(format_f64(1e-7), "1e-7");
        assert_eq!(format_f64(1.9275814160560204e-50), "1.9275814160560204e-50");
        assert_eq!(format_f64(1e21), "1e+21");
        assert_eq!(format_f64(1e20), "100000000000000000000");
        assert_eq!(format_f64(-2.5e30), "-2.5e+30");
        assert_eq!(format_f64(f64::NAN), "null");
    }

    #[test]
    fn test_string_escaping() {
        let value = json!("quote\" back\\ nl\n tab\t bell\u{7} slash/ é");
        assert_eq!(
            canonical_json(&value),
            "\"quote\\\" back\\\\ nl\\n tab\\t bell\\u0007 slash/ é\""
        );
    }

    #[test]
    fn test_non_string_keys_fail_to_serialize() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1u8);
        let err = to_canonical_string(&map).expect_err("vector keys are not representable");
        assert!(matches!(err, FingerprintError::SerializeError(_)));
    }

    #[test]
    fn test_parse_errors() {
        let err = from_canonical_bytes::<Value>(&[0xFF, 0xFE]).expect_err("invalid utf-8");
        assert!(err.is_parse());
        let err = from_canonical_bytes::<Value>(b"{\"x\":").expect_err("truncated json");
        assert!(err.is_parse());
    }

    #[test]
    fn test_typed_float_roundtrip_is_exact() {
        for value in [
            1.947700395895162e-169,
            0.1 + 0.2,
            f64::MIN_POSITIVE,
            f64::MAX,
            -123456.789e300,
            5e-324,
            1e19,
        ] {
            let bytes = to_canonical_bytes(&value).expect("serialize");
            let parsed: f64 = from_canonical_bytes(&bytes).expect("parse");
            assert_eq!(parsed.to_bits(), value.to_bits(), "{value:e}");
        }
    }

    #[test]
    fn test_integral_float_value_compares_canonically() {
        let value = json!({"ratio": 24.0, "scale": 0.5});
        let bytes = to_canonical_bytes(&value).expect("serialize");
        let parsed: Value = from_canonical_bytes(&bytes).expect("parse");
        assert_eq!(parsed, json!({"ratio": 24, "scale": 0.5}));
        assert!(canonical_eq(&parsed, &value));
        assert!(!canonical_eq(&parsed, &json!({"ratio": 25, "scale": 0.5})));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let value = json!({"x": 1, "list": [1, "two", false]});
        let bytes = to_canonical_bytes(&value).expect("serialize");
        let parsed: Value = from_canonical_bytes(&bytes).expect("parse");
        assert_eq!(parsed, value);
    }
}
