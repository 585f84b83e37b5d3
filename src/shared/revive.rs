//! Scalar revival — shape-based coercion of string leaves.
//!
//! Rules are tried in order and the first match wins:
//! 1. ISO-8601 UTC timestamp (`2024-01-01T00:00:00Z`, optional fraction) → `DateTime`
//! 2. Decimal integer (`-?\d+`) that fits in `i128` → `Integer`
//! 3. Base58 string decoding to 32 bytes → `Address`
//!
//! Anything that fails to convert stays a string. Revival never fails.
//! This is a heuristic; per-entity transforms in `domain` are authoritative.

use super::casing::map_keys_deep;
use super::value::Value;
use super::Address;
use chrono::{DateTime, Utc};

/// Revive a single node. Only `Value::String` is ever touched.
pub fn revive_scalar(value: Value) -> Value {
    let s = match value {
        Value::String(s) => s,
        other => return other,
    };

    if is_iso_utc(&s) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
            return Value::DateTime(dt.with_timezone(&Utc));
        }
    }

    if is_int_string(&s) {
        match s.parse::<i128>() {
            Ok(n) => return Value::Integer(n),
            Err(e) => {
                tracing::debug!("Integer-shaped string {} kept as string: {}", s, e);
            }
        }
    }

    if let Some(address) = Address::parse(&s) {
        return Value::Address(address);
    }

    Value::String(s)
}

/// Revive every string leaf, keys untouched.
pub fn revive_deep(value: Value) -> Value {
    let reviver: &dyn Fn(Value) -> Value = &revive_scalar;
    map_keys_deep(value, &|k| k.to_string(), Some(reviver))
}

/// `^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?Z$`
fn is_iso_utc(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < 20 || b[b.len() - 1] != b'Z' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);
    let fixed = digits(0..4)
        && b[4] == b'-'
        && digits(5..7)
        && b[7] == b'-'
        && digits(8..10)
        && b[10] == b'T'
        && digits(11..13)
        && b[13] == b':'
        && digits(14..16)
        && b[16] == b':'
        && digits(17..19);
    if !fixed {
        return false;
    }
    match &b[19..b.len() - 1] {
        [] => true,
        [b'.', frac @ ..] => !frac.is_empty() && frac.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// `^-?\d+$`
fn is_int_string(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_revives_iso_dates() {
        let v = revive_scalar(Value::from("2024-01-01T00:00:00Z"));
        assert_eq!(
            v,
            Value::DateTime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(revive_scalar(Value::from("2024-01-01T00:00:00.123Z"))
            .as_datetime()
            .is_some());
    }

    #[test]
    fn test_non_utc_or_partial_dates_stay_strings() {
        for s in ["2024-01-01", "2024-01-01T00:00:00+02:00", "2024-01-01T00:00:00.Z"] {
            assert_eq!(revive_scalar(Value::from(s)), Value::from(s));
        }
    }

    #[test]
    fn test_big_integer_revival_is_exact() {
        assert_eq!(
            revive_scalar(Value::from("200053968277")),
            Value::Integer(200053968277)
        );
        assert_eq!(revive_scalar(Value::from("-42")), Value::Integer(-42));
        assert_eq!(
            revive_scalar(Value::from("340282366920938463463374607431768211455")),
            Value::from("340282366920938463463374607431768211455")
        );
    }

    #[test]
    fn test_malformed_integers_stay_strings() {
        assert_eq!(revive_scalar(Value::from("12ab")), Value::from("12ab"));
        assert_eq!(revive_scalar(Value::from("-")), Value::from("-"));
    }

    #[test]
    fn test_revives_addresses() {
        let v = revive_scalar(Value::from("So11111111111111111111111111111111111111112"));
        assert!(matches!(v, Value::Address(_)));
        // Valid base58 but not 32 bytes.
        assert_eq!(revive_scalar(Value::from("abc")), Value::from("abc"));
    }

    #[test]
    fn test_typed_leaves_are_left_alone() {
        for raw in [json!(1), json!(1.5), json!(true), json!(null)] {
            let v = Value::from(raw.clone());
            assert_eq!(revive_scalar(v.clone()), v);
        }
    }

    #[test]
    fn test_revive_deep_keeps_keys() {
        let out = revive_deep(Value::from(json!({"a_b": {"c_d": "2024-01-01T00:00:00Z"}})));
        let leaf = out.get("a_b").and_then(|v| v.get("c_d")).unwrap();
        assert!(leaf.as_datetime().is_some());
    }
}
