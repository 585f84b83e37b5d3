//! Declared per-field coercions over normalized (camelCase) objects.
//!
//! These are the building blocks of each entity's `transform`. Unlike the
//! shape-sniffing reviver they know the field's type, so a plain JSON number
//! in an integer field or an ambiguous timestamp in a date field is forced to
//! the declared type. Missing fields and `null` are left alone; values that
//! cannot be converted are kept as they are.

use super::value::{Map, Value};
use chrono::{DateTime, Utc};

/// Force `obj[field]` to `Value::Integer`.
pub fn int(obj: &mut Map, field: &str) {
    if let Some(slot) = obj.get_mut(field) {
        if let Some(n) = to_integer(slot) {
            *slot = Value::Integer(n);
        }
    }
}

/// Force every listed field to `Value::Integer`.
pub fn ints(obj: &mut Map, fields: &[&str]) {
    for field in fields {
        int(obj, field);
    }
}

/// Force `obj[field]` to `Value::DateTime`.
///
/// Accepts RFC 3339 strings (any offset) and epoch-millisecond numbers.
pub fn date(obj: &mut Map, field: &str) {
    if let Some(slot) = obj.get_mut(field) {
        if let Some(dt) = to_datetime(slot) {
            *slot = Value::DateTime(dt);
        }
    }
}

pub fn dates(obj: &mut Map, fields: &[&str]) {
    for field in fields {
        date(obj, field);
    }
}

/// Coerce the `amount` of a nested `{ amount, usd }` object to an integer.
pub fn amount(obj: &mut Map, field: &str) {
    if let Some(Value::Object(inner)) = obj.get_mut(field) {
        int(inner, "amount");
    }
}

pub fn amounts(obj: &mut Map, fields: &[&str]) {
    for field in fields {
        amount(obj, field);
    }
}

/// Apply `f` to the nested object at `obj[field]`.
pub fn nested(obj: &mut Map, field: &str, f: impl Fn(&mut Value)) {
    if let Some(inner) = obj.get_mut(field) {
        if inner.as_object().is_some() {
            f(inner);
        }
    }
}

/// Apply `f` to every element of the array at `obj[field]`.
pub fn each(obj: &mut Map, field: &str, f: impl Fn(&mut Value)) {
    if let Some(Value::Array(items)) = obj.get_mut(field) {
        items.iter_mut().for_each(f);
    }
}

/// Apply `f` to every value of the keyed map at `obj[field]`
/// (e.g. market address → market).
pub fn map_values(obj: &mut Map, field: &str, f: impl Fn(&mut Value)) {
    if let Some(Value::Object(entries)) = obj.get_mut(field) {
        entries.values_mut().for_each(f);
    }
}

/// Apply an entity transform to a list payload element-wise, or to a single
/// payload directly.
pub fn one_or_many(value: &mut Value, f: impl Fn(&mut Value)) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(f),
        other => f(other),
    }
}

/// Run `f` on the value's object map, if it is one.
pub fn with_object(value: &mut Value, f: impl FnOnce(&mut Map)) {
    if let Some(obj) = value.as_object_mut() {
        f(obj);
    }
}

fn to_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 1e38)
                    .map(|f| f as i128)
            }),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Integer(n) => i64::try_from(*n)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
