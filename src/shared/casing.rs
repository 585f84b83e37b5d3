//! Key casing between the wire format (snake_case) and the application
//! format (camelCase).
//!
//! `to_camel` / `to_snake` are the raw converters. The deep transformers go
//! through `camelize_key` / `snakify_key`, which only touch identifier-shaped
//! keys. Literal map keys such as `"24h"`, `"7d"` or base58 addresses are
//! returned unchanged.

use super::value::Value;

/// `total_value_usd` → `totalValueUsd`.
///
/// Every `_` followed by a lowercase ASCII letter or digit is removed and the
/// following character uppercased. Other underscores are kept.
pub fn to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() || next.is_ascii_digit() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `totalValueUsd` → `total_value_usd`.
///
/// Every ASCII uppercase letter becomes `_` plus its lowercase form.
pub fn to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Keys matching `^[a-z][a-z0-9_]*$` are camelized; anything else is kept.
pub fn camelize_key(key: &str) -> String {
    if is_snake_identifier(key) {
        to_camel(key)
    } else {
        key.to_string()
    }
}

/// Keys matching `^[a-z][a-zA-Z0-9]*$` are snake-cased; anything else is kept.
pub fn snakify_key(key: &str) -> String {
    if is_camel_identifier(key) {
        to_snake(key)
    } else {
        key.to_string()
    }
}

fn is_snake_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_camel_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Recursively rename object keys.
///
/// `value_fn`, when given, runs on every node *before* its keys are renamed
/// and before its children are visited. Arrays map element-wise, objects get
/// every key renamed and every value visited, everything else (including
/// revived scalars) is returned as-is.
pub fn map_keys_deep(
    value: Value,
    key_fn: &dyn Fn(&str) -> String,
    value_fn: Option<&dyn Fn(Value) -> Value>,
) -> Value {
    let patched = match value_fn {
        Some(f) => f(value),
        None => value,
    };

    match patched {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| map_keys_deep(item, key_fn, value_fn))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (key_fn(&k), map_keys_deep(v, key_fn, value_fn)))
                .collect(),
        ),
        other => other,
    }
}

/// Deep snake_case → camelCase.
pub fn camelize_keys(value: Value) -> Value {
    map_keys_deep(value, &camelize_key, None)
}

/// Deep camelCase → snake_case.
pub fn snakify_keys(value: Value) -> Value {
    map_keys_deep(value, &snakify_key, None)
}

/// Deep camelCase → snake_case over plain JSON (outgoing request bodies).
pub fn snakify_json(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(snakify_json).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (snakify_key(&k), snakify_json(v)))
                .collect(),
        ),
        other => other,
    }
}
