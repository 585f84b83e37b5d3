//! Collapse a response envelope into the payload the caller asked for.

use crate::error::SdkError;
use crate::http::response::Response;
use crate::shared::Value;
use serde::de::DeserializeOwned;

/// Reduce an HTTP result to its payload or a structured error.
///
/// Precedence:
/// 1. a populated `error` slot raises `SdkError::Api` with that cause;
/// 2. a non-2xx status raises `SdkError::Api` with `data` as the cause;
/// 3. otherwise the payload is returned after one [`collapse_data`].
///
/// Transport errors pass through untouched.
pub fn unwrap(result: Result<Response, SdkError>) -> Result<Value, SdkError> {
    let response = result?;

    if let Some(cause) = response.error {
        return Err(SdkError::api(response.status, cause));
    }

    if !response.is_success() {
        return Err(SdkError::api(
            response.status,
            response.data.unwrap_or_default(),
        ));
    }

    Ok(collapse_data(response.data.unwrap_or_default()))
}

/// `{ "data": x }` → `x`. Objects with any other key are returned as-is.
/// Applied once; `{ "data": { "data": x } }` yields `{ "data": x }`.
pub fn collapse_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

/// [`unwrap`], then deserialize into `T`.
pub fn unwrap_into<T: DeserializeOwned>(result: Result<Response, SdkError>) -> Result<T, SdkError> {
    decode(unwrap(result)?)
}

/// Deserialize a normalized payload, reporting shape mismatches as `Decode`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    value
        .deserialize_into()
        .map_err(|e| SdkError::Decode(e.to_string()))
}
