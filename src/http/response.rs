//! Response envelope and the response normalizer.

use crate::shared::{normalize_value, Value};

/// A completed HTTP exchange.
///
/// Success (2xx) and error are mutually exclusive: a success response never
/// carries `error`, any other status always does (possibly `Value::Null`
/// when the server sent no body).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Option<Value>,
    pub error: Option<Value>,
}

impl Response {
    pub fn success(status: u16, data: Option<Value>) -> Self {
        Self {
            status,
            data,
            error: None,
        }
    }

    pub fn failure(status: u16, error: Option<Value>) -> Self {
        Self {
            status,
            data: None,
            error: Some(error.unwrap_or_default()),
        }
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }
}

pub(crate) fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse raw body bytes as JSON.
///
/// Empty or malformed bodies become `None`, never an error, so 204s and
/// non-JSON error pages unwrap cleanly.
pub fn parse_body(bytes: &[u8]) -> Option<serde_json::Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::debug!("Response body is not JSON, treating as empty: {}", e);
            None
        }
    }
}

/// Revive scalars, then camelize keys.
pub fn normalize_response(raw: Option<serde_json::Value>) -> Option<Value> {
    raw.map(normalize_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_empty_and_garbage() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(b"  \n"), None);
        assert_eq!(parse_body(b"<html>502</html>"), None);
        assert_eq!(parse_body(br#"{"a":1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn test_normalize_response() {
        let out = normalize_response(Some(json!({
            "data": {"token_a_mint": "So11111111111111111111111111111111111111112", "slot": "42"}
        })))
        .unwrap();
        let data = out.get("data").unwrap();
        assert!(matches!(data.get("tokenAMint"), Some(Value::Address(_))));
        assert_eq!(data.get("slot"), Some(&Value::Integer(42)));
        assert_eq!(normalize_response(None), None);
    }

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let ok = Response::success(200, Some(Value::from("x")));
        assert!(ok.is_success());
        assert!(ok.error.is_none());

        let err = Response::failure(404, None);
        assert!(!err.is_success());
        assert_eq!(err.error, Some(Value::Null));
        assert!(err.data.is_none());
    }
}
