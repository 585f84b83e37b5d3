//! `Value` — a JSON tree that can also carry revived scalars.
//!
//! Wire payloads arrive as plain JSON. After scalar revival, some string
//! leaves become typed runtime values (`Integer`, `DateTime`, `Address`).
//! Those variants are opaque to the deep key transformer: it never recurses
//! into them or rewrites them.

use super::Address;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Number;
use std::collections::BTreeMap;

/// Object map. Ordered, so normalized payloads compare and print deterministically.
pub type Map = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Decimal-integer string revived to an exact integer.
    Integer(i128),
    /// ISO-8601 UTC timestamp revived to a date-time.
    DateTime(DateTime<Utc>),
    /// Base58 string that decodes to a 32-byte public key.
    Address(Address),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Whether this node is a typed runtime value rather than plain JSON structure.
    pub fn is_revived(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::DateTime(_) | Value::Address(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Address(a) => Some(a.as_str()),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Number(n) => n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on an object node.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_object_mut().and_then(|map| map.get_mut(key))
    }

    /// Lower to plain JSON using the wire conventions: integers and
    /// addresses become strings, date-times become RFC 3339 strings.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Integer(n) => serde_json::Value::String(n.to_string()),
            Value::DateTime(dt) => serde_json::Value::String(format_datetime(&dt)),
            Value::Address(a) => serde_json::Value::String(a.to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Value::into_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into_json())).collect(),
            ),
        }
    }

    /// Deserialize a typed entity from this (normalized) tree.
    pub fn deserialize_into<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_json())
    }
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Integer(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(n) => serializer.collect_str(n),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::Address(a) => serializer.serialize_str(a.as_str()),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_and_back_is_identity_for_plain_json() {
        let raw = json!({"a": [1, "x", null, true], "b": {"c": 1.5}});
        let v = Value::from(raw.clone());
        assert_eq!(v.into_json(), raw);
    }

    #[test]
    fn test_revived_scalars_lower_to_wire_strings() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let v: Value = vec![
            ("amount".to_string(), Value::Integer(200053968277)),
            ("time".to_string(), Value::DateTime(dt)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            v.into_json(),
            json!({"amount": "200053968277", "time": "2024-01-01T00:00:00Z"})
        );
    }

    #[test]
    fn test_serialize_matches_into_json() {
        let v = Value::Array(vec![Value::Integer(-5), Value::from("s")]);
        let via_serde = serde_json::to_value(&v).unwrap();
        assert_eq!(via_serde, v.into_json());
    }

    #[test]
    fn test_as_i128_accepts_plain_numbers() {
        assert_eq!(Value::from(json!(42)).as_i128(), Some(42));
        assert_eq!(Value::Integer(7).as_i128(), Some(7));
        assert_eq!(Value::from("7").as_i128(), None);
    }
}
