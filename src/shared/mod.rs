//! Shared newtypes and utilities used across all domain modules.
//!
//! The normalization pipeline lives here: `casing` (key renaming), `revive`
//! (shape-based scalar revival), `coerce` (declared per-field coercion) and
//! `value` (the JSON tree they all operate on).

pub mod casing;
pub mod coerce;
pub mod revive;
pub mod serde_util;
pub mod value;

pub use casing::{camelize_keys, map_keys_deep, snakify_json, snakify_keys, to_camel, to_snake};
pub use revive::{revive_deep, revive_scalar};
pub use value::{Map, Value};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Generic half of response normalization: revive scalars, then camelize
/// keys. Per-entity transforms run on the result.
pub fn normalize_value(raw: serde_json::Value) -> Value {
    camelize_keys(revive_deep(Value::from(raw)))
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// A Solana public key stored as a base58 string.
///
/// Serializes transparently as a JSON string. Can be used as a HashMap key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Accept only base58 strings that decode to exactly 32 bytes.
    pub fn parse(s: &str) -> Option<Self> {
        if !(32..=44).contains(&s.len()) {
            return None;
        }
        match bs58::decode(s).into_vec() {
            Ok(bytes) if bytes.len() == 32 => Some(Self(s.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_pubkey(&self) -> Result<solana_pubkey::Pubkey, String> {
        solana_pubkey::Pubkey::from_str(&self.0).map_err(|e| e.to_string())
    }

    pub fn from_pubkey(pk: solana_pubkey::Pubkey) -> Self {
        Self(pk.to_string())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self(solana_pubkey::Pubkey::default().to_string())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<solana_pubkey::Pubkey> for Address {
    fn from(pk: solana_pubkey::Pubkey) -> Self {
        Self(pk.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Address(s))
    }
}

// ─── AmountWithUsd ───────────────────────────────────────────────────────────

/// A raw token amount alongside its USD valuation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountWithUsd {
    #[serde(with = "serde_util::int_str")]
    pub amount: i128,
    #[serde(default)]
    pub usd: f64,
}

/// A raw token amount with a PnL rate (bps or fraction, as sent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokensPnl {
    #[serde(with = "serde_util::int_str")]
    pub amount: i128,
    #[serde(default, alias = "bps")]
    pub rate: f64,
}

/// A USD-denominated PnL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsdPnl {
    pub amount: f64,
    #[serde(default, alias = "bps")]
    pub rate: f64,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

// ─── PoolProvider ────────────────────────────────────────────────────────────

/// Liquidity provider backing a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolProvider {
    Orca,
    Fusion,
}

impl PoolProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orca => "orca",
            Self::Fusion => "fusion",
        }
    }
}

impl std::fmt::Display for PoolProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
