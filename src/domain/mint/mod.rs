//! Mint domain — token metadata.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::{Address, Value};
use serde::{Deserialize, Serialize};

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mint {
    pub mint: Address,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: String,
    pub decimals: u8,
}

/// Mints carry no integer or date fields; addresses are already revived.
pub fn transform(_value: &mut Value) {}
