//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — typed entities plus the `transform` functions that coerce a
//!   normalized payload into the entity's declared field types
//! - `client.rs` — sub-client with the HTTP methods for that slice
//!
//! Transforms are authoritative: whatever the generic reviver guessed, a
//! transform forces integer and date fields to the declared type.

pub mod market;
pub mod mint;
pub mod oracle;
pub mod order;
pub mod pool;
pub mod position;
pub mod snapshot;
pub mod staking;
pub mod stats;
pub mod vault;

use crate::domain::market::Market;
use crate::domain::mint::Mint;
use crate::shared::coerce::{self, with_object};
use crate::shared::{PaginationMeta, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A list response with the markets and mints its items reference.
///
/// Also accepts a bare JSON array, in which case `markets` and `mints` are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "ListingRepr<T>",
    bound(deserialize = "T: DeserializeOwned")
)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Market address → market.
    pub markets: BTreeMap<String, Market>,
    /// Mint address → mint.
    pub mints: BTreeMap<String, Mint>,
    pub meta: Option<PaginationMeta>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            markets: BTreeMap::new(),
            mints: BTreeMap::new(),
            meta: None,
        }
    }
}

impl<T> Listing<T> {
    /// The market an item points at, if it was included.
    pub fn market(&self, address: &str) -> Option<&Market> {
        self.markets.get(address)
    }
}

#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned"))]
enum ListingRepr<T> {
    Full {
        items: Vec<T>,
        #[serde(default)]
        markets: BTreeMap<String, Market>,
        #[serde(default)]
        mints: BTreeMap<String, Mint>,
        #[serde(default)]
        meta: Option<PaginationMeta>,
    },
    Bare(Vec<T>),
}

impl<T> From<ListingRepr<T>> for Listing<T> {
    fn from(repr: ListingRepr<T>) -> Self {
        match repr {
            ListingRepr::Full {
                items,
                markets,
                mints,
                meta,
            } => Listing {
                items,
                markets,
                mints,
                meta,
            },
            ListingRepr::Bare(items) => Listing {
                items,
                ..Listing::default()
            },
        }
    }
}

/// Run `item` over a listing's items and the market transform over its
/// market map. Bare arrays get `item` element-wise.
pub fn transform_listing(value: &mut Value, item: impl Fn(&mut Value)) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(item),
        other => with_object(other, |obj| {
            coerce::each(obj, "items", item);
            coerce::nested(obj, "markets", market::transform_map);
        }),
    }
}
