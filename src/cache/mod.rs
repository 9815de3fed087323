//! Derived secondary indices over the bookmark records.
//!
//! The cache keeps two lookups alongside the canonical `bookmarks` section:
//!
//! - `bookmarkOrder`: parent folder id (stringified) → ordered [`OrderEntry`] list
//! - `bookmarkLocation`: URL → keys of every record stored under that URL
//!
//! Both are advisory. They may be stale with respect to the records, so every
//! reader filters what it gets back against the canonical section instead of
//! trusting it. Writers in [`order`] and [`location`] are total and return a
//! new [`AppState`](crate::AppState).
//!
//! # Modules
//!
//! - [`order`]: Per-parent ordering index
//! - [`location`]: URL to key index

pub mod location;
pub mod order;

pub use location::{add_location_key, generate_location_cache, get_keys_by_location, remove_location_key};
pub use order::{add_to_order_cache, get_order_cache, remove_from_order_cache, remove_order_parent, OrderEntry, Placement};

use crate::domain::lenient::buckets;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The `cache` section of the state tree.
///
/// An index that is absent, `null` or not an object decodes as empty. Inside an
/// index, buckets that are not lists are dropped, as are bucket items of the
/// wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cache {
    #[serde(deserialize_with = "buckets")]
    pub bookmark_order: Arc<BTreeMap<String, Vec<OrderEntry>>>,

    #[serde(deserialize_with = "buckets")]
    pub bookmark_location: Arc<BTreeMap<String, Vec<String>>>,
}
