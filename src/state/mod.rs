//! Application state tree holding bookmark records and their indices.
//!
//! This module defines [`AppState`], the immutable value every operation reads
//! and returns. It mirrors the caller's state tree: the `bookmarks` and
//! `bookmarkFolders` sections, the derived `cache`, and any unrelated top-level
//! sections (windows, tabs, history) carried through untouched.
//!
//! # Representation
//!
//! ```text
//! AppState
//! ├── bookmarks: Section<Bookmark>          // key → Entry (record or malformed)
//! ├── bookmarkFolders: Section<BookmarkFolder>
//! ├── cache: Cache
//! │   ├── bookmarkOrder: parentId → [OrderEntry]
//! │   └── bookmarkLocation: url → [key]
//! └── ...: other sections, kept verbatim
//! ```
//!
//! Sections and records sit behind `Arc`. Operations clone the root (which only
//! bumps reference counts) and copy on write with `Arc::make_mut`, so anything an
//! operation does not touch stays shared with the input state.
//!
//! # Example
//!
//! ```rust
//! use bookmark_state::AppState;
//! use serde_json::json;
//!
//! let state = AppState::from_json(json!({
//!     "bookmarks": {},
//!     "tabs": []
//! }))?;
//! assert!(state.bookmarks.as_map().is_some());
//! assert_eq!(state.to_json()?["tabs"], json!([]));
//! # Ok::<(), bookmark_state::BookmarkError>(())
//! ```

pub mod bookmarks;

use crate::cache::Cache;
use crate::domain::error::{BookmarkError, Result};
use crate::domain::lenient::or_default;
use crate::domain::{Bookmark, BookmarkFolder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Records of one section, keyed by composite key.
pub type Entries<T> = BTreeMap<String, Entry<T>>;

/// A single value inside a keyed section.
///
/// Any JSON object is a [`Entry::Record`]; its known fields decode leniently.
/// Everything else (`null`, a bare string, a list) is kept as
/// [`Entry::Malformed`] so the section as a whole still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Record(Arc<T>),
    Malformed(Value),
}

impl<T> Entry<T> {
    #[must_use]
    pub const fn as_record(&self) -> Option<&Arc<T>> {
        match self {
            Self::Record(record) => Some(record),
            Self::Malformed(_) => None,
        }
    }
}

/// A keyed section of the state tree.
///
/// Callers are supposed to supply a map. Any other shape is still representable
/// so it can be reported by [`bookmarks::validate_state`] instead of failing
/// during decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Map(Arc<Entries<T>>),
    Other(Value),
}

impl<T> Section<T> {
    /// An empty map section.
    #[must_use]
    pub fn empty() -> Self {
        Self::Map(Arc::new(BTreeMap::new()))
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Entries<T>> {
        match self {
            Self::Map(entries) => Some(entries),
            Self::Other(_) => None,
        }
    }

    /// Looks up a well-formed record, skipping malformed entries.
    #[must_use]
    pub fn get_record(&self, key: &str) -> Option<&Arc<T>> {
        self.as_map()?.get(key)?.as_record()
    }

    /// Short name of the JSON shape found in place of a map.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Map(_) => "map",
            Self::Other(Value::Null) => "nothing",
            Self::Other(Value::Array(_)) => "a list",
            Self::Other(Value::String(_)) => "a string",
            Self::Other(Value::Number(_)) => "a number",
            Self::Other(Value::Bool(_)) => "a boolean",
            Self::Other(Value::Object(_)) => "an object",
        }
    }
}

impl<T: Clone> Section<T> {
    /// Mutable access to the entries, copying them first if they are shared.
    pub fn as_map_mut(&mut self) -> Option<&mut Entries<T>> {
        match self {
            Self::Map(entries) => Some(Arc::make_mut(entries)),
            Self::Other(_) => None,
        }
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self::empty()
    }
}

fn missing_section() -> Section<Bookmark> {
    Section::Other(Value::Null)
}

/// The bookmark-related part of the application state tree.
///
/// A missing `bookmarks` section decodes as [`Section::Other`] and is rejected
/// by the record layer like any other non-map shape. Missing folders decode as
/// empty, and so does a missing cache or one that is not an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default = "missing_section")]
    pub bookmarks: Section<Bookmark>,

    #[serde(default)]
    pub bookmark_folders: Section<BookmarkFolder>,

    #[serde(default, deserialize_with = "or_default")]
    pub cache: Cache,

    /// Unrelated top-level sections, carried through unchanged.
    #[serde(flatten)]
    pub other: Arc<Map<String, Value>>,
}

impl AppState {
    /// Creates an empty, structurally valid state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bookmark_state::AppState;
    ///
    /// let state = AppState::new();
    /// assert!(state.bookmarks.as_map().is_some_and(|b| b.is_empty()));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            bookmarks: Section::empty(),
            bookmark_folders: Section::empty(),
            cache: Cache::default(),
            other: Arc::new(Map::new()),
        }
    }

    /// Decodes a state tree from its JSON form.
    ///
    /// Malformed bookmark entries, non-map sections and damaged cache indices
    /// are accepted here. Only a value that is not a JSON object is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Parse`] if the value is not an object.
    pub fn from_json(value: Value) -> Result<Self> {
        let state: Self = serde_json::from_value(value)
            .map_err(|e| BookmarkError::Parse(format!("failed to decode state: {e}")))?;

        tracing::trace!(
            bookmarks = state.bookmarks.as_map().map_or(0, BTreeMap::len),
            order_buckets = state.cache.bookmark_order.len(),
            location_buckets = state.cache.bookmark_location.len(),
            "decoded state"
        );

        Ok(state)
    }

    /// Encodes the state tree back into JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Parse`] if serialization fails, which only
    /// happens if an unrelated section collides with a bookmark section name.
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| BookmarkError::Parse(format!("failed to encode state: {e}")))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
