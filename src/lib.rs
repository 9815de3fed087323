//! Bookmark State: pure operations over an immutable bookmark state tree.
//!
//! The crate reads and transforms a single application-state value containing
//! bookmark records, folder records and two derived indices:
//! - An ordering index (parent folder → ordered children)
//! - A location index (URL → keys of the records saved under it)
//!
//! Every operation takes the state by reference and returns a new value. The
//! input is never mutated, and anything an operation does not touch is shared
//! between the input and the output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Caller (reducer / action dispatcher)               │  ← Out of scope
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Record Layer (state/bookmarks)                     │
//! │  - update_favicon                                   │
//! │  - get_bookmarks_by_parent_id                       │
//! │  - add / remove / lookup                            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Cache Index Layer (cache/)                         │
//! │  - order: parentId → [OrderEntry]                   │
//! │  - location: url → [key]                            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  State tree (state/) & Domain (domain/)             │
//! │  - AppState, Section, Entry                         │
//! │  - Bookmark, BookmarkFolder, SiteTag, errors        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Record models and the error type
//! - [`state`]: The state tree and the record layer
//! - [`cache`]: Ordering and location indices
//! - [`observability`]: Tracing subscriber with rotating file output
//!
//! # Error Model
//!
//! A `bookmarks` section that is not a keyed map is the one fatal condition
//! ([`BookmarkError::StructuralContract`]). Null or malformed entries, stale
//! cache keys and unparsable URLs are tolerated: the affected item is skipped
//! and a well-defined state is returned.
//!
//! # Example
//!
//! ```rust
//! use bookmark_state::state::bookmarks::{get_bookmarks_by_parent_id, update_favicon};
//! use bookmark_state::AppState;
//! use serde_json::json;
//!
//! let state = AppState::from_json(json!({
//!     "bookmarks": {
//!         "https://brave.com/|0|0": {
//!             "key": "https://brave.com/|0|0",
//!             "location": "https://brave.com/",
//!             "title": "Brave",
//!             "type": "bookmark"
//!         }
//!     },
//!     "cache": {
//!         "bookmarkOrder": { "0": [{ "key": "https://brave.com/|0|0", "order": 0 }] },
//!         "bookmarkLocation": { "https://brave.com/": ["https://brave.com/|0|0"] }
//!     }
//! }))?;
//!
//! let state = update_favicon(&state, "https://brave.com/", "https://brave.com/favicon.ico")?;
//! let root = get_bookmarks_by_parent_id(&state, Some(0));
//! assert_eq!(root[0].favicon.as_deref(), Some("https://brave.com/favicon.ico"));
//! # Ok::<(), bookmark_state::BookmarkError>(())
//! ```

pub mod cache;
pub mod domain;
pub mod observability;
pub mod state;

#[cfg(test)]
pub mod test_support;

pub use cache::{Cache, OrderEntry, Placement};
pub use domain::{Bookmark, BookmarkError, BookmarkFolder, Result, SiteTag};
pub use state::bookmarks::SiteRef;
pub use state::{AppState, Entry, Section};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Host configuration for the store's ambient services.
///
/// The operations themselves take no configuration; this only controls tracing.
///
/// # Example
///
/// ```toml
/// trace_level = "bookmark_state=debug"
/// trace_file = "/var/log/browser/bookmarks.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive for emitted spans and events. Default: `"info"`
    pub trace_level: Option<String>,

    /// File receiving trace output. Tracing stays off when unset.
    pub trace_file: Option<PathBuf>,
}

impl Config {
    /// Parses configuration from a host-supplied key/value map.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bookmark_state::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "debug".to_string());
    /// map.insert("trace_file".to_string(), " ".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert!(config.trace_file.is_none());
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let value = |name: &str| {
            config
                .get(name)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            trace_level: value("trace_level"),
            trace_file: value("trace_file").map(PathBuf::from),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Config`] if the text is not valid TOML or a key
    /// has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BookmarkError::Config(format!("invalid config: {e}")))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Io`] if the file cannot be read and
    /// [`BookmarkError::Config`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Initializes tracing from `config` and returns an empty, valid state.
///
/// # Example
///
/// ```rust
/// use bookmark_state::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.bookmarks.as_map().is_some());
/// ```
pub fn initialize(config: &Config) -> AppState {
    let installed = observability::init_tracing(config);
    tracing::debug!(tracing_installed = installed, "initializing bookmark state");
    AppState::new()
}
