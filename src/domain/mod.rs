//! Domain layer for the bookmark state store.
//!
//! This module contains the record models and the error taxonomy, independent of
//! how records are arranged inside the state tree.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`bookmark`]: Bookmark and folder records, site tags and key derivation
//! - `lenient`: Tolerant field decoders shared with the cache
//!
//! # Examples
//!
//! ```
//! use bookmark_state::domain::{bookmark_key, Bookmark};
//!
//! let bookmark = Bookmark::new("https://brave.com/", "Brave");
//! assert_eq!(bookmark.derive_key(), bookmark_key("https://brave.com/", 0, 0));
//! ```

pub mod bookmark;
pub mod error;
pub(crate) mod lenient;

pub use bookmark::{bookmark_key, Bookmark, BookmarkFolder, SiteTag};
pub use error::{BookmarkError, Result};
