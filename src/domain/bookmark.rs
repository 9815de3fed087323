//! Bookmark and folder record models.
//!
//! Records are stored in the state tree keyed by a composite string built from
//! the location, the parent folder and the partition (see [`bookmark_key`]).
//! Fields the store does not interpret are kept in `extra` so that a record
//! survives a decode/encode cycle unchanged.

use super::lenient::or_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque site type tag supplied by the caller.
///
/// The store only compares tags for equality. The two values it assigns itself
/// are [`SiteTag::BOOKMARK`] and [`SiteTag::BOOKMARK_FOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteTag(pub String);

impl SiteTag {
    pub const BOOKMARK: &'static str = "bookmark";
    pub const BOOKMARK_FOLDER: &'static str = "bookmark-folder";

    #[must_use]
    pub fn bookmark() -> Self {
        Self(Self::BOOKMARK.to_string())
    }

    #[must_use]
    pub fn bookmark_folder() -> Self {
        Self(Self::BOOKMARK_FOLDER.to_string())
    }

    #[must_use]
    pub fn is_bookmark(&self) -> bool {
        self.0 == Self::BOOKMARK
    }

    #[must_use]
    pub fn is_bookmark_folder(&self) -> bool {
        self.0 == Self::BOOKMARK_FOLDER
    }
}

impl fmt::Display for SiteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved site bookmark.
///
/// Any JSON object decodes into a `Bookmark`. A known field that is absent,
/// `null` or of the wrong type (a numeric title, a string parent id) takes its
/// default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bookmark {
    /// Composite identity, `"<location>|<parentFolderId>|<partitionNumber>"`.
    #[serde(deserialize_with = "or_default")]
    pub key: String,

    /// Bookmarked URL.
    #[serde(deserialize_with = "or_default")]
    pub location: String,

    #[serde(deserialize_with = "or_default")]
    pub title: String,

    /// Containing folder, `0` for the root.
    #[serde(deserialize_with = "or_default")]
    pub parent_folder_id: i64,

    #[serde(deserialize_with = "or_default")]
    pub partition_number: i64,

    /// Sync identifier, opaque to the store.
    pub object_id: Option<Value>,

    /// Favicon URL, filled in by [`update_favicon`](crate::state::bookmarks::update_favicon).
    #[serde(deserialize_with = "or_default")]
    pub favicon: Option<String>,

    #[serde(deserialize_with = "or_default")]
    pub theme_color: Option<String>,

    #[serde(rename = "type", deserialize_with = "or_default")]
    pub tag: Option<SiteTag>,

    /// Fields not interpreted by the store.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bookmark {
    /// Creates a root-level bookmark in the default partition.
    ///
    /// The key is left empty; it is derived when the record is added to a state.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookmark_state::Bookmark;
    ///
    /// let bookmark = Bookmark::new("https://brave.com/", "Brave");
    /// assert_eq!(bookmark.parent_folder_id, 0);
    /// assert!(bookmark.favicon.is_none());
    /// ```
    pub fn new(location: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            title: title.into(),
            tag: Some(SiteTag::bookmark()),
            ..Self::default()
        }
    }

    /// Builds this record's composite key from its own fields.
    #[must_use]
    pub fn derive_key(&self) -> String {
        bookmark_key(&self.location, self.parent_folder_id, self.partition_number)
    }
}

/// A bookmark folder.
///
/// Folders live in the `bookmarkFolders` section and share the order index with
/// bookmarks. The store never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkFolder {
    #[serde(deserialize_with = "or_default")]
    pub key: String,
    #[serde(deserialize_with = "or_default")]
    pub folder_id: i64,
    #[serde(deserialize_with = "or_default")]
    pub parent_folder_id: i64,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    pub object_id: Option<Value>,

    #[serde(rename = "type", deserialize_with = "or_default")]
    pub tag: Option<SiteTag>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Builds the composite key identifying a bookmark.
///
/// # Examples
///
/// ```
/// use bookmark_state::domain::bookmark_key;
///
/// assert_eq!(bookmark_key("https://brave.com/", 0, 0), "https://brave.com/|0|0");
/// assert_eq!(bookmark_key("https://brave.com/", 3, 1), "https://brave.com/|3|1");
/// ```
#[must_use]
pub fn bookmark_key(location: &str, parent_folder_id: i64, partition_number: i64) -> String {
    format!("{location}|{parent_folder_id}|{partition_number}")
}
