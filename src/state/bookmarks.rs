//! Bookmark record layer.
//!
//! Owns the canonical `bookmarks` section and keeps the cache indices in step
//! when records are added or removed. Every function is pure: it reads the
//! given [`AppState`] and returns a new one (or a lookup result), leaving the
//! input untouched.
//!
//! # Failure Model
//!
//! The only fatal condition is a `bookmarks` section that is not a keyed map,
//! reported as [`BookmarkError::StructuralContract`] by the mutating
//! operations. Everything else is absorbed:
//!
//! | Situation                                   | Outcome                     |
//! |---------------------------------------------|-----------------------------|
//! | location is not an absolute URL             | state returned unchanged    |
//! | no record or cache entry for a location     | state returned unchanged    |
//! | entry is `null` or otherwise malformed      | skipped                     |
//! | cache names a key missing from `bookmarks`  | skipped                     |
//!
//! # Example
//!
//! ```rust
//! use bookmark_state::state::bookmarks::{add_bookmark, get_bookmarks_by_parent_id, update_favicon};
//! use bookmark_state::{AppState, Bookmark, Placement};
//!
//! let state = add_bookmark(&AppState::new(), Bookmark::new("https://brave.com/", "Brave"), None, Placement::After)?;
//! let state = update_favicon(&state, "https://brave.com/", "https://brave.com/favicon.ico")?;
//!
//! let children = get_bookmarks_by_parent_id(&state, Some(0));
//! assert_eq!(children[0].favicon.as_deref(), Some("https://brave.com/favicon.ico"));
//! # Ok::<(), bookmark_state::BookmarkError>(())
//! ```

use super::{AppState, Entries, Entry};
use crate::cache::{location, order, Placement};
use crate::domain::error::{BookmarkError, Result};
use crate::domain::{Bookmark, BookmarkFolder, SiteTag};
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// A child of a folder, as resolved through the ordering index.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteRef {
    Bookmark(Arc<Bookmark>),
    Folder(Arc<BookmarkFolder>),
}

impl SiteRef {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Bookmark(bookmark) => &bookmark.key,
            Self::Folder(folder) => &folder.key,
        }
    }
}

/// Checks that `bookmarks` is a keyed map and returns its entries.
///
/// # Errors
///
/// Returns [`BookmarkError::StructuralContract`] if the section is missing or
/// has any other shape (a list, a string, ...).
pub fn validate_state(state: &AppState) -> Result<&Entries<Bookmark>> {
    state.bookmarks.as_map().ok_or_else(|| {
        let shape = state.bookmarks.shape();
        tracing::error!(shape, "bookmarks section is not a map");
        BookmarkError::StructuralContract(format!("found {shape}"))
    })
}

/// Returns the well-formed record stored under `key`.
#[must_use]
pub fn get_bookmark<'a>(state: &'a AppState, key: &str) -> Option<&'a Arc<Bookmark>> {
    state.bookmarks.get_record(key)
}

/// Whether `key` names a well-formed bookmark record.
#[must_use]
pub fn is_bookmark(state: &AppState, key: &str) -> bool {
    get_bookmark(state, key).is_some()
}

/// Sets `favicon` on every record stored under `location`.
///
/// Candidates are the union of records whose `location` equals the argument
/// and the keys the location index holds for it. Candidates that are missing
/// from `bookmarks` or malformed are skipped. Records that are not updated stay
/// shared with the input state.
///
/// # Errors
///
/// Returns [`BookmarkError::StructuralContract`] if `bookmarks` is not a map.
///
/// # Example
///
/// ```rust
/// use bookmark_state::state::bookmarks::update_favicon;
/// use bookmark_state::AppState;
///
/// let state = AppState::new();
/// let next = update_favicon(&state, "not-a-url", "https://brave.com/favicon.ico")?;
/// assert_eq!(next, state);
/// # Ok::<(), bookmark_state::BookmarkError>(())
/// ```
pub fn update_favicon(state: &AppState, location: &str, favicon: &str) -> Result<AppState> {
    let _span = tracing::debug_span!("update_favicon",
        location = %location,
        favicon = %favicon
    ).entered();

    let entries = validate_state(state)?;

    if let Err(e) = Url::parse(location) {
        tracing::debug!(error = %e, "location is not a URL, leaving state unchanged");
        return Ok(state.clone());
    }

    let candidates: BTreeSet<&str> = entries
        .iter()
        .filter(|(_, entry)| entry.as_record().is_some_and(|record| record.location == location))
        .map(|(key, _)| key.as_str())
        .chain(location::get_keys_by_location(state, location).iter().map(String::as_str))
        .collect();

    let targets: Vec<&str> = candidates
        .into_iter()
        .filter(|key| {
            let found = entries.get(*key).is_some_and(|entry| entry.as_record().is_some());
            if !found {
                tracing::trace!(key = %key, "skipping stale or malformed entry");
            }
            found
        })
        .collect();

    if targets.is_empty() {
        tracing::debug!("no bookmarks match location");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    if let Some(entries) = next.bookmarks.as_map_mut() {
        for key in &targets {
            if let Some(Entry::Record(record)) = entries.get_mut(*key) {
                Arc::make_mut(record).favicon = Some(favicon.to_string());
            }
        }
    }

    tracing::debug!(updated = targets.len(), "favicon updated");
    Ok(next)
}

/// Returns the bookmarks under `parent_folder_id` in cached display order.
///
/// `None` means no parent was given and yields an empty list. Ordering entries
/// whose key is missing or malformed in `bookmarks` are dropped; the remaining
/// records keep their relative order. Folders are not included, see
/// [`get_bookmarks_with_folders`].
#[must_use]
pub fn get_bookmarks_by_parent_id(state: &AppState, parent_folder_id: Option<i64>) -> Vec<Arc<Bookmark>> {
    let Some(parent_folder_id) = parent_folder_id else {
        return Vec::new();
    };

    let _span = tracing::debug_span!("get_bookmarks_by_parent_id", parent_folder_id).entered();

    let bookmarks: Vec<Arc<Bookmark>> = order::get_order_cache(state, parent_folder_id)
        .iter()
        .filter_map(|entry| get_bookmark(state, &entry.key).cloned())
        .collect();

    tracing::debug!(count = bookmarks.len(), "bookmarks resolved");
    bookmarks
}

/// Returns bookmarks and folders under `parent_folder_id` in cached display order.
///
/// Each ordering entry is resolved against `bookmarks` first, then against
/// `bookmarkFolders`. Entries found in neither are dropped.
#[must_use]
pub fn get_bookmarks_with_folders(state: &AppState, parent_folder_id: Option<i64>) -> Vec<SiteRef> {
    let Some(parent_folder_id) = parent_folder_id else {
        return Vec::new();
    };

    order::get_order_cache(state, parent_folder_id)
        .iter()
        .filter_map(|entry| {
            get_bookmark(state, &entry.key)
                .map(|bookmark| SiteRef::Bookmark(Arc::clone(bookmark)))
                .or_else(|| {
                    state
                        .bookmark_folders
                        .get_record(&entry.key)
                        .map(|folder| SiteRef::Folder(Arc::clone(folder)))
                })
        })
        .collect()
}

/// Stores `bookmark` and registers it in both cache indices.
///
/// The key is derived from the record's location, parent and partition, and the
/// record is tagged as a bookmark. An existing record with the same key is
/// replaced. In the ordering index the record goes next to `destination_key`
/// according to `placement`, or at the end of its parent.
///
/// # Errors
///
/// Returns [`BookmarkError::StructuralContract`] if `bookmarks` is not a map.
pub fn add_bookmark(
    state: &AppState,
    bookmark: Bookmark,
    destination_key: Option<&str>,
    placement: Placement,
) -> Result<AppState> {
    validate_state(state)?;

    let key = bookmark.derive_key();
    let _span = tracing::debug_span!("add_bookmark", key = %key).entered();

    let parent_folder_id = bookmark.parent_folder_id;
    let location = bookmark.location.clone();
    let record = Bookmark {
        key: key.clone(),
        tag: Some(SiteTag::bookmark()),
        ..bookmark
    };

    let mut next = state.clone();
    if let Some(entries) = next.bookmarks.as_map_mut() {
        entries.insert(key.clone(), Entry::Record(Arc::new(record)));
    }

    let next = location::add_location_key(&next, &location, &key);
    let next = order::add_to_order_cache(
        &next,
        parent_folder_id,
        &key,
        Some(SiteTag::bookmark()),
        destination_key,
        placement,
    );

    tracing::debug!("bookmark added");
    Ok(next)
}

/// Removes the entry stored under `key` together with its cache entries.
///
/// Malformed entries are removed from `bookmarks` only, since they carry no
/// location or parent to clean up. Unknown keys leave the state unchanged.
///
/// # Errors
///
/// Returns [`BookmarkError::StructuralContract`] if `bookmarks` is not a map.
pub fn remove_bookmark(state: &AppState, key: &str) -> Result<AppState> {
    let _span = tracing::debug_span!("remove_bookmark", key = %key).entered();

    let entries = validate_state(state)?;
    let Some(entry) = entries.get(key) else {
        tracing::debug!("bookmark not found");
        return Ok(state.clone());
    };

    let mut next = state.clone();
    if let Some(record) = entry.as_record() {
        next = location::remove_location_key(&next, &record.location, key);
        next = order::remove_from_order_cache(&next, record.parent_folder_id, key);
    }
    if let Some(entries) = next.bookmarks.as_map_mut() {
        entries.remove(key);
    }

    tracing::debug!("bookmark removed");
    Ok(next)
}
