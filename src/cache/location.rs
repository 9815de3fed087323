//! Location index: which record keys are stored under a given URL.
//!
//! One URL can back several records (the same site bookmarked in different
//! folders or partitions). Keys inside a bucket are unique; empty buckets are
//! removed rather than kept around.

use crate::state::AppState;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Returns the keys cached for `location`, or an empty slice if none are.
///
/// The keys are a hint. Some of them may no longer exist in `bookmarks`.
///
/// # Examples
///
/// ```
/// use bookmark_state::cache::get_keys_by_location;
/// use bookmark_state::AppState;
///
/// let state = AppState::new();
/// assert!(get_keys_by_location(&state, "https://brave.com/").is_empty());
/// ```
#[must_use]
pub fn get_keys_by_location<'a>(state: &'a AppState, location: &str) -> &'a [String] {
    state
        .cache
        .bookmark_location
        .get(location)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Records that `key` is stored under `location`.
///
/// Empty locations or keys are ignored, as are keys already present.
#[must_use]
pub fn add_location_key(state: &AppState, location: &str, key: &str) -> AppState {
    if location.is_empty() || key.is_empty() {
        tracing::trace!(location = %location, key = %key, "skipping empty location cache entry");
        return state.clone();
    }
    if get_keys_by_location(state, location).iter().any(|cached| cached == key) {
        return state.clone();
    }

    let mut next = state.clone();
    Arc::make_mut(&mut next.cache.bookmark_location)
        .entry(location.to_string())
        .or_default()
        .push(key.to_string());

    tracing::debug!(location = %location, key = %key, "location cache key added");
    next
}

/// Forgets that `key` is stored under `location`, dropping the bucket once empty.
#[must_use]
pub fn remove_location_key(state: &AppState, location: &str, key: &str) -> AppState {
    if !get_keys_by_location(state, location).iter().any(|cached| cached == key) {
        return state.clone();
    }

    let mut next = state.clone();
    let buckets = Arc::make_mut(&mut next.cache.bookmark_location);
    let emptied = buckets.get_mut(location).is_some_and(|bucket| {
        bucket.retain(|cached| cached != key);
        bucket.is_empty()
    });
    if emptied {
        buckets.remove(location);
    }

    tracing::debug!(location = %location, key = %key, "location cache key removed");
    next
}

/// Rebuilds the location index from the well-formed records in `bookmarks`.
///
/// Malformed entries and records without a location are left out. If
/// `bookmarks` is not a map the resulting index is empty.
#[must_use]
pub fn generate_location_cache(state: &AppState) -> AppState {
    let _span = tracing::debug_span!("generate_location_cache").entered();

    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(entries) = state.bookmarks.as_map() {
        for (key, entry) in entries {
            let Some(record) = entry.as_record() else {
                continue;
            };
            if record.location.is_empty() {
                continue;
            }
            index.entry(record.location.clone()).or_default().push(key.clone());
        }
    }

    tracing::debug!(locations = index.len(), "location cache generated");

    let mut next = state.clone();
    next.cache.bookmark_location = Arc::new(index);
    next
}
