//! Ordering index: the display sequence of children under each parent folder.
//!
//! Buckets are keyed by the parent id rendered as a decimal string. Within a
//! bucket, keys are unique and `order` runs from zero without gaps after every
//! write made through this module. Readers trust the stored sequence and do not
//! re-sort it.

use crate::domain::lenient::or_default;
use crate::domain::SiteTag;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One child of a parent folder.
///
/// Only `key` is required. A missing or unreadable `order` decodes as zero; the
/// position in the bucket is what readers go by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub key: String,

    /// Zero-based rank within the parent.
    #[serde(default, deserialize_with = "or_default")]
    pub order: usize,

    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub tag: Option<SiteTag>,
}

/// Where to insert relative to a destination key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    Before,
    #[default]
    After,
}

fn bucket_key(parent_folder_id: i64) -> String {
    parent_folder_id.to_string()
}

fn renumber(bucket: &mut [OrderEntry]) {
    for (rank, entry) in bucket.iter_mut().enumerate() {
        entry.order = rank;
    }
}

/// Returns the ordered children of `parent_folder_id`.
///
/// An unknown parent yields an empty slice.
///
/// # Examples
///
/// ```
/// use bookmark_state::cache::get_order_cache;
/// use bookmark_state::AppState;
///
/// let state = AppState::new();
/// assert!(get_order_cache(&state, 0).is_empty());
/// ```
#[must_use]
pub fn get_order_cache(state: &AppState, parent_folder_id: i64) -> &[OrderEntry] {
    state
        .cache
        .bookmark_order
        .get(&bucket_key(parent_folder_id))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Inserts `key` into the bucket of `parent_folder_id`.
///
/// Without a destination, or when the destination is not in the bucket, the
/// key is appended. A key already in the bucket is moved rather than
/// duplicated. Ranks are renumbered afterwards.
#[must_use]
pub fn add_to_order_cache(
    state: &AppState,
    parent_folder_id: i64,
    key: &str,
    tag: Option<SiteTag>,
    destination_key: Option<&str>,
    placement: Placement,
) -> AppState {
    let _span = tracing::debug_span!("add_to_order_cache",
        parent_folder_id = parent_folder_id,
        key = %key
    ).entered();

    let mut next = state.clone();
    let buckets = Arc::make_mut(&mut next.cache.bookmark_order);
    let bucket = buckets.entry(bucket_key(parent_folder_id)).or_default();

    bucket.retain(|entry| entry.key != key);

    let index = destination_key
        .and_then(|destination| bucket.iter().position(|entry| entry.key == destination))
        .map_or(bucket.len(), |position| match placement {
            Placement::Before => position,
            Placement::After => position + 1,
        });

    bucket.insert(
        index,
        OrderEntry {
            key: key.to_string(),
            order: index,
            tag,
        },
    );
    renumber(bucket);

    tracing::debug!(index, bucket_len = bucket.len(), "order entry placed");
    next
}

/// Removes `key` from the bucket of `parent_folder_id`, renumbering the rest.
///
/// The bucket is dropped once empty. Unknown parents or keys leave the state
/// untouched.
#[must_use]
pub fn remove_from_order_cache(state: &AppState, parent_folder_id: i64, key: &str) -> AppState {
    let bucket_id = bucket_key(parent_folder_id);
    let present = state
        .cache
        .bookmark_order
        .get(&bucket_id)
        .is_some_and(|bucket| bucket.iter().any(|entry| entry.key == key));

    if !present {
        tracing::trace!(parent_folder_id, key = %key, "order entry not cached");
        return state.clone();
    }

    let mut next = state.clone();
    let buckets = Arc::make_mut(&mut next.cache.bookmark_order);
    let emptied = buckets.get_mut(&bucket_id).is_some_and(|bucket| {
        bucket.retain(|entry| entry.key != key);
        renumber(bucket);
        bucket.is_empty()
    });
    if emptied {
        buckets.remove(&bucket_id);
    }
    next
}

/// Drops the whole bucket of `parent_folder_id`.
#[must_use]
pub fn remove_order_parent(state: &AppState, parent_folder_id: i64) -> AppState {
    let bucket_id = bucket_key(parent_folder_id);
    if !state.cache.bookmark_order.contains_key(&bucket_id) {
        return state.clone();
    }

    let mut next = state.clone();
    Arc::make_mut(&mut next.cache.bookmark_order).remove(&bucket_id);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{state_with_data, BRAVE_KEY, CLIFTON_KEY};

    fn keys(state: &AppState, parent: i64) -> Vec<(&str, usize)> {
        get_order_cache(state, parent)
            .iter()
            .map(|entry| (entry.key.as_str(), entry.order))
            .collect()
    }

    #[test]
    fn reads_bucket_in_stored_order() {
        let state = state_with_data();
        assert_eq!(keys(&state, 0), vec![(BRAVE_KEY, 0), (CLIFTON_KEY, 1)]);
    }

    #[test]
    fn entries_without_rank_keep_stored_position() {
        let state = AppState::from_json(serde_json::json!({
            "bookmarks": {},
            "cache": {
                "bookmarkOrder": {
                    "3": [{ "key": "b|3|0" }, { "key": "a|3|0", "order": null, "type": "bookmark" }]
                }
            }
        }))
        .unwrap();

        assert_eq!(keys(&state, 3), vec![("b|3|0", 0), ("a|3|0", 0)]);
        assert!(get_order_cache(&state, 3)[1].tag.as_ref().is_some_and(SiteTag::is_bookmark));

        let state = add_to_order_cache(&state, 3, "c|3|0", None, None, Placement::After);
        assert_eq!(keys(&state, 3), vec![("b|3|0", 0), ("a|3|0", 1), ("c|3|0", 2)]);
    }

    #[test]
    fn unknown_parent_is_empty() {
        let state = state_with_data();
        assert!(get_order_cache(&state, 42).is_empty());
        assert!(get_order_cache(&AppState::new(), 0).is_empty());
    }

    #[test]
    fn appends_without_destination() {
        let state = add_to_order_cache(&state_with_data(), 0, "x|0|0", Some(SiteTag::bookmark()), None, Placement::After);
        assert_eq!(keys(&state, 0), vec![(BRAVE_KEY, 0), (CLIFTON_KEY, 1), ("x|0|0", 2)]);
    }

    #[test]
    fn inserts_before_destination() {
        let state = add_to_order_cache(&state_with_data(), 0, "x|0|0", None, Some(CLIFTON_KEY), Placement::Before);
        assert_eq!(keys(&state, 0), vec![(BRAVE_KEY, 0), ("x|0|0", 1), (CLIFTON_KEY, 2)]);
    }

    #[test]
    fn inserts_after_destination() {
        let state = add_to_order_cache(&state_with_data(), 0, "x|0|0", None, Some(BRAVE_KEY), Placement::After);
        assert_eq!(keys(&state, 0), vec![(BRAVE_KEY, 0), ("x|0|0", 1), (CLIFTON_KEY, 2)]);
    }

    #[test]
    fn moving_existing_key_does_not_duplicate() {
        let state = add_to_order_cache(&state_with_data(), 0, CLIFTON_KEY, None, Some(BRAVE_KEY), Placement::Before);
        assert_eq!(keys(&state, 0), vec![(CLIFTON_KEY, 0), (BRAVE_KEY, 1)]);
    }

    #[test]
    fn creates_bucket_for_new_parent() {
        let original = state_with_data();
        let state = add_to_order_cache(&original, 5, "y|5|0", None, Some("missing"), Placement::Before);
        assert_eq!(keys(&state, 5), vec![("y|5|0", 0)]);
        assert!(get_order_cache(&original, 5).is_empty());
    }

    #[test]
    fn removes_and_renumbers() {
        let state = remove_from_order_cache(&state_with_data(), 0, BRAVE_KEY);
        assert_eq!(keys(&state, 0), vec![(CLIFTON_KEY, 0)]);

        let state = remove_from_order_cache(&state, 0, CLIFTON_KEY);
        assert!(!state.cache.bookmark_order.contains_key("0"));
    }

    #[test]
    fn removing_unknown_key_shares_index() {
        let original = state_with_data();
        let state = remove_from_order_cache(&original, 0, "nope");
        assert!(Arc::ptr_eq(&original.cache.bookmark_order, &state.cache.bookmark_order));
    }

    #[test]
    fn removes_parent_bucket() {
        let state = remove_order_parent(&state_with_data(), 0);
        assert!(get_order_cache(&state, 0).is_empty());

        let again = remove_order_parent(&state, 0);
        assert_eq!(again, state);
    }
}
