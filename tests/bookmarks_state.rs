//! End-to-end checks of the public surface against JSON state trees.

use bookmark_state::cache::{get_keys_by_location, get_order_cache};
use bookmark_state::state::bookmarks::{get_bookmark, get_bookmarks_by_parent_id, update_favicon};
use bookmark_state::{AppState, BookmarkError};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const FAVICON: &str = "https://brave.com/favicon.ico";

fn record(location: &str, parent: i64, partition: i64) -> (String, Value) {
    let key = format!("{location}|{parent}|{partition}");
    let value = json!({
        "key": key,
        "location": location,
        "title": location,
        "parentFolderId": parent,
        "partitionNumber": partition,
        "objectId": null,
        "type": "bookmark"
    });
    (key, value)
}

/// Builds a state whose caches agree with its records.
fn state_from_records(records: &[(String, Value)]) -> AppState {
    let mut bookmarks = Map::new();
    let mut order: Map<String, Value> = Map::new();
    let mut locations: Map<String, Value> = Map::new();

    for (key, value) in records {
        bookmarks.insert(key.clone(), value.clone());

        let parent = value["parentFolderId"].to_string();
        let bucket = order.entry(parent).or_insert_with(|| json!([]));
        let bucket = bucket.as_array_mut().unwrap();
        let rank = bucket.len();
        bucket.push(json!({ "key": key, "order": rank, "type": "bookmark" }));

        let location = value["location"].as_str().unwrap().to_string();
        let keys = locations.entry(location).or_insert_with(|| json!([]));
        keys.as_array_mut().unwrap().push(json!(key));
    }

    AppState::from_json(json!({
        "windows": [],
        "bookmarks": bookmarks,
        "bookmarkFolders": {},
        "cache": { "bookmarkOrder": order, "bookmarkLocation": locations },
        "tabs": []
    }))
    .unwrap()
}

#[test]
fn favicon_reaches_every_partition_of_a_location() {
    let state = state_from_records(&[
        record("https://brave.com/", 0, 0),
        record("https://brave.com/", 0, 1),
        record("https://brave.com/", 4, 0),
        record("https://clifton.io/", 0, 0),
    ]);

    let next = update_favicon(&state, "https://brave.com/", FAVICON).unwrap();

    for key in ["https://brave.com/|0|0", "https://brave.com/|0|1", "https://brave.com/|4|0"] {
        let favicon = get_bookmark(&next, key).and_then(|b| b.favicon.clone());
        assert_eq!(favicon.as_deref(), Some(FAVICON), "{key}");
    }
    assert!(get_bookmark(&next, "https://clifton.io/|0|0").unwrap().favicon.is_none());
    assert!(get_bookmark(&state, "https://brave.com/|0|0").unwrap().favicon.is_none());
    assert_eq!(next.cache, state.cache);
    assert_eq!(next.to_json().unwrap()["tabs"], json!([]));
}

#[test]
fn bookmarks_list_fails_with_contract_message() {
    let state = AppState::from_json(json!({ "bookmarks": [] })).unwrap();
    let err = update_favicon(&state, "https://brave.com/", FAVICON).unwrap_err();

    assert!(matches!(err, BookmarkError::StructuralContract(_)));
    let message = err.to_string();
    let rest = message.strip_prefix("state must contain ").unwrap();
    assert!(rest.contains(" bookmarks"));
}

#[test]
fn parent_listing_follows_cache_and_skips_stale_keys() {
    let mut state = state_from_records(&[record("https://a.com/", 2, 0), record("https://b.com/", 2, 0)]);
    state = bookmark_state::cache::add_to_order_cache(
        &state,
        2,
        "https://gone.com/|2|0",
        None,
        Some("https://a.com/|2|0"),
        bookmark_state::Placement::After,
    );

    let order: Vec<&str> = get_order_cache(&state, 2).iter().map(|e| e.key.as_str()).collect();
    assert_eq!(order, vec!["https://a.com/|2|0", "https://gone.com/|2|0", "https://b.com/|2|0"]);

    let listed: Vec<String> = get_bookmarks_by_parent_id(&state, Some(2))
        .iter()
        .map(|b| b.key.clone())
        .collect();
    assert_eq!(listed, vec!["https://a.com/|2|0", "https://b.com/|2|0"]);
    assert!(get_bookmarks_by_parent_id(&state, Some(0)).is_empty());
    assert!(get_bookmarks_by_parent_id(&state, None).is_empty());
}

#[test]
fn stale_location_keys_never_create_records() {
    let state = AppState::from_json(json!({
        "bookmarks": {},
        "cache": { "bookmarkLocation": { "https://brave.com": ["https://brave.com|0|0"] } }
    }))
    .unwrap();

    assert_eq!(get_keys_by_location(&state, "https://brave.com").len(), 1);
    let next = update_favicon(&state, "https://brave.com", FAVICON).unwrap();
    assert_eq!(next, state);
}

fn host() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a.com", "b.org", "c.net", "d.io"]).prop_map(|h| format!("https://{h}/"))
}

fn records() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec((host(), 0i64..3, 0i64..2), 0..12).prop_map(|specs| {
        let mut seen = std::collections::BTreeSet::new();
        specs
            .into_iter()
            .map(|(location, parent, partition)| record(&location, parent, partition))
            .filter(|(key, _)| seen.insert(key.clone()))
            .collect()
    })
}

proptest! {
    #[test]
    fn unmatched_location_leaves_bookmarks_equal(records in records()) {
        let state = state_from_records(&records);
        let next = update_favicon(&state, "https://unmatched.example/", FAVICON).unwrap();
        prop_assert_eq!(&next.bookmarks, &state.bookmarks);
    }

    #[test]
    fn unparsable_location_leaves_bookmarks_equal(records in records(), junk in "[a-z-]{1,16}") {
        let state = state_from_records(&records);
        let next = update_favicon(&state, &junk, FAVICON).unwrap();
        prop_assert_eq!(&next.bookmarks, &state.bookmarks);
    }

    #[test]
    fn favicon_propagates_only_to_matching_location(records in records(), target in host()) {
        let state = state_from_records(&records);
        let next = update_favicon(&state, &target, FAVICON).unwrap();

        for (key, value) in &records {
            let favicon = get_bookmark(&next, key).and_then(|b| b.favicon.clone());
            if value["location"] == Value::String(target.clone()) {
                prop_assert_eq!(favicon.as_deref(), Some(FAVICON));
            } else {
                prop_assert_eq!(favicon, None);
            }
        }
    }

    #[test]
    fn parent_listing_matches_cache_order(records in records(), parent in 0i64..3) {
        let state = state_from_records(&records);
        let listed: Vec<String> = get_bookmarks_by_parent_id(&state, Some(parent))
            .iter()
            .map(|b| b.key.clone())
            .collect();
        let expected: Vec<String> = get_order_cache(&state, parent).iter().map(|e| e.key.clone()).collect();
        prop_assert_eq!(listed, expected);
    }
}
