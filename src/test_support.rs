//! Fixtures shared across the crate's unit tests.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::AppState;
use serde_json::json;

pub const BRAVE_URL: &str = "https://brave.com/";
pub const BRAVE_KEY: &str = "https://brave.com/|0|0";
pub const CLIFTON_KEY: &str = "https://clifton.io/|0|0";
pub const FAVICON: &str = "https://brave.com/favicon.ico";

/// Two root-level bookmarks with a consistent order and location cache.
pub fn state_with_data() -> AppState {
    AppState::from_json(json!({
        "windows": [],
        "bookmarks": {
            BRAVE_KEY: {
                "favicon": null,
                "title": "Brave",
                "location": BRAVE_URL,
                "key": BRAVE_KEY,
                "parentFolderId": 0,
                "partitionNumber": 0,
                "objectId": null,
                "type": "bookmark"
            },
            CLIFTON_KEY: {
                "favicon": null,
                "title": "Clifton",
                "location": "https://clifton.io/",
                "key": CLIFTON_KEY,
                "parentFolderId": 0,
                "partitionNumber": 0,
                "objectId": null,
                "type": "bookmark"
            }
        },
        "bookmarkFolders": {},
        "cache": {
            "bookmarkOrder": {
                "0": [
                    { "key": BRAVE_KEY, "order": 0, "type": "bookmark" },
                    { "key": CLIFTON_KEY, "order": 1, "type": "bookmark" }
                ]
            },
            "bookmarkLocation": {
                BRAVE_URL: [BRAVE_KEY],
                "https://clifton.io/": [CLIFTON_KEY]
            }
        },
        "historySites": {},
        "tabs": []
    }))
    .expect("fixture state decodes")
}
