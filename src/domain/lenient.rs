//! Tolerant field decoders for state read from disk or sync.
//!
//! Stored state is written by older clients and by hand, so a field holding
//! `null` or a value of the wrong type must not reject the object around it.
//! These helpers are used through `#[serde(deserialize_with = ...)]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Decodes a field, falling back to `T::default()` when the stored value has
/// the wrong shape.
///
/// Only a malformed input stream is an error; any well-formed JSON value is
/// accepted.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decodes a map of lists, such as a cache index.
///
/// A map that is not an object decodes as empty. Buckets that are not arrays
/// are dropped, and so are items inside a bucket that do not decode as `T`.
pub(crate) fn buckets<'de, D, T>(deserializer: D) -> Result<Arc<BTreeMap<String, Vec<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(Arc::default());
    };

    let buckets = map
        .into_iter()
        .filter_map(|(key, bucket)| match bucket {
            Value::Array(items) => {
                let items = items.into_iter().filter_map(|item| T::deserialize(item).ok()).collect();
                Some((key, items))
            }
            _ => None,
        })
        .collect();

    Ok(Arc::new(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "or_default")]
        count: i64,
        #[serde(deserialize_with = "buckets")]
        index: Arc<BTreeMap<String, Vec<String>>>,
    }

    #[test]
    fn wrong_types_fall_back_to_default() {
        let sample: Sample = serde_json::from_value(json!({ "count": "three", "index": 4 })).unwrap();
        assert_eq!(sample.count, 0);
        assert!(sample.index.is_empty());
    }

    #[test]
    fn null_falls_back_to_default() {
        let sample: Sample = serde_json::from_value(json!({ "count": null, "index": null })).unwrap();
        assert_eq!(sample.count, 0);
        assert!(sample.index.is_empty());
    }

    #[test]
    fn buckets_drop_bad_shapes_and_keep_the_rest() {
        let sample: Sample = serde_json::from_value(json!({
            "count": 2,
            "index": { "a": ["x", 1, "y"], "b": null, "c": "z" }
        }))
        .unwrap();

        assert_eq!(sample.count, 2);
        assert_eq!(sample.index.len(), 1);
        assert_eq!(sample.index["a"], vec!["x".to_string(), "y".to_string()]);
    }
}
