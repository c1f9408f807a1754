//! Response DTOs for the exploration API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::map::{Mode, ParametricMap};
use crate::space::{Bounds, Dimension, Interval, Key, Value};

/// A cached key with its artifact
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub key: Key,
    pub artifact: serde_json::Value,
}

impl EntryView {
    pub fn new(key: Key, artifact: serde_json::Value) -> Self {
        Self { key, artifact }
    }

    /// Collects the map's entries in insertion order.
    pub fn from_map(map: &ParametricMap<serde_json::Value>) -> Vec<Self> {
        map.entries()
            .into_iter()
            .map(|(key, artifact)| Self::new(key.clone(), artifact.clone()))
            .collect()
    }
}

/// Response body for POST /get
pub type GetResponse = EntryView;

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub count: usize,
    pub keys: Vec<Key>,
}

impl KeysResponse {
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for POST /select
#[derive(Debug, Clone, Serialize)]
pub struct SelectResponse {
    /// Keys of the derived map, in insertion order
    pub keys: Vec<Key>,
    /// Soft ranges in effect on the derived map, by dimension name
    pub soft_ranges: BTreeMap<String, Interval>,
    pub entries: Vec<EntryView>,
}

impl SelectResponse {
    pub fn from_map(map: &ParametricMap<serde_json::Value>) -> Self {
        let soft_ranges = map
            .dimensions()
            .iter()
            .zip(map.soft_ranges())
            .filter_map(|(dimension, range)| range.map(|r| (dimension.name().to_string(), r)))
            .collect();

        Self {
            keys: map.keys(),
            soft_ranges,
            entries: EntryView::from_map(map),
        }
    }
}

/// Response body for POST /sample
#[derive(Debug, Clone, Serialize)]
pub struct SampleResponse {
    /// Number of grid points resolved
    pub sampled: usize,
    pub keys: Vec<Key>,
}

impl SampleResponse {
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            sampled: keys.len(),
            keys,
        }
    }
}

/// Response body for GET /snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub count: usize,
    pub entries: Vec<EntryView>,
}

impl SnapshotResponse {
    /// Builds the response from a materialized map, ordered by key.
    pub fn new(snapshot: BTreeMap<Key, serde_json::Value>) -> Self {
        let entries: Vec<EntryView> = snapshot
            .into_iter()
            .map(|(key, artifact)| EntryView::new(key, artifact))
            .collect();
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Description of one dimension for GET /dimensions
#[derive(Debug, Clone, Serialize)]
pub struct DimensionView {
    pub name: String,
    /// "open", "range" or "values"
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_range: Option<Interval>,
}

impl DimensionView {
    pub fn new(dimension: &Dimension, soft_range: Option<Interval>) -> Self {
        let (kind, range, values) = match dimension.bounds() {
            Bounds::Open => ("open", None, None),
            Bounds::Range(interval) => ("range", Some(*interval), None),
            Bounds::Values(values) => ("values", None, Some(values.clone())),
        };
        Self {
            name: dimension.name().to_string(),
            kind,
            range,
            values,
            soft_range,
        }
    }
}

/// Response body for GET /dimensions
#[derive(Debug, Clone, Serialize)]
pub struct DimensionsResponse {
    pub mode: Mode,
    pub generator: &'static str,
    pub capacity: usize,
    pub dimensions: Vec<DimensionView>,
}

impl DimensionsResponse {
    pub fn from_map<A>(map: &ParametricMap<A>) -> Self {
        let dimensions = map
            .dimensions()
            .iter()
            .zip(map.soft_ranges())
            .map(|(dimension, soft)| DimensionView::new(dimension, *soft))
            .collect();
        Self {
            mode: map.mode(),
            generator: map.generator_kind(),
            capacity: map.capacity(),
            dimensions,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of generator invocations
    pub computations: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of cached artifacts
    pub total_entries: usize,
    /// Maximum number of cached artifacts
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            computations: stats.computations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use crate::map::Generator;
    use crate::space::Selection;

    fn json_map() -> ParametricMap<serde_json::Value> {
        ParametricMap::new(
            vec![
                Dimension::values("N", [2, 3]).unwrap(),
                Dimension::range("radius", 0.5, 1.0).unwrap(),
            ],
            Generator::function(|key: &Key| serde_json::json!({ "label": key.to_string() })),
        )
        .unwrap()
    }

    #[test]
    fn test_entry_view_serialize() {
        let view = EntryView::new(key![2, 0.5], serde_json::json!({"sides": 2}));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["key"], serde_json::json!([2, 0.5]));
        assert_eq!(json["artifact"]["sides"], 2);
    }

    #[test]
    fn test_keys_response_count() {
        let resp = KeysResponse::new(vec![key![1], key![2]]);
        assert_eq!(resp.count, 2);
    }

    #[test]
    fn test_dimensions_response() {
        let map = json_map();
        let resp = DimensionsResponse::from_map(&map);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["mode"], "bounded");
        assert_eq!(json["generator"], "function");
        assert_eq!(json["capacity"], 500);
        assert_eq!(json["dimensions"][0]["kind"], "values");
        assert_eq!(json["dimensions"][1]["range"]["max"], 1.0);
        assert!(json["dimensions"][1].get("soft_range").is_none());
    }

    #[test]
    fn test_select_response_lists_soft_ranges() {
        let mut map = json_map();
        map.get(&key![2, 0.6]).unwrap();
        let narrowed = map
            .select(&Selection::new().range("radius", 0.5, 0.7))
            .unwrap();

        let resp = SelectResponse::from_map(&narrowed);
        assert_eq!(resp.keys, vec![key![2, 0.6]]);
        assert_eq!(resp.entries.len(), 1);
        assert_eq!(resp.soft_ranges["radius"], Interval::new(0.5, 0.7).unwrap());
    }

    #[test]
    fn test_snapshot_response_ordered_by_key() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert(key![3], serde_json::json!(3));
        snapshot.insert(key![1], serde_json::json!(1));

        let resp = SnapshotResponse::new(snapshot);
        assert_eq!(resp.count, 2);
        assert_eq!(resp.entries[0].key, key![1]);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            computations: 20,
            evictions: 5,
            total_entries: 15,
        };
        let resp = StatsResponse::new(&stats, 100);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.capacity, 100);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
