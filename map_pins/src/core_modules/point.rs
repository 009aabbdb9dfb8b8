// THEORY:
// A `Point` is one geo-located record as it exists in the data store: an identity
// handed out at ingestion time, a position, and whatever other fields the location
// happens to carry. The clustering core only ever reads the first two. The rest is
// kept in `attributes` and passed through untouched so callers can round-trip
// their records without the core knowing their schema.

use crate::core_modules::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single geo-located record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Opaque identity assigned at ingestion. Never reassigned.
    #[serde(rename = "uuid")]
    pub identity: String,
    #[serde(rename = "position")]
    pub coordinate: Coordinate,
    /// Any other location fields, carried opaquely.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Point {
    pub fn new(identity: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            identity: identity.into(),
            coordinate,
            attributes: Map::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }
}
