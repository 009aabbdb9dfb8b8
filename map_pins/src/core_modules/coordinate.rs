// THEORY:
// The `Coordinate` is the smallest unit of the clustering core: a validated pair of
// floating-point numbers. Everything above it (points, cluster summaries, display
// objects, the spatial index) speaks in coordinates, so this is the one place where
// the "finite numbers only" rule is enforced.
//
// Key architectural principles:
// 1.  **Validated at Construction**: A `Coordinate` can only be built through
//     `Coordinate::new` (or deserialization, which calls it). NaN and infinity are
//     rejected up front, so the index and the distance math never see them.
// 2.  **Axis Agnostic**: The pair is `(x, y)`. By convention x is longitude and y is
//     latitude, and the aggregator relies on that order for its projection. The
//     reconciler only compares coordinates to each other.
// 3.  **Exact Equality**: `PartialEq` is bitwise-by-value `f64` equality. Closeness
//     under tolerance is the reconciler's business, not the coordinate's.

use crate::error::{PreconditionViolation, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A finite `(x, y)` position, longitude first by convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    x: f64,
    y: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting NaN and infinite components.
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(PreconditionViolation::NonFiniteCoordinate { x, y });
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance between two coordinates.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = PreconditionViolation;

    fn try_from(value: [f64; 2]) -> Result<Self> {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        value.as_array()
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <[f64; 2]>::deserialize(deserializer)?;
        Coordinate::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_components() {
        assert!(matches!(
            Coordinate::new(f64::NAN, 1.0),
            Err(PreconditionViolation::NonFiniteCoordinate { .. })
        ));
        assert!(Coordinate::new(1.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(3.0, 4.0).unwrap();
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn serializes_as_position_array() {
        let c = Coordinate::new(50.0, 60.5).unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "[50.0,60.5]");

        let parsed: Coordinate = serde_json::from_str("[50.0,60.5]").unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn deserialization_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Coordinate>("[1.0]").is_err());
        assert!(serde_json::from_str::<Coordinate>("[1.0, 2.0, 3.0]").is_err());
    }
}
