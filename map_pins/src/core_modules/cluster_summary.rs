// THEORY:
// A `ClusterSummary` is the contract between an aggregator and the reconciler: a
// center and a member count, nothing more. Summaries carry no link back to the
// points they cover, which is exactly the gap the reconciler closes.
//
// The one promise that matters is about single-point summaries: their coordinate
// is the point's own coordinate, not a recomputed centroid. A zero count is never
// valid and is refused at construction and at parse time.

use crate::core_modules::coordinate::Coordinate;
use crate::error::{PreconditionViolation, Result};
use serde::{Deserialize, Serialize};

/// One aggregated group as produced by an aggregator for a single zoom level.
///
/// When `count == 1` the coordinate is the underlying point's own position, not a
/// recomputed centroid. The reconciler depends on that to recover the identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSummary", into = "RawSummary")]
pub struct ClusterSummary {
    coordinate: Coordinate,
    count: u32,
}

impl ClusterSummary {
    /// Builds a summary. A zero `count` is a caller error.
    pub fn new(coordinate: Coordinate, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(PreconditionViolation::ZeroCount);
        }
        Ok(Self { coordinate, count })
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_single(&self) -> bool {
        self.count == 1
    }
}

/// Wire shape emitted by supercluster-style aggregators.
#[derive(Serialize, Deserialize)]
struct RawSummary {
    longitude: f64,
    latitude: f64,
    count: u32,
}

impl TryFrom<RawSummary> for ClusterSummary {
    type Error = PreconditionViolation;

    fn try_from(raw: RawSummary) -> Result<Self> {
        ClusterSummary::new(Coordinate::new(raw.longitude, raw.latitude)?, raw.count)
    }
}

impl From<ClusterSummary> for RawSummary {
    fn from(summary: ClusterSummary) -> Self {
        Self {
            longitude: summary.coordinate.x(),
            latitude: summary.coordinate.y(),
            count: summary.count,
        }
    }
}
