// THEORY:
// The `reconciler` module solves the identity half of map clustering. An aggregator
// hands back summaries (a center and a count) with no link to the records they
// came from. For bubbles that is fine, but a summary of exactly one location must
// become a clickable pin, and a pin needs the identity of the location behind it.
//
// This is a data association problem, solved by nearest-neighbor lookup:
//
// 1.  **Index**: Bulk-load a `SpatialIndex` over every source point, once per call.
//     Nothing is cached between calls because the point set may change.
// 2.  **Classify**: Walk the summaries in input order. A summary with `count > 1`
//     becomes a `Cluster` with a freshly minted identity, no lookup needed.
// 3.  **Match**: A summary with `count == 1` asks the index for its nearest point.
//     Aggregators report single-point summaries at the point's own position, give
//     or take floating-point round-trip error, so a match closer than
//     `DISTANCE_THRESHOLD` is that point.
// 4.  **Soft Failure**: If the nearest point is not close enough (or there are no
//     points at all) the aggregator and the point set disagree. The summary still
//     becomes a `Point`, with no identity, and the miss is logged and recorded.
//     The call never aborts for this.
//
// The output always has one object per summary, in summary order. Inputs are only
// borrowed; output records are new values.

use crate::core_modules::cluster_summary::ClusterSummary;
use crate::core_modules::coordinate::Coordinate;
use crate::core_modules::display_object::DisplayObject;
use crate::core_modules::identity::{ClusterIdGenerator, UuidGenerator};
use crate::core_modules::point::Point;
use crate::core_modules::spatial_index::SpatialIndex;
use crate::error::{PreconditionViolation, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Maximum distance for a single-point summary to be considered the same location
/// as a source point. Fixed; absorbs floating-point round-trip error only.
pub const DISTANCE_THRESHOLD: f64 = 1e-8;

/// A single-point summary for which no source point was close enough.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedCluster {
    /// Position of the summary in the input sequence.
    pub summary_index: usize,
    pub coordinate: Coordinate,
    /// Distance to the nearest source point, `None` if there were no points.
    pub nearest_distance: Option<f64>,
}

/// Output of one reconciliation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One display object per input summary, in input order.
    pub objects: Vec<DisplayObject>,
    /// Diagnostics for single-point summaries left without an identity.
    pub unmatched: Vec<UnmatchedCluster>,
}

impl Reconciliation {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_objects(self) -> Vec<DisplayObject> {
        self.objects
    }
}

/// Stateless identity reconciler. Holds only the cluster identity generator.
#[derive(Debug, Clone, Default)]
pub struct Reconciler<G = UuidGenerator> {
    generator: G,
}

impl Reconciler<UuidGenerator> {
    pub fn new() -> Self {
        Self {
            generator: UuidGenerator,
        }
    }
}

impl<G: ClusterIdGenerator> Reconciler<G> {
    pub fn with_generator(generator: G) -> Self {
        Self { generator }
    }

    /// Classifies every summary and recovers identities for single-point ones.
    ///
    /// Fails only for malformed input: duplicate identities in `points`.
    pub fn reconcile(&self, points: &[Point], summaries: &[ClusterSummary]) -> Result<Reconciliation> {
        ensure_unique_identities(points)?;

        let index = SpatialIndex::build(points.iter().map(|p| p.coordinate));
        let mut objects = Vec::with_capacity(summaries.len());
        let mut unmatched = Vec::new();

        for (summary_index, summary) in summaries.iter().enumerate() {
            let coordinate = summary.coordinate();

            if !summary.is_single() {
                objects.push(DisplayObject::Cluster {
                    coordinate,
                    cluster_identity: self.generator.next_id(),
                    member_count: summary.count(),
                });
                continue;
            }

            let nearest = index.nearest(&coordinate);
            match nearest {
                Some(hit) if hit.distance < DISTANCE_THRESHOLD => {
                    objects.push(DisplayObject::Point {
                        coordinate,
                        identity: Some(points[hit.slot].identity.clone()),
                    });
                }
                _ => {
                    let nearest_distance = nearest.map(|hit| hit.distance);
                    warn!(
                        x = coordinate.x(),
                        y = coordinate.y(),
                        nearest_distance = ?nearest_distance,
                        threshold = DISTANCE_THRESHOLD,
                        "No matching identity found for single-point cluster"
                    );
                    unmatched.push(UnmatchedCluster {
                        summary_index,
                        coordinate,
                        nearest_distance,
                    });
                    objects.push(DisplayObject::Point {
                        coordinate,
                        identity: None,
                    });
                }
            }
        }

        debug!(
            points = index.len(),
            summaries = summaries.len(),
            clusters = objects.iter().filter(|o| o.is_cluster()).count(),
            unmatched = unmatched.len(),
            "Reconciled cluster summaries"
        );

        Ok(Reconciliation { objects, unmatched })
    }
}

/// Reconciles with the default random UUID generator and drops the diagnostics.
pub fn reconcile(points: &[Point], summaries: &[ClusterSummary]) -> Result<Vec<DisplayObject>> {
    Reconciler::new()
        .reconcile(points, summaries)
        .map(Reconciliation::into_objects)
}

fn ensure_unique_identities(points: &[Point]) -> Result<()> {
    let mut seen = HashSet::with_capacity(points.len());
    for point in points {
        if !seen.insert(point.identity.as_str()) {
            return Err(PreconditionViolation::DuplicateIdentity(point.identity.clone()));
        }
    }
    Ok(())
}
