// THEORY:
// The `SpatialIndex` answers the two geometric questions the core asks: "which
// stored coordinate is closest to this one?" (the reconciler) and "which stored
// coordinates lie within this radius?" (the aggregator).
//
// Key architectural principles:
// 1.  **Static, Bulk-Loaded**: The index is built once from a full slice of
//     coordinates using R*-tree bulk loading (O(n log n)) and never mutated. Every
//     call that needs one builds its own, so there is no shared state to guard.
// 2.  **Slots, Not Records**: Entries store the position of the coordinate in the
//     caller's slice ("slot"). The caller maps a slot back to whatever record it
//     indexed, which keeps the index independent of points vs. cluster nodes.
// 3.  **Euclidean Metric**: Distances are plain Euclidean over `(x, y)`, the same
//     metric the reconciler's tolerance is defined in.

use crate::core_modules::coordinate::Coordinate;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A coordinate stored in the tree along with its slot in the source slice.
#[derive(Debug, Clone, Copy)]
struct IndexedCoordinate {
    slot: usize,
    position: [f64; 2],
}

impl RTreeObject for IndexedCoordinate {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedCoordinate {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Slot of the matched coordinate in the slice the index was built from.
    pub slot: usize,
    /// Euclidean distance from the query to the matched coordinate.
    pub distance: f64,
}

/// Immutable nearest-neighbor index over 2D coordinates.
pub struct SpatialIndex {
    tree: RTree<IndexedCoordinate>,
}

impl SpatialIndex {
    /// Bulk-loads an index over `coordinates`. Slot `i` refers to `coordinates[i]`.
    pub fn build<I>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let entries: Vec<IndexedCoordinate> = coordinates
            .into_iter()
            .enumerate()
            .map(|(slot, c)| IndexedCoordinate {
                slot,
                position: c.as_array(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Finds the stored coordinate closest to `query`. Ties resolve to whichever
    /// entry the tree visits first. Returns `None` only for an empty index.
    pub fn nearest(&self, query: &Coordinate) -> Option<Neighbor> {
        let query = query.as_array();
        self.tree.nearest_neighbor(&query).map(|entry| Neighbor {
            slot: entry.slot,
            distance: entry.distance_2(&query).sqrt(),
        })
    }

    /// Slots of every stored coordinate at Euclidean distance `<= radius` from `query`.
    pub fn within(&self, query: &Coordinate, radius: f64) -> Vec<usize> {
        self.tree
            .locate_within_distance(query.as_array(), radius * radius)
            .map(|entry| entry.slot)
            .collect()
    }
}
