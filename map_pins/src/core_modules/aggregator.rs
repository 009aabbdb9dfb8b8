// THEORY:
// The `aggregator` module is the spatial grouping layer: it turns a flat set of
// locations into the handful of summaries a map can draw at a given zoom level.
//
// The rest of the core only depends on the `Aggregator` trait, so any clustering
// backend that honors its contract can be plugged in. The contract is small: for a
// zoom level, return summaries where every single-point summary sits at the
// point's own coordinate (up to floating-point round-trip error).
//
// `SuperCluster` is the bundled backend, a hierarchical greedy clusterer in the
// style of the well-known supercluster library:
// 1.  **Projection**: Longitude/latitude are projected into the unit Web-Mercator
//     square so that a pixel radius means the same thing everywhere on the map.
// 2.  **Leaf Level**: Level `max_zoom + 1` holds one node per location.
// 3.  **Greedy Merging**: Each level below is built from the one above. Nodes are
//     visited in order; an unclaimed node claims every unclaimed neighbor within
//     `radius / (extent * 2^zoom)` and, if that reaches `min_points`, the group is
//     replaced by one node at the count-weighted centroid.
// 4.  **Leaf Passthrough**: A node that never merged remembers which point it came
//     from, and its summary reports that point's coordinate untouched. The
//     projection round trip is not exact and clamps near the poles, so unprojecting
//     a lone point would move it.
// 5.  **Stateless Utility**: All levels are rebuilt per call, down to the requested
//     zoom only, and dropped afterwards.

use crate::config::ClusteringConfig;
use crate::core_modules::cluster_summary::ClusterSummary;
use crate::core_modules::coordinate::Coordinate;
use crate::core_modules::point::Point;
use crate::core_modules::spatial_index::SpatialIndex;
use crate::error::Result;
use tracing::debug;

/// Groups points into per-zoom cluster summaries.
pub trait Aggregator {
    fn aggregate(&self, points: &[Point], zoom: u8) -> Result<Vec<ClusterSummary>>;

    /// Inclusive zoom range this aggregator accepts, if it restricts one.
    fn zoom_range(&self) -> Option<(u8, u8)> {
        None
    }
}

pub mod mercator {
    use std::f64::consts::PI;

    pub fn lng_x(lng: f64) -> f64 {
        lng / 360.0 + 0.5
    }

    /// Latitude to projected y, clamped to the unit square near the poles.
    pub fn lat_y(lat: f64) -> f64 {
        let sin = (lat * PI / 180.0).sin();
        let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
        y.clamp(0.0, 1.0)
    }

    pub fn x_lng(x: f64) -> f64 {
        (x - 0.5) * 360.0
    }

    pub fn y_lat(y: f64) -> f64 {
        let y2 = (180.0 - y * 360.0) * PI / 180.0;
        360.0 * y2.exp().atan() / PI - 90.0
    }
}

/// A node of one clustering level, in projected space.
#[derive(Debug, Clone, Copy)]
struct Node {
    position: Coordinate,
    count: u32,
    /// Index of the source point while the node is still a single leaf.
    source: Option<usize>,
}

/// Hierarchical greedy clusterer over Web-Mercator space.
#[derive(Debug, Clone)]
pub struct SuperCluster {
    config: ClusteringConfig,
}

impl SuperCluster {
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Builds the level for `zoom` from the level directly above it.
    fn cluster_level(&self, nodes: &[Node], zoom: u8) -> Result<Vec<Node>> {
        let radius = self.config.radius / (self.config.extent * 2f64.powi(i32::from(zoom)));
        let index = SpatialIndex::build(nodes.iter().map(|n| n.position));
        let mut claimed = vec![false; nodes.len()];
        let mut level = Vec::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;

            let neighbors: Vec<usize> = index
                .within(&node.position, radius)
                .into_iter()
                .filter(|&j| !claimed[j])
                .collect();
            let total = node.count + neighbors.iter().map(|&j| nodes[j].count).sum::<u32>();

            if total > node.count && total >= self.config.min_points {
                let mut wx = node.position.x() * f64::from(node.count);
                let mut wy = node.position.y() * f64::from(node.count);
                for &j in &neighbors {
                    claimed[j] = true;
                    wx += nodes[j].position.x() * f64::from(nodes[j].count);
                    wy += nodes[j].position.y() * f64::from(nodes[j].count);
                }
                level.push(Node {
                    position: Coordinate::new(wx / f64::from(total), wy / f64::from(total))?,
                    count: total,
                    source: None,
                });
            } else {
                level.push(*node);
                // Too few to form a cluster; the neighbors survive on their own.
                for &j in &neighbors {
                    claimed[j] = true;
                    level.push(nodes[j]);
                }
            }
        }

        Ok(level)
    }
}

impl Default for SuperCluster {
    fn default() -> Self {
        Self {
            config: ClusteringConfig::default(),
        }
    }
}

impl Aggregator for SuperCluster {
    fn aggregate(&self, points: &[Point], zoom: u8) -> Result<Vec<ClusterSummary>> {
        let zoom = self.config.check_zoom(i64::from(zoom))?;

        let mut level = points
            .iter()
            .enumerate()
            .map(|(slot, p)| -> Result<Node> {
                let projected = Coordinate::new(
                    mercator::lng_x(p.coordinate.x()),
                    mercator::lat_y(p.coordinate.y()),
                )?;
                Ok(Node {
                    position: projected,
                    count: 1,
                    source: Some(slot),
                })
            })
            .collect::<Result<Vec<Node>>>()?;

        for z in (zoom..=self.config.max_zoom).rev() {
            level = self.cluster_level(&level, z)?;
        }

        debug!(points = points.len(), zoom, summaries = level.len(), "Aggregated points");

        level
            .into_iter()
            .map(|node| -> Result<ClusterSummary> {
                let coordinate = match node.source {
                    Some(slot) => points[slot].coordinate,
                    None => Coordinate::new(
                        mercator::x_lng(node.position.x()),
                        mercator::y_lat(node.position.y()),
                    )?,
                };
                ClusterSummary::new(coordinate, node.count)
            })
            .collect()
    }

    fn zoom_range(&self) -> Option<(u8, u8)> {
        Some((self.config.min_zoom, self.config.max_zoom))
    }
}
