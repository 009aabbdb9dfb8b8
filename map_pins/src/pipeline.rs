// THEORY:
// The `pipeline` module is the top-level API of the clustering core. It strings the
// two stages together behind one call so request handlers never touch the parts:
//
//   points + zoom --(Aggregator)--> cluster summaries --(Reconciler)--> display objects
//
// Both stages are pluggable: any `Aggregator` for the grouping and any
// `ClusterIdGenerator` for the ephemeral cluster identities. The pipeline itself
// holds no per-call state, so a single instance can serve concurrent requests.

use crate::config::ClusteringConfig;
use crate::core_modules::aggregator::{Aggregator, SuperCluster};
use crate::core_modules::identity::{ClusterIdGenerator, UuidGenerator};
use crate::core_modules::point::Point;
use crate::core_modules::reconciler::{Reconciler, Reconciliation};
use crate::error::{PreconditionViolation, Result};
use tracing::debug;

/// Aggregation followed by identity reconciliation.
#[derive(Debug, Clone)]
pub struct ClusteringPipeline<A = SuperCluster, G = UuidGenerator> {
    config: ClusteringConfig,
    aggregator: A,
    reconciler: Reconciler<G>,
}

impl ClusteringPipeline<SuperCluster, UuidGenerator> {
    /// The bundled supercluster-style aggregator with random cluster identities.
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        let aggregator = SuperCluster::new(config.clone())?;
        Ok(Self {
            config,
            aggregator,
            reconciler: Reconciler::new(),
        })
    }
}

impl<A: Aggregator, G: ClusterIdGenerator> ClusteringPipeline<A, G> {
    /// Assembles a pipeline from custom parts.
    ///
    /// `config` decides which zooms callers may request. It must stay inside the
    /// aggregator's own range, otherwise a zoom the pipeline accepts could still
    /// be refused by the aggregator.
    pub fn with_parts(config: ClusteringConfig, aggregator: A, generator: G) -> Result<Self> {
        config.validate()?;
        if let Some((min, max)) = aggregator.zoom_range() {
            if config.min_zoom < min || config.max_zoom > max {
                return Err(PreconditionViolation::InvalidConfig(format!(
                    "zoom range {}..={} exceeds the aggregator's {min}..={max}",
                    config.min_zoom, config.max_zoom
                )));
            }
        }
        Ok(Self {
            config,
            aggregator,
            reconciler: Reconciler::with_generator(generator),
        })
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Clusters `points` for `zoom` and resolves identities of single-point clusters.
    pub fn cluster(&self, points: &[Point], zoom: u8) -> Result<Reconciliation> {
        let zoom = self.config.check_zoom(i64::from(zoom))?;
        let summaries = self.aggregator.aggregate(points, zoom)?;
        let reconciliation = self.reconciler.reconcile(points, &summaries)?;
        debug!(
            zoom,
            objects = reconciliation.len(),
            unmatched = reconciliation.unmatched.len(),
            "Clustering pipeline finished"
        );
        Ok(reconciliation)
    }

    pub fn cluster_at_default_zoom(&self, points: &[Point]) -> Result<Reconciliation> {
        self.cluster(points, self.config.default_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::cluster_summary::ClusterSummary;
    use crate::core_modules::coordinate::Coordinate;
    use crate::core_modules::identity::SequentialIdGenerator;

    fn point(id: &str, x: f64, y: f64) -> Point {
        Point::new(id, Coordinate::new(x, y).unwrap())
    }

    /// Reports fixed summaries regardless of input, like a misbehaving backend.
    struct FixedAggregator(Vec<ClusterSummary>);

    impl Aggregator for FixedAggregator {
        fn aggregate(&self, _points: &[Point], _zoom: u8) -> Result<Vec<ClusterSummary>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn high_zoom_resolves_every_point() {
        let points = vec![point("uuid-1", 19.94, 50.06), point("uuid-2", 21.01, 52.23)];
        let pipeline = ClusteringPipeline::new(ClusteringConfig::default()).unwrap();

        let result = pipeline.cluster(&points, 16).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.unmatched.is_empty());
        let mut ids: Vec<&str> = result.objects.iter().filter_map(|o| o.identity()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["uuid-1", "uuid-2"]);
    }

    #[test]
    fn low_zoom_collapses_to_one_cluster() {
        let points = vec![point("uuid-1", 19.94, 50.06), point("uuid-2", 21.01, 52.23)];
        let pipeline = ClusteringPipeline::with_parts(
            ClusteringConfig::default(),
            SuperCluster::default(),
            SequentialIdGenerator::new("c"),
        )
        .unwrap();

        let result = pipeline.cluster(&points, 1).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.objects[0].cluster_identity(), Some("c-0"));
        assert_eq!(result.objects[0].member_count(), 2);
    }

    #[test]
    fn default_zoom_comes_from_config() {
        let points = vec![point("uuid-1", 19.94, 50.06)];
        let pipeline = ClusteringPipeline::new(ClusteringConfig::default()).unwrap();
        let result = pipeline.cluster_at_default_zoom(&points).unwrap();
        assert_eq!(result.objects[0].identity(), Some("uuid-1"));
    }

    #[test]
    fn invalid_zoom_is_a_hard_error() {
        let pipeline = ClusteringPipeline::new(ClusteringConfig::default()).unwrap();
        assert!(matches!(
            pipeline.cluster(&[], 17),
            Err(PreconditionViolation::InvalidZoom { zoom: 17, .. })
        ));
    }

    #[test]
    fn zoom_range_wider_than_aggregator_is_rejected() {
        let wide = ClusteringConfig {
            max_zoom: 20,
            ..Default::default()
        };
        let err = ClusteringPipeline::with_parts(wide, SuperCluster::default(), SequentialIdGenerator::default())
            .unwrap_err();
        assert!(matches!(err, PreconditionViolation::InvalidConfig(_)));

        let narrow = ClusteringConfig {
            min_zoom: 2,
            max_zoom: 12,
            ..Default::default()
        };
        let pipeline =
            ClusteringPipeline::with_parts(narrow, SuperCluster::default(), SequentialIdGenerator::default()).unwrap();
        assert!(pipeline.cluster(&[], 14).is_err());
        assert!(pipeline.cluster(&[], 12).is_ok());
    }

    #[test]
    fn inconsistent_aggregator_output_is_soft() {
        let stray = ClusterSummary::new(Coordinate::new(100.0, 80.0).unwrap(), 1).unwrap();
        let pipeline = ClusteringPipeline::with_parts(
            ClusteringConfig::default(),
            FixedAggregator(vec![stray]),
            SequentialIdGenerator::default(),
        )
        .unwrap();

        let result = pipeline.cluster(&[point("uuid-1", 1.0, 1.0)], 10).unwrap();
        assert_eq!(result.objects[0].identity(), None);
        assert_eq!(result.unmatched.len(), 1);
    }
}
