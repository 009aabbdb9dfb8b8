//! Clustering configuration.
//!
//! The distance tolerance used to recover identities is intentionally not part of
//! this configuration; see [`crate::core_modules::reconciler::DISTANCE_THRESHOLD`].

use crate::error::{PreconditionViolation, Result};
use serde::{Deserialize, Serialize};

/// Tunables for zoom-level aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Lowest zoom level a caller may request.
    pub min_zoom: u8,
    /// Highest zoom level at which points are still merged.
    /// Default: 16
    pub max_zoom: u8,
    /// Zoom used when the caller does not specify one.
    /// Default: 7
    pub default_zoom: u8,
    /// Cluster radius in pixels of a tile.
    /// Default: 200
    pub radius: f64,
    /// Tile extent in pixels; `radius / extent` is the radius as a fraction of a tile.
    /// Default: 512
    pub extent: f64,
    /// Minimum number of points that form a cluster.
    pub min_points: u32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 16,
            default_zoom: 7,
            radius: 200.0,
            extent: 512.0,
            min_points: 2,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        // Levels are stored up to max_zoom + 1.
        if self.max_zoom >= 32 {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "max_zoom {} is too large",
                self.max_zoom
            )));
        }
        if !self.zoom_in_range(i64::from(self.default_zoom)) {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "default_zoom {} is outside {}..={}",
                self.default_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "extent must be positive, got {}",
                self.extent
            )));
        }
        if self.min_points < 2 {
            return Err(PreconditionViolation::InvalidConfig(format!(
                "min_points must be at least 2, got {}",
                self.min_points
            )));
        }
        Ok(())
    }

    pub fn zoom_in_range(&self, zoom: i64) -> bool {
        zoom >= i64::from(self.min_zoom) && zoom <= i64::from(self.max_zoom)
    }

    /// Checks a caller-supplied zoom and narrows it to `u8`.
    pub fn check_zoom(&self, zoom: i64) -> Result<u8> {
        if !self.zoom_in_range(zoom) {
            return Err(PreconditionViolation::InvalidZoom {
                zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(zoom as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ClusteringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_zoom(7), Ok(7));
        assert_eq!(config.check_zoom(0), Ok(0));
        assert_eq!(config.check_zoom(16), Ok(16));
    }

    #[test]
    fn out_of_range_zoom_is_rejected() {
        let config = ClusteringConfig::default();
        assert_eq!(
            config.check_zoom(-1),
            Err(PreconditionViolation::InvalidZoom { zoom: -1, min: 0, max: 16 })
        );
        assert!(config.check_zoom(17).is_err());
    }

    #[test]
    fn inconsistent_configs_are_rejected() {
        let inverted = ClusteringConfig {
            min_zoom: 10,
            max_zoom: 5,
            default_zoom: 7,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let bad_default = ClusteringConfig {
            default_zoom: 20,
            ..Default::default()
        };
        assert!(bad_default.validate().is_err());

        let bad_radius = ClusteringConfig {
            radius: 0.0,
            ..Default::default()
        };
        assert!(bad_radius.validate().is_err());

        let bad_min_points = ClusteringConfig {
            min_points: 1,
            ..Default::default()
        };
        assert!(bad_min_points.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ClusteringConfig = serde_json::from_str(r#"{"radius": 60.0}"#).unwrap();
        assert_eq!(config.radius, 60.0);
        assert_eq!(config.max_zoom, 16);
        assert_eq!(config.extent, 512.0);
    }
}
