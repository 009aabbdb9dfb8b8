// THEORY:
// `DisplayObject` is the final product of the core: what a map client draws. It is
// a closed two-way choice.
//
// - `Point`: a pin for exactly one location. `identity` links back to the full
//   location record. It is `None` only when reconciliation could not find the
//   location behind a single-point summary (a data inconsistency that has already
//   been logged).
// - `Cluster`: a bubble standing for `member_count` locations. Its identity is
//   minted per response and means nothing outside it.
//
// The wire form keeps the flat shape map clients already consume: every object
// has `position`, `uuid`, `cluster_uuid`, `cluster_count` and `type`, with the
// fields that do not apply set to `null`.

use crate::core_modules::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

/// A renderable map object, either a single pin or a cluster bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "LazyLoadingObject", try_from = "LazyLoadingObject")]
pub enum DisplayObject {
    Point {
        coordinate: Coordinate,
        identity: Option<String>,
    },
    Cluster {
        coordinate: Coordinate,
        cluster_identity: String,
        member_count: u32,
    },
}

impl DisplayObject {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            DisplayObject::Point { coordinate, .. } | DisplayObject::Cluster { coordinate, .. } => {
                *coordinate
            }
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, DisplayObject::Cluster { .. })
    }

    /// Identity of the location behind a resolved point.
    pub fn identity(&self) -> Option<&str> {
        match self {
            DisplayObject::Point { identity, .. } => identity.as_deref(),
            DisplayObject::Cluster { .. } => None,
        }
    }

    pub fn cluster_identity(&self) -> Option<&str> {
        match self {
            DisplayObject::Cluster {
                cluster_identity, ..
            } => Some(cluster_identity),
            DisplayObject::Point { .. } => None,
        }
    }

    /// Number of locations represented. Always 1 for a point.
    pub fn member_count(&self) -> u32 {
        match self {
            DisplayObject::Point { .. } => 1,
            DisplayObject::Cluster { member_count, .. } => *member_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ObjectKind {
    Point,
    Cluster,
}

/// Flat wire record consumed by lazy-loading map clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LazyLoadingObject {
    position: Coordinate,
    uuid: Option<String>,
    cluster_uuid: Option<String>,
    cluster_count: Option<u32>,
    #[serde(rename = "type")]
    kind: ObjectKind,
}

impl From<DisplayObject> for LazyLoadingObject {
    fn from(object: DisplayObject) -> Self {
        match object {
            DisplayObject::Point {
                coordinate,
                identity,
            } => Self {
                position: coordinate,
                uuid: identity,
                cluster_uuid: None,
                cluster_count: None,
                kind: ObjectKind::Point,
            },
            DisplayObject::Cluster {
                coordinate,
                cluster_identity,
                member_count,
            } => Self {
                position: coordinate,
                uuid: None,
                cluster_uuid: Some(cluster_identity),
                cluster_count: Some(member_count),
                kind: ObjectKind::Cluster,
            },
        }
    }
}

impl TryFrom<LazyLoadingObject> for DisplayObject {
    type Error = String;

    fn try_from(raw: LazyLoadingObject) -> Result<Self, Self::Error> {
        match raw.kind {
            ObjectKind::Point => Ok(DisplayObject::Point {
                coordinate: raw.position,
                identity: raw.uuid,
            }),
            ObjectKind::Cluster => {
                let cluster_identity = raw
                    .cluster_uuid
                    .ok_or_else(|| "cluster object without cluster_uuid".to_string())?;
                let member_count = raw
                    .cluster_count
                    .ok_or_else(|| "cluster object without cluster_count".to_string())?;
                Ok(DisplayObject::Cluster {
                    coordinate: raw.position,
                    cluster_identity,
                    member_count,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_serializes_with_null_cluster_fields() {
        let object = DisplayObject::Point {
            coordinate: Coordinate::new(50.0, 60.0).unwrap(),
            identity: Some("test-uuid".into()),
        };
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({
                "position": [50.0, 60.0],
                "uuid": "test-uuid",
                "cluster_uuid": null,
                "cluster_count": null,
                "type": "point"
            })
        );
    }

    #[test]
    fn cluster_serializes_with_null_uuid() {
        let object = DisplayObject::Cluster {
            coordinate: Coordinate::new(50.0, 60.0).unwrap(),
            cluster_identity: "c-0".into(),
            member_count: 5,
        };
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["type"], json!("cluster"));
        assert_eq!(value["uuid"], json!(null));
        assert_eq!(value["cluster_uuid"], json!("c-0"));
        assert_eq!(value["cluster_count"], json!(5));
        assert_eq!(value["position"], json!([50.0, 60.0]));
    }

    #[test]
    fn unmatched_point_keeps_null_uuid() {
        let object = DisplayObject::Point {
            coordinate: Coordinate::new(100.0, 100.0).unwrap(),
            identity: None,
        };
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["type"], json!("point"));
        assert_eq!(value["uuid"], json!(null));
        assert_eq!(object.member_count(), 1);
    }

    #[test]
    fn cluster_without_count_is_rejected() {
        let raw = json!({
            "position": [1.0, 2.0],
            "uuid": null,
            "cluster_uuid": "c-1",
            "cluster_count": null,
            "type": "cluster"
        });
        assert!(serde_json::from_value::<DisplayObject>(raw).is_err());
    }
}
