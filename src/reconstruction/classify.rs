//! Circle-versus-polygon decision for `auto` reconstruction.
//!
//! The rule is a fixed, hand-tuned threshold table evaluated in order; the
//! first matching row wins.

use serde::Serialize;

use crate::math::hull_2d::convex_hull;
use crate::math::stats::{mean, mean_point, radial_distances, std_dev};
use crate::math::Point2;
use crate::model::ShapeKind;

/// Added to the mean radial distance before dividing.
pub const CIRCULARITY_EPSILON: f64 = 1e-6;
/// Hull vertex count assumed when the hull cannot be computed.
pub const FALLBACK_HULL_VERTICES: usize = 4;

/// Geometric features that drive the decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeFeatures {
    /// `stdev(d) / (mean(d) + eps)` of the point-to-centroid distances.
    pub circularity: f64,
    /// Number of convex hull vertices.
    pub hull_vertices: usize,
    /// Number of points in the cluster.
    pub cluster_size: usize,
}

impl ShapeFeatures {
    /// Measures a cluster, `None` when it is empty.
    #[must_use]
    pub fn measure(points: &[Point2]) -> Option<Self> {
        let center = mean_point(points)?;
        let distances = radial_distances(points, &center);
        let circularity = std_dev(&distances) / (mean(&distances) + CIRCULARITY_EPSILON);
        let hull_vertices = convex_hull(points).map_or(FALLBACK_HULL_VERTICES, |h| h.len());
        Some(Self {
            circularity,
            hull_vertices,
            cluster_size: points.len(),
        })
    }
}

/// Which row of the threshold table fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeDecision {
    /// `circularity < 0.05` and more than 15 hull vertices.
    VeryCircular,
    /// `circularity < 0.10` and fewer than 40 points.
    SmallRound,
    /// Anything else.
    PolygonDefault,
}

impl ShapeDecision {
    /// Shape family the decision selects.
    #[must_use]
    pub fn kind(self) -> ShapeKind {
        match self {
            Self::VeryCircular | Self::SmallRound => ShapeKind::Circle,
            Self::PolygonDefault => ShapeKind::Polygon,
        }
    }
}

/// Applies the threshold table.
#[must_use]
pub fn classify(features: &ShapeFeatures) -> ShapeDecision {
    if features.circularity < 0.05 && features.hull_vertices > 15 {
        ShapeDecision::VeryCircular
    } else if features.circularity < 0.10 && features.cluster_size < 40 {
        ShapeDecision::SmallRound
    } else {
        ShapeDecision::PolygonDefault
    }
}
