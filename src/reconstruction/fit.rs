//! Fitting one canonical shape to one cluster.

use serde::Serialize;
use tracing::{debug, warn};

use super::classify::{classify, ShapeDecision, ShapeFeatures};
use super::ReconstructionMode;
use crate::error::{GeometryError, Result};
use crate::math::hull_2d::convex_hull;
use crate::math::polygon_2d::{ensure_ccw, stride_sample};
use crate::math::stats::{mean_point, percentile, radial_distances};
use crate::math::Point2;
use crate::model::{Circle, Obstacle, Polygon, ShapeKind, MAX_POLYGON_VERTICES};

/// Clusters smaller than this are never fitted.
pub const MIN_CLUSTER_POINTS: usize = 3;
/// Percentile of radial distances used as the circle radius.
pub const CIRCLE_RADIUS_PERCENTILE: f64 = 85.0;
/// Polygons whose farthest vertex is closer than this to their centre are
/// dropped.
pub const MIN_POLYGON_EXTENT: f64 = 0.1;

/// Why a cluster produced no obstacle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    TooFewPoints { points: usize },
    TooFewVertices { vertices: usize },
    TooSmall { extent: f64 },
    FitFailed { message: String },
}

/// Result of reconstructing one cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Fitted {
        obstacle: Obstacle,
        /// Set only in `auto` mode.
        decision: Option<ShapeDecision>,
    },
    Skipped(SkipReason),
}

/// Fits a circle: mean centre, 85th-percentile radius clamped to
/// `[0.05, 5.0]`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` for an empty cluster and
/// `GeometryError::NonFinite` for non-finite coordinates.
pub fn fit_circle(points: &[Point2]) -> Result<Circle> {
    let center =
        mean_point(points).ok_or_else(|| GeometryError::Degenerate("empty cluster".into()))?;
    let distances = radial_distances(points, &center);
    let radius =
        percentile(&distances, CIRCLE_RADIUS_PERCENTILE).ok_or(GeometryError::NonFinite)?;
    Circle::new(center, radius)
}

/// Fits a convex polygon of at most eight vertices.
///
/// Hulls with more vertices are thinned by a uniform stride over the hull
/// ring, which may drop a sharp corner that falls between sampled indices.
fn fit_polygon(points: &[Point2]) -> std::result::Result<Polygon, SkipReason> {
    let hull = convex_hull(points).map_err(|e| SkipReason::FitFailed {
        message: e.to_string(),
    })?;
    let original = hull.len();
    let vertices = stride_sample(&hull, MAX_POLYGON_VERTICES);
    if vertices.len() < 3 {
        return Err(SkipReason::TooFewVertices {
            vertices: vertices.len(),
        });
    }
    if original > vertices.len() {
        debug!(original, reduced = vertices.len(), "thinned polygon hull");
    }
    let vertices = ensure_ccw(vertices);

    let center = mean_point(&vertices).unwrap_or_else(Point2::origin);
    let extent = radial_distances(&vertices, &center)
        .into_iter()
        .fold(0.0, f64::max);
    if extent < MIN_POLYGON_EXTENT {
        return Err(SkipReason::TooSmall { extent });
    }

    Polygon::new(vertices).map_err(|e| SkipReason::FitFailed {
        message: e.to_string(),
    })
}

/// Reconstructs one cluster, reporting why it was skipped if it was.
#[must_use]
pub fn fit_cluster(points: &[Point2], mode: ReconstructionMode) -> FitOutcome {
    if points.len() < MIN_CLUSTER_POINTS {
        return FitOutcome::Skipped(SkipReason::TooFewPoints {
            points: points.len(),
        });
    }

    let (kind, decision) = match mode {
        ReconstructionMode::Circle => (ShapeKind::Circle, None),
        ReconstructionMode::Polygon => (ShapeKind::Polygon, None),
        ReconstructionMode::Auto => match ShapeFeatures::measure(points) {
            Some(features) => {
                let decision = classify(&features);
                debug!(
                    circularity = features.circularity,
                    hull_vertices = features.hull_vertices,
                    size = features.cluster_size,
                    ?decision,
                    "classified cluster"
                );
                (decision.kind(), Some(decision))
            }
            None => (ShapeKind::Polygon, Some(ShapeDecision::PolygonDefault)),
        },
    };

    let fitted = match kind {
        ShapeKind::Circle => fit_circle(points).map(Obstacle::Circle).map_err(|e| {
            SkipReason::FitFailed {
                message: e.to_string(),
            }
        }),
        ShapeKind::Polygon => fit_polygon(points).map(Obstacle::Polygon),
    };

    match fitted {
        Ok(obstacle) => FitOutcome::Fitted { obstacle, decision },
        Err(reason) => {
            if matches!(reason, SkipReason::FitFailed { .. }) {
                warn!(?reason, size = points.len(), "failed to fit obstacle");
            } else {
                debug!(?reason, size = points.len(), "skipped cluster");
            }
            FitOutcome::Skipped(reason)
        }
    }
}

/// Reconstructs one cluster into an obstacle, or `None` when it is skipped.
#[must_use]
pub fn reconstruct(points: &[Point2], mode: ReconstructionMode) -> Option<Obstacle> {
    match fit_cluster(points, mode) {
        FitOutcome::Fitted { obstacle, .. } => Some(obstacle),
        FitOutcome::Skipped(_) => None,
    }
}
