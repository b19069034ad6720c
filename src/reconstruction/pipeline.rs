use tracing::{debug, info};

use super::cluster::cluster;
use super::fit::{fit_cluster, FitOutcome, SkipReason};
use super::{ReconstructionParams, ShapeDecision};
use crate::error::Result;
use crate::math::Point2;
use crate::model::{ObstacleId, ObstacleModel, ObstacleModelBuilder};

/// What happened to one cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterFate {
    Fitted {
        id: ObstacleId,
        decision: Option<ShapeDecision>,
    },
    Skipped(SkipReason),
}

/// Per-cluster record of a reconstruction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    /// Number of points in the cluster.
    pub size: usize,
    pub fate: ClusterFate,
}

/// Result of reconstructing a whole point cloud.
#[derive(Debug, Clone)]
pub struct ReconstructionReport {
    pub model: ObstacleModel,
    pub clusters: Vec<ClusterOutcome>,
    /// Points labelled as noise by the clustering step.
    pub noise_points: usize,
}

impl ReconstructionReport {
    /// Number of clusters that produced no obstacle.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.clusters
            .iter()
            .filter(|c| matches!(c.fate, ClusterFate::Skipped(_)))
            .count()
    }
}

/// Turns a raw point cloud into an [`ObstacleModel`].
///
/// Points are clustered with DBSCAN, then every cluster is fitted on its
/// own; a cluster that cannot be fitted is recorded and skipped without
/// affecting the others.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    params: ReconstructionParams,
}

impl Reconstruction {
    /// Creates a new reconstruction with the given parameters.
    #[must_use]
    pub fn new(params: ReconstructionParams) -> Self {
        Self { params }
    }

    /// Executes the reconstruction.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` for invalid clustering
    /// parameters.
    pub fn execute(&self, points: &[Point2]) -> Result<ReconstructionReport> {
        let clusters = cluster(points, self.params.eps, self.params.min_samples)?;
        let clustered: usize = clusters.iter().map(Vec::len).sum();

        let mut builder = ObstacleModelBuilder::new();
        let mut outcomes = Vec::with_capacity(clusters.len());
        for (idx, members) in clusters.iter().enumerate() {
            let fate = match fit_cluster(members, self.params.mode) {
                FitOutcome::Fitted { obstacle, decision } => {
                    debug!(
                        cluster = idx,
                        kind = ?obstacle.kind(),
                        size = members.len(),
                        "fitted obstacle"
                    );
                    ClusterFate::Fitted {
                        id: builder.add(obstacle, members),
                        decision,
                    }
                }
                FitOutcome::Skipped(reason) => ClusterFate::Skipped(reason),
            };
            outcomes.push(ClusterOutcome {
                size: members.len(),
                fate,
            });
        }

        let report = ReconstructionReport {
            model: builder.build(),
            clusters: outcomes,
            noise_points: points.len().saturating_sub(clustered),
        };
        info!(
            points = points.len(),
            clusters = report.clusters.len(),
            obstacles = report.model.len(),
            skipped = report.skipped(),
            noise = report.noise_points,
            "reconstructed obstacle model"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::model::{Obstacle, ShapeKind};
    use crate::reconstruction::ReconstructionMode;

    fn ring(cx: f64, cy: f64, r: f64, n: u32) -> Vec<Point2> {
        (0..n)
            .map(|i| {
                let a = f64::from(i) * TAU / f64::from(n);
                Point2::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect()
    }

    fn filled_square(x0: f64, y0: f64, side: f64) -> Vec<Point2> {
        let mut pts = Vec::new();
        for i in 0..=12 {
            for j in 0..=12 {
                pts.push(Point2::new(
                    x0 + side * f64::from(i) / 12.0,
                    y0 + side * f64::from(j) / 12.0,
                ));
            }
        }
        pts
    }

    #[test]
    fn empty_cloud_gives_empty_model() {
        let report = Reconstruction::new(ReconstructionParams::default())
            .execute(&[])
            .unwrap();
        assert!(report.model.is_empty());
        assert!(report.clusters.is_empty());
        assert_eq!(report.noise_points, 0);
    }

    #[test]
    fn mixed_scene_reconstructs_each_cluster() {
        let mut pts = ring(5.0, 5.0, 1.0, 64);
        pts.extend(filled_square(-4.0, 2.0, 1.5));
        pts.push(Point2::new(20.0, 20.0));
        let report = Reconstruction::new(ReconstructionParams::default())
            .execute(&pts)
            .unwrap();
        assert_eq!(report.model.len(), 2);
        assert_eq!(report.model.count_of(ShapeKind::Circle), 1);
        assert_eq!(report.model.count_of(ShapeKind::Polygon), 1);
        assert_eq!(report.noise_points, 1);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn failed_cluster_does_not_abort_others() {
        // A dense straight line cannot become a polygon.
        let mut pts: Vec<Point2> = (0..30)
            .map(|i| Point2::new(f64::from(i) * 0.05, -6.0))
            .collect();
        pts.extend(filled_square(3.0, 3.0, 1.0));
        let params = ReconstructionParams {
            mode: ReconstructionMode::Polygon,
            ..ReconstructionParams::default()
        };
        let report = Reconstruction::new(params).execute(&pts).unwrap();
        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.model.len(), 1);
        assert_eq!(report.skipped(), 1);
        let (_, obstacle) = report.model.iter().next().unwrap();
        assert!(matches!(obstacle, Obstacle::Polygon(_)));
    }

    #[test]
    fn invalid_eps_is_error() {
        let params = ReconstructionParams {
            eps: -1.0,
            ..ReconstructionParams::default()
        };
        assert!(Reconstruction::new(params).execute(&ring(0.0, 0.0, 1.0, 10)).is_err());
    }
}
