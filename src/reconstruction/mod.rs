//! Point cloud to obstacle model reconstruction.

pub mod classify;
pub mod cluster;
pub mod fit;
mod pipeline;

pub use classify::{classify, ShapeDecision, ShapeFeatures};
pub use cluster::{cluster, Cluster};
pub use fit::{fit_circle, fit_cluster, reconstruct, FitOutcome, SkipReason};
pub use pipeline::{ClusterFate, ClusterOutcome, Reconstruction, ReconstructionReport};

use serde::{Deserialize, Serialize};

/// Default DBSCAN neighbourhood radius.
pub const DEFAULT_EPS: f64 = 0.3;
/// Default DBSCAN core-point density.
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Shape family requested for every cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionMode {
    Circle,
    Polygon,
    #[default]
    Auto,
}

/// Tuning knobs of a reconstruction run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionParams {
    /// Neighbourhood radius for clustering.
    pub eps: f64,
    /// Minimum neighbourhood size of a core point.
    pub min_samples: usize,
    pub mode: ReconstructionMode,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
            mode: ReconstructionMode::Auto,
        }
    }
}
