//! Configuration of a full reconstruction and sampling run.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::pointcloud::PointCloud;
use crate::reconstruction::{Reconstruction, ReconstructionParams};
use crate::robot::RobotGeometry;
use crate::sampling::{
    generate_collision_free, GenerationRun, ObstacleSource, SamplingOptions, WorkspaceBounds,
};

/// Bundles the reconstruction and sampling knobs.
///
/// Per-cloud metadata takes precedence over `reconstruction`. Workspace
/// bounds come from `sampling.workspace_bounds`, then the cloud metadata,
/// then the extent of the raw cloud points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reconstruction: ReconstructionParams,
    pub sampling: SamplingOptions,
}

impl PipelineConfig {
    /// Parses a JSON configuration; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedConfig` for invalid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| InputError::MalformedConfig(e.to_string()).into())
    }

    /// Reads [`PipelineConfig::from_json`] from a file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the file cannot be read, or
    /// `InputError::MalformedConfig` for invalid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Reconstructs `cloud` and generates poses for `geometry` in it.
    ///
    /// # Errors
    ///
    /// Same as [`generate_collision_free`].
    pub fn run<R: Rng + ?Sized>(
        &self,
        cloud: &PointCloud,
        geometry: &RobotGeometry,
        rng: &mut R,
    ) -> Result<GenerationRun> {
        let params = cloud.reconstruction_params(self.reconstruction);
        let report = Reconstruction::new(params).execute(cloud.points())?;
        let mut sampling = self.sampling.clone();
        sampling.workspace_bounds = sampling
            .workspace_bounds
            .or(cloud.meta().workspace_bounds)
            .or_else(|| {
                cloud
                    .bounds()
                    .map(|(lo, hi)| WorkspaceBounds::from_corners(&lo, &hi))
            });
        let mut run = generate_collision_free(
            ObstacleSource::Model(&report.model),
            geometry,
            &sampling,
            rng,
        )?;
        run.model = Some(report.model);
        Ok(run)
    }
}
