//! JSON record of one generation run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::pipeline::{GenerationRun, GenerationStats, SamplingOptions};
use crate::error::{InputError, OperationError, Result};
use crate::pointcloud::EnvironmentMeta;
use crate::robot::{Pose, RobotGeometry};

/// Unit tag stored with every pose list.
pub const POSE_FORMAT: &str = "joint_angles_radians";

/// Which environment the poses belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub name: String,
    #[serde(default)]
    pub metadata: EnvironmentMeta,
}

/// The accepted poses and their unit tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSet {
    pub data: Vec<Pose>,
    pub count: usize,
    pub format: String,
}

/// Settings the run was made with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub target_poses: usize,
    pub achieved_poses: usize,
    pub safety_margin: f64,
    pub max_attempts: usize,
    /// RNG seed, when the run was seeded.
    pub seed: Option<u64>,
}

/// Everything needed to reuse the poses of one environment/robot pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub environment: EnvironmentInfo,
    pub robot: RobotGeometry,
    pub poses: PoseSet,
    pub generation_info: GenerationInfo,
    pub statistics: GenerationStats,
}

impl PoseRecord {
    /// Assembles a record from a finished run.
    #[must_use]
    pub fn new(
        environment: EnvironmentInfo,
        geometry: &RobotGeometry,
        run: &GenerationRun,
        options: &SamplingOptions,
        seed: Option<u64>,
    ) -> Self {
        Self {
            environment,
            robot: geometry.clone(),
            poses: PoseSet {
                data: run.poses.clone(),
                count: run.poses.len(),
                format: POSE_FORMAT.to_owned(),
            },
            generation_info: GenerationInfo {
                target_poses: options.target_count,
                achieved_poses: run.poses.len(),
                safety_margin: options.safety_margin,
                max_attempts: options.max_attempts,
                seed,
            },
            statistics: run.stats.clone(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Failed` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| OperationError::Failed(e.to_string()).into())
    }

    /// Parses a record written by [`PoseRecord::write_json`].
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedMetadata` for invalid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| InputError::MalformedMetadata(e.to_string()).into())
    }

    /// Writes the record to `path`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Failed` if serialization or the write fails.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| {
            OperationError::Failed(format!("writing {}: {e}", path.display())).into()
        })
    }
}
