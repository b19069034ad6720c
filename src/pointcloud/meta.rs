//! JSON companion metadata of a point cloud.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::reconstruction::{ReconstructionMode, ReconstructionParams};
use crate::sampling::WorkspaceBounds;

/// Optional per-environment settings stored next to a PLY file as
/// `<stem>_meta.json`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustering_eps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_samples: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_type: Option<ReconstructionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_bounds: Option<WorkspaceBounds>,
}

impl EnvironmentMeta {
    /// Parses a metadata document.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedMetadata` if the document is not valid
    /// JSON or a known key has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| InputError::MalformedMetadata(e.to_string()).into())
    }

    /// Applies the fields present here on top of `base`.
    #[must_use]
    pub fn apply_to(&self, base: ReconstructionParams) -> ReconstructionParams {
        ReconstructionParams {
            eps: self.clustering_eps.unwrap_or(base.eps),
            min_samples: self.min_samples.unwrap_or(base.min_samples),
            mode: self.obstacle_type.unwrap_or(base.mode),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn full_document() {
        let meta = EnvironmentMeta::from_json(
            r#"{
                "clustering_eps": 0.4,
                "min_samples": 3,
                "obstacle_type": "circle",
                "workspace_bounds": [0.0, 10.0, 0.0, 8.0],
                "generator": "ring_scene"
            }"#,
        )
        .unwrap();
        assert_eq!(meta.clustering_eps, Some(0.4));
        assert_eq!(meta.min_samples, Some(3));
        assert_eq!(meta.obstacle_type, Some(ReconstructionMode::Circle));
        assert_eq!(
            meta.workspace_bounds,
            Some(WorkspaceBounds::new(0.0, 10.0, 0.0, 8.0))
        );
    }

    #[test]
    fn missing_keys_fall_back_to_base() {
        let meta = EnvironmentMeta::from_json(r#"{"min_samples": 8}"#).unwrap();
        let params = meta.apply_to(ReconstructionParams::default());
        assert_eq!(params.min_samples, 8);
        assert!((params.eps - 0.3).abs() < 1e-12);
        assert_eq!(params.mode, ReconstructionMode::Auto);
    }

    #[test]
    fn wrong_type_is_malformed() {
        assert!(EnvironmentMeta::from_json(r#"{"obstacle_type": "hexagon"}"#).is_err());
        assert!(EnvironmentMeta::from_json("not json").is_err());
    }
}
