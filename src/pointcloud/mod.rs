//! Point-cloud input: ASCII PLY files and their metadata companions.

mod meta;
mod ply;

pub use meta::EnvironmentMeta;
pub use ply::{parse_ply, write_ply};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{InputError, Result};
use crate::math::Point2;
use crate::reconstruction::ReconstructionParams;

/// Suffix appended to a PLY file stem to locate its metadata.
pub const META_SUFFIX: &str = "_meta.json";

/// A named 2D point cloud with optional metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    name: String,
    points: Vec<Point2>,
    meta: EnvironmentMeta,
}

impl PointCloud {
    /// Creates an in-memory cloud.
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<Point2>) -> Self {
        Self {
            name: name.into(),
            points,
            meta: EnvironmentMeta::default(),
        }
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: EnvironmentMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Loads `<stem>.ply` and, when present, the sibling `<stem>_meta.json`.
    ///
    /// The cloud is named after the file stem.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if a file cannot be read, or the parse
    /// errors of [`parse_ply`] and [`EnvironmentMeta::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let points = parse_ply(&read(path)?)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let meta_path = path.with_file_name(format!("{name}{META_SUFFIX}"));
        let meta = if meta_path.is_file() {
            EnvironmentMeta::from_json(&read(&meta_path)?)?
        } else {
            EnvironmentMeta::default()
        };
        let has_meta = meta != EnvironmentMeta::default();
        debug!(name = %name, points = points.len(), has_meta, "loaded point cloud");
        Ok(Self { name, points, meta })
    }

    /// Name of the cloud, the file stem when loaded from disk.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sensed points in file order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Companion metadata, empty when none was found.
    #[must_use]
    pub fn meta(&self) -> &EnvironmentMeta {
        &self.meta
    }

    /// Reconstruction parameters: `base` overridden by the metadata.
    #[must_use]
    pub fn reconstruction_params(&self, base: ReconstructionParams) -> ReconstructionParams {
        self.meta.apply_to(base)
    }

    /// Axis-aligned bounds of the points, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        InputError::Io {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}
