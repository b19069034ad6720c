//! Robot geometry lookup.
//!
//! Components receive a [`GeometryCatalog`] explicitly; there is no global
//! registry.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::geometry::{CrossSection, RobotGeometry};
use crate::error::{CatalogError, InputError, Result};

/// Lookup of robot geometries by id.
pub trait GeometryCatalog {
    /// Returns the geometry registered under `robot_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    fn get_geometry(&self, robot_id: u32) -> Result<&RobotGeometry>;
}

/// In-memory table of robot geometries.
#[derive(Debug, Clone, Default)]
pub struct RobotCatalog {
    geometries: BTreeMap<u32, RobotGeometry>,
}

/// `(name, cross-section, lengths, widths, description)` of the reference arms.
type BuiltinRow = (&'static str, CrossSection, [f64; 3], [f64; 3], &'static str);

const BUILTIN: [BuiltinRow; 6] = [
    (
        "Standard Rectangle Robot",
        CrossSection::Rectangle,
        [3.0, 2.5, 2.0],
        [0.3, 0.25, 0.2],
        "standard rectangular-link arm",
    ),
    (
        "Compact Rectangle Robot",
        CrossSection::Rectangle,
        [2.5, 2.0, 1.5],
        [0.25, 0.2, 0.15],
        "compact rectangular-link arm",
    ),
    (
        "Extended Rectangle Robot",
        CrossSection::Rectangle,
        [3.5, 3.0, 2.5],
        [0.35, 0.3, 0.25],
        "extended rectangular-link arm",
    ),
    (
        "Standard Ellipse Robot",
        CrossSection::Ellipse,
        [3.0, 2.5, 2.0],
        [0.3, 0.25, 0.2],
        "standard elliptical-link arm",
    ),
    (
        "Slender Ellipse Robot",
        CrossSection::Ellipse,
        [3.2, 2.8, 2.3],
        [0.2, 0.18, 0.15],
        "slender elliptical-link arm",
    ),
    (
        "Heavy Duty Robot",
        CrossSection::Rectangle,
        [4.0, 3.5, 3.0],
        [0.5, 0.45, 0.4],
        "heavy-duty industrial arm",
    ),
];

/// One entry of a JSON geometry table.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    description: String,
    link_shape: CrossSection,
    link_lengths: Vec<f64>,
    link_widths: Vec<f64>,
    max_reach: Option<f64>,
}

impl RobotCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The six reference arms, ids `0..=5`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (id, (name, shape, lengths, widths, description)) in (0u32..).zip(BUILTIN) {
            let max_reach = lengths.iter().sum();
            catalog.geometries.insert(
                id,
                RobotGeometry::from_trusted(
                    id,
                    name,
                    description,
                    shape,
                    lengths.to_vec(),
                    widths.to_vec(),
                    max_reach,
                ),
            );
        }
        catalog
    }

    /// Parses a JSON object mapping robot ids to geometry entries:
    ///
    /// ```json
    /// { "0": { "name": "arm", "link_shape": "rectangle",
    ///          "link_lengths": [3.0, 2.5, 2.0], "link_widths": [0.3, 0.25, 0.2] } }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedConfig` for invalid JSON or non-numeric
    /// ids, and `CatalogError::InvalidGeometry` for inconsistent entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| InputError::MalformedConfig(format!("robot catalog: {e}")))?;
        let mut catalog = Self::new();
        for (key, entry) in raw {
            let robot_id: u32 = key
                .trim()
                .parse()
                .map_err(|_| {
                    InputError::MalformedConfig(format!("robot id `{key}` is not numeric"))
                })?;
            let mut geometry = RobotGeometry::new(
                robot_id,
                entry.name,
                entry.link_shape,
                entry.link_lengths,
                entry.link_widths,
            )?
            .with_description(entry.description);
            if let Some(reach) = entry.max_reach {
                geometry = geometry.with_max_reach(reach);
            }
            catalog.insert(geometry);
        }
        Ok(catalog)
    }

    /// Registers a geometry, replacing any previous entry with the same id.
    pub fn insert(&mut self, geometry: RobotGeometry) {
        self.geometries.insert(geometry.robot_id(), geometry);
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.geometries.keys().copied()
    }
}

impl GeometryCatalog for RobotCatalog {
    fn get_geometry(&self, robot_id: u32) -> Result<&RobotGeometry> {
        self.geometries
            .get(&robot_id)
            .ok_or_else(|| CatalogError::NotFound { robot_id }.into())
    }
}
