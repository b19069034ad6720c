use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::math::{Point2, Vector2};

/// Cross-section family of every link of a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossSection {
    Rectangle,
    Ellipse,
}

/// Fixed geometry of one planar arm variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotGeometry {
    robot_id: u32,
    name: String,
    description: String,
    cross_section: CrossSection,
    link_lengths: Vec<f64>,
    link_widths: Vec<f64>,
    max_reach: f64,
}

impl RobotGeometry {
    /// Creates a robot geometry. `max_reach` is the sum of the link lengths.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidGeometry` if there are no links, the
    /// length and width lists differ in size, or any length or width is not
    /// a positive finite number.
    pub fn new(
        robot_id: u32,
        name: impl Into<String>,
        cross_section: CrossSection,
        link_lengths: Vec<f64>,
        link_widths: Vec<f64>,
    ) -> Result<Self> {
        let invalid = |reason: String| CatalogError::InvalidGeometry { robot_id, reason };
        if link_lengths.is_empty() {
            return Err(invalid("robot has no links".into()).into());
        }
        if link_lengths.len() != link_widths.len() {
            return Err(invalid(format!(
                "{} link lengths but {} link widths",
                link_lengths.len(),
                link_widths.len()
            ))
            .into());
        }
        if let Some(bad) = link_lengths
            .iter()
            .chain(&link_widths)
            .find(|v| !v.is_finite() || **v <= 0.0)
        {
            return Err(invalid(format!("link dimension {bad} must be positive")).into());
        }
        let max_reach = link_lengths.iter().sum();
        Ok(Self {
            robot_id,
            name: name.into(),
            description: String::new(),
            cross_section,
            link_lengths,
            link_widths,
            max_reach,
        })
    }

    /// Builds a geometry from a table known to be consistent.
    pub(crate) fn from_trusted(
        robot_id: u32,
        name: &str,
        description: &str,
        cross_section: CrossSection,
        link_lengths: Vec<f64>,
        link_widths: Vec<f64>,
        max_reach: f64,
    ) -> Self {
        Self {
            robot_id,
            name: name.to_owned(),
            description: description.to_owned(),
            cross_section,
            link_lengths,
            link_widths,
            max_reach,
        }
    }

    /// Attaches a free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the reported reach.
    #[must_use]
    pub fn with_max_reach(mut self, max_reach: f64) -> Self {
        self.max_reach = max_reach;
        self
    }

    /// Catalog id of this arm.
    #[must_use]
    pub fn robot_id(&self) -> u32 {
        self.robot_id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description, empty when unset.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cross-section shared by every link.
    #[must_use]
    pub fn cross_section(&self) -> CrossSection {
        self.cross_section
    }

    /// Number of links (and joints).
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.link_lengths.len()
    }

    /// Link lengths from base to tip.
    #[must_use]
    pub fn link_lengths(&self) -> &[f64] {
        &self.link_lengths
    }

    /// Link widths from base to tip.
    #[must_use]
    pub fn link_widths(&self) -> &[f64] {
        &self.link_widths
    }

    /// Widest link of the arm.
    #[must_use]
    pub fn max_link_width(&self) -> f64 {
        self.link_widths.iter().copied().fold(0.0, f64::max)
    }

    /// Reach used to size a default workspace.
    #[must_use]
    pub fn max_reach(&self) -> f64 {
        self.max_reach
    }
}

/// One link placed in the plane by forward kinematics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSegment {
    pub start: Point2,
    pub end: Point2,
    pub width: f64,
    pub cross_section: CrossSection,
}

impl LinkSegment {
    /// Vector from start to end.
    #[must_use]
    pub fn axis(&self) -> Vector2 {
        self.end - self.start
    }

    /// Distance between the link's joints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.axis().norm()
    }

    /// Point halfway along the link.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        Point2::from((self.start.coords + self.end.coords) * 0.5)
    }
}
