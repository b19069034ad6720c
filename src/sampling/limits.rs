use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::{KinfieldError, OperationError, Result};
use crate::math::Point2;

/// Axis-aligned rectangle the end effector must land in (bounds inclusive).
///
/// Serialized as `[min_x, max_x, min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct WorkspaceBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorkspaceBounds {
    /// Creates bounds from their four edges.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Bounds spanned by two corners.
    #[must_use]
    pub fn from_corners(lo: &Point2, hi: &Point2) -> Self {
        Self::new(lo.x, hi.x, lo.y, hi.y)
    }

    /// Square of half-size `reach` centred on the robot base.
    #[must_use]
    pub fn around_base(reach: f64) -> Self {
        Self::new(-reach, reach, -reach, reach)
    }

    /// Tests `p` against the bounds, edges included.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

impl From<[f64; 4]> for WorkspaceBounds {
    fn from([min_x, max_x, min_y, max_y]: [f64; 4]) -> Self {
        Self::new(min_x, max_x, min_y, max_y)
    }
}

impl From<WorkspaceBounds> for [f64; 4] {
    fn from(b: WorkspaceBounds) -> Self {
        [b.min_x, b.max_x, b.min_y, b.max_y]
    }
}

/// Per-joint `[min, max]` sampling ranges in radians.
///
/// Deserialization goes through [`JointLimits::new`], so an inverted or
/// non-finite range is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct JointLimits {
    ranges: Vec<[f64; 2]>,
}

impl JointLimits {
    /// Creates limits from explicit ranges.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if a range is not finite or
    /// its minimum exceeds its maximum.
    pub fn new(ranges: Vec<[f64; 2]>) -> Result<Self> {
        if let Some((i, [lo, hi])) = ranges
            .iter()
            .enumerate()
            .find(|(_, [lo, hi])| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return Err(OperationError::InvalidArgument(format!(
                "joint {i} limit [{lo}, {hi}] is not a valid range"
            ))
            .into());
        }
        Ok(Self { ranges })
    }

    /// The first joint turns fully, the others within a half turn.
    #[must_use]
    pub fn default_for(joint_count: usize) -> Self {
        let ranges = (0..joint_count)
            .map(|i| if i == 0 { [-PI, PI] } else { [-FRAC_PI_2, FRAC_PI_2] })
            .collect();
        Self { ranges }
    }

    /// Ranges in joint order.
    #[must_use]
    pub fn ranges(&self) -> &[[f64; 2]] {
        &self.ranges
    }

    /// Number of joints covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` when no joint is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl TryFrom<Vec<[f64; 2]>> for JointLimits {
    type Error = KinfieldError;

    fn try_from(ranges: Vec<[f64; 2]>) -> Result<Self> {
        Self::new(ranges)
    }
}

impl From<JointLimits> for Vec<[f64; 2]> {
    fn from(limits: JointLimits) -> Self {
        limits.ranges
    }
}
