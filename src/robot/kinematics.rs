//! Forward kinematics of the planar open chain.
//!
//! The base sits at the origin. Joint angles are relative: the absolute
//! orientation of link `i` is the sum of `pose[0..=i]`.

use serde::{Deserialize, Serialize};

use super::geometry::{LinkSegment, RobotGeometry};
use crate::error::{OperationError, Result};
use crate::math::{Point2, Vector2};

/// Relative joint angles of one arm configuration, in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    angles: Vec<f64>,
}

impl Pose {
    /// Creates a pose from relative joint angles.
    #[must_use]
    pub fn new(angles: Vec<f64>) -> Self {
        Self { angles }
    }

    /// The joint angles.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Returns `true` for a pose without joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

impl From<Vec<f64>> for Pose {
    fn from(angles: Vec<f64>) -> Self {
        Self::new(angles)
    }
}

/// Computes the base position followed by every link endpoint
/// (`link_count + 1` points).
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` if the pose length differs from
/// the robot's link count.
pub fn forward(pose: &Pose, geometry: &RobotGeometry) -> Result<Vec<Point2>> {
    if pose.len() != geometry.link_count() {
        return Err(OperationError::InvalidArgument(format!(
            "pose has {} joints but robot {} has {} links",
            pose.len(),
            geometry.robot_id(),
            geometry.link_count()
        ))
        .into());
    }

    let mut theta = 0.0;
    let mut p = Point2::origin();
    let mut positions = Vec::with_capacity(pose.len() + 1);
    positions.push(p);
    for (angle, length) in pose.angles.iter().zip(geometry.link_lengths()) {
        theta += angle;
        p += Vector2::new(theta.cos(), theta.sin()) * *length;
        positions.push(p);
    }
    Ok(positions)
}

/// Position of the last link endpoint.
///
/// # Errors
///
/// Same as [`forward`].
pub fn end_effector(pose: &Pose, geometry: &RobotGeometry) -> Result<Point2> {
    let positions = forward(pose, geometry)?;
    Ok(positions[positions.len() - 1])
}

/// Places every link of the arm in the plane.
///
/// # Errors
///
/// Same as [`forward`].
pub fn link_segments(pose: &Pose, geometry: &RobotGeometry) -> Result<Vec<LinkSegment>> {
    let positions = forward(pose, geometry)?;
    Ok(segments_from_positions(&positions, geometry))
}

/// Pairs consecutive joint positions into link segments.
#[must_use]
pub fn segments_from_positions(positions: &[Point2], geometry: &RobotGeometry) -> Vec<LinkSegment> {
    positions
        .windows(2)
        .zip(geometry.link_widths())
        .map(|(pair, &width)| LinkSegment {
            start: pair[0],
            end: pair[1],
            width,
            cross_section: geometry.cross_section(),
        })
        .collect()
}
