use crate::error::Result;
use crate::math::Point2;
use crate::robot::{forward, Pose, RobotGeometry};

/// Minimum joint separation as a multiple of the widest link.
pub const SELF_CLEARANCE_FACTOR: f64 = 1.5;

/// Tests joint positions (base first) for self-collision.
///
/// Every non-adjacent pair `(i, j)` with `j >= i + 2` must stay at least
/// `1.5 * max(link_widths)` apart. The base / end-effector pair is exempt.
#[must_use]
pub fn self_collides(positions: &[Point2], geometry: &RobotGeometry) -> bool {
    let min_distance = geometry.max_link_width() * SELF_CLEARANCE_FACTOR;
    let last = positions.len().saturating_sub(1);
    for i in 0..positions.len() {
        for j in (i + 2)..positions.len() {
            if i == 0 && j == last {
                continue;
            }
            if (positions[i] - positions[j]).norm() < min_distance {
                return true;
            }
        }
    }
    false
}

/// Runs forward kinematics and then [`self_collides`].
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` if the pose length differs from
/// the link count.
pub fn pose_self_collides(pose: &Pose, geometry: &RobotGeometry) -> Result<bool> {
    Ok(self_collides(&forward(pose, geometry)?, geometry))
}
