use tracing::debug;

use super::footprint::Footprint;
use crate::error::{OperationError, Result};
use crate::math::Point2;
use crate::model::ObstacleModel;
use crate::robot::{forward, kinematics::segments_from_positions, LinkSegment, Pose, RobotGeometry};

/// Outcome of one collision query.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// `true` iff at least one link has at least one colliding point.
    pub is_collision: bool,
    /// Indices of colliding links, ascending.
    pub colliding_links: Vec<usize>,
    /// Every obstacle point found inside a link footprint.
    pub collision_points: Vec<Point2>,
    /// Number of collision points.
    pub count: usize,
}

impl CollisionResult {
    fn from_links(per_link: Vec<(usize, Vec<Point2>)>) -> Self {
        let mut colliding_links = Vec::new();
        let mut collision_points = Vec::new();
        for (idx, points) in per_link {
            if !points.is_empty() {
                colliding_links.push(idx);
                collision_points.extend(points);
            }
        }
        let count = collision_points.len();
        Self {
            is_collision: !colliding_links.is_empty(),
            colliding_links,
            collision_points,
            count,
        }
    }
}

/// Tests arm poses against one obstacle model.
///
/// Borrows the model and the robot geometry for the duration of the queries;
/// holds no mutable state, so one oracle can serve any number of poses.
#[derive(Debug, Clone, Copy)]
pub struct CollisionOracle<'a> {
    model: &'a ObstacleModel,
    geometry: &'a RobotGeometry,
    safety_margin: f64,
}

impl<'a> CollisionOracle<'a> {
    /// Creates an oracle.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if `safety_margin` is
    /// negative or not finite.
    pub fn new(
        model: &'a ObstacleModel,
        geometry: &'a RobotGeometry,
        safety_margin: f64,
    ) -> Result<Self> {
        if !safety_margin.is_finite() || safety_margin < 0.0 {
            return Err(OperationError::InvalidArgument(format!(
                "safety margin must be a non-negative number, got {safety_margin}"
            ))
            .into());
        }
        Ok(Self {
            model,
            geometry,
            safety_margin,
        })
    }

    /// Checks a single pose.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if the pose length differs
    /// from the link count.
    pub fn check(&self, pose: &Pose) -> Result<CollisionResult> {
        let positions = forward(pose, self.geometry)?;
        Ok(self.check_positions(&positions))
    }

    /// Checks each pose independently.
    ///
    /// # Errors
    ///
    /// Fails on the first pose whose length differs from the link count.
    pub fn check_many(&self, poses: &[Pose]) -> Result<Vec<CollisionResult>> {
        let results = poses
            .iter()
            .map(|pose| self.check(pose))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            poses = poses.len(),
            collisions = results.iter().filter(|r| r.is_collision).count(),
            "checked pose batch"
        );
        Ok(results)
    }

    /// Checks joint positions already produced by forward kinematics.
    #[must_use]
    pub fn check_positions(&self, positions: &[Point2]) -> CollisionResult {
        let per_link = segments_from_positions(positions, self.geometry)
            .iter()
            .enumerate()
            .map(|(idx, link)| (idx, self.link_collisions(link)))
            .collect();
        CollisionResult::from_links(per_link)
    }

    /// Obstacle points inside the inflated footprint of one link.
    ///
    /// Probe points come from the model's grid index. The link's start,
    /// midpoint and end are also tested against the exact obstacle shapes so
    /// a link buried inside a large obstacle is still reported.
    fn link_collisions(&self, link: &LinkSegment) -> Vec<Point2> {
        let footprint = Footprint::of(link, self.safety_margin);
        let (lo, hi) = footprint.bounds();
        let mut hits = Vec::new();
        self.model.probes().for_each_candidate(&lo, &hi, |p| {
            if footprint.contains(p) {
                hits.push(*p);
            }
        });

        let samples = match footprint {
            Footprint::Disc { .. } => vec![link.start],
            _ => vec![link.start, link.midpoint(), link.end],
        };
        hits.extend(
            samples
                .iter()
                .filter(|s| self.model.containing(s).is_some())
                .copied(),
        );
        hits
    }
}

/// Checks one pose against an obstacle model.
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` for a negative safety margin or a
/// pose whose length differs from the link count.
pub fn check(
    pose: &Pose,
    geometry: &RobotGeometry,
    model: &ObstacleModel,
    safety_margin: f64,
) -> Result<CollisionResult> {
    CollisionOracle::new(model, geometry, safety_margin)?.check(pose)
}

/// Checks many poses against an obstacle model, independently.
///
/// # Errors
///
/// Same as [`check`].
pub fn check_many(
    poses: &[Pose],
    geometry: &RobotGeometry,
    model: &ObstacleModel,
    safety_margin: f64,
) -> Result<Vec<CollisionResult>> {
    CollisionOracle::new(model, geometry, safety_margin)?.check_many(poses)
}
