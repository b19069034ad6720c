//! Rejection sampling of kinematically valid poses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::limits::{JointLimits, WorkspaceBounds};
use crate::collision::self_collides;
use crate::error::{OperationError, Result};
use crate::robot::{forward, Pose, RobotGeometry};

/// Default number of draws per requested pose.
pub const DEFAULT_SAMPLER_ATTEMPTS: usize = 1000;

/// Fate of one drawn joint vector.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Accepted(Pose),
    /// End effector outside the workspace bounds.
    RejectedWorkspace,
    RejectedSelfCollision,
    /// Hit an obstacle; decided by [`generate_collision_free`] after the
    /// sampler accepted the pose.
    ///
    /// [`generate_collision_free`]: super::generate_collision_free
    RejectedEnvironmentCollision,
}

/// Number of attempts that ended in each rejection state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub workspace: usize,
    pub self_collision: usize,
    pub environment: usize,
}

impl RejectionCounts {
    /// Counts one outcome; accepted attempts leave the counters unchanged.
    pub fn record(&mut self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Accepted(_) => {}
            AttemptOutcome::RejectedWorkspace => self.workspace += 1,
            AttemptOutcome::RejectedSelfCollision => self.self_collision += 1,
            AttemptOutcome::RejectedEnvironmentCollision => self.environment += 1,
        }
    }

    /// Sum of all rejections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.workspace + self.self_collision + self.environment
    }
}

/// Draws random poses until one reaches the workspace without folding onto
/// itself.
#[derive(Debug, Clone, Copy)]
pub struct PoseSampler {
    max_attempts: usize,
}

impl Default for PoseSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLER_ATTEMPTS)
    }
}

impl PoseSampler {
    /// Creates a sampler that gives up after `max_attempts` draws per pose.
    #[must_use]
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Draw budget per requested pose.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws and evaluates a single joint vector.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidArgument` if `limits` does not cover
    /// exactly one range per link.
    pub fn attempt<R: Rng + ?Sized>(
        &self,
        geometry: &RobotGeometry,
        limits: &JointLimits,
        bounds: &WorkspaceBounds,
        rng: &mut R,
    ) -> Result<AttemptOutcome> {
        check_limits(geometry, limits)?;
        let pose = Pose::new(
            limits
                .ranges()
                .iter()
                .map(|&[lo, hi]| rng.gen_range(lo..=hi))
                .collect(),
        );
        let positions = forward(&pose, geometry)?;
        let Some(tip) = positions.last() else {
            return Ok(AttemptOutcome::RejectedWorkspace);
        };
        if !bounds.contains(tip) {
            return Ok(AttemptOutcome::RejectedWorkspace);
        }
        if self_collides(&positions, geometry) {
            return Ok(AttemptOutcome::RejectedSelfCollision);
        }
        Ok(AttemptOutcome::Accepted(pose))
    }

    /// Returns the first accepted pose, or `None` once the attempt budget is
    /// spent.
    ///
    /// # Errors
    ///
    /// Same as [`PoseSampler::attempt`].
    pub fn sample<R: Rng + ?Sized>(
        &self,
        geometry: &RobotGeometry,
        limits: &JointLimits,
        bounds: &WorkspaceBounds,
        rng: &mut R,
    ) -> Result<Option<Pose>> {
        self.sample_counted(geometry, limits, bounds, rng, &mut RejectionCounts::default())
    }

    /// Like [`PoseSampler::sample`], adding every rejected draw to `counts`.
    ///
    /// # Errors
    ///
    /// Same as [`PoseSampler::attempt`].
    pub fn sample_counted<R: Rng + ?Sized>(
        &self,
        geometry: &RobotGeometry,
        limits: &JointLimits,
        bounds: &WorkspaceBounds,
        rng: &mut R,
        counts: &mut RejectionCounts,
    ) -> Result<Option<Pose>> {
        check_limits(geometry, limits)?;
        for _ in 0..self.max_attempts {
            match self.attempt(geometry, limits, bounds, rng)? {
                AttemptOutcome::Accepted(pose) => return Ok(Some(pose)),
                rejected => counts.record(&rejected),
            }
        }
        warn!(
            robot_id = geometry.robot_id(),
            attempts = self.max_attempts,
            "no valid pose within attempt budget"
        );
        Ok(None)
    }

    /// Samples `count` poses, dropping the ones that exhausted their budget.
    ///
    /// # Errors
    ///
    /// Same as [`PoseSampler::attempt`].
    pub fn sample_batch<R: Rng + ?Sized>(
        &self,
        count: usize,
        geometry: &RobotGeometry,
        limits: &JointLimits,
        bounds: &WorkspaceBounds,
        rng: &mut R,
    ) -> Result<Vec<Pose>> {
        let mut counts = RejectionCounts::default();
        self.sample_batch_counted(count, geometry, limits, bounds, rng, &mut counts)
    }

    /// Like [`PoseSampler::sample_batch`], adding every rejected draw to
    /// `counts`.
    ///
    /// # Errors
    ///
    /// Same as [`PoseSampler::attempt`].
    pub fn sample_batch_counted<R: Rng + ?Sized>(
        &self,
        count: usize,
        geometry: &RobotGeometry,
        limits: &JointLimits,
        bounds: &WorkspaceBounds,
        rng: &mut R,
        counts: &mut RejectionCounts,
    ) -> Result<Vec<Pose>> {
        let mut poses = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(pose) = self.sample_counted(geometry, limits, bounds, rng, counts)? {
                poses.push(pose);
            }
        }
        Ok(poses)
    }
}

fn check_limits(geometry: &RobotGeometry, limits: &JointLimits) -> Result<()> {
    if limits.len() == geometry.link_count() {
        return Ok(());
    }
    Err(OperationError::InvalidArgument(format!(
        "{} joint limits for a robot with {} links",
        limits.len(),
        geometry.link_count()
    ))
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::robot::{end_effector, CrossSection};

    fn standard() -> RobotGeometry {
        RobotGeometry::new(
            0,
            "std",
            CrossSection::Rectangle,
            vec![3.0, 2.5, 2.0],
            vec![0.3, 0.25, 0.2],
        )
        .unwrap()
    }

    #[test]
    fn accepted_pose_respects_limits_and_bounds() {
        let geo = standard();
        let limits = JointLimits::default_for(3);
        let bounds = WorkspaceBounds::new(0.0, 10.0, 0.0, 10.0);
        let mut rng = StdRng::seed_from_u64(7);
        let pose = PoseSampler::default()
            .sample(&geo, &limits, &bounds, &mut rng)
            .unwrap()
            .unwrap();
        for (angle, [lo, hi]) in pose.angles().iter().zip(limits.ranges()) {
            assert!(angle >= lo && angle <= hi);
        }
        assert!(bounds.contains(&end_effector(&pose, &geo).unwrap()));
        assert!(!self_collides(&forward(&pose, &geo).unwrap(), &geo));
    }

    #[test]
    fn unreachable_bounds_exhaust_budget() {
        let geo = standard();
        let bounds = WorkspaceBounds::new(50.0, 60.0, 50.0, 60.0);
        let mut rng = StdRng::seed_from_u64(1);
        let pose = PoseSampler::new(50)
            .sample(&geo, &JointLimits::default_for(3), &bounds, &mut rng)
            .unwrap();
        assert!(pose.is_none());
    }

    #[test]
    fn folded_arm_is_rejected_as_self_collision() {
        let geo = RobotGeometry::new(1, "even", CrossSection::Rectangle, vec![2.0; 3], vec![0.3; 3])
            .unwrap();
        let straight = JointLimits::new(vec![[0.0, 0.0]; 3]).unwrap();
        // Link 1 folds back so joint 2 lands on the base.
        let folded =
            JointLimits::new(vec![[0.0, 0.0], [std::f64::consts::PI; 2], [0.0, 0.0]]).unwrap();
        let bounds = WorkspaceBounds::around_base(20.0);
        let mut rng = StdRng::seed_from_u64(3);
        let sampler = PoseSampler::new(1);
        assert!(matches!(
            sampler.attempt(&geo, &straight, &bounds, &mut rng).unwrap(),
            AttemptOutcome::Accepted(_)
        ));
        assert_eq!(
            sampler.attempt(&geo, &folded, &bounds, &mut rng).unwrap(),
            AttemptOutcome::RejectedSelfCollision
        );
    }

    #[test]
    fn batch_is_reproducible_with_seed() {
        let geo = standard();
        let limits = JointLimits::default_for(3);
        let bounds = WorkspaceBounds::around_base(geo.max_reach());
        let a = PoseSampler::default()
            .sample_batch(5, &geo, &limits, &bounds, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = PoseSampler::default()
            .sample_batch(5, &geo, &limits, &bounds, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn unreachable_bounds_count_workspace_rejections() {
        let geo = standard();
        let bounds = WorkspaceBounds::new(50.0, 60.0, 50.0, 60.0);
        let mut counts = RejectionCounts::default();
        let poses = PoseSampler::new(20)
            .sample_batch_counted(
                3,
                &geo,
                &JointLimits::default_for(3),
                &bounds,
                &mut StdRng::seed_from_u64(4),
                &mut counts,
            )
            .unwrap();
        assert!(poses.is_empty());
        assert_eq!(counts.workspace, 60);
        assert_eq!(counts.total(), 60);
    }

    #[test]
    fn record_ignores_accepted() {
        let mut counts = RejectionCounts::default();
        counts.record(&AttemptOutcome::Accepted(Pose::new(vec![0.0])));
        counts.record(&AttemptOutcome::RejectedSelfCollision);
        counts.record(&AttemptOutcome::RejectedEnvironmentCollision);
        assert_eq!(counts.self_collision, 1);
        assert_eq!(counts.environment, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn mismatched_limits_rejected() {
        let geo = standard();
        let mut rng = StdRng::seed_from_u64(0);
        let res = PoseSampler::default().sample(
            &geo,
            &JointLimits::default_for(2),
            &WorkspaceBounds::around_base(10.0),
            &mut rng,
        );
        assert!(res.is_err());
    }
}
