//! Batched generation of collision-free poses for one environment.

use std::borrow::Cow;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::limits::{JointLimits, WorkspaceBounds};
use super::sampler::{AttemptOutcome, PoseSampler, RejectionCounts, DEFAULT_SAMPLER_ATTEMPTS};
use crate::collision::CollisionOracle;
use crate::error::Result;
use crate::model::ObstacleModel;
use crate::pointcloud::PointCloud;
use crate::reconstruction::{Reconstruction, ReconstructionParams};
use crate::robot::{Pose, RobotGeometry};

/// Upper bound on the default batch size.
pub const MAX_BATCH_SIZE: usize = 100;

/// Where the obstacles of a generation run come from.
#[derive(Debug, Clone, Copy)]
pub enum ObstacleSource<'a> {
    /// Raw sensed points, reconstructed with the cloud's metadata or the
    /// default parameters.
    Cloud(&'a PointCloud),
    /// An already-built model.
    Model(&'a ObstacleModel),
}

/// Knobs of [`generate_collision_free`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    /// Number of collision-free poses wanted.
    pub target_count: usize,
    /// Total pose draws allowed across all batches.
    pub max_attempts: usize,
    /// Inflation applied to every link footprint.
    pub safety_margin: f64,
    /// Overrides `min(100, max_attempts / 10)`.
    pub batch_size: Option<usize>,
    /// Rejection budget of each individual draw.
    pub sampler_attempts: usize,
    /// Defaults to [`JointLimits::default_for`] the robot's link count.
    pub joint_limits: Option<JointLimits>,
    pub workspace_bounds: Option<WorkspaceBounds>,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            target_count: 100,
            max_attempts: 1000,
            safety_margin: 0.05,
            batch_size: None,
            sampler_attempts: DEFAULT_SAMPLER_ATTEMPTS,
            joint_limits: None,
            workspace_bounds: None,
        }
    }
}

impl SamplingOptions {
    /// Effective batch size, never zero.
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or_else(|| MAX_BATCH_SIZE.min(self.max_attempts / 10))
            .max(1)
    }
}

/// Counters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub target: usize,
    pub achieved: usize,
    /// Pose draws spent out of `max_attempts`.
    pub total_sampled: usize,
    /// Poses that reached the collision check.
    pub total_checked: usize,
    /// Checked poses that hit an obstacle; equals `rejections.environment`.
    pub collision_count: usize,
    /// Rejected draws by state, sampler rejections included.
    pub rejections: RejectionCounts,
    pub collision_rate: f64,
    pub success_rate: f64,
    pub elapsed_seconds: f64,
    pub poses_per_second: f64,
    pub safety_margin: f64,
}

impl GenerationStats {
    /// How many poses short of the target the run ended.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.achieved)
    }
}

/// Output of [`generate_collision_free`].
#[derive(Debug, Clone)]
pub struct GenerationRun {
    /// Accepted poses in acceptance order.
    pub poses: Vec<Pose>,
    pub stats: GenerationStats,
    /// Bounds the end effector was sampled in.
    pub workspace: WorkspaceBounds,
    /// The reconstructed model, when the source was a point cloud.
    pub model: Option<ObstacleModel>,
}

/// Generates up to `target_count` poses that are valid and clear of every
/// obstacle.
///
/// Workspace bounds come from the options, then the cloud's metadata, then
/// the extent of the raw cloud points (or of the probe points for a model
/// source), and finally a square around the base sized by the robot's
/// reach.
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` for a negative safety margin,
/// invalid reconstruction parameters or joint limits that do not match the
/// robot. Running out of attempts is not an error; see
/// [`GenerationStats::shortfall`].
pub fn generate_collision_free<R: Rng + ?Sized>(
    source: ObstacleSource<'_>,
    geometry: &RobotGeometry,
    options: &SamplingOptions,
    rng: &mut R,
) -> Result<GenerationRun> {
    let start = Instant::now();

    let (model, source_bounds) = match source {
        ObstacleSource::Cloud(cloud) => {
            let params = cloud.reconstruction_params(ReconstructionParams::default());
            let report = Reconstruction::new(params).execute(cloud.points())?;
            let bounds = cloud.meta().workspace_bounds.or_else(|| {
                cloud
                    .bounds()
                    .map(|(lo, hi)| WorkspaceBounds::from_corners(&lo, &hi))
            });
            (Cow::Owned(report.model), bounds)
        }
        ObstacleSource::Model(model) => (Cow::Borrowed(model), None),
    };

    let oracle = CollisionOracle::new(&model, geometry, options.safety_margin)?;
    let workspace = options
        .workspace_bounds
        .or(source_bounds)
        .or_else(|| {
            model
                .bounds()
                .map(|(lo, hi)| WorkspaceBounds::from_corners(&lo, &hi))
        })
        .unwrap_or_else(|| WorkspaceBounds::around_base(geometry.max_reach()));
    let limits = options
        .joint_limits
        .clone()
        .unwrap_or_else(|| JointLimits::default_for(geometry.link_count()));
    let sampler = PoseSampler::new(options.sampler_attempts);
    let batch_size = options.effective_batch_size();

    let mut poses = Vec::new();
    let mut total_sampled = 0;
    let mut total_checked = 0;
    let mut rejections = RejectionCounts::default();
    while poses.len() < options.target_count && total_sampled < options.max_attempts {
        let current = batch_size.min(options.max_attempts - total_sampled);
        let batch = sampler.sample_batch_counted(
            current,
            geometry,
            &limits,
            &workspace,
            rng,
            &mut rejections,
        )?;
        total_sampled += current;
        if batch.is_empty() {
            debug!(requested = current, "no valid poses in batch");
            continue;
        }

        let results = oracle.check_many(&batch)?;
        total_checked += batch.len();
        for (pose, result) in batch.into_iter().zip(results) {
            let outcome = if result.is_collision {
                AttemptOutcome::RejectedEnvironmentCollision
            } else {
                AttemptOutcome::Accepted(pose)
            };
            rejections.record(&outcome);
            if let AttemptOutcome::Accepted(pose) = outcome {
                poses.push(pose);
                if poses.len() >= options.target_count {
                    break;
                }
            }
        }
        debug!(
            accepted = poses.len(),
            target = options.target_count,
            checked = total_checked,
            collisions = rejections.environment,
            "batch done"
        );
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    let collision_count = rejections.environment;
    let stats = GenerationStats {
        target: options.target_count,
        achieved: poses.len(),
        total_sampled,
        total_checked,
        collision_count,
        rejections,
        collision_rate: ratio(collision_count, total_checked),
        success_rate: ratio(poses.len(), total_checked),
        elapsed_seconds,
        poses_per_second: if elapsed_seconds > 0.0 {
            count_as_f64(poses.len()) / elapsed_seconds
        } else {
            0.0
        },
        safety_margin: options.safety_margin,
    };
    info!(
        robot_id = geometry.robot_id(),
        achieved = stats.achieved,
        target = stats.target,
        sampled = stats.total_sampled,
        collision_rate = stats.collision_rate,
        rejected_workspace = stats.rejections.workspace,
        rejected_self = stats.rejections.self_collision,
        shortfall = stats.shortfall(),
        "pose generation finished"
    );

    Ok(GenerationRun {
        poses,
        stats,
        workspace,
        model: match model {
            Cow::Owned(model) => Some(model),
            Cow::Borrowed(_) => None,
        },
    })
}

#[allow(clippy::cast_precision_loss)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        count_as_f64(part) / count_as_f64(whole)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::collision::check;
    use crate::math::Point2;
    use crate::model::{Circle, Obstacle, ObstacleModelBuilder};
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

    fn model_with_disc() -> ObstacleModel {
        let mut builder = ObstacleModelBuilder::new();
        let circle = Circle::new(Point2::new(4.0, 2.0), 1.0).unwrap();
        builder.add(Obstacle::Circle(circle), &[Point2::new(4.0, 2.0)]);
        builder.build()
    }

    #[test]
    fn default_batch_size() {
        let mut options = SamplingOptions::default();
        assert_eq!(options.effective_batch_size(), 100);
        options.max_attempts = 50;
        assert_eq!(options.effective_batch_size(), 5);
        options.max_attempts = 5;
        assert_eq!(options.effective_batch_size(), 1);
        options.batch_size = Some(7);
        assert_eq!(options.effective_batch_size(), 7);
    }

    #[test]
    fn results_are_bounded_and_clean() {
        let geo = standard();
        let model = model_with_disc();
        let options = SamplingOptions {
            target_count: 20,
            max_attempts: 200,
            workspace_bounds: Some(WorkspaceBounds::around_base(geo.max_reach())),
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let run = generate_collision_free(ObstacleSource::Model(&model), &geo, &options, &mut rng)
            .unwrap();
        assert!(run.poses.len() <= 20);
        assert!(run.stats.total_sampled <= 200);
        assert_eq!(run.stats.achieved, run.poses.len());
        assert!(run.model.is_none());
        for pose in &run.poses {
            assert!(!check(pose, &geo, &model, options.safety_margin).unwrap().is_collision);
            assert!(run.workspace.contains(&end_effector(pose, &geo).unwrap()));
        }
    }

    #[test]
    fn rejections_are_counted_per_state() {
        let geo = standard();
        let model = model_with_disc();
        let options = SamplingOptions {
            target_count: 1000,
            max_attempts: 200,
            workspace_bounds: Some(WorkspaceBounds::new(0.0, 7.5, 0.0, 7.5)),
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(21);
        let run = generate_collision_free(ObstacleSource::Model(&model), &geo, &options, &mut rng)
            .unwrap();
        let stats = &run.stats;
        assert!(stats.rejections.workspace > 0);
        assert!(stats.rejections.environment > 0);
        assert_eq!(stats.rejections.environment, stats.collision_count);
        // The target is out of reach, so every checked pose is accounted for.
        assert_eq!(stats.collision_count + stats.achieved, stats.total_checked);
    }

    #[test]
    fn cloud_without_metadata_uses_raw_point_bounds() {
        let geo = standard();
        let mut points: Vec<Point2> = (0..64)
            .map(|i| {
                let a = f64::from(i) * std::f64::consts::TAU / 64.0;
                Point2::new(5.0 + a.cos(), 5.0 + a.sin())
            })
            .collect();
        // Isolated point: noise for the clustering, but part of the cloud.
        points.push(Point2::new(-2.0, -3.0));
        let cloud = PointCloud::new("ring", points);
        let options = SamplingOptions {
            target_count: 5,
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let run = generate_collision_free(ObstacleSource::Cloud(&cloud), &geo, &options, &mut rng)
            .unwrap();
        let (lo, hi) = cloud.bounds().unwrap();
        assert_eq!(run.workspace, WorkspaceBounds::from_corners(&lo, &hi));
        assert!((run.workspace.min_x + 2.0).abs() < 1e-12);
        assert!((run.workspace.min_y + 3.0).abs() < 1e-12);
        let (probe_lo, _) = run.model.as_ref().unwrap().bounds().unwrap();
        assert!(probe_lo.x > 3.0);
    }

    #[test]
    fn empty_environment_meets_target() {
        let geo = standard();
        let model = ObstacleModel::empty();
        let options = SamplingOptions {
            target_count: 10,
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let run = generate_collision_free(ObstacleSource::Model(&model), &geo, &options, &mut rng)
            .unwrap();
        assert_eq!(run.poses.len(), 10);
        assert_eq!(run.stats.shortfall(), 0);
        assert_eq!(run.stats.collision_count, 0);
        assert_eq!(run.workspace, WorkspaceBounds::around_base(7.5));
    }

    #[test]
    fn zero_budget_reports_shortfall() {
        let geo = standard();
        let model = ObstacleModel::empty();
        let options = SamplingOptions {
            target_count: 3,
            max_attempts: 0,
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let run = generate_collision_free(ObstacleSource::Model(&model), &geo, &options, &mut rng)
            .unwrap();
        assert!(run.poses.is_empty());
        assert_eq!(run.stats.shortfall(), 3);
        assert!(run.stats.collision_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn negative_margin_rejected() {
        let geo = standard();
        let model = ObstacleModel::empty();
        let options = SamplingOptions {
            safety_margin: -0.1,
            ..SamplingOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let run = generate_collision_free(ObstacleSource::Model(&model), &geo, &options, &mut rng);
        assert!(run.is_err());
    }
}
