//! Sampling of collision-free arm configurations.

mod limits;
mod pipeline;
pub mod record;
mod sampler;

pub use limits::{JointLimits, WorkspaceBounds};
pub use pipeline::{
    generate_collision_free, GenerationRun, GenerationStats, ObstacleSource, SamplingOptions,
    MAX_BATCH_SIZE,
};
pub use record::PoseRecord;
pub use sampler::{AttemptOutcome, PoseSampler, RejectionCounts, DEFAULT_SAMPLER_ATTEMPTS};
