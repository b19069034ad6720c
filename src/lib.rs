pub mod collision;
pub mod config;
pub mod error;
pub mod math;
pub mod model;
pub mod pointcloud;
pub mod reconstruction;
pub mod robot;
pub mod sampling;

pub use collision::{check, check_many, CollisionOracle, CollisionResult};
pub use config::PipelineConfig;
pub use error::{KinfieldError, Result};
pub use model::{Obstacle, ObstacleModel};
pub use pointcloud::PointCloud;
pub use reconstruction::{reconstruct, Reconstruction, ReconstructionMode, ReconstructionParams};
pub use robot::{forward, GeometryCatalog, Pose, RobotCatalog, RobotGeometry};
pub use sampling::{generate_collision_free, GenerationRun, ObstacleSource, SamplingOptions};
