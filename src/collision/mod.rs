mod footprint;
mod oracle;
mod self_collision;

pub use footprint::{Footprint, DEGENERATE_LINK_LENGTH};
pub use oracle::{check, check_many, CollisionOracle, CollisionResult};
pub use self_collision::{pose_self_collides, self_collides, SELF_CLEARANCE_FACTOR};
