pub mod catalog;
pub mod geometry;
pub mod kinematics;

pub use catalog::{GeometryCatalog, RobotCatalog};
pub use geometry::{CrossSection, LinkSegment, RobotGeometry};
pub use kinematics::{end_effector, forward, link_segments, Pose};
