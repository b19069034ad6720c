//! The immutable obstacle model of one reconstructed environment.

mod index;
mod obstacle;

pub use index::GridIndex;
pub use obstacle::{
    Circle, Obstacle, Polygon, ShapeKind, MAX_POLYGON_VERTICES, MAX_RADIUS, MIN_RADIUS,
};

use slotmap::SlotMap;

use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for an obstacle in an [`ObstacleModel`].
    pub struct ObstacleId;
}

/// Maximum spacing between boundary probe samples.
pub const PROBE_SPACING: f64 = 0.05;

/// Cell size of the probe-point grid.
pub const PROBE_CELL_SIZE: f64 = 0.25;

/// Read-only collection of reconstructed obstacles for one environment.
///
/// Besides the shapes themselves the model keeps the *probe points* that
/// collision queries test against link footprints: every sensed point of a
/// cluster that became an obstacle plus a dense sampling of each outline.
#[derive(Debug, Clone)]
pub struct ObstacleModel {
    obstacles: SlotMap<ObstacleId, Obstacle>,
    probes: GridIndex,
}

impl ObstacleModel {
    /// An environment without obstacles.
    #[must_use]
    pub fn empty() -> Self {
        ObstacleModelBuilder::new().build()
    }

    /// Returns the obstacle with the given id.
    #[must_use]
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    /// Iterates over all obstacles.
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.obstacles.iter()
    }

    /// Number of obstacles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns `true` if the model holds no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Number of obstacles of the given shape family.
    #[must_use]
    pub fn count_of(&self, kind: ShapeKind) -> usize {
        self.obstacles.values().filter(|o| o.kind() == kind).count()
    }

    /// The probe-point index.
    #[must_use]
    pub fn probes(&self) -> &GridIndex {
        &self.probes
    }

    /// Returns the first obstacle containing `p`.
    #[must_use]
    pub fn containing(&self, p: &Point2) -> Option<ObstacleId> {
        self.obstacles.iter().find_map(|(id, o)| {
            let (lo, hi) = o.bounds();
            let in_box = p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y;
            (in_box && o.contains(p)).then_some(id)
        })
    }

    /// Axis-aligned bounds of all probe points.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        self.probes.bounds()
    }
}

/// Accumulates obstacles and their probe points, then freezes them into an
/// [`ObstacleModel`].
#[derive(Debug, Default)]
pub struct ObstacleModelBuilder {
    obstacles: SlotMap<ObstacleId, Obstacle>,
    probes: Vec<Point2>,
}

impl ObstacleModelBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle together with the sensed points it was fitted from.
    pub fn add(&mut self, obstacle: Obstacle, members: &[Point2]) -> ObstacleId {
        self.probes.extend_from_slice(members);
        self.probes.extend(obstacle.boundary_samples(PROBE_SPACING));
        self.obstacles.insert(obstacle)
    }

    /// Freezes the builder into a model.
    #[must_use]
    pub fn build(self) -> ObstacleModel {
        ObstacleModel {
            obstacles: self.obstacles,
            probes: GridIndex::build(self.probes, PROBE_CELL_SIZE),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn model_with_circle() -> (ObstacleModel, ObstacleId) {
        let mut builder = ObstacleModelBuilder::new();
        let circle = Obstacle::Circle(Circle::new(Point2::new(5.0, 5.0), 1.0).unwrap());
        let id = builder.add(circle, &[Point2::new(6.0, 5.0), Point2::new(4.0, 5.0)]);
        (builder.build(), id)
    }

    #[test]
    fn empty_model_has_no_probes() {
        let model = ObstacleModel::empty();
        assert!(model.is_empty());
        assert!(model.probes().is_empty());
        assert!(model.bounds().is_none());
    }

    #[test]
    fn probes_include_members_and_outline() {
        let (model, id) = model_with_circle();
        assert_eq!(model.len(), 1);
        assert!(model.get(id).is_some());
        assert!(model.probes().len() > 2);
        assert!(model.probes().points().contains(&Point2::new(6.0, 5.0)));
    }

    #[test]
    fn containing_finds_obstacle() {
        let (model, id) = model_with_circle();
        assert_eq!(model.containing(&Point2::new(5.2, 4.9)), Some(id));
        assert_eq!(model.containing(&Point2::new(8.0, 8.0)), None);
    }

    #[test]
    fn count_by_kind() {
        let (model, _) = model_with_circle();
        assert_eq!(model.count_of(ShapeKind::Circle), 1);
        assert_eq!(model.count_of(ShapeKind::Polygon), 0);
    }
}
