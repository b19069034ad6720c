use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{contains_convex, ensure_ccw, signed_area};
use crate::math::{Point2, TOLERANCE};

/// Smallest radius a reconstructed circle may have.
pub const MIN_RADIUS: f64 = 0.05;
/// Largest radius a reconstructed circle may have.
pub const MAX_RADIUS: f64 = 5.0;
/// Maximum number of polygon vertices.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Shape family of an obstacle, used for classification and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Polygon,
}

/// A circular obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a circle, clamping the radius into `[MIN_RADIUS, MAX_RADIUS]`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if the center or radius is not finite.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if !center.x.is_finite() || !center.y.is_finite() || !radius.is_finite() {
            return Err(GeometryError::NonFinite.into());
        }
        Ok(Self {
            center,
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
        })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// A convex polygon obstacle with 3 to 8 vertices, wound counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon, reversing clockwise input so the winding is CCW.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the vertex count is outside
    /// `[3, MAX_POLYGON_VERTICES]` or the polygon has no area, and
    /// `GeometryError::NonFinite` for non-finite coordinates.
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < 3 || vertices.len() > MAX_POLYGON_VERTICES {
            return Err(GeometryError::Degenerate(format!(
                "polygon needs 3..={MAX_POLYGON_VERTICES} vertices, got {}",
                vertices.len()
            ))
            .into());
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(GeometryError::NonFinite.into());
        }
        if signed_area(&vertices).abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("polygon has zero area".into()).into());
        }
        Ok(Self {
            vertices: ensure_ccw(vertices),
        })
    }

    /// Returns the vertices in counter-clockwise order.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Signed (always non-negative) area of the polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices)
    }
}

/// A reconstructed obstacle shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle {
    Circle(Circle),
    Polygon(Polygon),
}

impl Obstacle {
    /// Returns the shape family of this obstacle.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle(_) => ShapeKind::Circle,
            Self::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Tests whether `p` lies inside or on the boundary of the obstacle.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        match self {
            Self::Circle(c) => (p - c.center).norm() <= c.radius,
            Self::Polygon(poly) => contains_convex(&poly.vertices, p),
        }
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    #[must_use]
    pub fn bounds(&self) -> (Point2, Point2) {
        match self {
            Self::Circle(c) => (
                Point2::new(c.center.x - c.radius, c.center.y - c.radius),
                Point2::new(c.center.x + c.radius, c.center.y + c.radius),
            ),
            Self::Polygon(poly) => poly.vertices.iter().fold(
                (
                    Point2::new(f64::INFINITY, f64::INFINITY),
                    Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
                ),
                |(lo, hi), v| {
                    (
                        Point2::new(lo.x.min(v.x), lo.y.min(v.y)),
                        Point2::new(hi.x.max(v.x), hi.y.max(v.y)),
                    )
                },
            ),
        }
    }

    /// Samples the obstacle outline with at most `spacing` between neighbours.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn boundary_samples(&self, spacing: f64) -> Vec<Point2> {
        let spacing = spacing.max(TOLERANCE);
        match self {
            Self::Circle(c) => {
                let perimeter = std::f64::consts::TAU * c.radius;
                let n = ((perimeter / spacing).ceil() as usize).max(16);
                (0..n)
                    .map(|i| {
                        let a = std::f64::consts::TAU * i as f64 / n as f64;
                        Point2::new(
                            c.center.x + c.radius * a.cos(),
                            c.center.y + c.radius * a.sin(),
                        )
                    })
                    .collect()
            }
            Self::Polygon(poly) => {
                let m = poly.vertices.len();
                let mut out = Vec::new();
                for i in 0..m {
                    let a = poly.vertices[i];
                    let b = poly.vertices[(i + 1) % m];
                    let steps = (((b - a).norm() / spacing).ceil() as usize).max(1);
                    for s in 0..steps {
                        let t = s as f64 / steps as f64;
                        out.push(a + (b - a) * t);
                    }
                }
                out
            }
        }
    }
}
