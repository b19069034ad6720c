//! Inflated link footprints and their point-membership tests.

use nalgebra::Isometry2;

use crate::math::{Point2, Vector2};
use crate::robot::{CrossSection, LinkSegment};

/// Links shorter than this are treated as a single point.
pub const DEGENERATE_LINK_LENGTH: f64 = 1e-6;

/// Region of the plane occupied by one link after inflation by the safety
/// margin.
#[derive(Debug, Clone, Copy)]
pub enum Footprint {
    /// Local frame at the link start, x along the link.
    Rectangle {
        frame: Isometry2<f64>,
        length: f64,
        half_width: f64,
    },
    /// Local frame at the link midpoint, x along the link.
    Ellipse {
        frame: Isometry2<f64>,
        semi_major: f64,
        semi_minor: f64,
    },
    /// Zero-length link.
    Disc { center: Point2, radius: f64 },
}

impl Footprint {
    /// Builds the footprint of `link` with its width grown by
    /// `2 * safety_margin`.
    #[must_use]
    pub fn of(link: &LinkSegment, safety_margin: f64) -> Self {
        let width = link.width + 2.0 * safety_margin;
        let axis = link.axis();
        let length = axis.norm();
        if length < DEGENERATE_LINK_LENGTH {
            return Self::Disc {
                center: link.start,
                radius: width / 2.0,
            };
        }
        let angle = axis.y.atan2(axis.x);
        match link.cross_section {
            CrossSection::Rectangle => Self::Rectangle {
                frame: Isometry2::new(link.start.coords, angle),
                length,
                half_width: width / 2.0,
            },
            CrossSection::Ellipse => Self::Ellipse {
                frame: Isometry2::new(link.midpoint().coords, angle),
                semi_major: length / 2.0,
                semi_minor: width / 2.0,
            },
        }
    }

    /// Tests whether `p` lies inside or on the footprint.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        match self {
            Self::Rectangle {
                frame,
                length,
                half_width,
            } => {
                let local = frame.inverse_transform_point(p);
                (0.0..=*length).contains(&local.x) && local.y.abs() <= *half_width
            }
            Self::Ellipse {
                frame,
                semi_major,
                semi_minor,
            } => {
                let local = frame.inverse_transform_point(p);
                (local.x / semi_major).powi(2) + (local.y / semi_minor).powi(2) <= 1.0
            }
            Self::Disc { center, radius } => (p - center).norm() <= *radius,
        }
    }

    /// Axis-aligned box enclosing the footprint, as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> (Point2, Point2) {
        let corners = |frame: &Isometry2<f64>, x0: f64, x1: f64, h: f64| {
            [
                Point2::new(x0, -h),
                Point2::new(x1, -h),
                Point2::new(x1, h),
                Point2::new(x0, h),
            ]
            .map(|c| frame.transform_point(&c))
        };
        let pts = match self {
            Self::Rectangle {
                frame,
                length,
                half_width,
            } => corners(frame, 0.0, *length, *half_width),
            Self::Ellipse {
                frame,
                semi_major,
                semi_minor,
            } => corners(frame, -semi_major, *semi_major, *semi_minor),
            Self::Disc { center, radius } => {
                let r = Vector2::new(*radius, *radius);
                return (center - r, center + r);
            }
        };
        pts.iter().fold(
            (
                Point2::new(f64::INFINITY, f64::INFINITY),
                Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        )
    }
}
