use spade::{DelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use super::polygon_2d::{ensure_ccw, remove_collinear, rotate_to_canonical_start};
use super::{cross_2d, Point2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the convex hull of a 2D point set.
///
/// The hull is read off the outer face of a Delaunay triangulation. Boundary
/// points lying on a hull edge are dropped, the ring is wound
/// counter-clockwise and starts at its leftmost-bottom vertex, so identical
/// inputs always give identical output.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` for NaN or out-of-range coordinates and
/// `GeometryError::Degenerate` if fewer than three non-collinear hull
/// vertices remain.
pub fn convex_hull(points: &[Point2]) -> Result<Vec<Point2>> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::NonFinite.into());
    }

    let mut vertices: Vec<SpadePoint2<f64>> =
        points.iter().map(|p| SpadePoint2::new(p.x, p.y)).collect();
    vertices.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    vertices.dedup();
    if all_collinear(&vertices) {
        return Err(GeometryError::Degenerate("collinear point set".into()).into());
    }
    let triangulation = DelaunayTriangulation::<SpadePoint2<f64>>::bulk_load(vertices)
        .map_err(|e: InsertionError| GeometryError::Degenerate(format!("triangulation: {e}")))?;

    if triangulation.num_vertices() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "{} distinct points cannot span a hull",
            triangulation.num_vertices()
        ))
        .into());
    }

    let ring: Vec<Point2> = triangulation
        .convex_hull()
        .map(|edge| {
            let p = edge.from().position();
            Point2::new(p.x, p.y)
        })
        .collect();

    let ring = remove_collinear(&ring);
    if ring.len() < 3 {
        return Err(GeometryError::Degenerate("collinear point set".into()).into());
    }

    Ok(rotate_to_canonical_start(&ensure_ccw(ring)))
}

/// True when every vertex lies on the line through the first and the
/// farthest vertex (also true for fewer than three vertices).
fn all_collinear(vertices: &[SpadePoint2<f64>]) -> bool {
    let Some(first) = vertices.first() else {
        return true;
    };
    let a = Point2::new(first.x, first.y);
    let Some(b) = vertices
        .iter()
        .map(|v| Point2::new(v.x, v.y))
        .max_by(|p, q| (p - a).norm_squared().total_cmp(&(q - a).norm_squared()))
    else {
        return true;
    };
    let span = (b - a).norm();
    if span < TOLERANCE {
        return true;
    }
    vertices
        .iter()
        .all(|v| (cross_2d(&a, &b, &Point2::new(v.x, v.y)) / span).abs() < TOLERANCE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area;

    #[test]
    fn hull_of_square_with_interior_points() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.5, 1.5),
            Point2::new(1.0, 0.0),
        ];
        let hull = convex_hull(&pts).unwrap();
        assert_eq!(hull.len(), 4);
        assert!(signed_area(&hull) > 0.0);
        assert_eq!(hull[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn hull_is_deterministic_under_permutation() {
        let mut pts: Vec<Point2> = (0..24)
            .map(|i| {
                let a = f64::from(i) * std::f64::consts::TAU / 24.0;
                Point2::new(a.cos(), a.sin())
            })
            .collect();
        let a = convex_hull(&pts).unwrap();
        pts.reverse();
        let b = convex_hull(&pts).unwrap();
        assert_eq!(a.len(), 24);
        assert_eq!(a, b);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts: Vec<Point2> = (0..10).map(|i| Point2::new(f64::from(i), 0.0)).collect();
        assert!(convex_hull(&pts).is_err());
    }

    #[test]
    fn non_finite_rejected() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 1.0),
            Point2::new(1.0, 1.0),
        ];
        assert!(convex_hull(&pts).is_err());
    }
}
