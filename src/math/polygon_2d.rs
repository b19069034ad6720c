use super::{cross_2d, Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Reverses the vertex order if the polygon is wound clockwise.
#[must_use]
pub fn ensure_ccw(mut points: Vec<Point2>) -> Vec<Point2> {
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    points
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Drops vertices that lie on the line through their two neighbours.
///
/// Neighbours are taken from the input ring, so runs of collinear vertices
/// along one edge are removed in a single pass.
#[must_use]
pub fn remove_collinear(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let prev = &points[(i + n - 1) % n];
            let next = &points[(i + 1) % n];
            let cur = &points[i];
            let scale = (cur - prev).norm() * (next - cur).norm();
            cross_2d(prev, cur, next).abs() > TOLERANCE * scale.max(TOLERANCE)
        })
        .map(|i| points[i])
        .collect()
}

/// Tests whether `p` lies inside or on a convex polygon wound counter-clockwise.
#[must_use]
pub fn contains_convex(vertices: &[Point2], p: &Point2) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| cross_2d(&vertices[i], &vertices[(i + 1) % n], p) >= -TOLERANCE)
}

/// Picks `count` vertices at evenly spaced indices along a closed ring.
///
/// Index `k` maps to `floor(k * (n - 1) / (count - 1))`, so the first and last
/// input vertices are always kept. Rings with at most `count` vertices are
/// returned unchanged.
#[must_use]
pub fn stride_sample(points: &[Point2], count: usize) -> Vec<Point2> {
    let n = points.len();
    if n <= count || count < 2 {
        return points.to_vec();
    }
    (0..count)
        .map(|k| points[k * (n - 1) / (count - 1)])
        .collect()
}
