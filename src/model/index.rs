//! Uniform-grid spatial hash over obstacle probe points.

use std::collections::HashMap;

use crate::math::Point2;

/// Cell key of the grid.
type CellKey = (i64, i64);

/// Buckets points into square cells so rectangular range queries only touch
/// the cells they overlap.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    points: Vec<Point2>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    /// Builds the index. `cell_size` must be positive; non-finite points are
    /// ignored.
    #[must_use]
    pub fn build(points: Vec<Point2>, cell_size: f64) -> Self {
        let points: Vec<Point2> = points
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(cell_key(p, cell_size)).or_default().push(idx);
        }
        Self {
            cell_size,
            points,
            cells,
        }
    }

    /// All indexed points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Visits every point whose cell overlaps the box `[min, max]`.
    ///
    /// Candidates may lie slightly outside the box; callers apply their own
    /// exact test.
    pub fn for_each_candidate<F: FnMut(&Point2)>(&self, min: &Point2, max: &Point2, mut f: F) {
        if self.points.is_empty() {
            return;
        }
        let (x0, y0) = cell_key(min, self.cell_size);
        let (x1, y1) = cell_key(max, self.cell_size);
        // Sweeping a huge box cell by cell is slower than a linear scan.
        let span = x1
            .saturating_sub(x0)
            .saturating_add(1)
            .saturating_mul(y1.saturating_sub(y0).saturating_add(1));
        if span < 0 || usize::try_from(span).map_or(true, |s| s > self.cells.len()) {
            for (key, ids) in &self.cells {
                if (x0..=x1).contains(&key.0) && (y0..=y1).contains(&key.1) {
                    ids.iter().for_each(|&i| f(&self.points[i]));
                }
            }
            return;
        }
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(cx, cy)) {
                    ids.iter().for_each(|&i| f(&self.points[i]));
                }
            }
        }
    }

    /// Axis-aligned bounds of the indexed points, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Compute the grid cell key for a point.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn cell_key(p: &Point2, cell_size: f64) -> CellKey {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}
