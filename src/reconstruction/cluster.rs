//! Density-based clustering (DBSCAN) over a uniform grid.
//!
//! Points are binned into square cells of side `eps`, so every
//! `eps`-neighbourhood lies within the 3x3 block of cells around a point.

use std::collections::{HashMap, VecDeque};

use crate::error::{OperationError, Result};
use crate::math::Point2;

/// Points sharing one density-cluster label.
pub type Cluster = Vec<Point2>;

/// Per-point label during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Member(usize),
}

/// Groups `points` into density-connected clusters and drops noise.
///
/// A point is a core point when at least `min_samples` points (itself
/// included) lie within distance `eps`. Clusters grow through core points;
/// non-core points reached from a core point join that cluster as border
/// points. Clusters are returned in the order their first core point appears
/// in the input.
///
/// # Errors
///
/// Returns `OperationError::InvalidArgument` if `eps` is not a positive
/// finite number or `min_samples` is zero.
pub fn cluster(points: &[Point2], eps: f64, min_samples: usize) -> Result<Vec<Cluster>> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(OperationError::InvalidArgument(format!(
            "clustering eps must be positive, got {eps}"
        ))
        .into());
    }
    if min_samples == 0 {
        return Err(OperationError::InvalidArgument("min_samples must be at least 1".into()).into());
    }
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let grid = NeighborGrid::new(points, eps);
    let mut labels = vec![Label::Unvisited; points.len()];
    let mut cluster_count = 0;

    for seed in 0..points.len() {
        if labels[seed] != Label::Unvisited {
            continue;
        }
        let neighbors = grid.neighbors(seed);
        if neighbors.len() < min_samples {
            labels[seed] = Label::Noise;
            continue;
        }

        let id = cluster_count;
        cluster_count += 1;
        labels[seed] = Label::Member(id);
        let mut queue: VecDeque<usize> = neighbors.into();
        while let Some(idx) = queue.pop_front() {
            match labels[idx] {
                Label::Member(_) => continue,
                // Former noise becomes a border point; it is not expanded.
                Label::Noise => {
                    labels[idx] = Label::Member(id);
                    continue;
                }
                Label::Unvisited => labels[idx] = Label::Member(id),
            }
            let reach = grid.neighbors(idx);
            if reach.len() >= min_samples {
                queue.extend(
                    reach
                        .into_iter()
                        .filter(|&n| !matches!(labels[n], Label::Member(_))),
                );
            }
        }
    }

    let mut clusters: Vec<Cluster> = vec![Vec::new(); cluster_count];
    for (p, label) in points.iter().zip(&labels) {
        if let Label::Member(id) = label {
            clusters[*id].push(*p);
        }
    }
    Ok(clusters)
}

/// Grid of point indices keyed by cell.
struct NeighborGrid<'a> {
    points: &'a [Point2],
    eps: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> NeighborGrid<'a> {
    fn new(points: &'a [Point2], eps: f64) -> Self {
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(cell_key(p, eps)).or_default().push(idx);
        }
        Self { points, eps, cells }
    }

    /// Indices within `eps` of point `idx`, including `idx` itself.
    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let p = &self.points[idx];
        let (cx, cy) = cell_key(p, self.eps);
        let mut out = Vec::new();
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                let Some(ids) = self.cells.get(&(cx.saturating_add(dx), cy.saturating_add(dy)))
                else {
                    continue;
                };
                out.extend(
                    ids.iter()
                        .copied()
                        .filter(|&j| (self.points[j] - p).norm() <= self.eps),
                );
            }
        }
        out
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_key(p: &Point2, cell_size: f64) -> (i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}
