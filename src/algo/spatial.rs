//! Nearest-point queries over a growing point set, backed by a kiddo k-d tree.
//!
//! The tree stores every point in a fixed rotated frame. Remeshing input is
//! often planar or grid aligned, and the tree cannot split a bucket whose
//! points share one coordinate; rotating first keeps shared coordinates apart.
//! Distances are recomputed from the unrotated points and results with equal
//! distance are ordered by point index, so every query is deterministic.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point3, Rotation3};

/// Point index with radius, k-nearest and nearest queries.
#[derive(Debug, Clone)]
pub struct PointIndex {
    points: Vec<Point3<f64>>,
    tree: KdTree<f64, 3>,
    frame: Rotation3<f64>,
}

fn by_distance(a: &(usize, f64), b: &(usize, f64)) -> std::cmp::Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}

/// Rounding allowance for distances measured in the rotated frame.
fn slack(p: &Point3<f64>, radius: f64) -> f64 {
    1e-9 * (1.0 + radius + p.coords.norm())
}

impl Default for PointIndex {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PointIndex {
    /// Index `points`; point `i` keeps index `i`.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        let mut index = Self {
            points: Vec::with_capacity(points.len()),
            tree: KdTree::new(),
            frame: Rotation3::from_euler_angles(0.4187, 0.7393, 1.1291),
        };
        for p in points {
            index.insert(p);
        }
        index
    }

    fn key(&self, p: &Point3<f64>) -> [f64; 3] {
        let q = self.frame * p;
        [q.x, q.y, q.z]
    }

    /// Add a point and return its index.
    pub fn insert(&mut self, p: Point3<f64>) -> usize {
        let idx = self.points.len();
        self.tree.add(&self.key(&p), idx as u64);
        self.points.push(p);
        idx
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no point is indexed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of an indexed point.
    pub fn point(&self, idx: usize) -> &Point3<f64> {
        &self.points[idx]
    }

    /// Every point within `radius` of `p`, unordered.
    fn within(&self, p: &Point3<f64>, radius: f64) -> Vec<(usize, f64)> {
        if self.points.is_empty() || !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }
        let reach = radius + slack(p, radius);
        self.tree
            .within_unsorted::<SquaredEuclidean>(&self.key(p), reach * reach)
            .into_iter()
            .filter_map(|n| {
                let i = n.item as usize;
                let d = (self.points[i] - p).norm();
                (d <= radius).then_some((i, d))
            })
            .collect()
    }

    /// Closest point within `max_dist` of `p`, as `(index, distance)`.
    pub fn closest_within(&self, p: &Point3<f64>, max_dist: f64) -> Option<(usize, f64)> {
        self.within(p, max_dist).into_iter().min_by(by_distance)
    }

    /// Up to `k` closest points within `max_dist` of `p`, nearest first.
    pub fn k_closest_within(&self, p: &Point3<f64>, k: usize, max_dist: f64) -> Vec<(usize, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut found = self.within(p, max_dist);
        found.sort_by(by_distance);
        found.truncate(k);
        found
    }

    /// Whether any point lies within `dist` of `p`.
    pub fn any_within(&self, p: &Point3<f64>, dist: f64) -> bool {
        !self.within(p, dist).is_empty()
    }

    /// Closest point to `p` with no distance bound.
    pub fn closest(&self, p: &Point3<f64>) -> Option<(usize, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let nearest = self.tree.nearest_one::<SquaredEuclidean>(&self.key(p));
        let d = (self.points[nearest.item as usize] - p).norm();
        // Other points at the same distance may precede the one the tree found.
        self.closest_within(p, d + slack(p, d))
    }
}
