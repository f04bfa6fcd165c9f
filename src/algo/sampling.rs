//! Surface point sampling.
//!
//! Samplers are strategies that receive each generated point together with
//! a fixed/free tag: [`PointSampler`] keeps only positions, [`FixedSampler`]
//! records both into a [`SeedSet`]. The sampling routines take an explicit
//! random generator so callers control reproducibility.
//!
//! # Example
//!
//! ```
//! use voromesh::algo::sampling::{montecarlo_sample, PointSampler};
//! use voromesh::mesh::build_from_triangles;
//! use nalgebra::Point3;
//! use rand::SeedableRng;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut sampler = PointSampler::default();
//! montecarlo_sample(&mesh, 100, &mut rng, &mut sampler);
//! assert_eq!(sampler.points.len(), 100);
//! ```

use nalgebra::Point3;
use rand::seq::SliceRandom;
use rand::Rng;

use super::spatial::PointIndex;
use crate::mesh::{FaceId, TriMesh};

/// Density factor of a Poisson-disk distribution relative to hexagonal packing.
const POISSON_DENSITY: f64 = 0.7;

/// Receives sampled points.
pub trait Sampler {
    /// Accept one sample; `fixed` marks points that must not move later.
    fn add_sample(&mut self, position: Point3<f64>, fixed: bool);
}

/// Collects sample positions and ignores the fixed tag.
#[derive(Debug, Clone, Default)]
pub struct PointSampler {
    /// Collected positions in sampling order.
    pub points: Vec<Point3<f64>>,
}

impl Sampler for PointSampler {
    fn add_sample(&mut self, position: Point3<f64>, _fixed: bool) {
        self.points.push(position);
    }
}

/// Seed positions with a parallel fixed flag per seed.
///
/// The two lists only grow together, so they always have equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSet {
    points: Vec<Point3<f64>>,
    fixed: Vec<bool>,
}

impl SeedSet {
    /// Create an empty seed set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a seed.
    pub fn push(&mut self, position: Point3<f64>, fixed: bool) {
        self.points.push(position);
        self.fixed.push(fixed);
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.points.len(), self.fixed.len());
        self.points.len()
    }

    /// True when there are no seeds.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Seed positions.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Mutable seed positions. The slice cannot change the seed count.
    pub fn points_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.points
    }

    /// Fixed flags, parallel to [`SeedSet::points`].
    pub fn fixed(&self) -> &[bool] {
        &self.fixed
    }

    /// Whether seed `i` is fixed.
    pub fn is_fixed(&self, i: usize) -> bool {
        self.fixed[i]
    }

    /// Number of fixed seeds.
    pub fn num_fixed(&self) -> usize {
        self.fixed.iter().filter(|&&f| f).count()
    }

    /// Iterate over `(position, fixed)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Point3<f64>, bool)> + '_ {
        self.points.iter().zip(self.fixed.iter().copied())
    }
}

/// Records samples and their fixed tag into a [`SeedSet`].
#[derive(Debug, Clone, Default)]
pub struct FixedSampler {
    /// Collected seeds.
    pub seeds: SeedSet,
}

impl Sampler for FixedSampler {
    fn add_sample(&mut self, position: Point3<f64>, fixed: bool) {
        self.seeds.push(position, fixed);
    }
}

/// Expected number of Poisson-disk samples of spacing `radius` on `mesh`.
pub fn poisson_sample_count(mesh: &TriMesh, radius: f64) -> usize {
    let disk_area = std::f64::consts::PI * radius * radius * POISSON_DENSITY;
    if disk_area.is_nan() || disk_area <= 0.0 {
        return 0;
    }
    let count = mesh.area() / disk_area;
    if count.is_finite() {
        count as usize
    } else {
        0
    }
}

/// Draw `count` uniformly distributed points on the surface.
///
/// Faces are chosen with probability proportional to their area, and a
/// point inside the chosen face is picked with uniform barycentric weights.
/// All samples are reported as free.
pub fn montecarlo_sample<R: Rng + ?Sized>(
    mesh: &TriMesh,
    count: usize,
    rng: &mut R,
    sampler: &mut impl Sampler,
) {
    let mut cdf = Vec::with_capacity(mesh.num_faces());
    let mut total = 0.0;
    for f in mesh.face_ids() {
        total += mesh.face_area(f);
        cdf.push(total);
    }
    if cdf.is_empty() || total.is_nan() || total <= 0.0 {
        return;
    }

    for _ in 0..count {
        let x = rng.gen::<f64>() * total;
        let fi = cdf.partition_point(|&c| c <= x).min(cdf.len() - 1);
        let [p0, p1, p2] = mesh.face_positions(FaceId::new(fi));
        let (mut u, mut v) = (rng.gen::<f64>(), rng.gen::<f64>());
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        sampler.add_sample(p0 + (p1 - p0) * u + (p2 - p0) * v, false);
    }
}

/// Thin a point cloud so no two kept points are within `radius`.
///
/// Every `pregenerated` point is reported first, as fixed, and excludes
/// candidates around it. Candidates are then visited in an order shuffled
/// by `rng`, and each one is kept (as free) if no kept or pre-generated
/// point lies within `radius`. Returns the number of candidates kept.
pub fn poisson_disk_prune<R: Rng + ?Sized>(
    candidates: &[Point3<f64>],
    radius: f64,
    pregenerated: &[Point3<f64>],
    rng: &mut R,
    sampler: &mut impl Sampler,
) -> usize {
    let mut accepted = PointIndex::default();
    for &p in pregenerated {
        sampler.add_sample(p, true);
        accepted.insert(p);
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.shuffle(rng);

    let mut kept = 0;
    for i in order {
        let p = candidates[i];
        if accepted.any_within(&p, radius) {
            continue;
        }
        accepted.insert(p);
        sampler.add_sample(p, false);
        kept += 1;
    }
    kept
}
