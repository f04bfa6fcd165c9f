//! Restricted centroidal Voronoi relaxation (Lloyd iterations on a surface).
//!
//! Each iteration assigns every mesh vertex to its Euclidean-nearest seed,
//! computes the area-weighted centroid of each seed's vertices, and moves
//! the free seeds there. Centroids of curved cells lie off the surface, so
//! they are projected back onto the faces around the nearest vertex.

use nalgebra::{Point3, Vector3};

use crate::algo::sampling::SeedSet;
use crate::algo::spatial::PointIndex;
use crate::algo::Progress;
use crate::mesh::{FaceId, TriMesh, VertexId};

/// Options for [`relax_seeds`].
#[derive(Debug, Clone)]
pub struct RelaxOptions {
    /// Number of Lloyd iterations.
    pub iterations: usize,

    /// Stop early once no free seed moves farther than this.
    pub convergence_threshold: f64,

    /// Whether to project centroids back onto the surface.
    pub project_to_surface: bool,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            iterations: 20,
            convergence_threshold: 0.0,
            project_to_surface: true,
        }
    }
}

impl RelaxOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Set the convergence threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set whether centroids are projected onto the surface.
    pub fn with_projection(mut self, project: bool) -> Self {
        self.project_to_surface = project;
        self
    }
}

/// Outcome of a relaxation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxReport {
    /// Iterations actually performed.
    pub iterations: usize,
    /// Largest seed displacement in the last iteration.
    pub max_movement: f64,
}

/// Lumped vertex areas: a third of each incident face's area.
fn vertex_areas(mesh: &TriMesh) -> Vec<f64> {
    let mut areas = vec![0.0; mesh.num_vertices()];
    for f in mesh.face_ids() {
        let third = mesh.face_area(f) / 3.0;
        for v in mesh.face_vertices(f) {
            areas[v.index()] += third;
        }
    }
    areas
}

/// Move the free seeds of `seeds` towards the centroids of their cells.
///
/// Fixed seeds keep their coordinates; seed order and count never change.
/// A seed whose cell contains no vertex stays where it is.
pub fn relax_seeds(mesh: &TriMesh, seeds: &mut SeedSet, options: &RelaxOptions) -> RelaxReport {
    relax_seeds_internal(mesh, seeds, options, None)
}

/// Relax seeds with progress reporting.
///
/// See [`relax_seeds`] for details.
pub fn relax_seeds_with_progress(
    mesh: &TriMesh,
    seeds: &mut SeedSet,
    options: &RelaxOptions,
    progress: &Progress,
) -> RelaxReport {
    relax_seeds_internal(mesh, seeds, options, Some(progress))
}

fn relax_seeds_internal(
    mesh: &TriMesh,
    seeds: &mut SeedSet,
    options: &RelaxOptions,
    progress: Option<&Progress>,
) -> RelaxReport {
    let mut report = RelaxReport {
        iterations: 0,
        max_movement: 0.0,
    };
    if seeds.is_empty() || mesh.num_faces() == 0 || options.iterations == 0 {
        return report;
    }

    let areas = vertex_areas(mesh);
    let vertex_index = PointIndex::new(mesh.positions().copied().collect());

    for iter in 0..options.iterations {
        if let Some(p) = progress {
            p.report(iter, options.iterations, "Relaxing seeds");
        }

        let seed_index = PointIndex::new(seeds.points().to_vec());
        let mut weights = vec![0.0; seeds.len()];
        let mut sums = vec![Vector3::zeros(); seeds.len()];
        for (v, p) in mesh.positions().enumerate() {
            if let Some((s, _)) = seed_index.closest(p) {
                weights[s] += areas[v];
                sums[s] += p.coords * areas[v];
            }
        }

        let mut max_movement = 0.0_f64;
        for i in 0..seeds.len() {
            if seeds.is_fixed(i) || weights[i] <= 0.0 {
                continue;
            }
            let centroid = Point3::from(sums[i] / weights[i]);
            let target = if options.project_to_surface {
                project_to_surface(mesh, &vertex_index, &centroid).unwrap_or(centroid)
            } else {
                centroid
            };
            let seed = &mut seeds.points_mut()[i];
            max_movement = max_movement.max((target - *seed).norm());
            *seed = target;
        }

        report.iterations = iter + 1;
        report.max_movement = max_movement;
        if max_movement <= options.convergence_threshold {
            break;
        }
    }

    if let Some(p) = progress {
        p.report(options.iterations, options.iterations, "Relaxation complete");
    }
    report
}

/// Closest point on the faces around the vertex nearest to `p`.
fn project_to_surface(
    mesh: &TriMesh,
    vertex_index: &PointIndex,
    p: &Point3<f64>,
) -> Option<Point3<f64>> {
    let (nearest, _) = vertex_index.closest(p)?;
    mesh.vertex_faces(VertexId::new(nearest))
        .iter()
        .map(|&(f, _)| closest_point_on_face(mesh, f, p))
        .min_by(|a, b| (a - p).norm_squared().total_cmp(&(b - p).norm_squared()))
}

fn closest_point_on_face(mesh: &TriMesh, f: FaceId, p: &Point3<f64>) -> Point3<f64> {
    let [a, b, c] = mesh.face_positions(f);
    closest_point_on_triangle(p, &a, &b, &c)
}

/// Closest point to `p` on triangle `abc`, by Voronoi region of the triangle.
pub(crate) fn closest_point_on_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = va + vb + vc;
    if denom.abs() < f64::EPSILON {
        // Degenerate triangle.
        return Point3::from((a.coords + b.coords + c.coords) / 3.0);
    }
    a + ab * (vb / denom) + ac * (vc / denom)
}
