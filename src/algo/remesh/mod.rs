//! Voronoi remeshing.
//!
//! Rebuilds a surface as the dual of a centroidal Voronoi partition whose
//! sites are spaced about a target distance apart. Boundaries and, if
//! requested, sharp creases are preserved: creases are cut open first, so
//! they become boundaries too, and every boundary is resampled into fixed
//! sites before the interior sites are scattered and relaxed.
//!
//! Per connected component the pipeline is:
//!
//! 1. **Border**: extract the boundary graph and resample it ([`border`])
//! 2. **Seeds**: Poisson-disk interior seeds around the fixed border seeds ([`seeds`])
//! 3. **Relax**: Lloyd relaxation on a refined copy of the component
//! 4. **Snap**: move every seed onto mesh vertices ([`snap`])
//! 5. **Dual**: label vertices by nearest seed and triangulate the dual ([`dual`])
//!
//! Components are remeshed independently and welded back together.
//!
//! # Example
//!
//! ```no_run
//! use voromesh::algo::remesh::{remesh, RemeshOptions};
//!
//! let mesh = voromesh::io::load("part.stl").unwrap();
//! let options = RemeshOptions::new(0.5).with_border_crease_angle(60.0);
//! let remeshed = remesh(&mesh, &options).unwrap();
//! voromesh::io::save(&remeshed, "part_remeshed.ply").unwrap();
//! ```

pub mod border;
pub mod dual;
pub mod seeds;
pub mod snap;

pub use border::{extract_border, resample_border};
pub use dual::build_dual_mesh;
pub use seeds::generate_seeds;
pub use snap::{keep_non_increasing_run, snap_seeds, SnappedSeeds};

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::algo::clean::{append, connected_components, extract_component, remove_duplicate_vertices};
use crate::algo::crease::crease_cut;
use crate::algo::refine::preprocess_for_voronoi;
use crate::algo::voronoi::{compute_sources, relax_seeds, RelaxOptions};
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Lloyd iterations per component.
pub const RELAX_ITERATIONS: usize = 20;

/// Relaxation mesh edges are refined below `spacing / REFINEMENT_RATIO`.
pub const REFINEMENT_RATIO: f64 = 4.0;

/// Components with fewer seeds produce no output.
pub const MIN_SEEDS: usize = 3;

/// Junction matching tolerance, as a fraction of the bounding-box diagonal.
pub const JUNCTION_TOLERANCE: f64 = 1.0 / 1000.0;

/// Options for [`remesh`].
#[derive(Debug, Clone)]
pub struct RemeshOptions {
    /// Target distance between output vertices.
    pub spacing: f64,

    /// Boundary turns sharper than this many degrees keep a vertex.
    /// Negative values act as zero, which disables corner detection.
    pub border_crease_angle: f64,

    /// Edges with a dihedral angle above this many degrees are preserved.
    /// A negative value means "same as `border_crease_angle`".
    pub internal_crease_angle: f64,

    /// Remesh components on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RemeshOptions {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            border_crease_angle: 0.0,
            internal_crease_angle: -1.0,
            parallel: false,
        }
    }
}

impl RemeshOptions {
    /// Create options with the specified target spacing.
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            ..Default::default()
        }
    }

    /// Set the boundary corner angle in degrees.
    pub fn with_border_crease_angle(mut self, degrees: f64) -> Self {
        self.border_crease_angle = degrees;
        self
    }

    /// Set the internal crease angle in degrees.
    pub fn with_internal_crease_angle(mut self, degrees: f64) -> Self {
        self.internal_crease_angle = degrees;
        self
    }

    /// Set whether components are remeshed in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Boundary corner angle actually used, in degrees.
    pub fn effective_border_angle(&self) -> f64 {
        self.border_crease_angle.max(0.0)
    }

    /// Internal crease angle actually used, in degrees.
    pub fn effective_internal_angle(&self) -> f64 {
        if self.internal_crease_angle < 0.0 {
            self.effective_border_angle()
        } else {
            self.internal_crease_angle
        }
    }

    /// Check that the options describe a valid run.
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(MeshError::invalid_param(
                "spacing",
                self.spacing,
                "must be positive and finite",
            ));
        }
        if !self.border_crease_angle.is_finite() {
            return Err(MeshError::invalid_param(
                "border_crease_angle",
                self.border_crease_angle,
                "must be finite",
            ));
        }
        if !self.internal_crease_angle.is_finite() {
            return Err(MeshError::invalid_param(
                "internal_crease_angle",
                self.internal_crease_angle,
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Remesh a surface with Voronoi sites about `options.spacing` apart.
///
/// The input is not modified. Fails on invalid options, an empty mesh, or
/// an edge shared by more than two faces. A component too small to hold
/// [`MIN_SEEDS`] seeds contributes nothing to the output.
pub fn remesh(mesh: &TriMesh, options: &RemeshOptions) -> Result<TriMesh> {
    remesh_internal(mesh, options, None)
}

/// Remesh with progress reporting, one step per component.
///
/// See [`remesh`] for details.
pub fn remesh_with_progress(
    mesh: &TriMesh,
    options: &RemeshOptions,
    progress: &Progress,
) -> Result<TriMesh> {
    remesh_internal(mesh, options, Some(progress))
}

fn remesh_internal(
    mesh: &TriMesh,
    options: &RemeshOptions,
    progress: Option<&Progress>,
) -> Result<TriMesh> {
    options.validate()?;
    if mesh.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut work = mesh.clone();
    work.update_topology();
    let non_manifold = work.count_non_manifold_edges();
    if non_manifold > 0 {
        return Err(MeshError::NonManifoldInput {
            edges: non_manifold,
        });
    }
    work.update_border_flags();
    work.clear_selected();
    work.clear_visited();

    let mut junctions = border::boundary_junctions(&work);
    let crease_angle = options.effective_internal_angle();
    if crease_angle > 0.0 {
        let added = crease_cut(&mut work, crease_angle.to_radians());
        work.update_topology();
        work.update_border_flags();
        log::debug!("crease cut at {}°: {} vertices added", crease_angle, added);
    }
    junctions.extend(border::seam_junctions(&work));
    let tolerance = work.bbox_diagonal() * JUNCTION_TOLERANCE;
    let marked = border::mark_visited_near(&mut work, &junctions, tolerance);
    log::debug!("{} junctions, {} vertices marked", junctions.len(), marked);

    let components = connected_components(&mut work);
    let total = components.len();
    let border_angle = options.effective_border_angle().to_radians();
    let done = AtomicUsize::new(0);
    let run = |index: usize, component: TriMesh| {
        let out = remesh_component(component, options.spacing, border_angle, index);
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(p) = progress {
            p.report(finished, total, "Remeshing components");
        }
        out
    };

    if let Some(p) = progress {
        p.report(0, total, "Remeshing components");
    }
    let result = if total == 1 {
        run(0, work)
    } else {
        let pieces: Vec<TriMesh> = if options.parallel {
            components
                .par_iter()
                .enumerate()
                .map(|(i, faces)| run(i, extract_component(&work, faces)))
                .collect()
        } else {
            components
                .iter()
                .enumerate()
                .map(|(i, faces)| run(i, extract_component(&work, faces)))
                .collect()
        };

        let mut merged = TriMesh::new();
        for piece in &pieces {
            append(&mut merged, piece);
        }
        let welded = remove_duplicate_vertices(&mut merged);
        merged.update_topology();
        merged.update_border_flags();
        log::debug!("reassembly welded {} vertices", welded);
        merged
    };

    log::info!(
        "remeshed {} faces into {} faces, {} vertices ({} components, spacing {})",
        mesh.num_faces(),
        result.num_faces(),
        result.num_vertices(),
        total,
        options.spacing
    );
    Ok(result)
}

/// Run the full pipeline on one connected component.
///
/// The component needs current adjacency and border flags; visited flags
/// mark positions where the boundary must be split.
fn remesh_component(
    mesh: TriMesh,
    spacing: f64,
    border_angle_rad: f64,
    index: usize,
) -> TriMesh {
    let border = resample_border(extract_border(&mesh), border_angle_rad, spacing);
    let border_points: Vec<Point3<f64>> = border.positions().copied().collect();

    let mut seeds = generate_seeds(&mesh, &border_points, spacing);
    if seeds.len() < MIN_SEEDS {
        log::debug!(
            "component {}: only {} seeds, skipped",
            index,
            seeds.len()
        );
        return TriMesh::new();
    }

    // Snapping and the dual work on the refined copy.
    let mut base = mesh;
    preprocess_for_voronoi(&mut base, spacing, REFINEMENT_RATIO);
    let report = relax_seeds(&base, &mut seeds, &RelaxOptions::new(RELAX_ITERATIONS));

    let snapped = snap_seeds(&base, &seeds, spacing);
    let sources = compute_sources(&base, &snapped.vertices);
    let out = build_dual_mesh(&mut base, &sources, &snapped.vertices);

    log::debug!(
        "component {}: {} seeds ({} fixed), {} relax iterations, {} snapped, {} dropped, {} faces",
        index,
        seeds.len(),
        seeds.num_fixed(),
        report.iterations,
        snapped.vertices.len(),
        snapped.dropped,
        out.num_faces()
    );
    out
}
