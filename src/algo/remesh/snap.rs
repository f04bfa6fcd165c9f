//! Snapping relaxed seeds onto mesh vertices.
//!
//! Free seeds take the nearest mesh vertex. Fixed seeds are first pulled
//! back onto the nearest boundary vertex and then expand into the cluster
//! of mesh vertices at non-increasing distance from it, which keeps the
//! near-ties at sharp boundary corners together in one region.

use crate::algo::sampling::SeedSet;
use crate::algo::spatial::PointIndex;
use crate::mesh::{TriMesh, VertexId};

/// Search radius for snapping, in units of the target spacing.
pub const SNAP_RADIUS_FACTOR: f64 = 4.0;

/// Candidates examined around a fixed seed.
pub const FIXED_SEED_NEIGHBORS: usize = 16;

/// Indices of the leading run of `distances` that never increases.
///
/// Index 0 is always kept; each following entry is kept while it is not
/// greater than the last kept one, and the run ends at the first strict
/// increase. Empty input gives an empty run.
///
/// ```
/// use voromesh::algo::remesh::keep_non_increasing_run;
///
/// assert_eq!(keep_non_increasing_run(&[0.05, 0.1, 0.1, 0.3]), vec![0]);
/// assert_eq!(keep_non_increasing_run(&[0.1, 0.1, 0.3]), vec![0, 1]);
/// ```
pub fn keep_non_increasing_run(distances: &[f64]) -> Vec<usize> {
    let Some(&first) = distances.first() else {
        return Vec::new();
    };
    let mut kept = vec![0];
    let mut last = first;
    for (j, &d) in distances.iter().enumerate().skip(1) {
        if d > last {
            break;
        }
        kept.push(j);
        last = d;
    }
    kept
}

/// Result of [`snap_seeds`].
#[derive(Debug, Clone, Default)]
pub struct SnappedSeeds {
    /// Mesh vertices acting as seeds. May contain repeats.
    pub vertices: Vec<VertexId>,
    /// Seeds with no vertex inside the search radius.
    pub dropped: usize,
}

/// Replace every seed by one or more vertices of `mesh`.
///
/// The search radius is [`SNAP_RADIUS_FACTOR`] times `spacing`; seeds with
/// nothing inside it are dropped. Needs current border flags.
pub fn snap_seeds(mesh: &TriMesh, seeds: &SeedSet, spacing: f64) -> SnappedSeeds {
    let radius = SNAP_RADIUS_FACTOR * spacing;
    let all = PointIndex::new(mesh.positions().copied().collect());

    let border_ids: Vec<VertexId> = mesh.vertex_ids().filter(|&v| mesh.flags(v).border).collect();
    let border = PointIndex::new(border_ids.iter().map(|&v| *mesh.position(v)).collect());

    let mut out = SnappedSeeds::default();
    for (p, fixed) in seeds.iter() {
        if !fixed {
            match all.closest_within(p, radius) {
                Some((i, _)) => out.vertices.push(VertexId::new(i)),
                None => out.dropped += 1,
            }
            continue;
        }

        let Some((b, _)) = border.closest_within(p, radius) else {
            out.dropped += 1;
            continue;
        };
        let anchor = *border.point(b);
        let candidates = all.k_closest_within(&anchor, FIXED_SEED_NEIGHBORS, radius);
        let distances: Vec<f64> = candidates.iter().map(|c| c.1).collect();
        for k in keep_non_increasing_run(&distances) {
            out.vertices.push(VertexId::new(candidates[k].0));
        }
    }

    if out.dropped > 0 {
        log::debug!("snapping dropped {} of {} seeds", out.dropped, seeds.len());
    }
    out
}
