//! Per-vertex Voronoi sources.
//!
//! Multi-source Dijkstra along mesh edges: every seed vertex starts at
//! distance zero as its own source, and each vertex ends up labelled with
//! the seed it is closest to in edge-path distance.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::mesh::{TriMesh, VertexId};

/// Nearest seed per vertex, with the edge-path distance to it.
#[derive(Debug, Clone)]
pub struct VoronoiSources {
    sources: Vec<Option<VertexId>>,
    distances: Vec<f64>,
}

impl VoronoiSources {
    /// The seed vertex whose region contains `v`, if any seed reaches it.
    #[inline]
    pub fn source(&self, v: VertexId) -> Option<VertexId> {
        self.sources[v.index()]
    }

    /// Edge-path distance from `v` to its source; infinite when unreached.
    #[inline]
    pub fn distance(&self, v: VertexId) -> f64 {
        self.distances[v.index()]
    }

    /// Number of vertices with a slot (the mesh vertex count).
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True for a mesh without vertices.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of vertices reached from some seed.
    pub fn assigned_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_some()).count()
    }

    /// The source of every vertex, indexed by vertex.
    pub fn as_slice(&self) -> &[Option<VertexId>] {
        &self.sources
    }

    /// Sources from an explicit labelling, at distance zero.
    #[cfg(test)]
    pub(crate) fn from_labels(sources: Vec<Option<VertexId>>) -> Self {
        let distances = sources
            .iter()
            .map(|s| if s.is_some() { 0.0 } else { f64::INFINITY })
            .collect();
        Self { sources, distances }
    }
}

/// Priority queue entry; ordered so the heap pops the smallest distance.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    vertex: VertexId,
    source: VertexId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour; ties resolve on indices.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.source.cmp(&self.source))
    }
}

/// Assign every vertex to its nearest seed vertex.
///
/// Seeds may repeat; a repeated seed is simply its own source. Vertices in
/// parts of the mesh no seed can reach keep no source. Needs current
/// vertex-face adjacency.
pub fn compute_sources(mesh: &TriMesh, seeds: &[VertexId]) -> VoronoiSources {
    let n = mesh.num_vertices();
    let mut sources = vec![None; n];
    let mut distances = vec![f64::INFINITY; n];
    let mut heap = BinaryHeap::new();

    for &seed in seeds {
        if seed.index() < n {
            heap.push(Frontier {
                distance: 0.0,
                vertex: seed,
                source: seed,
            });
        }
    }

    while let Some(entry) = heap.pop() {
        let u = entry.vertex.index();
        if sources[u].is_some() {
            continue;
        }
        sources[u] = Some(entry.source);
        distances[u] = entry.distance;

        let pu = mesh.position(entry.vertex);
        for w in mesh.vertex_neighbors(entry.vertex) {
            if sources[w.index()].is_some() {
                continue;
            }
            let d = entry.distance + (mesh.position(w) - pu).norm();
            heap.push(Frontier {
                distance: d,
                vertex: w,
                source: entry.source,
            });
        }
    }

    VoronoiSources { sources, distances }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::create_grid_mesh;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_seed_reaches_everything() {
        let mesh = create_grid_mesh(3, 3.0);
        let result = compute_sources(&mesh, &[VertexId::new(0)]);
        assert_eq!(result.len(), mesh.num_vertices());
        assert_eq!(result.assigned_count(), mesh.num_vertices());
        assert_eq!(result.distance(VertexId::new(0)), 0.0);
        assert_relative_eq!(result.distance(VertexId::new(3)), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_seeds_split_grid() {
        // 5 x 5 vertices on a 4 x 4 grid with unit spacing.
        let mesh = create_grid_mesh(4, 4.0);
        let left = VertexId::new(10); // (0, 2)
        let right = VertexId::new(14); // (4, 2)
        let result = compute_sources(&mesh, &[left, right]);

        assert_eq!(result.source(VertexId::new(11)), Some(left));
        assert_eq!(result.source(VertexId::new(13)), Some(right));
        assert_eq!(result.source(VertexId::new(0)), Some(left));
        assert_eq!(result.source(VertexId::new(4)), Some(right));
    }

    #[test]
    fn test_repeated_seed_is_own_source() {
        let mesh = create_grid_mesh(2, 1.0);
        let s = VertexId::new(4);
        let result = compute_sources(&mesh, &[s, s]);
        assert!(result.as_slice().iter().all(|&src| src == Some(s)));
    }

    #[test]
    fn test_no_seeds_leaves_vertices_unassigned() {
        let mesh = create_grid_mesh(2, 1.0);
        let result = compute_sources(&mesh, &[]);
        assert_eq!(result.assigned_count(), 0);
        assert!(result.distance(VertexId::new(0)).is_infinite());
    }
}
