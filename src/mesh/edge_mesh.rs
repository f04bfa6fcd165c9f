//! Boundary graph: vertices and edges without faces.
//!
//! An [`EdgeMesh`] holds copies of mesh vertices (position and flags) joined
//! by edges. The remesher uses it to represent the boundary loops of a
//! surface, to cut those loops into simple arcs at junctions and corners,
//! and to place evenly spaced samples along each arc.

use std::cmp::Ordering;

use nalgebra::Point3;

use super::coincident_vertex_map;
use super::index::{EdgeId, VertexId};
use super::trimesh::{Vertex, VertexFlags};

/// A simple path or loop through an [`EdgeMesh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arc {
    /// Vertices in traversal order. A loop does not repeat its first vertex.
    pub vertices: Vec<VertexId>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

/// A graph of vertices joined by straight edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<[VertexId; 2]>,
}

/// Lexicographic order on positions, total even with NaN.
fn cmp_position(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}

impl EdgeMesh {
    /// Create a new empty edge mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Add a vertex carrying the given flags.
    pub fn add_vertex(&mut self, position: Point3<f64>, flags: VertexFlags) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex { position, flags });
        id
    }

    /// Add an edge between two existing vertices.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push([a, b]);
        id
    }

    /// Get the position of a vertex.
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    /// Get the flags of a vertex.
    pub fn flags(&self, v: VertexId) -> VertexFlags {
        self.vertices[v.index()].flags
    }

    /// Get the endpoints of an edge.
    pub fn edge(&self, e: EdgeId) -> [VertexId; 2] {
        self.edges[e.index()]
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Number of edge ends at each vertex.
    pub fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0; self.vertices.len()];
        for [a, b] in &self.edges {
            deg[a.index()] += 1;
            deg[b.index()] += 1;
        }
        deg
    }

    /// Incident `(edge, other endpoint)` pairs per vertex, in edge order.
    fn adjacency(&self) -> Vec<Vec<(EdgeId, VertexId)>> {
        let mut adj = vec![Vec::new(); self.vertices.len()];
        for (ei, &[a, b]) in self.edges.iter().enumerate() {
            adj[a.index()].push((EdgeId::new(ei), b));
            adj[b.index()].push((EdgeId::new(ei), a));
        }
        adj
    }

    // ==================== Cleaning ====================

    /// Merge vertices with identical positions and drop edges that collapse.
    ///
    /// Flags of merged vertices are combined. Returns the number of vertices
    /// removed.
    pub fn remove_duplicate_vertices(&mut self) -> usize {
        let positions: Vec<Point3<f64>> = self.vertices.iter().map(|v| v.position).collect();
        let (remap, representatives) = coincident_vertex_map(&positions);
        let removed = self.vertices.len() - representatives.len();
        if removed == 0 {
            return 0;
        }

        let mut merged: Vec<Vertex> = representatives
            .iter()
            .map(|&old| self.vertices[old].clone())
            .collect();
        for (old, v) in self.vertices.iter().enumerate() {
            let flags = &mut merged[remap[old]].flags;
            flags.border |= v.flags.border;
            flags.selected |= v.flags.selected;
            flags.visited |= v.flags.visited;
        }

        self.vertices = merged;
        self.edges = self
            .edges
            .iter()
            .map(|&[a, b]| [VertexId::new(remap[a.index()]), VertexId::new(remap[b.index()])])
            .filter(|[a, b]| a != b)
            .collect();
        removed
    }

    /// Collapse edges joining the same pair of vertices into one.
    ///
    /// Returns the number of edges removed.
    pub fn remove_duplicate_edges(&mut self) -> usize {
        let before = self.edges.len();
        let mut keyed: Vec<(u32, u32, usize)> = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, &[a, b])| (a.raw().min(b.raw()), a.raw().max(b.raw()), i))
            .collect();
        keyed.sort();
        keyed.dedup_by_key(|k| (k.0, k.1));
        let mut keep: Vec<usize> = keyed.into_iter().map(|k| k.2).collect();
        keep.sort_unstable();
        self.edges = keep.into_iter().map(|i| self.edges[i]).collect();
        before - self.edges.len()
    }

    // ==================== Selection ====================

    /// Clear the selected flag on every vertex.
    pub fn clear_selected(&mut self) {
        for v in &mut self.vertices {
            v.flags.selected = false;
        }
    }

    /// Select every vertex that is not a regular curve point (degree ≠ 2).
    ///
    /// Returns the number of newly selected vertices.
    pub fn select_non_manifold_vertices(&mut self) -> usize {
        self.select_by_degree(|d| d != 2)
    }

    /// Select every vertex where three or more edge ends meet.
    pub fn select_branching_vertices(&mut self) -> usize {
        self.select_by_degree(|d| d > 2)
    }

    fn select_by_degree(&mut self, pred: impl Fn(usize) -> bool) -> usize {
        let deg = self.degrees();
        let mut count = 0;
        for (v, d) in self.vertices.iter_mut().zip(deg) {
            if pred(d) && !v.flags.selected {
                v.flags.selected = true;
                count += 1;
            }
        }
        count
    }

    /// Select every vertex carrying the visited flag.
    pub fn select_visited(&mut self) -> usize {
        let mut count = 0;
        for v in &mut self.vertices {
            if v.flags.visited && !v.flags.selected {
                v.flags.selected = true;
                count += 1;
            }
        }
        count
    }

    /// Select curve points where the direction turns by more than `angle_rad`.
    ///
    /// Only vertices with exactly two incident edges are considered.
    pub fn select_crease_vertices(&mut self, angle_rad: f64) -> usize {
        let adj = self.adjacency();
        let mut count = 0;
        for (vi, incident) in adj.iter().enumerate() {
            if incident.len() != 2 {
                continue;
            }
            let p = self.vertices[vi].position;
            let prev = self.vertices[incident[0].1.index()].position;
            let next = self.vertices[incident[1].1.index()].position;
            let incoming = p - prev;
            let outgoing = next - p;
            if incoming.norm() == 0.0 || outgoing.norm() == 0.0 {
                continue;
            }
            if incoming.angle(&outgoing) > angle_rad && !self.vertices[vi].flags.selected {
                self.vertices[vi].flags.selected = true;
                count += 1;
            }
        }
        count
    }

    /// Give every edge end at a selected vertex its own copy of that vertex.
    ///
    /// The first incident edge keeps the original vertex. Returns the number
    /// of vertices added.
    pub fn split_selected_vertices(&mut self) -> usize {
        let adj = self.adjacency();
        let mut added = 0;
        for (vi, incident) in adj.iter().enumerate() {
            if !self.vertices[vi].flags.selected || incident.len() < 2 {
                continue;
            }
            let original = VertexId::new(vi);
            for &(e, _) in &incident[1..] {
                let copy = VertexId::new(self.vertices.len());
                self.vertices.push(self.vertices[vi].clone());
                let edge = &mut self.edges[e.index()];
                // A self-loop edge has both ends here; rewire just one.
                if edge[0] == original {
                    edge[0] = copy;
                } else {
                    edge[1] = copy;
                }
                added += 1;
            }
        }
        added
    }

    // ==================== Arcs and sampling ====================

    /// Decompose the graph into simple paths and loops.
    ///
    /// Paths run between vertices of degree ≠ 2; what remains are loops.
    /// Each arc is put in a canonical direction that depends only on vertex
    /// positions: paths start at their lexicographically smaller end, loops
    /// start at their smallest vertex and head towards its smaller neighbour.
    /// Two coincident arcs therefore come out identical.
    pub fn arcs(&self) -> Vec<Arc> {
        let adj = self.adjacency();
        let mut used = vec![false; self.edges.len()];
        let mut arcs = Vec::new();

        // Returns the visited vertices and whether the walk came back to `start`.
        let walk = |start: VertexId, first: (EdgeId, VertexId), used: &mut Vec<bool>| {
            let mut verts = vec![start];
            let (mut e, mut cur) = first;
            loop {
                used[e.index()] = true;
                if cur == start {
                    return (verts, true);
                }
                verts.push(cur);
                let incident = &adj[cur.index()];
                if incident.len() != 2 {
                    break;
                }
                match incident.iter().find(|(ne, _)| !used[ne.index()]) {
                    Some(&(ne, nv)) => {
                        e = ne;
                        cur = nv;
                    }
                    None => break,
                }
            }
            (verts, false)
        };

        for (vi, incident) in adj.iter().enumerate() {
            if incident.len() == 2 {
                continue;
            }
            for &link in incident {
                if !used[link.0.index()] {
                    let start = VertexId::new(vi);
                    let (mut verts, returned) = walk(start, link, &mut used);
                    if returned {
                        // A loop hanging off a branch vertex keeps that vertex at both ends.
                        verts.push(start);
                    }
                    arcs.push(self.canonical_path(verts));
                }
            }
        }
        for (vi, incident) in adj.iter().enumerate() {
            for &link in incident {
                if !used[link.0.index()] {
                    let (verts, _) = walk(VertexId::new(vi), link, &mut used);
                    arcs.push(self.canonical_loop(verts));
                }
            }
        }
        arcs
    }

    fn canonical_path(&self, mut verts: Vec<VertexId>) -> Arc {
        if let (Some(&first), Some(&last)) = (verts.first(), verts.last()) {
            let ord = cmp_position(self.position(last), self.position(first))
                .then(last.cmp(&first));
            if ord == Ordering::Less {
                verts.reverse();
            }
        }
        Arc {
            vertices: verts,
            closed: false,
        }
    }

    fn canonical_loop(&self, mut verts: Vec<VertexId>) -> Arc {
        let n = verts.len();
        let key = |v: VertexId| (self.position(v), v);
        let smallest = (0..n).min_by(|&i, &j| {
            let (pi, vi) = key(verts[i]);
            let (pj, vj) = key(verts[j]);
            cmp_position(pi, pj).then(vi.cmp(&vj))
        });
        if let Some(s) = smallest {
            verts.rotate_left(s);
            if n > 2 {
                let (pn, vn) = key(verts[1]);
                let (pp, vp) = key(verts[n - 1]);
                if cmp_position(pp, pn).then(vp.cmp(&vn)) == Ordering::Less {
                    verts[1..].reverse();
                }
            }
        }
        Arc {
            vertices: verts,
            closed: true,
        }
    }

    /// Evenly spaced samples along every arc.
    ///
    /// An arc of length `L` is divided into `max(1, ceil(L / spacing))`
    /// equal intervals. Paths yield both end points plus the interior
    /// division points; loops yield one point per interval, starting at
    /// their first vertex. Shared end points appear once per arc.
    pub fn uniform_samples(&self, spacing: f64) -> Vec<Point3<f64>> {
        let mut samples = Vec::new();
        for arc in self.arcs() {
            let mut pts: Vec<Point3<f64>> = arc.vertices.iter().map(|&v| *self.position(v)).collect();
            if arc.closed {
                pts.push(pts[0]);
            }
            sample_polyline(&pts, spacing, !arc.closed, &mut samples);
        }
        samples
    }
}

/// Append evenly spaced samples of a polyline to `out`.
fn sample_polyline(pts: &[Point3<f64>], spacing: f64, include_end: bool, out: &mut Vec<Point3<f64>>) {
    let Some(&first) = pts.first() else {
        return;
    };
    let mut cumulative = Vec::with_capacity(pts.len());
    cumulative.push(0.0);
    for w in pts.windows(2) {
        let last = cumulative[cumulative.len() - 1];
        cumulative.push(last + (w[1] - w[0]).norm());
    }
    let total = cumulative[cumulative.len() - 1];

    out.push(first);
    if total <= 0.0 {
        return;
    }

    let intervals = ((total / spacing).ceil() as usize).max(1);
    let step = total / intervals as f64;
    let mut seg = 0;
    for k in 1..intervals {
        let target = k as f64 * step;
        while seg + 2 < cumulative.len() && cumulative[seg + 1] < target {
            seg += 1;
        }
        let len = cumulative[seg + 1] - cumulative[seg];
        let t = if len > 0.0 {
            ((target - cumulative[seg]) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(pts[seg] + (pts[seg + 1] - pts[seg]) * t);
    }
    if include_end {
        out.push(pts[pts.len() - 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flags() -> VertexFlags {
        VertexFlags::default()
    }

    /// Closed polyline through the given points.
    fn polygon(points: &[[f64; 3]]) -> EdgeMesh {
        let mut em = EdgeMesh::new();
        let ids: Vec<VertexId> = points
            .iter()
            .map(|p| em.add_vertex(Point3::new(p[0], p[1], p[2]), flags()))
            .collect();
        for i in 0..ids.len() {
            em.add_edge(ids[i], ids[(i + 1) % ids.len()]);
        }
        em
    }

    fn unit_square() -> EdgeMesh {
        polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]])
    }

    #[test]
    fn test_degrees_of_loop() {
        let em = unit_square();
        assert_eq!(em.degrees(), vec![2, 2, 2, 2]);
        assert_eq!(em.arcs().len(), 1);
        assert!(em.arcs()[0].closed);
    }

    #[test]
    fn test_remove_duplicate_vertices_merges_flags() {
        let mut em = EdgeMesh::new();
        let a = em.add_vertex(Point3::new(0.0, 0.0, 0.0), flags());
        let b = em.add_vertex(Point3::new(1.0, 0.0, 0.0), flags());
        let c = em.add_vertex(
            Point3::new(1.0, 0.0, 0.0),
            VertexFlags {
                visited: true,
                ..flags()
            },
        );
        let d = em.add_vertex(Point3::new(2.0, 0.0, 0.0), flags());
        em.add_edge(a, b);
        em.add_edge(c, d);
        em.add_edge(b, c);

        assert_eq!(em.remove_duplicate_vertices(), 1);
        assert_eq!(em.num_vertices(), 3);
        // The b-c edge collapsed.
        assert_eq!(em.num_edges(), 2);
        assert_eq!(em.degrees(), vec![1, 2, 1]);
        assert!(em.flags(VertexId::new(1)).visited);
    }

    #[test]
    fn test_remove_duplicate_edges() {
        let mut em = unit_square();
        em.add_edge(VertexId::new(1), VertexId::new(0));
        assert_eq!(em.remove_duplicate_edges(), 1);
        assert_eq!(em.num_edges(), 4);
    }

    #[test]
    fn test_select_crease_vertices_on_square() {
        let mut em = unit_square();
        assert_eq!(em.select_crease_vertices(80f64.to_radians()), 4);

        let mut em = unit_square();
        assert_eq!(em.select_crease_vertices(100f64.to_radians()), 0);
    }

    #[test]
    fn test_split_selected_turns_loop_into_paths() {
        let mut em = unit_square();
        em.select_crease_vertices(45f64.to_radians());
        assert_eq!(em.split_selected_vertices(), 4);
        assert_eq!(em.num_vertices(), 8);
        assert!(em.degrees().iter().all(|&d| d == 1));

        let arcs = em.arcs();
        assert_eq!(arcs.len(), 4);
        assert!(arcs.iter().all(|a| !a.closed && a.vertices.len() == 2));
    }

    #[test]
    fn test_select_non_manifold_on_figure_eight() {
        // Two triangles sharing one vertex.
        let mut em = EdgeMesh::new();
        let c = em.add_vertex(Point3::origin(), flags());
        let p: Vec<VertexId> = [[1.0, 0.0], [1.0, 1.0], [-1.0, 0.0], [-1.0, -1.0]]
            .iter()
            .map(|q| em.add_vertex(Point3::new(q[0], q[1], 0.0), flags()))
            .collect();
        em.add_edge(c, p[0]);
        em.add_edge(p[0], p[1]);
        em.add_edge(p[1], c);
        em.add_edge(c, p[2]);
        em.add_edge(p[2], p[3]);
        em.add_edge(p[3], c);

        assert_eq!(em.select_branching_vertices(), 1);
        assert!(em.flags(c).selected);
        em.clear_selected();
        assert_eq!(em.select_non_manifold_vertices(), 1);

        em.split_selected_vertices();
        assert!(em.degrees().iter().all(|&d| d <= 2));
        let arcs = em.arcs();
        assert_eq!(arcs.len(), 2);
        assert!(arcs.iter().all(|a| !a.closed && a.vertices.len() == 4));
    }

    #[test]
    fn test_canonical_path_direction() {
        let mut em = EdgeMesh::new();
        let a = em.add_vertex(Point3::new(2.0, 0.0, 0.0), flags());
        let b = em.add_vertex(Point3::new(1.0, 0.0, 0.0), flags());
        let c = em.add_vertex(Point3::new(0.0, 0.0, 0.0), flags());
        em.add_edge(a, b);
        em.add_edge(b, c);
        let arcs = em.arcs();
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].vertices, vec![c, b, a]);
    }

    #[test]
    fn test_canonical_loop_ignores_winding() {
        let ccw = unit_square();
        let cw = polygon(&[[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let pa: Vec<Point3<f64>> = ccw.arcs()[0].vertices.iter().map(|&v| *ccw.position(v)).collect();
        let pb: Vec<Point3<f64>> = cw.arcs()[0].vertices.iter().map(|&v| *cw.position(v)).collect();
        assert_eq!(pa, pb);
        assert_eq!(ccw.uniform_samples(0.3), cw.uniform_samples(0.3));
    }

    #[test]
    fn test_uniform_samples_on_loop() {
        let em = unit_square();
        // Perimeter 4 at spacing 0.5: eight samples, every corner hit.
        let samples = em.uniform_samples(0.5);
        assert_eq!(samples.len(), 8);
        for s in &samples {
            let on_edge = s.x.abs() < 1e-12
                || (s.x - 1.0).abs() < 1e-12
                || s.y.abs() < 1e-12
                || (s.y - 1.0).abs() < 1e-12;
            assert!(on_edge, "sample {:?} off the square", s);
        }
    }

    #[test]
    fn test_uniform_samples_on_path_include_ends() {
        let mut em = EdgeMesh::new();
        let a = em.add_vertex(Point3::new(0.0, 0.0, 0.0), flags());
        let b = em.add_vertex(Point3::new(1.0, 0.0, 0.0), flags());
        em.add_edge(a, b);
        let samples = em.uniform_samples(0.3);
        // ceil(1 / 0.3) = 4 intervals, 5 points.
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(samples[4], Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(samples[2].x, 0.5, epsilon = 1e-12);
    }
}
