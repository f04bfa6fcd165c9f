//! Flagged triangle mesh with face-face and vertex-face adjacency.
//!
//! Vertices and faces live in dense vectors. Each vertex carries a small set
//! of boolean flags that the remeshing stages use to communicate (border,
//! selected, visited). Adjacency is derived data: any call that changes the
//! face list drops it, and [`TriMesh::update_topology`] rebuilds it.
//!
//! # Face-face adjacency
//!
//! For face `f` and edge `z` (the edge from corner `z` to corner `z + 1`),
//! `ff(f, z)` returns the face across that edge together with the index of
//! the shared edge inside that face. A border edge points back to itself:
//! `ff(f, z) == (f, z)`. Edges shared by more than two faces are linked in a
//! cycle so that adjacency stays total; such meshes are rejected by the
//! remesher before any walk happens.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, VertexId};

/// Per-vertex boolean flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexFlags {
    /// The vertex lies on at least one border edge.
    pub border: bool,
    /// Generic selection mark (fixed seeds, split points, boundary seeds).
    pub selected: bool,
    /// Generic visit mark (junctions, walked boundary seeds).
    pub visited: bool,
}

/// A vertex of a [`TriMesh`].
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,
    /// Flags attached to this vertex.
    pub flags: VertexFlags,
}

impl Vertex {
    /// Create a new unflagged vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            flags: VertexFlags::default(),
        }
    }
}

/// A triangle of a [`TriMesh`].
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// Corner vertices, counter-clockwise.
    pub vertices: [VertexId; 3],
    /// `border[z]` is set when edge `z` has no opposite face.
    pub border: [bool; 3],
}

impl Face {
    /// Create a face from three corner vertices.
    pub fn new(vertices: [VertexId; 3]) -> Self {
        Self {
            vertices,
            border: [false; 3],
        }
    }

    /// Corner index of `v` in this face, if present.
    #[inline]
    pub fn corner_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }
}

/// A triangle mesh with per-vertex flags and derived adjacency.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
    /// Face across each edge; empty while adjacency is stale.
    pub(crate) ff: Vec<[FaceId; 3]>,
    /// Edge index inside the opposite face.
    pub(crate) ffi: Vec<[u8; 3]>,
    /// Incident `(face, corner)` pairs per vertex; empty while stale.
    pub(crate) vf: Vec<Vec<(FaceId, u8)>>,
}

/// One directed face edge, keyed by its sorted endpoints.
#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    key: (u32, u32),
    face: FaceId,
    edge: u8,
}

impl TriMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
            ..Self::default()
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has neither vertices nor faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// Get the flags of a vertex.
    #[inline]
    pub fn flags(&self, v: VertexId) -> VertexFlags {
        self.vertices[v.index()].flags
    }

    /// Get mutable flags of a vertex.
    #[inline]
    pub fn flags_mut(&mut self, v: VertexId) -> &mut VertexFlags {
        &mut self.vertices[v.index()].flags
    }

    /// Get the three corner vertices of a face.
    #[inline]
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        self.faces[f.index()].vertices
    }

    /// Get the three corner positions of a face.
    #[inline]
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        let [a, b, c] = self.face_vertices(f);
        [*self.position(a), *self.position(b), *self.position(c)]
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.vertices.iter().map(|v| &v.position)
    }

    // ==================== Construction ====================

    /// Add a new unflagged vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        self.add_vertex_with_flags(position, VertexFlags::default())
    }

    /// Add a new vertex carrying the given flags.
    pub fn add_vertex_with_flags(&mut self, position: Point3<f64>, flags: VertexFlags) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex { position, flags });
        id
    }

    /// Add a triangle. Drops any computed adjacency.
    pub fn add_face(&mut self, vertices: [VertexId; 3]) -> FaceId {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(vertices));
        self.invalidate_topology();
        id
    }

    /// Forget derived adjacency after a topology edit.
    pub(crate) fn invalidate_topology(&mut self) {
        self.ff.clear();
        self.ffi.clear();
        self.vf.clear();
    }

    // ==================== Topology ====================

    /// Whether face-face and vertex-face adjacency are current.
    pub fn has_topology(&self) -> bool {
        self.ff.len() == self.faces.len() && self.vf.len() == self.vertices.len()
    }

    /// Recompute face-face and vertex-face adjacency.
    pub fn update_topology(&mut self) {
        self.update_face_face();
        self.update_vertex_face();
    }

    /// Collect every face edge keyed by its sorted endpoints, sorted by key.
    fn sorted_edge_records(&self) -> Vec<EdgeRecord> {
        let mut records = Vec::with_capacity(self.faces.len() * 3);
        for (fi, face) in self.faces.iter().enumerate() {
            for z in 0..3 {
                let a = face.vertices[z].raw();
                let b = face.vertices[(z + 1) % 3].raw();
                records.push(EdgeRecord {
                    key: (a.min(b), a.max(b)),
                    face: FaceId::new(fi),
                    edge: z as u8,
                });
            }
        }
        records.sort_by_key(|r| (r.key, r.face, r.edge));
        records
    }

    /// Recompute face-face adjacency.
    ///
    /// Faces sharing an edge are linked in a cycle in ascending face order;
    /// for a manifold edge that is simply the pair.
    pub fn update_face_face(&mut self) {
        let n = self.faces.len();
        self.ff = (0..n).map(|fi| [FaceId::new(fi); 3]).collect();
        self.ffi = vec![[0, 1, 2]; n];

        let records = self.sorted_edge_records();
        let mut start = 0;
        while start < records.len() {
            let mut end = start + 1;
            while end < records.len() && records[end].key == records[start].key {
                end += 1;
            }
            let group = &records[start..end];
            if group.len() > 1 {
                for (i, rec) in group.iter().enumerate() {
                    let other = &group[(i + 1) % group.len()];
                    self.ff[rec.face.index()][rec.edge as usize] = other.face;
                    self.ffi[rec.face.index()][rec.edge as usize] = other.edge;
                }
            }
            start = end;
        }
    }

    /// Recompute vertex-face incidence.
    pub fn update_vertex_face(&mut self) {
        let mut vf = vec![Vec::new(); self.vertices.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            for (z, v) in face.vertices.iter().enumerate() {
                vf[v.index()].push((FaceId::new(fi), z as u8));
            }
        }
        self.vf = vf;
    }

    /// Number of edges with more than two incident faces.
    pub fn count_non_manifold_edges(&self) -> usize {
        let records = self.sorted_edge_records();
        let mut count = 0;
        let mut start = 0;
        while start < records.len() {
            let mut end = start + 1;
            while end < records.len() && records[end].key == records[start].key {
                end += 1;
            }
            if end - start > 2 {
                count += 1;
            }
            start = end;
        }
        count
    }

    /// Face across edge `z` of `f`, and the shared edge's index in that face.
    #[inline]
    pub fn ff(&self, f: FaceId, z: usize) -> (FaceId, usize) {
        debug_assert!(self.has_topology(), "face-face adjacency is stale");
        (self.ff[f.index()][z], self.ffi[f.index()][z] as usize)
    }

    /// Faces incident to `v`, with the corner index of `v` in each.
    #[inline]
    pub fn vertex_faces(&self, v: VertexId) -> &[(FaceId, u8)] {
        debug_assert!(self.has_topology(), "vertex-face adjacency is stale");
        &self.vf[v.index()]
    }

    /// Vertices sharing an edge with `v`, sorted and without repeats.
    pub fn vertex_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        let mut out = Vec::with_capacity(self.vertex_faces(v).len() * 2);
        for &(f, z) in self.vertex_faces(v) {
            let verts = self.face_vertices(f);
            out.push(verts[(z as usize + 1) % 3]);
            out.push(verts[(z as usize + 2) % 3]);
        }
        out.sort();
        out.dedup();
        out
    }

    /// Recompute per-edge and per-vertex border flags from face-face adjacency.
    pub fn update_border_flags(&mut self) {
        if !self.has_topology() {
            self.update_topology();
        }
        for v in &mut self.vertices {
            v.flags.border = false;
        }
        for fi in 0..self.faces.len() {
            for z in 0..3 {
                let is_border = self.ff[fi][z].index() == fi;
                self.faces[fi].border[z] = is_border;
                if is_border {
                    let face = self.faces[fi];
                    self.vertices[face.vertices[z].index()].flags.border = true;
                    self.vertices[face.vertices[(z + 1) % 3].index()].flags.border = true;
                }
            }
        }
    }

    /// Whether edge `z` of face `f` is flagged as border.
    #[inline]
    pub fn is_border_edge(&self, f: FaceId, z: usize) -> bool {
        self.faces[f.index()].border[z]
    }

    /// Number of edges flagged as border.
    pub fn num_border_edges(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.border.iter().filter(|&&b| b).count())
            .sum()
    }

    // ==================== Flags ====================

    /// Clear the selected flag on every vertex.
    pub fn clear_selected(&mut self) {
        for v in &mut self.vertices {
            v.flags.selected = false;
        }
    }

    /// Clear the visited flag on every vertex.
    pub fn clear_visited(&mut self) {
        for v in &mut self.vertices {
            v.flags.visited = false;
        }
    }

    /// Set the selected flag on every vertex.
    pub fn select_all(&mut self) {
        for v in &mut self.vertices {
            v.flags.selected = true;
        }
    }

    /// Number of vertices with the given flag predicate.
    pub fn count_vertices_where(&self, pred: impl Fn(VertexFlags) -> bool) -> usize {
        self.vertices.iter().filter(|v| pred(v.flags)).count()
    }

    // ==================== Geometry ====================

    /// Unnormalized face normal (length is twice the face area).
    pub fn face_cross(&self, f: FaceId) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the unit normal of a face. Zero for degenerate faces.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        self.face_cross(f)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        0.5 * self.face_cross(f).norm()
    }

    /// Compute the total surface area of the mesh.
    pub fn area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Compute the bounding box of the mesh vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }

    /// Length of the bounding box diagonal, zero for an empty mesh.
    pub fn bbox_diagonal(&self) -> f64 {
        self.bounding_box()
            .map(|(min, max)| (max - min).norm())
            .unwrap_or(0.0)
    }

    /// Length of edge `z` of face `f`.
    pub fn edge_length(&self, f: FaceId, z: usize) -> f64 {
        let verts = self.face_vertices(f);
        (self.position(verts[(z + 1) % 3]) - self.position(verts[z])).norm()
    }
}
