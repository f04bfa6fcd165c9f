//! Face/edge/vertex position for walking a [`TriMesh`].
//!
//! A [`Pos`] names one face, one of its edges, and one endpoint of that
//! edge. The elementary moves each change exactly one of the three while
//! keeping the others consistent, and compose into rotation around a vertex
//! ([`Pos::next_e`]) and travel along a boundary loop ([`Pos::next_b`]).
//! All moves need current face-face adjacency.

use super::index::{FaceId, VertexId};
use super::trimesh::TriMesh;

/// A (face, edge, vertex) triple. The vertex is always an endpoint of the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    /// Current face.
    pub f: FaceId,
    /// Current edge, as an index into the face (edge `z` joins corners `z` and `z + 1`).
    pub z: usize,
    /// Current vertex.
    pub v: VertexId,
}

impl Pos {
    /// Position on face `f`, edge `z`, vertex `v`.
    pub fn new(f: FaceId, z: usize, v: VertexId) -> Self {
        Self { f, z, v }
    }

    /// Position at corner `z` of face `f`: the edge leaving that corner.
    pub fn from_corner(mesh: &TriMesh, f: FaceId, z: usize) -> Self {
        Self::new(f, z, mesh.face_vertices(f)[z])
    }

    /// Index of the current vertex inside the current face.
    pub fn v_ind(&self, mesh: &TriMesh) -> usize {
        let verts = mesh.face_vertices(self.f);
        if verts[self.z] == self.v {
            self.z
        } else {
            (self.z + 1) % 3
        }
    }

    /// The other endpoint of the current edge.
    pub fn v_flip(&self, mesh: &TriMesh) -> VertexId {
        let verts = mesh.face_vertices(self.f);
        if verts[(self.z + 1) % 3] == self.v {
            verts[self.z]
        } else {
            verts[(self.z + 1) % 3]
        }
    }

    /// Move to the other endpoint of the current edge.
    pub fn flip_v(&mut self, mesh: &TriMesh) {
        self.v = self.v_flip(mesh);
    }

    /// Move to the other edge of the current face sharing the current vertex.
    pub fn flip_e(&mut self, mesh: &TriMesh) {
        let verts = mesh.face_vertices(self.f);
        if verts[(self.z + 1) % 3] == self.v {
            self.z = (self.z + 1) % 3;
        } else {
            self.z = (self.z + 2) % 3;
        }
    }

    /// Cross the current edge into the adjacent face. No-op on a border edge.
    pub fn flip_f(&mut self, mesh: &TriMesh) {
        let (nf, nz) = mesh.ff(self.f, self.z);
        self.f = nf;
        self.z = nz;
    }

    /// Rotate one step around the current vertex.
    ///
    /// On a border edge the face flip is a no-op, so repeated calls sweep
    /// back and forth across an open fan.
    pub fn next_e(&mut self, mesh: &TriMesh) {
        self.flip_e(mesh);
        self.flip_f(mesh);
    }

    /// Whether the current edge has no opposite face.
    pub fn is_border(&self, mesh: &TriMesh) -> bool {
        mesh.ff(self.f, self.z).0 == self.f
    }

    /// Advance to the next border edge of the loop and its far endpoint.
    ///
    /// Must start on a border edge. Rotates around the current vertex to the
    /// other border edge of its fan, then moves to that edge's other end.
    /// `max_steps` bounds the rotation; returns `false` if it was exhausted.
    pub fn next_b(&mut self, mesh: &TriMesh, max_steps: usize) -> bool {
        debug_assert!(self.is_border(mesh));
        let mut steps = 0;
        loop {
            self.next_e(mesh);
            steps += 1;
            if self.is_border(mesh) {
                break;
            }
            if steps >= max_steps {
                return false;
            }
        }
        self.flip_v(mesh);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// Unit square split into two triangles.
    fn square() -> TriMesh {
        let mut mesh = TriMesh::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let v3 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_face([v0, v1, v2]);
        mesh.add_face([v0, v2, v3]);
        mesh.update_topology();
        mesh.update_border_flags();
        mesh
    }

    #[test]
    fn test_flips_keep_consistency() {
        let mesh = square();
        let mut pos = Pos::from_corner(&mesh, FaceId::new(0), 0);
        assert_eq!(pos.v, VertexId::new(0));
        assert_eq!(pos.v_ind(&mesh), 0);

        pos.flip_v(&mesh);
        assert_eq!(pos.v, VertexId::new(1));
        pos.flip_v(&mesh);
        assert_eq!(pos.v, VertexId::new(0));

        // The other edge of face 0 at v0 is edge 2 (v2 -> v0), shared with face 1.
        pos.flip_e(&mesh);
        assert_eq!(pos.z, 2);
        assert!(!pos.is_border(&mesh));
        pos.flip_f(&mesh);
        assert_eq!(pos.f, FaceId::new(1));
        assert_eq!(pos.v, VertexId::new(0));
    }

    #[test]
    fn test_next_b_walks_square_boundary() {
        let mesh = square();
        let mut pos = Pos::from_corner(&mesh, FaceId::new(0), 0);
        assert!(pos.is_border(&mesh));

        let mut visited = vec![pos.v];
        for _ in 0..4 {
            assert!(pos.next_b(&mesh, 16));
            visited.push(pos.v);
        }
        // Walk runs against the face orientation: v0, v3, v2, v1, v0.
        let expected: Vec<VertexId> = [0, 3, 2, 1, 0].into_iter().map(VertexId::new).collect();
        assert_eq!(visited, expected);
    }
}
