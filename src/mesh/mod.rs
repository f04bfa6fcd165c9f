//! Core mesh data structures.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`], a triangle mesh stored as dense vertex
//! and face vectors with per-vertex flags and derived face-face /
//! vertex-face adjacency. [`Pos`] walks it edge by edge, and [`EdgeMesh`]
//! holds boundary graphs extracted from it.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies an edge of an [`EdgeMesh`]
//!
//! # Construction
//!
//! ```
//! use voromesh::mesh::{build_from_triangles, TriMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod builder;
mod edge_mesh;
mod index;
mod pos;
mod trimesh;

use nalgebra::Point3;

pub use builder::{build_from_points, build_from_triangles, to_face_vertex};
pub use edge_mesh::{Arc, EdgeMesh};
pub use index::{EdgeId, FaceId, VertexId};
pub use pos::Pos;
pub use trimesh::{Face, TriMesh, Vertex, VertexFlags};

/// Group exactly coincident positions.
///
/// Returns `(remap, representatives)`: `remap[i]` is the new index of
/// position `i`, and `representatives[j]` is the first original index that
/// maps to `j`. New indices follow the order of first occurrence. Signed
/// zeros compare equal.
pub(crate) fn coincident_vertex_map(positions: &[Point3<f64>]) -> (Vec<usize>, Vec<usize>) {
    let key = |i: usize| {
        let p = positions[i];
        [p.x + 0.0, p.y + 0.0, p.z + 0.0]
    };
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| {
        let (ka, kb) = (key(a), key(b));
        ka[0].total_cmp(&kb[0])
            .then(ka[1].total_cmp(&kb[1]))
            .then(ka[2].total_cmp(&kb[2]))
            .then(a.cmp(&b))
    });

    // Smallest original index of each group, for every position.
    let mut group_rep = vec![0; positions.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && key(order[end]) == key(order[start]) {
            end += 1;
        }
        for &i in &order[start..end] {
            group_rep[i] = order[start];
        }
        start = end;
    }

    let mut remap = vec![0; positions.len()];
    let mut representatives = Vec::new();
    for i in 0..positions.len() {
        if group_rep[i] == i {
            remap[i] = representatives.len();
            representatives.push(i);
        } else {
            remap[i] = remap[group_rep[i]];
        }
    }
    (remap, representatives)
}
