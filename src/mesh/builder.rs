//! Conversion between [`TriMesh`] and flat position/index arrays.

use nalgebra::Point3;

use super::index::VertexId;
use super::trimesh::TriMesh;
use crate::error::{MeshError, Result};

/// Build a triangle mesh from indexed triangles.
///
/// Every index must point into `vertices` and every triangle needs three
/// distinct corners. Adjacency and border flags are ready on return.
///
/// ```
/// use voromesh::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let strip = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&strip, &[[0, 1, 3], [0, 3, 2]]).unwrap();
/// assert_eq!(mesh.num_border_edges(), 4);
/// assert!(mesh.flags(voromesh::mesh::VertexId::new(3)).border);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<TriMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (face, &[a, b, c]) in faces.iter().enumerate() {
        if let Some(&vertex) = [a, b, c].iter().find(|&&i| i >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face, vertex });
        }
        if a == b || b == c || c == a {
            return Err(MeshError::DegenerateFace { face });
        }
    }

    let mut mesh = TriMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }
    for face in faces {
        mesh.add_face(face.map(VertexId::new));
    }
    mesh.update_topology();
    mesh.update_border_flags();
    Ok(mesh)
}

/// Build a mesh holding only vertices, one per point.
pub fn build_from_points(points: &[Point3<f64>]) -> TriMesh {
    let mut mesh = TriMesh::with_capacity(points.len(), 0);
    for &p in points {
        mesh.add_vertex(p);
    }
    mesh
}

/// Flatten a mesh into positions and index triples, in storage order.
pub fn to_face_vertex(mesh: &TriMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.positions().copied().collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()))
        .collect();

    (vertices, faces)
}
