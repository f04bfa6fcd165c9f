//! # voromesh
//!
//! Voronoi-based surface remeshing.
//!
//! voromesh rebuilds a triangle mesh so that its vertices are spread evenly
//! at a chosen spacing. Sites are scattered over the surface, relaxed
//! towards the centroids of their Voronoi cells, and the dual of the final
//! partition becomes the new mesh. Open boundaries, boundary corners and
//! sharp creases survive the process.
//!
//! ## Quick Start
//!
//! ```no_run
//! use voromesh::prelude::*;
//!
//! let mesh = voromesh::io::load("bracket.stl").unwrap();
//! let options = RemeshOptions::new(0.5)
//!     .with_border_crease_angle(45.0)
//!     .with_internal_crease_angle(30.0);
//! let remeshed = remesh(&mesh, &options).unwrap();
//! voromesh::io::save(&remeshed, "bracket_remeshed.stl").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use voromesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! assert_eq!(mesh.num_border_edges(), 4);
//! assert_eq!(mesh.count_non_manifold_edges(), 0);
//! ```
//!
//! ## Logging
//!
//! The library logs through the [`log`](https://docs.rs/log) facade: a
//! summary per run at `info`, per-component and per-stage statistics at
//! `debug`. Install any logger (the `voromesh` binary uses `env_logger`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use voromesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::remesh::{remesh, remesh_with_progress, RemeshOptions};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, EdgeMesh, Face, FaceId, TriMesh, Vertex,
        VertexFlags, VertexId,
    };
}

/// The linear algebra crate used for all positions and vectors.
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_prelude_covers_a_full_run() {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let mesh = build_from_triangles(&corners, &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]).unwrap();
        assert_eq!(mesh.num_border_edges(), 0);

        // Far too coarse for a closed mesh without boundary: nothing survives.
        let out: Result<TriMesh> = remesh(&mesh, &RemeshOptions::new(10.0));
        assert!(out.unwrap().is_empty());
    }
}
