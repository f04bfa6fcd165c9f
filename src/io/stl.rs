//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own corners. `stl_io` merges
//! bit-identical corners while reading, which restores connectivity for
//! files written by CAD tools.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::{load_error, save_error};
use crate::error::Result;
use crate::mesh::{build_from_triangles, TriMesh};

/// Load a mesh from a binary or ASCII STL file.
///
/// Triangles that collapse onto fewer than three distinct corners are
/// skipped.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let stl = stl_io::read_stl(&mut reader).map_err(|e| load_error(path, e.to_string()))?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
        .collect();
    let faces: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|t| t.vertices)
        .filter(|&[a, b, c]| a != b && b != c && a != c)
        .collect();

    let skipped = stl.faces.len() - faces.len();
    if skipped > 0 {
        log::warn!("{}: skipped {} degenerate triangles", path.display(), skipped);
    }
    if faces.is_empty() {
        return Err(load_error(path, "no valid triangles"));
    }
    build_from_triangles(&vertices, &faces)
}

fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Save a mesh as binary STL.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let triangles: Vec<stl_io::Triangle> = mesh
        .face_ids()
        .map(|f| {
            let n = mesh.face_normal(f);
            let [p0, p1, p2] = mesh.face_positions(f);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new(to_f32(&p0)),
                    stl_io::Vertex::new(to_f32(&p1)),
                    stl_io::Vertex::new(to_f32(&p2)),
                ],
            }
        })
        .collect();

    let mut out = BufWriter::new(File::create(path)?);
    stl_io::write_stl(&mut out, triangles.iter()).map_err(|e| save_error(path, e.to_string()))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::create_cube_mesh;
    use crate::io::temp_path;

    #[test]
    fn test_round_trip_restores_connectivity() {
        let mesh = create_cube_mesh(2);
        let path = temp_path("cube.stl");
        save(&mesh, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_faces(), mesh.num_faces());
        assert_eq!(loaded.num_vertices(), mesh.num_vertices());
        assert_eq!(loaded.num_border_edges(), 0);
        assert!((loaded.area() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_ascii_stl() {
        let path = temp_path("tri.stl");
        std::fs::write(
            &path,
            "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\n\
             vertex 0 1 0\nendloop\nendfacet\nendsolid t\n",
        )
        .unwrap();
        let mesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_vertices(), 3);
    }
}
