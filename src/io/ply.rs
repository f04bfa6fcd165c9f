//! PLY (Stanford polygon) format support.
//!
//! Reading goes through the `ply-rs` parser, so ASCII and both binary
//! encodings load. Polygons with more than three corners are fanned into
//! triangles.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;

use super::{load_error, save_error};
use crate::error::Result;
use crate::mesh::{build_from_triangles, to_face_vertex, TriMesh};

/// Load a mesh from a PLY file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let ply = Parser::<DefaultElement>::new()
        .read_ply(&mut reader)
        .map_err(|e| load_error(path, e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error(path, "no vertex element"))?;
    let vertices = vertex_element
        .iter()
        .map(|v| {
            let coord = |name: &str| {
                scalar(v, name).ok_or_else(|| load_error(path, format!("vertex without {}", name)))
            };
            Ok(Point3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect::<Result<Vec<_>>>()?;

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error(path, "no face element"))?;
    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let corners = index_list(face, "vertex_indices")
            .or_else(|| index_list(face, "vertex_index"))
            .ok_or_else(|| load_error(path, "face without vertex_indices"))?;
        for i in 1..corners.len().saturating_sub(1) {
            faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }
    if faces.is_empty() {
        return Err(load_error(path, "no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

fn scalar(element: &DefaultElement, name: &str) -> Option<f64> {
    Some(match element.get(name)? {
        Property::Float(v) => f64::from(*v),
        Property::Double(v) => *v,
        Property::Int(v) => f64::from(*v),
        Property::UInt(v) => f64::from(*v),
        Property::Short(v) => f64::from(*v),
        Property::UShort(v) => f64::from(*v),
        Property::Char(v) => f64::from(*v),
        Property::UChar(v) => f64::from(*v),
        _ => return None,
    })
}

fn index_list(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn widen<T: Copy + TryInto<usize>>(v: &[T]) -> Option<Vec<usize>> {
        v.iter().map(|&x| x.try_into().ok()).collect()
    }
    match element.get(name)? {
        Property::ListInt(v) => widen(v),
        Property::ListUInt(v) => widen(v),
        Property::ListShort(v) => widen(v),
        Property::ListUShort(v) => widen(v),
        Property::ListChar(v) => widen(v),
        Property::ListUChar(v) => widen(v),
        _ => None,
    }
}

/// Save a mesh as ASCII PLY.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    write(mesh, path.as_ref(), Encoding::Ascii)
}

/// Save a mesh as little-endian binary PLY.
pub fn save_binary<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    write(mesh, path.as_ref(), Encoding::BinaryLittleEndian)
}

fn write(mesh: &TriMesh, path: &Path, encoding: Encoding) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = encoding;
    ply.header.comments.push("written by voromesh".to_string());

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for axis in ["x", "y", "z"] {
        vertex_def.properties.add(PropertyDef::new(
            axis.to_string(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    ply.header.elements.add(face_def);

    let vertex_rows = vertices
        .iter()
        .map(|p| {
            let mut row = DefaultElement::new();
            row.insert("x".to_string(), Property::Double(p.x));
            row.insert("y".to_string(), Property::Double(p.y));
            row.insert("z".to_string(), Property::Double(p.z));
            row
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertex_rows);

    let face_rows = faces
        .iter()
        .map(|f| {
            let indices = f
                .iter()
                .map(|&i| i32::try_from(i).map_err(|_| save_error(path, "vertex index overflows i32")))
                .collect::<Result<Vec<i32>>>()?;
            let mut row = DefaultElement::new();
            row.insert("vertex_indices".to_string(), Property::ListInt(indices));
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;
    ply.payload.insert("face".to_string(), face_rows);

    ply.make_consistent()
        .map_err(|e| save_error(path, format!("{:?}", e)))?;

    let mut out = BufWriter::new(File::create(path)?);
    Writer::new().write_ply(&mut out, &mut ply)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::create_tetrahedron;
    use crate::io::temp_path;

    fn assert_same_geometry(a: &TriMesh, b: &TriMesh) {
        assert_eq!(a.num_vertices(), b.num_vertices());
        assert_eq!(a.num_faces(), b.num_faces());
        for v in a.vertex_ids() {
            assert_eq!(a.position(v), b.position(v));
        }
        for f in a.face_ids() {
            assert_eq!(a.face_vertices(f), b.face_vertices(f));
        }
    }

    #[test]
    fn test_ascii_and_binary_keep_exact_geometry() {
        let mesh = create_tetrahedron();
        for (name, binary) in [("ascii.ply", false), ("binary.ply", true)] {
            let path = temp_path(name);
            if binary {
                save_binary(&mesh, &path).unwrap();
            } else {
                save(&mesh, &path).unwrap();
            }
            let loaded = load(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_same_geometry(&mesh, &loaded);
            assert!(loaded.has_topology());
        }
    }

    #[test]
    fn test_quads_are_fanned() {
        let path = temp_path("quad.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\n\
             property float z\nelement face 1\nproperty list uchar int vertex_indices\n\
             end_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n",
        )
        .unwrap();
        let mesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_border_edges(), 4);
    }

    #[test]
    fn test_missing_faces_is_an_error() {
        let path = temp_path("points.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\n\
             property float z\nend_header\n0 0 0\n",
        )
        .unwrap();
        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, crate::error::MeshError::LoadError { .. }));
    }
}
