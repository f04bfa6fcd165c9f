//! Mesh file I/O.
//!
//! | Format | Extension | Load | Save |
//! |--------|-----------|------|------|
//! | STL | `.stl` | binary and ASCII | binary |
//! | PLY | `.ply` | ASCII and binary | ASCII (binary via [`ply::save_binary`]) |
//!
//! [`load`] and [`save`] pick the format from the file extension.
//!
//! ```no_run
//! use voromesh::io::{load, save};
//!
//! let mesh = load("scan.stl").unwrap();
//! save(&mesh, "scan.ply").unwrap();
//! ```

pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

pub(crate) fn load_error(path: &Path, message: impl Into<String>) -> MeshError {
    MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

pub(crate) fn save_error(path: &Path, message: impl Into<String>) -> MeshError {
    MeshError::SaveError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Load a mesh, choosing the format by extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh, choosing the format by extension.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
pub(crate) fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("voromesh-{}-{}", std::process::id(), name))
}
