//! Error types for voromesh.
//!
//! Remeshing has a single fatal failure mode (non-manifold input); everything
//! else here comes from mesh construction, parameter validation and file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MeshError>;

/// Everything that can go wrong in voromesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// No faces to work on.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A triangle points past the end of the vertex list.
    #[error("triangle {face} uses vertex {vertex}, which does not exist")]
    InvalidVertexIndex {
        /// Offending triangle.
        face: usize,
        /// Out-of-range vertex.
        vertex: usize,
    },

    /// A triangle repeats a corner.
    #[error("triangle {face} repeats a vertex")]
    DegenerateFace {
        /// Offending triangle.
        face: usize,
    },

    /// Some edges are shared by more than two faces.
    ///
    /// Remeshing refuses such input before doing any work.
    #[error("input mesh is not two-manifold: {edges} edge(s) have more than two incident faces")]
    NonManifoldInput {
        /// Number of offending edges.
        edges: usize,
    },

    /// Underlying file system failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A file could not be parsed as a mesh.
    #[error("cannot read {path}: {message}")]
    LoadError {
        /// File being read.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A mesh could not be written.
    #[error("cannot write {path}: {message}")]
    SaveError {
        /// File being written.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The file extension names no supported format.
    #[error("no mesh format for extension '{extension}'")]
    UnsupportedFormat {
        /// Extension as found, or `(none)`.
        extension: String,
    },

    /// An option is out of range.
    #[error("{name} = {value}: {reason}")]
    InvalidParameter {
        /// Option name.
        name: &'static str,
        /// Rejected value, formatted.
        value: String,
        /// Accepted range.
        reason: &'static str,
    },
}

impl MeshError {
    /// Shorthand for [`MeshError::InvalidParameter`].
    pub fn invalid_param(name: &'static str, value: impl std::fmt::Display, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error is the non-manifold input rejection.
    pub fn is_non_manifold(&self) -> bool {
        matches!(self, Self::NonManifoldInput { .. })
    }
}
