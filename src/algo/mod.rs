//! Mesh processing algorithms.
//!
//! - **Cleaning**: duplicate/unreferenced vertex removal, connected components
//! - **Crease cutting**: topological split along sharp edges
//! - **Refinement**: midpoint subdivision to a maximum edge length
//! - **Spatial queries**: k-d tree index over point sets
//! - **Sampling**: Monte-Carlo and Poisson-disk surface sampling
//! - **Voronoi**: restricted centroidal relaxation and per-vertex sources
//! - **Remeshing**: the Voronoi remeshing pipeline built on all of the above

pub mod clean;
pub mod crease;
pub mod progress;
pub mod refine;
pub mod remesh;
pub mod sampling;
pub mod spatial;
pub mod voronoi;

pub use progress::Progress;
