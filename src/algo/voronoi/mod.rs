//! Voronoi partitioning on triangle meshes.
//!
//! - [`relax`]: Lloyd relaxation of seed points restricted to the surface
//! - [`sources`]: nearest-seed labelling of mesh vertices along edges

pub mod relax;
pub mod sources;

pub use relax::{relax_seeds, relax_seeds_with_progress, RelaxOptions, RelaxReport};
pub use sources::{compute_sources, VoronoiSources};
