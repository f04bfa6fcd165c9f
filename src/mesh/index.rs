//! Typed element indices.
//!
//! Vertices, faces and boundary-graph edges live in dense vectors and are
//! addressed by `u32` wrappers. Attribute maps (Voronoi sources, seed maps)
//! are keyed by these indices, never by references.

use std::fmt::{self, Debug};

/// Sentinel raw value for an invalid index.
const INVALID: u32 = u32::MAX;

/// Vertex of a [`TriMesh`](super::TriMesh) or [`EdgeMesh`](super::EdgeMesh).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// Face of a [`TriMesh`](super::TriMesh).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// Edge of an [`EdgeMesh`](super::EdgeMesh).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Wrap a dense position.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large for u32", index);
                Self(index as u32)
            }

            /// The sentinel meaning "no element".
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Position in the owning vector.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Stored `u32`.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Whether this is not the sentinel.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(-)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");
impl_index_type!(EdgeId, "E");
