//! Typed handles into the mesh arenas.
//!
//! Vertices, half-edges and faces live in flat `Vec`s owned by the mesh; every
//! cross-reference between them is one of the handles below. The handles are
//! generic over the integer width so small meshes can use `u16` and huge ones
//! `u64`; `u32` is the default everywhere.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as mesh indices.
///
/// The maximum value of each type is reserved as the "no element" sentinel.
pub trait MeshIndex:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Sentinel for an unset reference.
    const INVALID: Self;

    /// Convert from `usize`, returning `None` if the value does not fit
    /// (or would collide with the sentinel).
    fn try_from_usize(v: usize) -> Option<Self>;

    /// Convert to `usize`.
    fn to_usize(self) -> usize;

    /// Largest number of elements an arena indexed by this type can hold.
    fn capacity() -> usize {
        Self::INVALID.to_usize()
    }
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {
        $(
            impl MeshIndex for $t {
                const INVALID: Self = <$t>::MAX;

                #[inline]
                fn try_from_usize(v: usize) -> Option<Self> {
                    <$t>::try_from(v).ok().filter(|&i| i != Self::INVALID)
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32, u64);

/// Handle of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Handle of a half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Handle of a face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a handle from a position in its arena.
            ///
            /// Out-of-range positions produce the invalid handle; arenas check
            /// their size against [`MeshIndex::capacity`] before growing, so
            /// this only happens for positions no arena can hold.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::try_from_usize(index).unwrap_or(I::INVALID))
            }

            /// The unset handle.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Position of the element in its arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Whether the handle refers to an element.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != I::INVALID
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $tag, self.index())
                } else {
                    write!(f, "{}(-)", $tag)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(HalfEdgeId, "HE");
impl_handle!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let v: VertexId = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert!(!VertexId::<u32>::invalid().is_valid());
        assert_eq!(VertexId::<u32>::default(), VertexId::invalid());
    }

    #[test]
    fn test_sentinel_is_rejected() {
        assert_eq!(u16::try_from_usize(65_535), None);
        assert_eq!(u16::try_from_usize(65_534), Some(65_534));
        assert_eq!(u16::try_from_usize(70_000), None);
        assert!(!VertexId::<u16>::new(70_000).is_valid());
        assert_eq!(u16::capacity(), 65_535);
    }

    #[test]
    fn test_debug_format() {
        let he: HalfEdgeId = HalfEdgeId::new(7);
        assert_eq!(format!("{:?}", he), "HE(7)");
        assert_eq!(format!("{:?}", FaceId::<u32>::invalid()), "F(-)");
    }
}
