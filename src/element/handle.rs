//! Kind-tagged element handles: the crate's only cross-reference form
//!
//! Every stored reference from one element to another is a handle: a
//! `repr(transparent)` newtype over `NonZeroU32` holding the target's
//! physical index plus one. The +1 shift gives `Option<Handle>` the same
//! four-byte layout as the handle itself, and `None` doubles as the null
//! sentinel compaction fixup writes for removed targets.
//!
//! Handles are plain indices resolved through the owning [`Mesh`]: growing
//! or relocating a container's backing storage never invalidates them, and
//! only compaction (renumbering) or mesh append (offsetting) rewrites them.
//! Each element kind gets its own type so a face can never be fed a vertex
//! handle; the shared behavior lives in the [`Handle`] trait.
//!
//! [`Mesh`]: crate::mesh::Mesh

use crate::element::ElementKind;
use crate::mesh_error::MeshArenaError;
use std::fmt;
use std::num::NonZeroU32;

/// Common surface of the per-kind handle types.
///
/// ```rust
/// use mesh_arena::element::{ElementKind, Handle, VertexHandle};
///
/// let h = VertexHandle::new(3);
/// assert_eq!(h.index(), 3);
/// assert_eq!(VertexHandle::KIND, ElementKind::Vertex);
/// ```
pub trait Handle:
    Copy + Clone + Eq + Ord + std::hash::Hash + fmt::Debug + fmt::Display + 'static
{
    /// The element kind this handle designates.
    const KIND: ElementKind;

    /// Wraps a physical index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not representable (see [`Handle::try_new`]).
    fn new(index: usize) -> Self;

    /// Fallible constructor for externally supplied indices.
    ///
    /// Fails with [`MeshArenaError::HandleOverflow`] when `index >=
    /// u32::MAX as usize`; the top value is reserved by the +1 encoding.
    fn try_new(index: usize) -> Result<Self, MeshArenaError>;

    /// The physical index this handle designates.
    fn index(self) -> usize;

    /// A handle to the same element after its container grew by `by` slots
    /// in front of it. Used by append fixup.
    ///
    /// # Panics
    ///
    /// Panics if the shifted index is not representable.
    #[inline]
    #[must_use]
    fn offset(self, by: usize) -> Self {
        Self::new(self.index() + by)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wraps a physical index.
            ///
            /// # Panics
            ///
            /// Panics if `index >= u32::MAX as usize`.
            #[inline]
            #[must_use]
            pub fn new(index: usize) -> Self {
                match Self::try_new(index) {
                    Ok(h) => h,
                    Err(_) => panic!(
                        concat!(stringify!($name), " index {} out of range"),
                        index
                    ),
                }
            }

            /// Fallible constructor for externally supplied indices.
            #[inline]
            pub fn try_new(index: usize) -> Result<Self, MeshArenaError> {
                u32::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_add(1))
                    .and_then(NonZeroU32::new)
                    .map(Self)
                    .ok_or(MeshArenaError::HandleOverflow(index))
            }

            /// The physical index this handle designates.
            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl Handle for $name {
            const KIND: ElementKind = $kind;

            #[inline]
            fn new(index: usize) -> Self {
                Self::new(index)
            }

            #[inline]
            fn try_new(index: usize) -> Result<Self, MeshArenaError> {
                Self::try_new(index)
            }

            #[inline]
            fn index(self) -> usize {
                self.index()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.index()).finish()
            }
        }

        /// Prints the physical index without wrapper text.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

define_handle! {
    /// Handle to a vertex in the owning mesh's vertex container.
    VertexHandle => ElementKind::Vertex
}

define_handle! {
    /// Handle to a face in the owning mesh's face container.
    FaceHandle => ElementKind::Face
}

define_handle! {
    /// Handle to an edge in the owning mesh's edge container.
    EdgeHandle => ElementKind::Edge
}

#[cfg(test)]
mod layout_tests {
    //! The niche encoding is load-bearing: elements store `Option<Handle>`
    //! columns, so both layouts must stay at four bytes.
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(VertexHandle, u32);
    assert_eq_size!(Option<VertexHandle>, u32);
    assert_eq_size!(FaceHandle, u32);
    assert_eq_size!(Option<FaceHandle>, u32);
    assert_eq_size!(EdgeHandle, u32);
    assert_eq_size!(Option<EdgeHandle>, u32);
}
