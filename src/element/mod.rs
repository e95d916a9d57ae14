//! Element kinds, flags, and the trait containers are generic over.
//!
//! Element capabilities are static: a closed [`ElementKind`] enum plus
//! associated constants on the [`Element`] trait. `REFERENCED_KINDS` is the
//! "who references whom" relation the [`Mesh`](crate::mesh::Mesh) consults
//! when it drives reference fixup after a compaction or an append.

use crate::container::remap::RemapTable;
use std::fmt;

pub mod edge;
pub mod face;
pub mod handle;
pub mod vertex;

pub use edge::{Edge, EdgeAttributes};
pub use face::{Face, FaceAttributes};
pub use handle::{EdgeHandle, FaceHandle, Handle, VertexHandle};
pub use vertex::{ADJACENCY_INLINE, AdjacencyRow, Vertex, VertexAttributes};

/// The closed set of element kinds a mesh composes containers for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ElementKind {
    /// Vertex container.
    Vertex,
    /// Face container.
    Face,
    /// Edge container.
    Edge,
}

impl ElementKind {
    /// Every kind, in container-declaration order.
    pub const ALL: [ElementKind; 3] = [ElementKind::Vertex, ElementKind::Face, ElementKind::Edge];

    /// Lowercase kind name, as used in error messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Face => "face",
            ElementKind::Edge => "edge",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Per-element flag word.
    ///
    /// `DELETED` is the tombstone mark and is owned by the container: it is
    /// set by `delete` and cleared only by slot reclamation. Writing it
    /// through [`Element::flags_mut`] desynchronizes the live count. The
    /// remaining bits are free for callers and survive compaction and
    /// append with their element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u32 {
        /// Tombstone mark; container-managed.
        const DELETED = 1 << 0;
        /// Caller-managed selection mark.
        const SELECTED = 1 << 1;
        /// Caller-managed traversal mark.
        const VISITED = 1 << 2;
        /// Caller-managed boundary mark.
        const BORDER = 1 << 3;
    }
}

/// One element of a mesh: a vertex, face, or edge.
///
/// Implementations pair a concrete element type with its handle type and its
/// optional-attribute aggregate, and expose the two reference-rewrite hooks
/// the fixup protocol drives over the element's *required* components
/// (adjacency columns rewrite themselves through
/// [`AttributeAggregate`](crate::container::attribute::AttributeAggregate)).
///
/// The index cache and the `DELETED` flag are maintained by the owning
/// container; the mutating methods here exist for the container and for
/// caller-managed flag bits, not for rewiring bookkeeping by hand.
pub trait Element: Clone + fmt::Debug + Default + 'static {
    /// Kind tag of this element type.
    const KIND: ElementKind;

    /// Kinds this element type can hold references to, through required
    /// components or optional adjacency columns. Drives fixup dispatch.
    const REFERENCED_KINDS: &'static [ElementKind];

    /// Handle type naming elements of this kind.
    type Handle: Handle;

    /// Optional-attribute aggregate stored column-wise by the container.
    type Attributes: crate::container::attribute::AttributeAggregate
        + Clone
        + fmt::Debug
        + Default;

    /// Cached physical index; containers keep it aligned with the slot at
    /// every observation point.
    fn index(&self) -> usize;

    /// Rewrites the cached index. Container-driven.
    fn set_index(&mut self, index: usize);

    /// This element's handle, derived from the cached index.
    #[inline]
    fn handle(&self) -> Self::Handle {
        Self::Handle::new(self.index())
    }

    /// Flag word.
    fn flags(&self) -> ElementFlags;

    /// Mutable flag word. `DELETED` is container-managed; see
    /// [`ElementFlags`].
    fn flags_mut(&mut self) -> &mut ElementFlags;

    /// Whether this element is tombstoned.
    #[inline]
    fn is_deleted(&self) -> bool {
        self.flags().contains(ElementFlags::DELETED)
    }

    /// Rewrites required-component references to `kind` through `remap`,
    /// nulling references to removed targets. No-op for kinds this element
    /// holds no required references to.
    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable);

    /// Offsets required-component references to `kind` by `offset`. Used by
    /// mesh append for elements copied from the source mesh.
    fn offset_references(&mut self, kind: ElementKind, offset: usize);
}
