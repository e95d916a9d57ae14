//! The mesh aggregate: one container per element kind plus shared state.
//!
//! `Mesh` is the only type that knows the static who-references-whom
//! relation between element kinds, so it is the component that drives
//! reference fixup: after a container compaction it pushes the
//! [`RemapTable`] into every container whose elements may hold handles of
//! the compacted kind (the compacted container included, for
//! self-references), and after [`append`](Mesh::append) it offsets every
//! handle stored in an appended slot by the destination's pre-append
//! length for that handle's kind. Fixup completes before the mutating call
//! returns; there is no observable intermediate state.
//!
//! Because handles are indices, storage relocation (growth, `reserve`)
//! needs no fixup at all, and `Mesh` is [`Clone`]: a deep copy resolves
//! every handle identically to the source with no rebasing pass. The same
//! holds for moves and `std::mem::swap`.
//!
//! The per-kind operation surface (`add_vertex`, `delete_face`,
//! `vertex_normal`, custom attributes) lives in the sibling modules
//! [`vertices`], [`faces`], and [`edges`].

use crate::container::{ElementContainer, RemapTable};
use crate::debug_invariants::DebugInvariants;
use crate::element::{Edge, ElementKind, Face, Handle, Vertex};
use crate::geometry::Aabb;
use crate::mesh_error::MeshArenaError;

mod edges;
mod faces;
mod vertices;

/// A triangle mesh assembled from dense soft-deletable element containers.
///
/// Elements reference each other through kind-tagged index handles resolved
/// through this type at dereference time. A handle survives `add`,
/// `reserve`, and deletion of *other* elements unchanged; only compaction
/// renumbers, and the returned [`RemapTable`] is the contract for
/// re-resolving handles a caller retained across it.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub(crate) vertices: ElementContainer<Vertex>,
    pub(crate) faces: ElementContainer<Face>,
    pub(crate) edges: ElementContainer<Edge>,
    name: String,
    bounding_box: Aabb,
}

impl Mesh {
    /// An empty mesh with every optional attribute disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The stored bounding box. The crate stores and merges this value;
    /// computing it from positions is a geometry-layer concern.
    #[must_use]
    pub fn bounding_box(&self) -> &Aabb {
        &self.bounding_box
    }

    pub fn set_bounding_box(&mut self, bounding_box: Aabb) {
        self.bounding_box = bounding_box;
    }

    /// The vertex container: counts, iteration, version, raw slot access.
    #[must_use]
    pub fn vertices(&self) -> &ElementContainer<Vertex> {
        &self.vertices
    }

    /// The face container.
    #[must_use]
    pub fn faces(&self) -> &ElementContainer<Face> {
        &self.faces
    }

    /// The edge container.
    #[must_use]
    pub fn edges(&self) -> &ElementContainer<Edge> {
        &self.edges
    }

    /// Empties every container. Attribute enablement and custom-attribute
    /// registrations survive at length zero; name and bounding box reset;
    /// every container version bumps.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.edges.clear();
        self.name.clear();
        self.bounding_box = Aabb::empty();
        self.debug_assert_invariants();
    }

    /// Enables on `self` every optional attribute enabled on `other`,
    /// custom-attribute registrations included (union; nothing is
    /// disabled). Newly enabled columns are value-initialized.
    pub fn enable_same_attributes_of(&mut self, other: &Mesh) {
        self.vertices.enable_same_attributes_of(&other.vertices);
        self.faces.enable_same_attributes_of(&other.faces);
        self.edges.enable_same_attributes_of(&other.edges);
    }

    /// Copies every element of `other` onto the end of this mesh.
    ///
    /// Attribute enablement is unioned first, then `other`'s slots are
    /// copied verbatim (tombstones and flags included) with their attribute
    /// rows, and every handle stored in an appended slot is offset by the
    /// destination's pre-append length for its kind, so the copies
    /// reference each other instead of `other`'s elements. `self`'s
    /// pre-existing slots are untouched. The bounding box expands to
    /// include `other`'s; the name is unchanged.
    pub fn append(&mut self, other: &Mesh) {
        let vertex_offset = self.vertices.append(&other.vertices);
        let face_offset = self.faces.append(&other.faces);
        let edge_offset = self.edges.append(&other.edges);
        for kind in ElementKind::ALL {
            let offset = match kind {
                ElementKind::Vertex => vertex_offset,
                ElementKind::Face => face_offset,
                ElementKind::Edge => edge_offset,
            };
            self.vertices.offset_references_to(kind, offset, vertex_offset);
            self.faces.offset_references_to(kind, offset, face_offset);
            self.edges.offset_references_to(kind, offset, edge_offset);
        }
        self.bounding_box.merge(&other.bounding_box);
        log::debug!(
            "appended mesh: +{} vertices, +{} faces, +{} edges (tombstones included)",
            other.vertices.total_len(),
            other.faces.total_len(),
            other.edges.total_len(),
        );
        self.debug_assert_invariants();
    }

    /// Compacts the vertex container and rewrites every stored vertex
    /// handle in the mesh through the returned table. References to
    /// removed vertices become null.
    pub fn compact_vertices(&mut self) -> RemapTable {
        let before = self.vertices.total_len();
        let remap = self.vertices.compact();
        self.remap_references(ElementKind::Vertex, &remap);
        log::debug!(
            "compacted vertices: {before} slots -> {} live, {} reclaimed",
            remap.live_len(),
            remap.removed_len(),
        );
        self.debug_assert_invariants();
        remap
    }

    /// Compacts the face container; see [`compact_vertices`](Self::compact_vertices).
    pub fn compact_faces(&mut self) -> RemapTable {
        let before = self.faces.total_len();
        let remap = self.faces.compact();
        self.remap_references(ElementKind::Face, &remap);
        log::debug!(
            "compacted faces: {before} slots -> {} live, {} reclaimed",
            remap.live_len(),
            remap.removed_len(),
        );
        self.debug_assert_invariants();
        remap
    }

    /// Compacts the edge container; see [`compact_vertices`](Self::compact_vertices).
    pub fn compact_edges(&mut self) -> RemapTable {
        let before = self.edges.total_len();
        let remap = self.edges.compact();
        self.remap_references(ElementKind::Edge, &remap);
        log::debug!(
            "compacted edges: {before} slots -> {} live, {} reclaimed",
            remap.live_len(),
            remap.removed_len(),
        );
        self.debug_assert_invariants();
        remap
    }

    /// Compacts every container, vertices first so face and edge
    /// references are renumbered before their own containers move.
    pub fn compact(&mut self) {
        self.compact_vertices();
        self.compact_faces();
        self.compact_edges();
    }

    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable) {
        self.vertices.remap_references_to(kind, remap);
        self.faces.remap_references_to(kind, remap);
        self.edges.remap_references_to(kind, remap);
    }

    fn validate_references(&self) -> Result<(), MeshArenaError> {
        let vertex_len = self.vertices.total_len();
        let face_len = self.faces.total_len();
        let edge_len = self.edges.total_len();

        for (slot, face) in self.faces.iter_with_deleted().enumerate() {
            for &corner in &face.vertices {
                check_handle(ElementKind::Face, slot, corner, vertex_len)?;
            }
        }
        for (slot, edge) in self.edges.iter_with_deleted().enumerate() {
            for &end in &edge.vertices {
                check_handle(ElementKind::Edge, slot, end, vertex_len)?;
            }
        }

        let vertex_attrs = self.vertices.attributes();
        if let Some(rows) = vertex_attrs.adjacent_faces.as_slice() {
            for (slot, row) in rows.iter().enumerate() {
                for &h in row {
                    check_handle(ElementKind::Vertex, slot, h, face_len)?;
                }
            }
        }
        if let Some(rows) = vertex_attrs.adjacent_vertices.as_slice() {
            for (slot, row) in rows.iter().enumerate() {
                for &h in row {
                    check_handle(ElementKind::Vertex, slot, h, vertex_len)?;
                }
            }
        }
        if let Some(rows) = vertex_attrs.adjacent_edges.as_slice() {
            for (slot, row) in rows.iter().enumerate() {
                for &h in row {
                    check_handle(ElementKind::Vertex, slot, h, edge_len)?;
                }
            }
        }
        if let Some(rows) = self.faces.attributes().adjacent_faces.as_slice() {
            for (slot, row) in rows.iter().enumerate() {
                for &h in row {
                    check_handle(ElementKind::Face, slot, h, face_len)?;
                }
            }
        }
        Ok(())
    }
}

fn check_handle<H: Handle>(
    from: ElementKind,
    slot: usize,
    handle: Option<H>,
    len: usize,
) -> Result<(), MeshArenaError> {
    match handle {
        Some(h) if h.index() >= len => Err(MeshArenaError::ReferenceOutOfRange {
            from,
            slot,
            to: H::KIND,
            index: h.index(),
            len,
        }),
        _ => Ok(()),
    }
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Mesh");
    }

    /// Container bookkeeping first, then the cross-reference invariant:
    /// every non-null stored handle is in range of its target container.
    /// Liveness of targets is deliberately not checked here; a reference
    /// may resolve to a tombstone between `delete` and the next compaction.
    fn validate_invariants(&self) -> Result<(), MeshArenaError> {
        self.vertices.validate_invariants()?;
        self.faces.validate_invariants()?;
        self.edges.validate_invariants()?;
        self.validate_references()
    }
}
