//! Vertex elements and their optional attribute columns.
//!
//! A vertex requires only a position; normals, colors, quality scalars, and
//! the three adjacency lists are toggleable columns in the container. The
//! adjacency columns are what make vertices participate in reference fixup
//! for every element kind, including vertex-to-vertex self-references.

use crate::container::attribute::{AttributeAggregate, AttributeSlot, check_column};
use crate::container::custom::CustomAttributes;
use crate::container::remap::{RemapTable, offset_row, remap_row};
use crate::element::handle::{EdgeHandle, FaceHandle, Handle, VertexHandle};
use crate::element::{Element, ElementFlags, ElementKind};
use crate::geometry::{Color, Point3, Vector3};
use crate::mesh_error::MeshArenaError;
use smallvec::SmallVec;

/// Inline capacity of variable-length adjacency rows. Interior vertices of
/// a closed triangle mesh typically have valence six.
pub const ADJACENCY_INLINE: usize = 6;

/// One adjacency list: the references one vertex holds to its neighbors of
/// some kind. Entries go null when the target is reclaimed.
pub type AdjacencyRow<H> = SmallVec<[Option<H>; ADJACENCY_INLINE]>;

/// A mesh vertex.
///
/// The position is the required component; everything else lives in
/// [`VertexAttributes`] columns. The cached index and the `DELETED` flag
/// are container bookkeeping.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Position in model space.
    pub position: Point3<f64>,
    index: usize,
    flags: ElementFlags,
}

impl Vertex {
    /// The position, by value.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.position
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            index: 0,
            flags: ElementFlags::empty(),
        }
    }
}

impl Element for Vertex {
    const KIND: ElementKind = ElementKind::Vertex;
    // Adjacency columns can reference every kind.
    const REFERENCED_KINDS: &'static [ElementKind] =
        &[ElementKind::Vertex, ElementKind::Face, ElementKind::Edge];

    type Handle = VertexHandle;
    type Attributes = VertexAttributes;

    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    #[inline]
    fn flags(&self) -> ElementFlags {
        self.flags
    }

    #[inline]
    fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }

    // A vertex holds no required references; its references are all
    // column-stored adjacency, rewritten by the aggregate.
    fn remap_references(&mut self, _kind: ElementKind, _remap: &RemapTable) {}

    fn offset_references(&mut self, _kind: ElementKind, _offset: usize) {}
}

/// Column-wise optional attributes of the vertex container.
#[derive(Debug, Clone)]
pub struct VertexAttributes {
    /// Per-vertex normals.
    pub normal: AttributeSlot<Vector3<f64>>,
    /// Per-vertex colors.
    pub color: AttributeSlot<Color>,
    /// Per-vertex scalar quality.
    pub quality: AttributeSlot<f64>,
    /// Faces incident to each vertex.
    pub adjacent_faces: AttributeSlot<AdjacencyRow<FaceHandle>>,
    /// Vertices adjacent to each vertex.
    pub adjacent_vertices: AttributeSlot<AdjacencyRow<VertexHandle>>,
    /// Edges incident to each vertex.
    pub adjacent_edges: AttributeSlot<AdjacencyRow<EdgeHandle>>,
    /// Named custom columns.
    pub custom: CustomAttributes,
}

impl Default for VertexAttributes {
    fn default() -> Self {
        Self {
            normal: AttributeSlot::default(),
            color: AttributeSlot::default(),
            quality: AttributeSlot::default(),
            adjacent_faces: AttributeSlot::default(),
            adjacent_vertices: AttributeSlot::default(),
            adjacent_edges: AttributeSlot::default(),
            custom: CustomAttributes::new(ElementKind::Vertex),
        }
    }
}

fn remap_adjacency<H: Handle>(slot: &mut AttributeSlot<AdjacencyRow<H>>, remap: &RemapTable) {
    if let Some(rows) = slot.as_mut_slice() {
        for row in rows {
            remap_row(row.iter_mut(), remap);
        }
    }
}

fn offset_adjacency<H: Handle>(slot: &mut AttributeSlot<AdjacencyRow<H>>, by: usize, first: usize) {
    if let Some(rows) = slot.as_mut_slice() {
        for row in rows.iter_mut().skip(first) {
            offset_row(row.iter_mut(), by);
        }
    }
}

impl AttributeAggregate for VertexAttributes {
    fn push(&mut self) {
        self.normal.push();
        self.color.push();
        self.quality.push();
        self.adjacent_faces.push();
        self.adjacent_vertices.push();
        self.adjacent_edges.push();
        self.custom.push();
    }

    fn resize(&mut self, len: usize) {
        self.normal.resize(len);
        self.color.resize(len);
        self.quality.resize(len);
        self.adjacent_faces.resize(len);
        self.adjacent_vertices.resize(len);
        self.adjacent_edges.resize(len);
        self.custom.resize(len);
    }

    fn reserve(&mut self, additional: usize) {
        self.normal.reserve(additional);
        self.color.reserve(additional);
        self.quality.reserve(additional);
        self.adjacent_faces.reserve(additional);
        self.adjacent_vertices.reserve(additional);
        self.adjacent_edges.reserve(additional);
        self.custom.reserve(additional);
    }

    fn compact(&mut self, remap: &RemapTable) {
        self.normal.compact(remap);
        self.color.compact(remap);
        self.quality.compact(remap);
        self.adjacent_faces.compact(remap);
        self.adjacent_vertices.compact(remap);
        self.adjacent_edges.compact(remap);
        self.custom.compact(remap);
    }

    fn clear(&mut self) {
        self.normal.clear();
        self.color.clear();
        self.quality.clear();
        self.adjacent_faces.clear();
        self.adjacent_vertices.clear();
        self.adjacent_edges.clear();
        self.custom.clear();
    }

    fn enable_same_as(&mut self, other: &Self, len: usize) {
        self.normal.enable_if_enabled(&other.normal, len);
        self.color.enable_if_enabled(&other.color, len);
        self.quality.enable_if_enabled(&other.quality, len);
        self.adjacent_faces.enable_if_enabled(&other.adjacent_faces, len);
        self.adjacent_vertices
            .enable_if_enabled(&other.adjacent_vertices, len);
        self.adjacent_edges.enable_if_enabled(&other.adjacent_edges, len);
        self.custom.register_same_as(&other.custom, len);
    }

    fn append_from(&mut self, other: &Self, other_len: usize) {
        self.normal.append_from(&other.normal, other_len);
        self.color.append_from(&other.color, other_len);
        self.quality.append_from(&other.quality, other_len);
        self.adjacent_faces.append_from(&other.adjacent_faces, other_len);
        self.adjacent_vertices
            .append_from(&other.adjacent_vertices, other_len);
        self.adjacent_edges.append_from(&other.adjacent_edges, other_len);
        self.custom.append_from(&other.custom, other_len);
    }

    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable) {
        match kind {
            ElementKind::Vertex => remap_adjacency(&mut self.adjacent_vertices, remap),
            ElementKind::Face => remap_adjacency(&mut self.adjacent_faces, remap),
            ElementKind::Edge => remap_adjacency(&mut self.adjacent_edges, remap),
        }
    }

    fn offset_references(&mut self, kind: ElementKind, offset: usize, first: usize) {
        match kind {
            ElementKind::Vertex => offset_adjacency(&mut self.adjacent_vertices, offset, first),
            ElementKind::Face => offset_adjacency(&mut self.adjacent_faces, offset, first),
            ElementKind::Edge => offset_adjacency(&mut self.adjacent_edges, offset, first),
        }
    }

    fn validate_lengths(&self, kind: ElementKind, expected: usize) -> Result<(), MeshArenaError> {
        check_column(&self.normal, kind, "normal", expected)?;
        check_column(&self.color, kind, "color", expected)?;
        check_column(&self.quality, kind, "quality", expected)?;
        check_column(&self.adjacent_faces, kind, "adjacent_faces", expected)?;
        check_column(&self.adjacent_vertices, kind, "adjacent_vertices", expected)?;
        check_column(&self.adjacent_edges, kind, "adjacent_edges", expected)?;
        self.custom.validate_lengths(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vertex_sits_at_origin() {
        let v = Vertex::default();
        assert_eq!(v.position(), Point3::origin());
        assert_eq!(v.index(), 0);
        assert!(!v.is_deleted());
    }

    #[test]
    fn handle_tracks_cached_index() {
        let mut v = Vertex::default();
        v.set_index(12);
        assert_eq!(v.handle(), VertexHandle::new(12));
    }

    #[test]
    fn adjacency_columns_remap_per_kind() {
        let mut attrs = VertexAttributes::default();
        attrs.adjacent_faces.enable(1);
        attrs.adjacent_vertices.enable(1);
        attrs.adjacent_faces.get_mut(0).unwrap().push(Some(FaceHandle::new(1)));
        attrs
            .adjacent_vertices
            .get_mut(0)
            .unwrap()
            .push(Some(VertexHandle::new(1)));

        // Face 1 removed; vertex column must be untouched.
        let mut remap = RemapTable::with_capacity(2);
        remap.push_live();
        remap.push_removed();
        attrs.remap_references(ElementKind::Face, &remap);

        assert_eq!(attrs.adjacent_faces.get(0).unwrap().as_slice(), [None]);
        assert_eq!(
            attrs.adjacent_vertices.get(0).unwrap().as_slice(),
            [Some(VertexHandle::new(1))]
        );
    }

    #[test]
    fn offset_applies_from_first_slot_only() {
        let mut attrs = VertexAttributes::default();
        attrs.adjacent_faces.enable(2);
        for i in 0..2 {
            attrs
                .adjacent_faces
                .get_mut(i)
                .unwrap()
                .push(Some(FaceHandle::new(3)));
        }
        attrs.offset_references(ElementKind::Face, 10, 1);
        assert_eq!(
            attrs.adjacent_faces.get(0).unwrap().as_slice(),
            [Some(FaceHandle::new(3))]
        );
        assert_eq!(
            attrs.adjacent_faces.get(1).unwrap().as_slice(),
            [Some(FaceHandle::new(13))]
        );
    }

    #[test]
    fn validate_catches_misaligned_column() {
        let mut attrs = VertexAttributes::default();
        assert!(attrs.validate_lengths(ElementKind::Vertex, 4).is_ok());
        attrs.quality.enable(3);
        let err = attrs.validate_lengths(ElementKind::Vertex, 4).unwrap_err();
        assert!(matches!(
            err,
            MeshArenaError::ColumnLengthMismatch { expected: 4, found: 3, .. }
        ));
    }
}
