//! Triangle faces and their optional attribute columns.

use crate::container::attribute::{AttributeAggregate, AttributeSlot, check_column};
use crate::container::custom::CustomAttributes;
use crate::container::remap::{RemapTable, offset_row, remap_row};
use crate::element::handle::{FaceHandle, VertexHandle};
use crate::element::{Element, ElementFlags, ElementKind};
use crate::geometry::{Color, Vector3};
use crate::mesh_error::MeshArenaError;

/// A triangle face.
///
/// The three vertex references are the required component; compaction fixup
/// nulls a corner whose vertex was reclaimed. Normals, colors, quality, and
/// per-edge face adjacency are toggleable columns in [`FaceAttributes`].
#[derive(Debug, Clone, Default)]
pub struct Face {
    /// Corner vertex references, in winding order.
    pub vertices: [Option<VertexHandle>; 3],
    index: usize,
    flags: ElementFlags,
}

impl Face {
    /// The vertex reference at `corner`.
    ///
    /// # Panics
    ///
    /// Panics if `corner >= 3`.
    #[inline]
    #[must_use]
    pub fn vertex(&self, corner: usize) -> Option<VertexHandle> {
        self.vertices[corner]
    }

    /// Sets all three corners at once.
    #[inline]
    pub fn set_vertices(&mut self, v0: VertexHandle, v1: VertexHandle, v2: VertexHandle) {
        self.vertices = [Some(v0), Some(v1), Some(v2)];
    }
}

impl Element for Face {
    const KIND: ElementKind = ElementKind::Face;
    // Vertices through the required corners, faces through the adjacency
    // column.
    const REFERENCED_KINDS: &'static [ElementKind] = &[ElementKind::Vertex, ElementKind::Face];

    type Handle = FaceHandle;
    type Attributes = FaceAttributes;

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

    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable) {
        if kind == ElementKind::Vertex {
            remap_row(self.vertices.iter_mut(), remap);
        }
    }

    fn offset_references(&mut self, kind: ElementKind, offset: usize) {
        if kind == ElementKind::Vertex {
            offset_row(self.vertices.iter_mut(), offset);
        }
    }
}

/// Column-wise optional attributes of the face container.
#[derive(Debug, Clone)]
pub struct FaceAttributes {
    /// Per-face normals.
    pub normal: AttributeSlot<Vector3<f64>>,
    /// Per-face colors.
    pub color: AttributeSlot<Color>,
    /// Per-face scalar quality.
    pub quality: AttributeSlot<f64>,
    /// Face across each of the three edges, `None` on a border.
    pub adjacent_faces: AttributeSlot<[Option<FaceHandle>; 3]>,
    /// Named custom columns.
    pub custom: CustomAttributes,
}

impl Default for FaceAttributes {
    fn default() -> Self {
        Self {
            normal: AttributeSlot::default(),
            color: AttributeSlot::default(),
            quality: AttributeSlot::default(),
            adjacent_faces: AttributeSlot::default(),
            custom: CustomAttributes::new(ElementKind::Face),
        }
    }
}

impl AttributeAggregate for FaceAttributes {
    fn push(&mut self) {
        self.normal.push();
        self.color.push();
        self.quality.push();
        self.adjacent_faces.push();
        self.custom.push();
    }

    fn resize(&mut self, len: usize) {
        self.normal.resize(len);
        self.color.resize(len);
        self.quality.resize(len);
        self.adjacent_faces.resize(len);
        self.custom.resize(len);
    }

    fn reserve(&mut self, additional: usize) {
        self.normal.reserve(additional);
        self.color.reserve(additional);
        self.quality.reserve(additional);
        self.adjacent_faces.reserve(additional);
        self.custom.reserve(additional);
    }

    fn compact(&mut self, remap: &RemapTable) {
        self.normal.compact(remap);
        self.color.compact(remap);
        self.quality.compact(remap);
        self.adjacent_faces.compact(remap);
        self.custom.compact(remap);
    }

    fn clear(&mut self) {
        self.normal.clear();
        self.color.clear();
        self.quality.clear();
        self.adjacent_faces.clear();
        self.custom.clear();
    }

    fn enable_same_as(&mut self, other: &Self, len: usize) {
        self.normal.enable_if_enabled(&other.normal, len);
        self.color.enable_if_enabled(&other.color, len);
        self.quality.enable_if_enabled(&other.quality, len);
        self.adjacent_faces.enable_if_enabled(&other.adjacent_faces, len);
        self.custom.register_same_as(&other.custom, len);
    }

    fn append_from(&mut self, other: &Self, other_len: usize) {
        self.normal.append_from(&other.normal, other_len);
        self.color.append_from(&other.color, other_len);
        self.quality.append_from(&other.quality, other_len);
        self.adjacent_faces.append_from(&other.adjacent_faces, other_len);
        self.custom.append_from(&other.custom, other_len);
    }

    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable) {
        if kind != ElementKind::Face {
            return;
        }
        if let Some(rows) = self.adjacent_faces.as_mut_slice() {
            for row in rows {
                remap_row(row.iter_mut(), remap);
            }
        }
    }

    fn offset_references(&mut self, kind: ElementKind, offset: usize, first: usize) {
        if kind != ElementKind::Face {
            return;
        }
        if let Some(rows) = self.adjacent_faces.as_mut_slice() {
            for row in rows.iter_mut().skip(first) {
                offset_row(row.iter_mut(), offset);
            }
        }
    }

    fn validate_lengths(&self, kind: ElementKind, expected: usize) -> Result<(), MeshArenaError> {
        check_column(&self.normal, kind, "normal", expected)?;
        check_column(&self.color, kind, "color", expected)?;
        check_column(&self.quality, kind, "quality", expected)?;
        check_column(&self.adjacent_faces, kind, "adjacent_faces", expected)?;
        self.custom.validate_lengths(expected)
    }
}
