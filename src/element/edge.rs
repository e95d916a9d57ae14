//! Edge elements and their optional attribute columns.

use crate::container::attribute::{AttributeAggregate, AttributeSlot, check_column};
use crate::container::custom::CustomAttributes;
use crate::container::remap::{RemapTable, offset_row, remap_row};
use crate::element::handle::{EdgeHandle, VertexHandle};
use crate::element::{Element, ElementFlags, ElementKind};
use crate::geometry::Color;
use crate::mesh_error::MeshArenaError;

/// An edge between two vertices.
#[derive(Debug, Clone, Default)]
pub struct Edge {
    /// Endpoint vertex references.
    pub vertices: [Option<VertexHandle>; 2],
    index: usize,
    flags: ElementFlags,
}

impl Edge {
    /// The endpoint reference at `end` (0 or 1).
    ///
    /// # Panics
    ///
    /// Panics if `end >= 2`.
    #[inline]
    #[must_use]
    pub fn vertex(&self, end: usize) -> Option<VertexHandle> {
        self.vertices[end]
    }

    /// Sets both endpoints.
    #[inline]
    pub fn set_vertices(&mut self, v0: VertexHandle, v1: VertexHandle) {
        self.vertices = [Some(v0), Some(v1)];
    }
}

impl Element for Edge {
    const KIND: ElementKind = ElementKind::Edge;
    const REFERENCED_KINDS: &'static [ElementKind] = &[ElementKind::Vertex];

    type Handle = EdgeHandle;
    type Attributes = EdgeAttributes;

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

/// Column-wise optional attributes of the edge container.
#[derive(Debug, Clone)]
pub struct EdgeAttributes {
    /// Per-edge colors.
    pub color: AttributeSlot<Color>,
    /// Per-edge scalar quality.
    pub quality: AttributeSlot<f64>,
    /// Named custom columns.
    pub custom: CustomAttributes,
}

impl Default for EdgeAttributes {
    fn default() -> Self {
        Self {
            color: AttributeSlot::default(),
            quality: AttributeSlot::default(),
            custom: CustomAttributes::new(ElementKind::Edge),
        }
    }
}

impl AttributeAggregate for EdgeAttributes {
    fn push(&mut self) {
        self.color.push();
        self.quality.push();
        self.custom.push();
    }

    fn resize(&mut self, len: usize) {
        self.color.resize(len);
        self.quality.resize(len);
        self.custom.resize(len);
    }

    fn reserve(&mut self, additional: usize) {
        self.color.reserve(additional);
        self.quality.reserve(additional);
        self.custom.reserve(additional);
    }

    fn compact(&mut self, remap: &RemapTable) {
        self.color.compact(remap);
        self.quality.compact(remap);
        self.custom.compact(remap);
    }

    fn clear(&mut self) {
        self.color.clear();
        self.quality.clear();
        self.custom.clear();
    }

    fn enable_same_as(&mut self, other: &Self, len: usize) {
        self.color.enable_if_enabled(&other.color, len);
        self.quality.enable_if_enabled(&other.quality, len);
        self.custom.register_same_as(&other.custom, len);
    }

    fn append_from(&mut self, other: &Self, other_len: usize) {
        self.color.append_from(&other.color, other_len);
        self.quality.append_from(&other.quality, other_len);
        self.custom.append_from(&other.custom, other_len);
    }

    // Edge columns hold no references.
    fn remap_references(&mut self, _kind: ElementKind, _remap: &RemapTable) {}

    fn offset_references(&mut self, _kind: ElementKind, _offset: usize, _first: usize) {}

    fn validate_lengths(&self, kind: ElementKind, expected: usize) -> Result<(), MeshArenaError> {
        check_column(&self.color, kind, "color", expected)?;
        check_column(&self.quality, kind, "quality", expected)?;
        self.custom.validate_lengths(expected)
    }
}
