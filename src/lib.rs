#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-arena
//!
//! mesh-arena is the element-container and cross-reference management core of a
//! generic 3D-mesh data structure: dense, growable, soft-deletable containers
//! of vertices, faces, and edges, toggleable per-element attribute columns, and
//! consistent rewriting of the references elements hold into other containers
//! across deletion, compaction, and mesh append.
//!
//! ## Features
//! - Kind-tagged index handles over `NonZeroU32`: `Option<VertexHandle>` is
//!   four bytes, and storage relocation never invalidates a handle
//! - Soft deletion with tombstones; O(n) in-place compaction returning a
//!   [`RemapTable`](container::RemapTable) that rewrites every stored
//!   reference in the mesh, nulling references to removed elements
//! - Optional attribute columns (normals, colors, quality, adjacency lists)
//!   toggled at runtime, with no storage while disabled
//! - Named custom attribute columns of caller-chosen types, type-checked at
//!   access
//! - Mesh append with attribute-enablement union and reference offsetting;
//!   `Mesh` is `Clone` with no pointer rebasing
//! - Invariant validation compiled in under `debug_assertions` or the
//!   `check-invariants`/`strict-invariants` features
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-arena = "0.4"
//! ```
//!
//! ```rust
//! use mesh_arena::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! let v0 = mesh.add_vertex_at(Point3::new(0.0, 0.0, 0.0));
//! let v1 = mesh.add_vertex_at(Point3::new(1.0, 0.0, 0.0));
//! let v2 = mesh.add_vertex_at(Point3::new(0.0, 1.0, 0.0));
//! let f = mesh.add_face_with(v0, v1, v2);
//!
//! // Deletion tombstones; compaction renumbers and rewrites references.
//! mesh.delete_vertex(v0);
//! let remap = mesh.compact_vertices();
//! assert_eq!(remap.target(v2.index()), Some(1));
//! assert_eq!(mesh.face(f).vertex(0), None);
//! assert_eq!(mesh.face(f).vertex(2), Some(VertexHandle::new(1)));
//! ```
//!
//! Handles are plain indices: they are not generation-checked, and a handle
//! retained across a compaction must be re-resolved through the returned
//! remap table. Container [`version()`](container::ElementContainer::version)
//! counters let external caches detect staleness.

pub mod container;
pub mod debug_invariants;
pub mod element;
pub mod geometry;
pub mod mesh;
pub mod mesh_error;

pub use debug_invariants::DebugInvariants;
pub use mesh::Mesh;
pub use mesh_error::MeshArenaError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::container::{AttributeSlot, ElementContainer, RemapTable};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::element::{
        AdjacencyRow, Edge, EdgeHandle, Element, ElementFlags, ElementKind, Face, FaceHandle,
        Handle, Vertex, VertexHandle,
    };
    pub use crate::geometry::{Aabb, Color, Point3, Vector3};
    pub use crate::mesh::Mesh;
    pub use crate::mesh_error::MeshArenaError;
}
