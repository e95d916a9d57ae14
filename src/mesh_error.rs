//! MeshArenaError: unified error type for mesh-arena public APIs
//!
//! Every fallible `try_*` accessor and every invariant validation in the
//! crate reports through this enum. Hot-path accessors panic on precondition
//! violations instead (see crate docs); the variants here cover the
//! runtime-checkable conditions a caller can legitimately probe first.

use crate::element::ElementKind;
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for mesh-arena operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshArenaError {
    /// A handle's index is outside the target container's physical range.
    #[error("invalid {kind} handle: index {index} out of range (container holds {len} slots)")]
    InvalidHandle {
        /// Kind of the container the handle was resolved against.
        kind: ElementKind,
        /// Index carried by the handle.
        index: usize,
        /// Physical slot count of the container at resolution time.
        len: usize,
    },
    /// A handle resolved to a tombstoned (soft-deleted) element.
    #[error("{kind} {index} is deleted (tombstoned until the next compaction)")]
    DeletedElement {
        /// Kind of the tombstoned element.
        kind: ElementKind,
        /// Physical index of the tombstoned slot.
        index: usize,
    },
    /// Handle indices must stay below `u32::MAX`; the top value is reserved
    /// by the +1 niche encoding.
    #[error("handle index {0} is unrepresentable (u32::MAX is reserved)")]
    HandleOverflow(usize),
    /// A typed optional attribute was accessed while disabled.
    #[error("optional {kind} attribute `{attribute}` is disabled")]
    AttributeDisabled {
        /// Element kind owning the attribute column.
        kind: ElementKind,
        /// Attribute name as exposed by the enable/disable surface.
        attribute: &'static str,
    },
    /// A custom attribute name was not found in the container's registry.
    #[error("no custom {kind} attribute named `{name}`")]
    MissingCustomAttribute {
        /// Element kind owning the custom-attribute registry.
        kind: ElementKind,
        /// Name that failed to resolve.
        name: String,
    },
    /// A custom attribute was registered twice under the same name.
    #[error("custom {kind} attribute `{name}` already exists")]
    DuplicateCustomAttribute {
        /// Element kind owning the custom-attribute registry.
        kind: ElementKind,
        /// Conflicting name.
        name: String,
    },
    /// Typed access to a custom attribute used the wrong element type.
    #[error("custom {kind} attribute `{name}` holds `{stored}`, not `{requested}`")]
    CustomAttributeType {
        /// Element kind owning the custom-attribute registry.
        kind: ElementKind,
        /// Attribute name.
        name: String,
        /// Type name recorded at registration.
        stored: &'static str,
        /// Type name used by the failed access.
        requested: &'static str,
    },
    /// Invariant violation: live/deleted/total counts disagree.
    #[error("{kind} container counts out of sync: live {live} + deleted {deleted} != total {total}")]
    CountMismatch {
        /// Element kind of the inconsistent container.
        kind: ElementKind,
        /// Live count the container reports.
        live: usize,
        /// Tombstone count the container reports.
        deleted: usize,
        /// Physical slot count.
        total: usize,
    },
    /// Invariant violation: an element's cached index disagrees with its slot.
    #[error("{kind} slot {slot} caches index {cached}")]
    IndexOutOfSync {
        /// Element kind of the inconsistent container.
        kind: ElementKind,
        /// Physical slot holding the element.
        slot: usize,
        /// Index the element caches.
        cached: usize,
    },
    /// Invariant violation: an attribute column's length diverged from its
    /// owning container.
    #[error("{kind} column `{column}` has {found} slots, container has {expected}")]
    ColumnLengthMismatch {
        /// Element kind owning the column.
        kind: ElementKind,
        /// Column name (typed attribute or custom-attribute name).
        column: String,
        /// Container's physical slot count.
        expected: usize,
        /// Column's actual length.
        found: usize,
    },
    /// Invariant violation: a stored reference points outside its target
    /// container.
    #[error("{from} slot {slot} references {to} {index}, but that container holds {len} slots")]
    ReferenceOutOfRange {
        /// Kind of the element holding the reference.
        from: ElementKind,
        /// Physical slot of the referencing element.
        slot: usize,
        /// Kind of the referenced container.
        to: ElementKind,
        /// Out-of-range index carried by the reference.
        index: usize,
        /// Physical slot count of the referenced container.
        len: usize,
    },
}
