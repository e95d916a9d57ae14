//! Toggleable optional-attribute columns.
//!
//! Attributes are stored column-wise beside the element array, one
//! [`AttributeSlot`] per attribute. A disabled slot holds no memory at all;
//! an enabled one holds a vector index-aligned with the owning container,
//! kept in lockstep through the [`AttributeAggregate`] hooks the container
//! drives inside its own mutating calls. Enabling always value-initializes
//! the whole column, re-enabling included, so stale values from a previous
//! enabled lifetime are never observable.

use crate::container::remap::{RemapTable, compact_column};
use crate::element::ElementKind;
use crate::mesh_error::MeshArenaError;

/// One optional attribute column: disabled (no storage) or enabled (a
/// vector aligned with the owning container).
///
/// Lockstep mutation is crate-internal; callers toggle and access columns
/// through the mesh surface, which names the attribute in its errors.
#[derive(Debug, Clone)]
pub struct AttributeSlot<T> {
    data: Option<Vec<T>>,
}

impl<T> Default for AttributeSlot<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<T: Clone + Default> AttributeSlot<T> {
    /// Whether the column currently holds storage.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.data.is_some()
    }

    /// Allocates the column at `len` slots, every slot `T::default()`.
    /// Enabling an already-enabled column re-initializes it.
    pub(crate) fn enable(&mut self, len: usize) {
        self.data = Some(vec![T::default(); len]);
    }

    /// Drops the column's storage entirely.
    pub(crate) fn disable(&mut self) {
        self.data = None;
    }

    /// Appends one default slot. No-op while disabled.
    pub(crate) fn push(&mut self) {
        if let Some(v) = &mut self.data {
            v.push(T::default());
        }
    }

    /// Resizes to `len` slots, filling growth with defaults. No-op while
    /// disabled.
    pub(crate) fn resize(&mut self, len: usize) {
        if let Some(v) = &mut self.data {
            v.resize(len, T::default());
        }
    }

    /// Reserves capacity for `additional` more slots. No-op while disabled.
    pub(crate) fn reserve(&mut self, additional: usize) {
        if let Some(v) = &mut self.data {
            v.reserve(additional);
        }
    }

    /// Compacts the column with the owning container's table. No-op while
    /// disabled.
    pub(crate) fn compact(&mut self, remap: &RemapTable) {
        if let Some(v) = &mut self.data {
            compact_column(v, remap);
        }
    }

    /// Empties the column, keeping it enabled. No-op while disabled.
    pub(crate) fn clear(&mut self) {
        if let Some(v) = &mut self.data {
            v.clear();
        }
    }

    /// Copies `other`'s values onto the tail of this column during append.
    /// If `other`'s column is disabled, the tail is filled with defaults
    /// instead. No-op while this column is disabled.
    pub(crate) fn append_from(&mut self, other: &Self, other_len: usize) {
        let Some(v) = &mut self.data else { return };
        match &other.data {
            Some(src) => v.extend_from_slice(src),
            None => v.resize(v.len() + other_len, T::default()),
        }
    }

    /// Enables this column (value-initialized at `len`) if `other`'s is
    /// enabled; never disables.
    pub(crate) fn enable_if_enabled(&mut self, other: &Self, len: usize) {
        if other.is_enabled() && !self.is_enabled() {
            self.enable(len);
        }
    }

    /// Whether the column is disabled or exactly `expected` slots long.
    pub(crate) fn is_aligned_with(&self, expected: usize) -> bool {
        self.data.as_ref().is_none_or(|v| v.len() == expected)
    }

    /// The column as a slice, `None` while disabled.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// The column as a mutable slice, `None` while disabled.
    #[inline]
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.data.as_deref_mut()
    }

    /// The value at `index`, `None` while disabled.
    ///
    /// # Panics
    ///
    /// Panics if the column is enabled and `index` is out of range; slot
    /// indices come from the owning container and out-of-range access is a
    /// precondition violation there too.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.as_ref().map(|v| &v[index])
    }

    /// Mutable access to the value at `index`, `None` while disabled.
    ///
    /// # Panics
    ///
    /// Panics if the column is enabled and `index` is out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.as_mut().map(|v| &mut v[index])
    }
}

/// Lockstep hooks a container drives on its per-kind attribute aggregate.
///
/// Implementations hold one [`AttributeSlot`] per optional attribute of
/// their element kind plus the custom-attribute registry, and forward each
/// hook to every column. The reference hooks rewrite adjacency columns the
/// same way elements rewrite their required components.
pub trait AttributeAggregate {
    /// Appends one default slot to every enabled column.
    fn push(&mut self);
    /// Resizes every enabled column to `len`.
    fn resize(&mut self, len: usize);
    /// Reserves capacity for `additional` more slots in every enabled
    /// column.
    fn reserve(&mut self, additional: usize);
    /// Compacts every enabled column with the container's table.
    fn compact(&mut self, remap: &RemapTable);
    /// Empties every enabled column, keeping enablement and custom
    /// registrations.
    fn clear(&mut self);
    /// Enables every column and registers every custom attribute that is
    /// enabled on `other`, value-initialized at `len`. Never disables.
    fn enable_same_as(&mut self, other: &Self, len: usize);
    /// Extends every enabled column by `other`'s values (defaults where
    /// `other` has the column disabled). Runs after `enable_same_as`.
    fn append_from(&mut self, other: &Self, other_len: usize);
    /// Rewrites adjacency-column references to `kind` through `remap`.
    fn remap_references(&mut self, kind: ElementKind, remap: &RemapTable);
    /// Offsets adjacency-column references to `kind` by `offset` for slots
    /// `first..`. Used by append fixup.
    fn offset_references(&mut self, kind: ElementKind, offset: usize, first: usize);
    /// Checks every column's length against the container's slot count.
    fn validate_lengths(&self, kind: ElementKind, expected: usize) -> Result<(), MeshArenaError>;
}

/// Length check shared by the aggregate implementations.
pub(crate) fn check_column<T: Clone + Default>(
    slot: &AttributeSlot<T>,
    kind: ElementKind,
    column: &'static str,
    expected: usize,
) -> Result<(), MeshArenaError> {
    if slot.is_aligned_with(expected) {
        Ok(())
    } else {
        Err(MeshArenaError::ColumnLengthMismatch {
            kind,
            column: column.to_owned(),
            expected,
            found: slot.as_slice().map_or(0, <[T]>::len),
        })
    }
}
