//! Dense, growable, soft-deletable element containers.
//!
//! One [`ElementContainer`] stores every element of one kind for a mesh,
//! together with that kind's optional-attribute columns, kept index-aligned
//! through every mutation. Deletion is a tombstone mark; storage is
//! reclaimed by [`compact`](ElementContainer::compact), which renumbers
//! survivors and returns the [`RemapTable`] the owning mesh uses to rewrite
//! stored references everywhere.
//!
//! Invariants maintained at every observation point:
//! - every physical slot's element caches its own index;
//! - `len() + deleted_len() == total_len()`;
//! - every enabled column is exactly `total_len()` slots long.
//!
//! Indexing outside `[0, total_len())` through the panicking accessors is a
//! precondition violation; the `try_*` accessors are the checked surface.

use crate::debug_invariants::DebugInvariants;
use crate::element::{Element, ElementFlags, ElementKind};
use crate::mesh_error::MeshArenaError;

pub mod attribute;
pub mod custom;
pub mod iter;
pub mod remap;

pub use attribute::{AttributeAggregate, AttributeSlot};
pub use custom::CustomAttributes;
pub use iter::{ElementIter, ElementIterMut};
pub use remap::RemapTable;

/// Dense soft-deletable storage for one element kind.
///
/// Containers are owned by the [`Mesh`](crate::mesh::Mesh) and mutated
/// through it; the mesh is what drives cross-container reference fixup
/// after a compaction or append, so the mutating surface here is
/// crate-internal.
#[derive(Debug, Clone)]
pub struct ElementContainer<E: Element> {
    elements: Vec<E>,
    attributes: E::Attributes,
    live: usize,
    version: u64,
}

impl<E: Element> ElementContainer<E> {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
            attributes: E::Attributes::default(),
            live: 0,
            version: 0,
        }
    }

    /// Number of live (non-tombstoned) elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the container holds no live elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of physical slots, tombstones included.
    #[inline]
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.elements.len()
    }

    /// Number of tombstoned slots awaiting compaction.
    #[inline]
    #[must_use]
    pub fn deleted_len(&self) -> usize {
        self.elements.len() - self.live
    }

    /// Wrapping counter of structural mutations (add, delete, compact,
    /// clear, append, attribute toggling). External caches compare it to
    /// detect staleness.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The element at `index`, tombstoned or not.
    ///
    /// # Panics
    ///
    /// Panics if `index >= total_len()`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> &E {
        &self.elements[index]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut E {
        &mut self.elements[index]
    }

    /// The element at `index` if it is live.
    pub fn try_get(&self, index: usize) -> Result<&E, MeshArenaError> {
        let element = self
            .elements
            .get(index)
            .ok_or(MeshArenaError::InvalidHandle {
                kind: E::KIND,
                index,
                len: self.elements.len(),
            })?;
        if element.is_deleted() {
            return Err(MeshArenaError::DeletedElement {
                kind: E::KIND,
                index,
            });
        }
        Ok(element)
    }

    pub(crate) fn try_get_mut(&mut self, index: usize) -> Result<&mut E, MeshArenaError> {
        self.try_get(index)?;
        Ok(&mut self.elements[index])
    }

    /// Whether `index` names an in-range, non-tombstoned slot.
    #[inline]
    #[must_use]
    pub fn is_live(&self, index: usize) -> bool {
        self.elements.get(index).is_some_and(|e| !e.is_deleted())
    }

    /// The physical element array, tombstones included. The base pointer is
    /// stable until the next growth or compaction.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    /// The optional-attribute columns.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &E::Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut E::Attributes {
        &mut self.attributes
    }

    /// Runs an attribute toggle (enable, disable, custom registration) with
    /// the container's slot count and bumps the version: column storage
    /// changed shape.
    pub(crate) fn toggle_attributes<R>(
        &mut self,
        f: impl FnOnce(&mut E::Attributes, usize) -> R,
    ) -> R {
        let len = self.elements.len();
        let out = f(&mut self.attributes, len);
        self.bump();
        out
    }

    /// Appends one default element and one default slot to every enabled
    /// column; returns the new element's index.
    pub(crate) fn add(&mut self) -> usize {
        let index = self.elements.len();
        let mut element = E::default();
        element.set_index(index);
        self.elements.push(element);
        self.attributes.push();
        self.live += 1;
        self.bump();
        self.debug_assert_invariants();
        index
    }

    /// Appends `n` default elements in one go; returns the first new index
    /// (the pre-call `total_len()`, also for `n == 0`).
    pub(crate) fn add_n(&mut self, n: usize) -> usize {
        let first = self.elements.len();
        if n == 0 {
            return first;
        }
        self.elements.reserve(n);
        for i in 0..n {
            let mut element = E::default();
            element.set_index(first + i);
            self.elements.push(element);
        }
        self.attributes.resize(first + n);
        self.live += n;
        self.bump();
        self.debug_assert_invariants();
        first
    }

    /// Reserves capacity for `additional` more elements in the element
    /// array and every enabled column. May relocate storage; indices,
    /// counts, and the version are untouched.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
        self.attributes.reserve(additional);
    }

    /// Tombstones the element at `index`. Data is retained until the next
    /// compaction; default iteration skips the slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or already tombstoned.
    pub(crate) fn delete(&mut self, index: usize) {
        let element = &mut self.elements[index];
        assert!(
            !element.is_deleted(),
            "{} {index} deleted twice",
            E::KIND,
        );
        element.flags_mut().insert(ElementFlags::DELETED);
        self.live -= 1;
        self.bump();
        self.debug_assert_invariants();
    }

    /// Removes every tombstoned slot in place and renumbers survivors,
    /// keeping relative order; one O(n) pass, no element clones. Every
    /// enabled column compacts with the same table inside this call.
    ///
    /// The caller (the mesh) still owns reference fixup: stored handles of
    /// this kind anywhere in the mesh are stale until rewritten with the
    /// returned table.
    pub(crate) fn compact(&mut self) -> RemapTable {
        let total = self.elements.len();
        let mut remap = RemapTable::with_capacity(total);
        let mut write = 0;
        for read in 0..total {
            if self.elements[read].is_deleted() {
                remap.push_removed();
            } else {
                remap.push_live();
                self.elements.swap(write, read);
                write += 1;
            }
        }
        self.elements.truncate(write);
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.set_index(index);
        }
        self.attributes.compact(&remap);
        self.bump();
        remap
    }

    /// Empties the container and every column. Enablement and custom
    /// registrations survive at length zero.
    pub(crate) fn clear(&mut self) {
        self.elements.clear();
        self.attributes.clear();
        self.live = 0;
        self.bump();
        self.debug_assert_invariants();
    }

    /// Copies `other`'s slots (tombstones and flags included) onto the end
    /// of this container after unioning attribute enablement; returns the
    /// offset (this container's pre-append `total_len()`).
    ///
    /// Appended elements still reference the source mesh's numbering; the
    /// mesh follows up with offset fixup.
    pub(crate) fn append(&mut self, other: &Self) -> usize {
        let offset = self.elements.len();
        let other_len = other.elements.len();
        self.attributes.enable_same_as(&other.attributes, offset);
        self.elements.reserve(other_len);
        for (i, source) in other.elements.iter().enumerate() {
            let mut element = source.clone();
            element.set_index(offset + i);
            self.elements.push(element);
        }
        self.attributes.append_from(&other.attributes, other_len);
        self.live += other.live;
        self.bump();
        offset
    }

    /// Enables on this container every optional attribute enabled on
    /// `other`, value-initialized; custom registrations are unioned.
    pub(crate) fn enable_same_attributes_of(&mut self, other: &Self) {
        let len = self.elements.len();
        self.attributes.enable_same_as(&other.attributes, len);
        self.bump();
    }

    /// Rewrites every reference to `kind` held anywhere in this container
    /// (required components and enabled adjacency columns, tombstoned slots
    /// included) through `remap`. No-op unless this element kind statically
    /// references `kind`.
    pub(crate) fn remap_references_to(&mut self, kind: ElementKind, remap: &RemapTable) {
        if !E::REFERENCED_KINDS.contains(&kind) {
            return;
        }
        for element in &mut self.elements {
            element.remap_references(kind, remap);
        }
        self.attributes.remap_references(kind, remap);
    }

    /// Offsets every reference to `kind` held in slots `first..` by
    /// `offset`. No-op unless this element kind statically references
    /// `kind`.
    pub(crate) fn offset_references_to(&mut self, kind: ElementKind, offset: usize, first: usize) {
        if !E::REFERENCED_KINDS.contains(&kind) {
            return;
        }
        for element in self.elements.iter_mut().skip(first) {
            element.offset_references(kind, offset);
        }
        self.attributes.offset_references(kind, offset, first);
    }

    /// Live elements in index order.
    #[must_use]
    pub fn iter(&self) -> ElementIter<'_, E> {
        ElementIter::new(&self.elements, self.live)
    }

    /// Every physical slot in index order, tombstones included.
    pub fn iter_with_deleted(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> ElementIterMut<'_, E> {
        ElementIterMut::new(&mut self.elements, self.live)
    }

    /// Handles of the live elements, in index order.
    pub fn handles(&self) -> impl Iterator<Item = E::Handle> + '_ {
        self.iter().map(|e| e.handle())
    }

    /// The index slot `index` would hold after a compaction, without
    /// compacting: the number of live slots before it. `None` for a
    /// tombstoned slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= total_len()`.
    #[must_use]
    pub fn index_if_compact(&self, index: usize) -> Option<usize> {
        if self.elements[index].is_deleted() {
            return None;
        }
        Some(
            self.elements[..index]
                .iter()
                .filter(|e| !e.is_deleted())
                .count(),
        )
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<E: Element> Default for ElementContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E: Element> IntoIterator for &'a ElementContainer<E> {
    type Item = &'a E;
    type IntoIter = ElementIter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Element> DebugInvariants for ElementContainer<E> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ElementContainer");
    }

    fn validate_invariants(&self) -> Result<(), MeshArenaError> {
        let total = self.elements.len();
        let scanned_live = self.elements.iter().filter(|e| !e.is_deleted()).count();
        if scanned_live != self.live {
            return Err(MeshArenaError::CountMismatch {
                kind: E::KIND,
                live: self.live,
                deleted: total - scanned_live,
                total,
            });
        }
        for (slot, element) in self.elements.iter().enumerate() {
            if element.index() != slot {
                return Err(MeshArenaError::IndexOutOfSync {
                    kind: E::KIND,
                    slot,
                    cached: element.index(),
                });
            }
        }
        self.attributes.validate_lengths(E::KIND, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Vertex, VertexHandle};
    use crate::geometry::Point3;

    fn with_n(n: usize) -> ElementContainer<Vertex> {
        let mut c: ElementContainer<Vertex> = ElementContainer::new();
        for i in 0..n {
            let index = c.add();
            c.get_mut(index).position = Point3::new(i as f64, 0.0, 0.0);
        }
        c
    }

    #[test]
    fn add_assigns_consecutive_indices() {
        let c = with_n(3);
        assert_eq!(c.len(), 3);
        assert_eq!(c.total_len(), 3);
        assert_eq!(c.deleted_len(), 0);
        for i in 0..3 {
            assert_eq!(c.get(i).index(), i);
        }
    }

    #[test]
    fn add_n_matches_repeated_add() {
        let mut c = ElementContainer::<Vertex>::new();
        assert_eq!(c.add_n(0), 0);
        let first = c.add_n(4);
        assert_eq!(first, 0);
        assert_eq!(c.len(), 4);
        let next = c.add_n(2);
        assert_eq!(next, 4);
        assert_eq!(c.get(5).index(), 5);
        assert!(c.validate_invariants().is_ok());
    }

    #[test]
    fn add_n_zero_keeps_version() {
        let mut c = with_n(1);
        let before = c.version();
        c.add_n(0);
        assert_eq!(c.version(), before);
    }

    #[test]
    fn delete_tombstones_without_moving_data() {
        let mut c = with_n(3);
        c.delete(1);
        assert_eq!(c.len(), 2);
        assert_eq!(c.total_len(), 3);
        assert_eq!(c.deleted_len(), 1);
        assert!(c.get(1).is_deleted());
        assert_eq!(c.get(1).position.x, 1.0);
        assert!(!c.is_live(1));
        assert!(c.is_live(2));
    }

    #[test]
    #[should_panic(expected = "deleted twice")]
    fn double_delete_panics() {
        let mut c = with_n(2);
        c.delete(0);
        c.delete(0);
    }

    #[test]
    fn try_get_reports_both_error_classes() {
        let mut c = with_n(2);
        c.delete(0);
        assert!(matches!(
            c.try_get(0),
            Err(MeshArenaError::DeletedElement { index: 0, .. })
        ));
        assert!(matches!(
            c.try_get(5),
            Err(MeshArenaError::InvalidHandle { index: 5, len: 2, .. })
        ));
        assert!(c.try_get(1).is_ok());
    }

    #[test]
    fn compact_renumbers_survivors_and_columns() {
        let mut c = with_n(5);
        c.toggle_attributes(|a, len| a.quality.enable(len));
        for i in 0..5 {
            *c.attributes_mut().quality.get_mut(i).unwrap() = i as f64;
        }
        c.delete(1);
        c.delete(3);

        let remap = c.compact();
        assert_eq!(remap.len(), 5);
        assert_eq!(remap.live_len(), 3);
        assert_eq!(remap.target(0), Some(0));
        assert_eq!(remap.target(1), None);
        assert_eq!(remap.target(2), Some(1));
        assert_eq!(remap.target(4), Some(2));

        assert_eq!(c.len(), 3);
        assert_eq!(c.total_len(), 3);
        let xs: Vec<f64> = c.iter().map(|v| v.position.x).collect();
        assert_eq!(xs, [0.0, 2.0, 4.0]);
        for (slot, v) in c.iter_with_deleted().enumerate() {
            assert_eq!(v.index(), slot);
        }
        assert_eq!(c.attributes().quality.as_slice(), Some([0.0, 2.0, 4.0].as_slice()));
        assert!(c.validate_invariants().is_ok());
    }

    #[test]
    fn compact_without_tombstones_is_identity() {
        let mut c = with_n(3);
        let base = c.as_slice().as_ptr();
        let remap = c.compact();
        assert!(remap.is_identity());
        assert_eq!(remap.len(), 3);
        // no reallocation: truncation to the same length keeps the storage
        assert_eq!(c.as_slice().as_ptr(), base);
        for i in 0..3 {
            assert_eq!(c.get(i).index(), i);
        }
    }

    #[test]
    fn reserve_keeps_contents_and_version() {
        let mut c = with_n(2);
        let version = c.version();
        c.reserve(100);
        assert_eq!(c.len(), 2);
        assert_eq!(c.version(), version);
        assert_eq!(c.get(1).position.x, 1.0);
    }

    #[test]
    fn version_bumps_on_structural_mutations() {
        let mut c = ElementContainer::<Vertex>::new();
        let mut last = c.version();
        let mut expect_bump = |c: &ElementContainer<Vertex>, what: &str| {
            assert_ne!(c.version(), last, "{what} must bump the version");
            last = c.version();
        };

        c.add();
        expect_bump(&c, "add");
        c.delete(0);
        expect_bump(&c, "delete");
        c.compact();
        expect_bump(&c, "compact");
        c.toggle_attributes(|a, len| a.color.enable(len));
        expect_bump(&c, "attribute toggle");
        c.clear();
        expect_bump(&c, "clear");
    }

    #[test]
    fn clear_keeps_enablement_and_registrations() {
        let mut c = with_n(2);
        c.toggle_attributes(|a, len| a.normal.enable(len));
        c.toggle_attributes(|a, _| a.custom.register::<i32>("tag"))
            .unwrap();
        c.clear();
        assert_eq!(c.total_len(), 0);
        assert!(c.attributes().normal.is_enabled());
        assert!(c.attributes().custom.contains("tag"));
        assert!(c.validate_invariants().is_ok());
    }

    #[test]
    fn live_iteration_skips_and_counts() {
        let mut c = with_n(4);
        c.delete(0);
        c.delete(2);
        let iter = c.iter();
        assert_eq!(iter.len(), 2);
        let xs: Vec<f64> = iter.map(|v| v.position.x).collect();
        assert_eq!(xs, [1.0, 3.0]);
        assert_eq!(c.iter_with_deleted().count(), 4);

        let handles: Vec<VertexHandle> = c.handles().collect();
        assert_eq!(handles, [VertexHandle::new(1), VertexHandle::new(3)]);

        // for-loop sugar over &container
        let mut seen = 0;
        for v in &c {
            assert!(!v.is_deleted());
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn index_if_compact_predicts_the_remap() {
        let mut c = with_n(5);
        c.delete(1);
        c.delete(2);
        assert_eq!(c.index_if_compact(0), Some(0));
        assert_eq!(c.index_if_compact(1), None);
        assert_eq!(c.index_if_compact(3), Some(1));
        assert_eq!(c.index_if_compact(4), Some(2));

        let remap = c.compact();
        assert_eq!(remap.target(3), Some(1));
        assert_eq!(remap.target(4), Some(2));
    }

    #[test]
    fn append_copies_slots_and_unions_columns() {
        let mut a = with_n(2);
        let mut b = with_n(3);
        b.toggle_attributes(|attrs, len| attrs.quality.enable(len));
        *b.attributes_mut().quality.get_mut(2).unwrap() = 9.0;
        b.delete(0);

        let offset = a.append(&b);
        assert_eq!(offset, 2);
        assert_eq!(a.total_len(), 5);
        assert_eq!(a.len(), 4);
        assert_eq!(a.deleted_len(), 1);
        assert!(a.get(2).is_deleted());
        assert_eq!(a.get(4).index(), 4);
        assert_eq!(a.get(4).position.x, 2.0);

        // quality got enabled on `a` by the union, defaults for a's own rows
        let quality = a.attributes().quality.as_slice().unwrap();
        assert_eq!(quality, [0.0, 0.0, 0.0, 0.0, 9.0]);
        assert!(a.validate_invariants().is_ok());
    }

    #[test]
    fn validate_catches_corrupted_bookkeeping() {
        let mut c = with_n(2);
        assert!(c.validate_invariants().is_ok());
        c.live = 5;
        assert!(matches!(
            c.validate_invariants(),
            Err(MeshArenaError::CountMismatch { .. })
        ));
        c.live = 2;
        c.elements[1].set_index(7);
        assert!(matches!(
            c.validate_invariants(),
            Err(MeshArenaError::IndexOutOfSync { slot: 1, cached: 7, .. })
        ));
    }
}
