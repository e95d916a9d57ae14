//! Remap tables: the renumbering contract produced by compaction.
//!
//! `compact` removes tombstoned slots and renumbers survivors; the
//! [`RemapTable`] it returns is the single source of truth for rewriting
//! everything keyed by the old numbering: stored handles across the mesh,
//! parallel attribute columns, and any index a caller retained. Survivors
//! keep their relative order, so targets are strictly increasing and new
//! indices never exceed old ones.

use crate::element::handle::Handle;

/// Maps pre-compaction physical indices to post-compaction ones.
///
/// `target(old)` is `None` when the slot was removed. Out-of-range queries
/// also read as removed, so a stale table applied to foreign indices fails
/// toward the null sentinel instead of inventing a target.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemapTable {
    targets: Vec<Option<u32>>,
    live: usize,
}

impl RemapTable {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            targets: Vec::with_capacity(n),
            live: 0,
        }
    }

    /// The identity mapping over `n` slots: no removals, every index its own
    /// target. What `compact` returns for a tombstone-free container.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            targets: (0..n).map(|i| Some(i as u32)).collect(),
            live: n,
        }
    }

    /// Records the next slot as surviving and returns its new index.
    pub(crate) fn push_live(&mut self) -> usize {
        let new = self.live;
        self.targets.push(Some(new as u32));
        self.live += 1;
        new
    }

    /// Records the next slot as removed.
    pub(crate) fn push_removed(&mut self) {
        self.targets.push(None);
    }

    /// Number of pre-compaction slots covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the table covers zero slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of surviving slots (the post-compaction length).
    #[must_use]
    pub fn live_len(&self) -> usize {
        self.live
    }

    /// Number of removed slots.
    #[must_use]
    pub fn removed_len(&self) -> usize {
        self.targets.len() - self.live
    }

    /// Whether the table maps every slot to itself.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.live == self.targets.len()
    }

    /// The post-compaction index of slot `old`, or `None` if the slot was
    /// removed or `old` is out of range.
    #[inline]
    #[must_use]
    pub fn target(&self, old: usize) -> Option<usize> {
        self.targets.get(old).copied().flatten().map(|n| n as usize)
    }

    /// Whether slot `old` was removed (out-of-range reads as removed).
    #[inline]
    #[must_use]
    pub fn is_removed(&self, old: usize) -> bool {
        self.target(old).is_none()
    }

    /// Targets in old-index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.targets.iter().map(|t| t.map(|n| n as usize))
    }

    /// Rewrites a stored handle: removed targets become `None`, surviving
    /// targets become their new handle, nulls stay null.
    #[inline]
    #[must_use]
    pub fn remap_handle<H: Handle>(&self, handle: Option<H>) -> Option<H> {
        handle.and_then(|h| self.target(h.index()).map(H::new))
    }
}

/// Compacts a parallel column in place with the owning container's table:
/// survivors swap down to their new slots, the tail is truncated.
///
/// Ascending order is what makes the in-place swap sound: a survivor's new
/// slot is never above its old one, and slots not yet visited are never
/// written, so `column[old]` still holds the survivor when the scan reaches
/// it.
pub(crate) fn compact_column<T>(column: &mut Vec<T>, remap: &RemapTable) {
    debug_assert_eq!(column.len(), remap.len());
    for old in 0..remap.len() {
        if let Some(new) = remap.target(old) {
            column.swap(new, old);
        }
    }
    column.truncate(remap.live_len());
}

/// Rewrites every reference in a row of handle slots through the table.
pub(crate) fn remap_row<'a, H: Handle>(
    row: impl IntoIterator<Item = &'a mut Option<H>>,
    remap: &RemapTable,
) {
    for slot in row {
        *slot = remap.remap_handle(*slot);
    }
}

/// Offsets every non-null reference in a row of handle slots.
pub(crate) fn offset_row<'a, H: Handle>(row: impl IntoIterator<Item = &'a mut Option<H>>, by: usize) {
    for slot in row {
        if let Some(h) = slot.as_mut() {
            *h = h.offset(by);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::handle::VertexHandle;

    fn table(pattern: &[bool]) -> RemapTable {
        let mut t = RemapTable::with_capacity(pattern.len());
        for &live in pattern {
            if live {
                t.push_live();
            } else {
                t.push_removed();
            }
        }
        t
    }

    #[test]
    fn identity_maps_every_slot_to_itself() {
        let t = RemapTable::identity(4);
        assert!(t.is_identity());
        assert_eq!(t.len(), 4);
        assert_eq!(t.live_len(), 4);
        assert_eq!(t.removed_len(), 0);
        for i in 0..4 {
            assert_eq!(t.target(i), Some(i));
        }
    }

    #[test]
    fn mixed_table_renumbers_survivors_in_order() {
        // slots: live, removed, live, live, removed
        let t = table(&[true, false, true, true, false]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.live_len(), 3);
        assert_eq!(t.removed_len(), 2);
        assert!(!t.is_identity());
        assert_eq!(t.target(0), Some(0));
        assert_eq!(t.target(1), None);
        assert_eq!(t.target(2), Some(1));
        assert_eq!(t.target(3), Some(2));
        assert_eq!(t.target(4), None);
    }

    #[test]
    fn out_of_range_reads_as_removed() {
        let t = RemapTable::identity(2);
        assert_eq!(t.target(2), None);
        assert!(t.is_removed(99));
    }

    #[test]
    fn remap_handle_nulls_removed_targets() {
        let t = table(&[false, true]);
        let kept = Some(VertexHandle::new(1));
        let dropped = Some(VertexHandle::new(0));
        assert_eq!(t.remap_handle(kept), Some(VertexHandle::new(0)));
        assert_eq!(t.remap_handle(dropped), None);
        assert_eq!(t.remap_handle::<VertexHandle>(None), None);
    }

    #[test]
    fn compact_column_moves_survivors_down() {
        let t = table(&[true, false, true, false, true]);
        let mut column = vec!["a", "b", "c", "d", "e"];
        compact_column(&mut column, &t);
        assert_eq!(column, vec!["a", "c", "e"]);
    }

    #[test]
    fn compact_column_identity_is_noop() {
        let t = RemapTable::identity(3);
        let mut column = vec![1, 2, 3];
        compact_column(&mut column, &t);
        assert_eq!(column, vec![1, 2, 3]);
    }

    #[test]
    fn compact_column_all_removed_empties() {
        let t = table(&[false, false]);
        let mut column = vec![1.0, 2.0];
        compact_column(&mut column, &t);
        assert!(column.is_empty());
    }

    #[test]
    fn remap_row_rewrites_in_place() {
        let t = table(&[false, true, true]);
        let mut row = [
            Some(VertexHandle::new(0)),
            Some(VertexHandle::new(2)),
            None,
        ];
        remap_row(row.iter_mut(), &t);
        assert_eq!(row, [None, Some(VertexHandle::new(1)), None]);
    }

    #[test]
    fn offset_row_skips_nulls() {
        let mut row = [Some(VertexHandle::new(1)), None];
        offset_row(row.iter_mut(), 10);
        assert_eq!(row, [Some(VertexHandle::new(11)), None]);
    }

    #[test]
    fn serde_roundtrip() {
        let t = table(&[true, false, true]);
        let s = serde_json::to_string(&t).unwrap();
        let t2: RemapTable = serde_json::from_str(&s).unwrap();
        assert_eq!(t2, t);
    }
}
