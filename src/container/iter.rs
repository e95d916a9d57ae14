//! Container iteration.
//!
//! The default iterators skip tombstones: advancing past a deleted run is a
//! linear scan to the next live slot. Both are exact-size because the
//! container knows its live count up front. Full physical iteration,
//! tombstones included, goes through
//! [`ElementContainer::iter_with_deleted`](crate::container::ElementContainer::iter_with_deleted).

use crate::element::Element;
use std::iter::FusedIterator;

/// Live-skipping shared iterator over a container's elements.
#[derive(Debug, Clone)]
pub struct ElementIter<'a, E: Element> {
    inner: std::slice::Iter<'a, E>,
    remaining: usize,
}

impl<'a, E: Element> ElementIter<'a, E> {
    pub(crate) fn new(elements: &'a [E], live: usize) -> Self {
        Self {
            inner: elements.iter(),
            remaining: live,
        }
    }
}

impl<'a, E: Element> Iterator for ElementIter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.inner.by_ref() {
            if !element.is_deleted() {
                self.remaining -= 1;
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E: Element> ExactSizeIterator for ElementIter<'_, E> {}
impl<E: Element> FusedIterator for ElementIter<'_, E> {}

/// Live-skipping mutable iterator over a container's elements.
///
/// Mutating bookkeeping fields through this iterator (the cached index, the
/// `DELETED` flag) desynchronizes the container; it exists for element data
/// and caller-managed flag bits.
#[derive(Debug)]
pub struct ElementIterMut<'a, E: Element> {
    inner: std::slice::IterMut<'a, E>,
    remaining: usize,
}

impl<'a, E: Element> ElementIterMut<'a, E> {
    pub(crate) fn new(elements: &'a mut [E], live: usize) -> Self {
        Self {
            inner: elements.iter_mut(),
            remaining: live,
        }
    }
}

impl<'a, E: Element> Iterator for ElementIterMut<'a, E> {
    type Item = &'a mut E;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.inner.by_ref() {
            if !element.is_deleted() {
                self.remaining -= 1;
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E: Element> ExactSizeIterator for ElementIterMut<'_, E> {}
impl<E: Element> FusedIterator for ElementIterMut<'_, E> {}
