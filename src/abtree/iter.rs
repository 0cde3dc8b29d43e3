//! Iterators for the tree.

// All of these walk positions with the same stepping as the cursors. A range
// is the half-open span [front, back) of positions; it is exhausted when the
// two meet, from whichever side.

use std::iter::FusedIterator;

use crate::compare::{KeyOrder, NaturalOrder};
use crate::internals::abtree::raw::{Position, RawTree};

/// Entries whose keys fall within a range, in key order.
pub struct Range<'a, K, V, C = NaturalOrder> {
    raw: &'a RawTree<K, V, C>,
    front: Position,
    back: Position,
}

impl<'a, K, V, C: KeyOrder<K>> Range<'a, K, V, C> {
    pub(crate) fn new(raw: &'a RawTree<K, V, C>, front: Position, back: Position) -> Self {
        Range { raw, front, back }
    }
}

impl<'a, K, V, C: KeyOrder<K>> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let entry = self.raw.entry_at(self.front)?;
        self.front = self.raw.next_position(self.front)?;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V, C: KeyOrder<K>> DoubleEndedIterator for Range<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.raw.prev_position(self.back)?;
        let entry = self.raw.entry_at(self.back)?;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V, C: KeyOrder<K>> FusedIterator for Range<'_, K, V, C> {}

/// Every entry in key order.
pub struct Iter<'a, K, V, C = NaturalOrder> {
    inner: Range<'a, K, V, C>,
    remaining: usize,
}

impl<'a, K, V, C: KeyOrder<K>> Iter<'a, K, V, C> {
    pub(crate) fn new(raw: &'a RawTree<K, V, C>) -> Self {
        Iter {
            inner: Range::new(raw, raw.begin_position(), raw.end_position()),
            remaining: raw.len(),
        }
    }
}

impl<'a, K, V, C: KeyOrder<K>> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C: KeyOrder<K>> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V, C: KeyOrder<K>> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C: KeyOrder<K>> FusedIterator for Iter<'_, K, V, C> {}

/// The keys of a tree, in order.
pub struct Keys<'a, K, V, C = NaturalOrder> {
    iter: Iter<'a, K, V, C>,
}

impl<'a, K, V, C: KeyOrder<K>> Keys<'a, K, V, C> {
    pub(crate) fn new(iter: Iter<'a, K, V, C>) -> Self {
        Keys { iter }
    }
}

impl<'a, K, V, C: KeyOrder<K>> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V, C: KeyOrder<K>> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C: KeyOrder<K>> ExactSizeIterator for Keys<'_, K, V, C> {}

/// The values of a tree, in key order.
pub struct Values<'a, K, V, C = NaturalOrder> {
    iter: Iter<'a, K, V, C>,
}

impl<'a, K, V, C: KeyOrder<K>> Values<'a, K, V, C> {
    pub(crate) fn new(iter: Iter<'a, K, V, C>) -> Self {
        Values { iter }
    }
}

impl<'a, K, V, C: KeyOrder<K>> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V, C: KeyOrder<K>> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C: KeyOrder<K>> ExactSizeIterator for Values<'_, K, V, C> {}
