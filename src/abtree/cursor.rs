// Cursors are a (node, index) position plus a borrow of the tree. Holding
// the borrow is what keeps the position meaningful: while a Cursor lives the
// tree cannot change, and a CursorMut is the only thing that can change it.

use std::fmt::{self, Debug};
use std::ptr;

use crate::compare::{KeyOrder, NaturalOrder};
use crate::internals::abtree::raw::{Position, RawTree};

/// A read-only position in an [AbTree](crate::AbTree).
///
/// A cursor either points at an entry or is the end cursor, one past the
/// largest entry. Stepping past either end leaves the cursor where it was
/// and reports `false`.
pub struct Cursor<'a, K, V, C = NaturalOrder> {
    raw: &'a RawTree<K, V, C>,
    pos: Position,
}

impl<'a, K, V, C: KeyOrder<K>> Cursor<'a, K, V, C> {
    pub(crate) fn new(raw: &'a RawTree<K, V, C>, pos: Position) -> Self {
        Cursor { raw, pos }
    }

    /// The key under the cursor, `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        self.raw.entry_at(self.pos).map(|e| &e.key)
    }

    /// The value under the cursor, `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        self.raw.entry_at(self.pos).map(|e| &e.value)
    }

    /// The key and value under the cursor, `None` at the end.
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.raw.entry_at(self.pos).map(|e| (&e.key, &e.value))
    }

    /// Whether this is the end cursor.
    pub fn is_end(&self) -> bool {
        self.raw.is_end(self.pos)
    }

    /// Step to the next entry (or to the end). Returns `false` if the cursor
    /// was already at the end.
    pub fn move_next(&mut self) -> bool {
        match self.raw.next_position(self.pos) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Step to the previous entry. Returns `false` if the cursor was on the
    /// first entry, or the tree is empty.
    pub fn move_prev(&mut self) -> bool {
        match self.raw.prev_position(self.pos) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        Cursor {
            raw: self.raw,
            pos: self.pos,
        }
    }
}

impl<K, V, C> PartialEq for Cursor<'_, K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.raw, other.raw) && self.pos == other.pos
    }
}

impl<K, V, C> Eq for Cursor<'_, K, V, C> {}

impl<K: Debug, V: Debug, C: KeyOrder<K>> Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((k, v)) => f.debug_tuple("Cursor").field(k).field(v).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// A position in an [AbTree](crate::AbTree) that holds the exclusive borrow,
/// so the value under it can be changed or the entry removed.
pub struct CursorMut<'a, K, V, C = NaturalOrder> {
    raw: &'a mut RawTree<K, V, C>,
    pos: Position,
}

impl<'a, K, V, C: KeyOrder<K>> CursorMut<'a, K, V, C> {
    pub(crate) fn new(raw: &'a mut RawTree<K, V, C>, pos: Position) -> Self {
        CursorMut { raw, pos }
    }

    /// The key under the cursor, `None` at the end.
    pub fn key(&self) -> Option<&K> {
        self.raw.entry_at(self.pos).map(|e| &e.key)
    }

    /// The value under the cursor, `None` at the end.
    pub fn value(&self) -> Option<&V> {
        self.raw.entry_at(self.pos).map(|e| &e.value)
    }

    /// Mutable access to the value under the cursor.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.raw.entry_at_mut(self.pos).map(|e| &mut e.value)
    }

    /// Turn the cursor into a mutable borrow of its value that lives as
    /// long as the original borrow of the tree.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let CursorMut { raw, pos } = self;
        raw.entry_at_mut(pos).map(|e| &mut e.value)
    }

    /// The key and value under the cursor, `None` at the end.
    pub fn entry(&self) -> Option<(&K, &V)> {
        self.raw.entry_at(self.pos).map(|e| (&e.key, &e.value))
    }

    /// Whether this is the end cursor.
    pub fn is_end(&self) -> bool {
        self.raw.is_end(self.pos)
    }

    /// As [Cursor::move_next].
    pub fn move_next(&mut self) -> bool {
        match self.raw.next_position(self.pos) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// As [Cursor::move_prev].
    pub fn move_prev(&mut self) -> bool {
        match self.raw.prev_position(self.pos) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }

    /// A read-only cursor at the same position, borrowing from this one.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&*self.raw, self.pos)
    }

    /// Remove the entry under the cursor and return it. The removal may
    /// merge or rotate nodes, so the cursor is consumed. Returns `None` at
    /// the end.
    pub fn remove_current(self) -> Option<(K, V)> {
        self.raw.entry_at(self.pos)?;
        Some(self.raw.remove_at(self.pos).into_pair())
    }
}

impl<K: Debug, V: Debug, C: KeyOrder<K>> Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_cursor().fmt(f)
    }
}
