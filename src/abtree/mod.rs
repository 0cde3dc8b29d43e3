//! See the documentation for [AbTree]

mod cursor;
mod iter;

pub use self::cursor::{Cursor, CursorMut};
pub use self::iter::{Iter, Keys, Range, Values};

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::ops::{Bound, RangeBounds};

use crate::compare::{KeyOrder, NaturalOrder};
use crate::config::AbTreeConfig;
use crate::error::Result;
use crate::internals::abtree::raw::RawTree;

/// An ordered map stored as an (a, b)-tree.
///
/// Every node other than the root holds between `a - 1` and `b - 1`
/// entries, internal nodes have one more child than entries, and all leaves
/// sit at the same depth. Lookups, inserts and removals are `O(log n)`.
///
/// Keys are ordered by `C`, a [KeyOrder], which defaults to the key type's
/// own [Ord] implementation.
///
/// Positions in the tree are exposed as cursors. A [Cursor] borrows the tree
/// immutably and a [CursorMut] borrows it exclusively, so a cursor can
/// never observe a structural change it did not make itself:
///
/// ```compile_fail
/// use abtree::AbTree;
///
/// let mut tree: AbTree<u32, u32> = AbTree::new();
/// tree.insert(1, 1);
/// let cursor = tree.find(&1);
/// tree.insert(2, 2);
/// assert_eq!(cursor.key(), Some(&1));
/// ```
///
/// ```
/// use abtree::AbTree;
///
/// let mut tree = AbTree::try_new(2, 3).unwrap();
/// for k in [5, 1, 4, 2, 3] {
///     tree.insert(k, k * 10);
/// }
/// assert_eq!(tree.get(&4), Some(&40));
/// assert_eq!(tree.lower_bound(&6).key(), None);
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3, 4, 5]);
/// ```
pub struct AbTree<K, V, C = NaturalOrder> {
    raw: RawTree<K, V, C>,
}

impl<K: Ord, V> AbTree<K, V> {
    /// An empty tree with the default `(a, b)` and natural key order.
    pub fn new() -> Self {
        Self::with_config(AbTreeConfig::default())
    }

    /// An empty tree with the given `(a, b)`.
    pub fn with_config(config: AbTreeConfig) -> Self {
        Self::with_config_and_order(config, NaturalOrder)
    }

    /// Validate `(a, b)` and build an empty tree from it.
    pub fn try_new(a: usize, b: usize) -> Result<Self> {
        AbTreeConfig::new(a, b).map(Self::with_config)
    }
}

impl<K: Ord, V> Default for AbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: KeyOrder<K>> AbTree<K, V, C> {
    /// An empty tree with the given `(a, b)` and key order.
    pub fn with_config_and_order(config: AbTreeConfig, order: C) -> Self {
        AbTree {
            raw: RawTree::new(config, order),
        }
    }

    /// The `(a, b)` this tree was built with.
    pub fn config(&self) -> &AbTreeConfig {
        self.raw.config()
    }

    /// Insert `value` under `key`, replacing the value (but not the key) if
    /// the key is already present. The returned cursor points at the entry.
    pub fn insert(&mut self, key: K, value: V) -> CursorMut<'_, K, V, C> {
        let (pos, _) = self.raw.insert(key, value);
        CursorMut::new(&mut self.raw, pos)
    }

    /// Insert `value` under `key` and hand back the value it replaced.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value).1
    }

    /// Remove `key`, returning its value. Removing an absent key is a no-op.
    pub fn erase(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key).map(|e| e.value)
    }

    /// As [AbTree::erase], but also returns the stored key.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove(key).map(|e| e.into_pair())
    }

    /// A cursor on `key`, or the end cursor if it is absent.
    pub fn find(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.find(key))
    }

    /// A mutable cursor on `key`, or the end cursor if it is absent.
    pub fn find_mut(&mut self, key: &K) -> CursorMut<'_, K, V, C> {
        let pos = self.raw.find(key);
        CursorMut::new(&mut self.raw, pos)
    }

    /// A cursor on the first entry whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.lower_bound(key))
    }

    /// A cursor on the first entry whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.upper_bound(key))
    }

    /// A cursor on the smallest entry. Equal to [AbTree::end] when empty.
    pub fn begin(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.begin_position())
    }

    /// The one-past-the-largest cursor.
    pub fn end(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.end_position())
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.entry_at(self.raw.find(key)).map(|e| &e.value)
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.raw.find(key);
        self.raw.entry_at_mut(pos).map(|e| &mut e.value)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        !self.raw.is_end(self.raw.find(key))
    }

    /// The smallest entry.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.begin().entry()
    }

    /// The largest entry.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut cursor = self.end();
        if cursor.move_prev() {
            cursor.entry()
        } else {
            None
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// The first key held by the root node, if any.
    pub fn root_key(&self) -> Option<&K> {
        self.raw.node(self.raw.root()).first_key()
    }

    /// Iterate every entry in key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(&self.raw)
    }

    /// Iterate the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(self.iter())
    }

    /// Iterate the values in key order.
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values::new(self.iter())
    }

    /// Iterate the entries whose keys fall in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range orders after its end, or if both
    /// bounds are excluded and equal.
    pub fn range<R>(&self, range: R) -> Range<'_, K, V, C>
    where
        R: RangeBounds<K>,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(s), Bound::Excluded(e))
                if self.raw.order().compare(s, e) == Ordering::Equal =>
            {
                panic!("range start and end are equal and excluded in AbTree")
            }
            (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e))
                if self.raw.order().compare(s, e) == Ordering::Greater =>
            {
                panic!("range start is greater than range end in AbTree")
            }
            _ => {}
        }

        let front = match range.start_bound() {
            Bound::Included(s) => self.raw.lower_bound(s),
            Bound::Excluded(s) => self.raw.upper_bound(s),
            Bound::Unbounded => self.raw.begin_position(),
        };
        let back = match range.end_bound() {
            Bound::Included(e) => self.raw.upper_bound(e),
            Bound::Excluded(e) => self.raw.lower_bound(e),
            Bound::Unbounded => self.raw.end_position(),
        };
        Range::new(&self.raw, front, back)
    }

    /// Drop every entry, leaving a single empty root.
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// Check the structural invariants of the whole tree. Violations are
    /// logged at error level.
    pub fn verify(&self) -> bool {
        self.raw.verify()
    }
}

impl<K: Debug, V, C> AbTree<K, V, C> {
    /// Render the keys as an indented tree, one key per line, children
    /// indented four spaces deeper than their parent.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl<K: Debug, V: Debug, C: KeyOrder<K>> Debug for AbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: KeyOrder<K>> Extend<(K, V)> for AbTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.raw.insert(k, v);
        }
    }
}

impl<K, V, C: KeyOrder<K> + Default> FromIterator<(K, V)> for AbTree<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AbTree::with_config_and_order(AbTreeConfig::default(), C::default());
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V, C: KeyOrder<K>> IntoIterator for &'a AbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
