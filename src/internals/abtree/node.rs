use smallvec::SmallVec;
use std::fmt::{self, Debug};

use crate::compare::KeyOrder;
use crate::config::DEFAULT_MAX_CHILDREN;
use crate::utils::slice_search;

// A node may transiently hold b items (and b + 1 children) between an insert
// and the split that follows it, so the inline storage is sized for the
// default b. Larger configurations spill to the heap.
pub(crate) const INLINE_ITEMS: usize = DEFAULT_MAX_CHILDREN;
pub(crate) const INLINE_CHILDREN: usize = DEFAULT_MAX_CHILDREN + 1;

/// Stable handle of a node inside the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

pub(crate) type Items<K, V> = SmallVec<[Entry<K, V>; INLINE_ITEMS]>;
pub(crate) type Children = SmallVec<[NodeId; INLINE_CHILDREN]>;

/// One vertex of the tree.
///
/// `children` is either empty (a leaf) or holds exactly `items.len() + 1`
/// links, where `children[i]` covers the keys strictly between
/// `items[i - 1]` and `items[i]`.
pub(crate) struct Node<K, V> {
    pub(crate) items: Items<K, V>,
    pub(crate) children: Children,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new_leaf(parent: Option<NodeId>) -> Self {
        Node {
            items: SmallVec::new(),
            children: SmallVec::new(),
            parent,
        }
    }

    pub(crate) fn new_branch(entry: Entry<K, V>, left: NodeId, right: NodeId) -> Self {
        let mut items = SmallVec::new();
        items.push(entry);
        let mut children = SmallVec::new();
        children.push(left);
        children.push(right);
        Node {
            items,
            children,
            parent: None,
        }
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline(always)]
    pub(crate) fn count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn first_key(&self) -> Option<&K> {
        self.items.first().map(Entry::key)
    }

    #[inline]
    pub(crate) fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }

    /// Position of `k` within this node, `Ok` on an exact hit.
    #[inline]
    pub(crate) fn locate<C: KeyOrder<K>>(&self, k: &K, order: &C) -> Result<usize, usize> {
        slice_search(&self.items, k, Entry::key, order)
    }

    /// Smallest index whose key is `>= k`, which is also the child to
    /// descend into when `k` is not held here.
    #[inline]
    pub(crate) fn search<C: KeyOrder<K>>(&self, k: &K, order: &C) -> usize {
        match self.locate(k, order) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    /// Index of `child` among this node's links.
    pub(crate) fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }
}

impl<K: Debug, V> Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf -> {}", self.count())?;
        } else {
            write!(f, "Branch -> {}", self.count())?;
        }
        write!(f, "  \\-> [ ")?;
        for e in self.items.iter() {
            write!(f, "{:?}, ", e.key)?;
        }
        write!(f, " ]")
    }
}
