// The raw tree is what actually knits the nodes together. It owns the node
// arena, and every structural change (split, rotation, merge, root growth
// and shrink) happens here so that the parent links and the root handle are
// always updated in the same step as the change that affects them.
//
// Positions handed out to cursors are plain (node, index) pairs. The end
// position is (root, root.count()); there is no other sentinel.

use slab::Slab;
use std::cmp::Ordering;
use std::fmt::{Debug, Write};
use std::mem;
use tracing::{debug, error, trace};

use super::node::{Children, Entry, Items, Node, NodeId};
use super::states::{Located, Refill};
use crate::compare::KeyOrder;
use crate::config::AbTreeConfig;

pub(crate) type Position = (NodeId, usize);

pub(crate) struct RawTree<K, V, C> {
    nodes: Slab<Node<K, V>>,
    root: NodeId,
    config: AbTreeConfig,
    size: usize,
    order: C,
}

#[derive(Default)]
struct VerifyState {
    leaf_depth: Option<usize>,
    entries: usize,
    nodes: usize,
}

impl<K, V, C> RawTree<K, V, C> {
    pub(crate) fn new(config: AbTreeConfig, order: C) -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(Node::new_leaf(None)));
        RawTree {
            nodes,
            root,
            config,
            size: 0,
            order,
        }
    }

    #[inline(always)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }

    #[inline(always)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.0]
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn config(&self) -> &AbTreeConfig {
        &self.config
    }

    pub(crate) fn order(&self) -> &C {
        &self.order
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let Some(child) = self.node(id).children.first() {
            height += 1;
            id = *child;
        }
        height
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId(self.nodes.insert(Node::new_leaf(None)));
        self.size = 0;
    }

    pub(crate) fn end_position(&self) -> Position {
        (self.root, self.node(self.root).count())
    }

    pub(crate) fn begin_position(&self) -> Position {
        (self.leftmost_leaf(self.root), 0)
    }

    pub(crate) fn is_end(&self, pos: Position) -> bool {
        pos == self.end_position()
    }

    /// The entry at `pos`, or `None` for the end position or a handle
    /// that no longer names a live node.
    pub(crate) fn entry_at(&self, pos: Position) -> Option<&Entry<K, V>> {
        self.nodes.get(pos.0 .0)?.items.get(pos.1)
    }

    pub(crate) fn entry_at_mut(&mut self, pos: Position) -> Option<&mut Entry<K, V>> {
        self.nodes.get_mut(pos.0 .0)?.items.get_mut(pos.1)
    }

    fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = self.node(id).children.first() {
            id = *child;
        }
        id
    }

    fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = self.node(id).last_child() {
            id = child;
        }
        id
    }

    // Children match the item count and all point back at `id`.
    fn debug_assert_links(&self, id: NodeId) {
        let node = self.node(id);
        debug_assert!(node.is_leaf() || node.children.len() == node.count() + 1);
        debug_assert!(node
            .children
            .iter()
            .all(|c| self.node(*c).parent == Some(id)));
    }

    fn adopt_children(&mut self, id: NodeId) {
        for idx in 0..self.node(id).children.len() {
            let child = self.node(id).children[idx];
            self.node_mut(child).parent = Some(id);
        }
    }
}

impl<K, V, C: KeyOrder<K>> RawTree<K, V, C> {
    /// Descend from the root until `k` is found or a leaf is reached.
    pub(crate) fn locate(&self, k: &K) -> Located {
        let mut id = self.root;
        loop {
            let node = self.node(id);
            match node.locate(k, &self.order) {
                Ok(idx) => return Located::Hit(id, idx),
                Err(idx) => {
                    if node.is_leaf() {
                        return Located::Miss(id, idx);
                    }
                    id = node.children[idx];
                }
            }
        }
    }

    pub(crate) fn find(&self, k: &K) -> Position {
        match self.locate(k) {
            Located::Hit(id, idx) => (id, idx),
            Located::Miss(..) => self.end_position(),
        }
    }

    pub(crate) fn lower_bound(&self, k: &K) -> Position {
        // The deepest slot seen so far whose key is greater than k. Every
        // later descent goes left of it, so it only ever gets tighter.
        let mut back = self.end_position();
        let mut id = self.root;
        loop {
            let node = self.node(id);
            let idx = match node.locate(k, &self.order) {
                Ok(idx) => return (id, idx),
                Err(idx) => idx,
            };
            if idx < node.count() {
                back = (id, idx);
            }
            if node.is_leaf() {
                return back;
            }
            id = node.children[idx];
        }
    }

    pub(crate) fn upper_bound(&self, k: &K) -> Position {
        let mut back = self.end_position();
        let mut id = self.root;
        loop {
            let node = self.node(id);
            match node.locate(k, &self.order) {
                Ok(idx) if node.is_leaf() => {
                    return if idx + 1 < node.count() {
                        (id, idx + 1)
                    } else {
                        back
                    };
                }
                Ok(idx) => {
                    // Successor of an internal hit is the first entry of
                    // its right subtree.
                    return (self.leftmost_leaf(node.children[idx + 1]), 0);
                }
                Err(idx) => {
                    if idx < node.count() {
                        back = (id, idx);
                    }
                    if node.is_leaf() {
                        return back;
                    }
                    id = node.children[idx];
                }
            }
        }
    }

    /// Insert or replace. Returns where the entry ended up after any
    /// splits, and the replaced value if the key was already present.
    pub(crate) fn insert(&mut self, k: K, v: V) -> (Position, Option<V>) {
        match self.locate(&k) {
            Located::Hit(id, idx) => {
                let slot = &mut self.node_mut(id).items[idx].value;
                let prev = mem::replace(slot, v);
                ((id, idx), Some(prev))
            }
            Located::Miss(id, idx) => {
                let b = self.config.max_children();
                let node = self.node_mut(id);
                node.items.insert(idx, Entry::new(k, v));
                let full = node.count() == b;
                self.size += 1;
                let pos = if full {
                    self.split_node(id, idx)
                } else {
                    (id, idx)
                };
                (pos, None)
            }
        }
    }

    /// Split a node that has reached `b` items. The median moves up into
    /// the parent, which may split in turn; a split root gets a new root
    /// above it. `track` is an item index in `id` before the split, and the
    /// returned position is where that item lives afterwards.
    fn split_node(&mut self, id: NodeId, track: usize) -> Position {
        let b = self.config.max_children();
        let middle = b / 2;

        let (median, right_items, right_children, parent) = {
            let node = self.node_mut(id);
            debug_assert_eq!(node.count(), b);
            let right_items: Items<K, V> = node.items.drain(middle + 1..).collect();
            let median = node.items.remove(middle);
            let right_children: Children = if node.is_leaf() {
                Children::new()
            } else {
                node.children.drain(middle + 1..).collect()
            };
            (median, right_items, right_children, node.parent)
        };

        let sibling = NodeId(self.nodes.insert(Node {
            items: right_items,
            children: right_children,
            parent,
        }));
        self.adopt_children(sibling);
        debug_assert!(self.node(id).count() >= self.config.min_items());
        debug_assert!(self.node(sibling).count() >= self.config.min_items());
        self.debug_assert_links(id);
        self.debug_assert_links(sibling);
        trace!(node = id.0, sibling = sibling.0, middle, "split");

        let promoted_to = match parent {
            None => {
                let root = NodeId(self.nodes.insert(Node::new_branch(median, id, sibling)));
                self.node_mut(id).parent = Some(root);
                self.node_mut(sibling).parent = Some(root);
                self.root = root;
                debug!(root = root.0, height = self.height(), "root split, tree grew");
                (root, 0)
            }
            Some(pid) => {
                let pos = self.node(pid).search(median.key(), &self.order);
                let pnode = self.node_mut(pid);
                pnode.items.insert(pos, median);
                pnode.children.insert(pos + 1, sibling);
                self.debug_assert_links(pid);
                let pnode = self.node(pid);
                if pnode.count() == b {
                    self.split_node(pid, pos)
                } else {
                    (pid, pos)
                }
            }
        };

        match track.cmp(&middle) {
            Ordering::Less => (id, track),
            Ordering::Equal => promoted_to,
            Ordering::Greater => (sibling, track - middle - 1),
        }
    }

    pub(crate) fn remove(&mut self, k: &K) -> Option<Entry<K, V>> {
        match self.locate(k) {
            Located::Hit(id, idx) => Some(self.remove_at((id, idx))),
            Located::Miss(..) => None,
        }
    }

    /// Remove the entry at a live position. An internal entry is swapped
    /// with its in-order predecessor so the physical removal is always
    /// from a leaf.
    pub(crate) fn remove_at(&mut self, (id, idx): Position) -> Entry<K, V> {
        let (leaf, removed) = if self.node(id).is_leaf() {
            (id, self.node_mut(id).items.remove(idx))
        } else {
            let leaf = self.rightmost_leaf(self.node(id).children[idx]);
            let last = self.node(leaf).count() - 1;
            let pred = self.node_mut(leaf).items.remove(last);
            let removed = mem::replace(&mut self.node_mut(id).items[idx], pred);
            (leaf, removed)
        };
        self.size -= 1;

        if self.node(leaf).count() < self.config.min_items() {
            match self.refill_node(leaf) {
                Some(Refill::Merged { cascaded, shrunk }) => {
                    trace!(node = leaf.0, cascaded, shrunk, "refilled by merge");
                }
                Some(outcome) => trace!(node = leaf.0, ?outcome, "refilled"),
                None => {}
            }
        }
        removed
    }

    /// Restore the minimum occupancy of an underfull non-root node. The
    /// left sibling is always preferred, for rotation and for merging.
    /// Returns `None` for the root, which has no minimum.
    fn refill_node(&mut self, id: NodeId) -> Option<Refill> {
        let parent = self.node(id).parent?;
        let i = self.node(parent).child_index(id)?;
        let a = self.config.min_children();

        let left = i.checked_sub(1).map(|l| self.node(parent).children[l]);
        let right = self.node(parent).children.get(i + 1).copied();

        if let Some(left) = left {
            if self.node(left).count() >= a {
                self.rotate_right(parent, i);
                return Some(Refill::RotatedRight);
            }
        }
        if let Some(right) = right {
            if self.node(right).count() >= a {
                self.rotate_left(parent, i);
                return Some(Refill::RotatedLeft);
            }
        }

        let (cascaded, shrunk) = match left {
            Some(_) => self.merge_nodes(parent, i - 1),
            None => self.merge_nodes(parent, i),
        };
        Some(Refill::Merged { cascaded, shrunk })
    }

    // parent.items[i - 1] comes down into children[i], the left sibling's
    // last item goes up, and its last child moves across.
    fn rotate_right(&mut self, parent: NodeId, i: usize) {
        let (left, node) = {
            let p = self.node(parent);
            (p.children[i - 1], p.children[i])
        };
        debug_assert!(self.node(left).count() >= self.config.min_children());
        let (item, child) = {
            let l = self.node_mut(left);
            let last = l.count() - 1;
            (l.items.remove(last), l.children.pop())
        };
        let sep = mem::replace(&mut self.node_mut(parent).items[i - 1], item);
        let n = self.node_mut(node);
        n.items.insert(0, sep);
        if let Some(child) = child {
            n.children.insert(0, child);
            self.node_mut(child).parent = Some(node);
        }
        debug_assert!(self.node(node).count() >= self.config.min_items());
        self.debug_assert_links(left);
        self.debug_assert_links(node);
        trace!(from = left.0, to = node.0, "rotate right");
    }

    // Mirror of rotate_right, borrowing from children[i + 1].
    fn rotate_left(&mut self, parent: NodeId, i: usize) {
        let (node, right) = {
            let p = self.node(parent);
            (p.children[i], p.children[i + 1])
        };
        debug_assert!(self.node(right).count() >= self.config.min_children());
        let (item, child) = {
            let r = self.node_mut(right);
            let item = r.items.remove(0);
            let child = if r.is_leaf() {
                None
            } else {
                Some(r.children.remove(0))
            };
            (item, child)
        };
        let sep = mem::replace(&mut self.node_mut(parent).items[i], item);
        let n = self.node_mut(node);
        n.items.push(sep);
        if let Some(child) = child {
            n.children.push(child);
            self.node_mut(child).parent = Some(node);
        }
        debug_assert!(self.node(node).count() >= self.config.min_items());
        self.debug_assert_links(right);
        self.debug_assert_links(node);
        trace!(from = right.0, to = node.0, "rotate left");
    }

    /// Fuse children[k + 1] of `parent` into children[k], pulling the
    /// separating item down between them. The right node is freed. Returns
    /// (cascaded, shrunk).
    fn merge_nodes(&mut self, parent: NodeId, k: usize) -> (bool, bool) {
        let (left, right, sep) = {
            let p = self.node_mut(parent);
            let right = p.children.remove(k + 1);
            let sep = p.items.remove(k);
            (p.children[k], right, sep)
        };

        let absorbed = self.nodes.remove(right.0);
        for child in absorbed.children.iter() {
            self.node_mut(*child).parent = Some(left);
        }
        let l = self.node_mut(left);
        l.items.push(sep);
        l.items.extend(absorbed.items);
        l.children.extend(absorbed.children);
        trace!(left = left.0, right = right.0, count = l.count(), "merged");
        debug_assert!(self.node(left).count() <= self.config.max_items());
        self.debug_assert_links(left);
        self.debug_assert_links(parent);

        if parent == self.root {
            if self.node(parent).count() == 0 {
                // The root handle moves to the merged node before the old
                // root slot is released.
                self.root = left;
                self.node_mut(left).parent = None;
                self.nodes.remove(parent.0);
                debug!(root = left.0, height = self.height(), "root emptied, tree shrank");
                return (false, true);
            }
            (false, false)
        } else if self.node(parent).count() < self.config.min_items() {
            if let Some(outcome) = self.refill_node(parent) {
                trace!(node = parent.0, ?outcome, "cascaded refill");
            }
            (true, false)
        } else {
            (false, false)
        }
    }

    /// In-order successor of `pos`, or `None` when `pos` is the end.
    ///
    /// Leaves are left upwards without a stack: the child index of the node
    /// being left is recovered by searching the parent for that node's first
    /// key.
    pub(crate) fn next_position(&self, (mut id, mut idx): Position) -> Option<Position> {
        let node = self.node(id);
        if idx >= node.count() {
            return None;
        }
        if !node.is_leaf() {
            return Some((self.leftmost_leaf(node.children[idx + 1]), 0));
        }
        idx += 1;
        while idx == self.node(id).count() {
            let node = self.node(id);
            let (Some(parent), Some(first)) = (node.parent, node.first_key()) else {
                break;
            };
            idx = self.node(parent).search(first, &self.order);
            id = parent;
        }
        Some((id, idx))
    }

    /// In-order predecessor of `pos`, or `None` when `pos` is the first
    /// entry (or the tree is empty).
    pub(crate) fn prev_position(&self, (mut id, mut idx): Position) -> Option<Position> {
        let node = self.node(id);
        if !node.is_leaf() {
            let leaf = self.rightmost_leaf(node.children[idx]);
            return Some((leaf, self.node(leaf).count() - 1));
        }
        while idx == 0 {
            let node = self.node(id);
            let (Some(parent), Some(first)) = (node.parent, node.first_key()) else {
                return None;
            };
            idx = self.node(parent).search(first, &self.order);
            id = parent;
        }
        Some((id, idx - 1))
    }

    /// Check every structural invariant, logging the first violation.
    pub(crate) fn verify(&self) -> bool {
        let root = match self.nodes.get(self.root.0) {
            Some(root) => root,
            None => {
                error!(root = self.root.0, "root handle is dangling");
                return false;
            }
        };
        if root.parent.is_some() {
            error!(root = self.root.0, "root has a parent link");
            return false;
        }
        if !root.is_leaf() && root.count() == 0 {
            error!(root = self.root.0, "internal root holds no items");
            return false;
        }

        let mut state = VerifyState::default();
        if !self.verify_node(self.root, None, None, 0, &mut state) {
            return false;
        }
        if state.entries != self.size {
            error!(entries = state.entries, size = self.size, "size accounting mismatch");
            return false;
        }
        if state.nodes != self.nodes.len() {
            error!(
                reachable = state.nodes,
                allocated = self.nodes.len(),
                "unreachable nodes in arena"
            );
            return false;
        }
        true
    }

    fn verify_node(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        state: &mut VerifyState,
    ) -> bool {
        let node = self.node(id);
        let count = node.count();
        state.nodes += 1;
        state.entries += count;

        if count > self.config.max_items() {
            error!(node = id.0, count, "node overfull");
            return false;
        }
        if id != self.root && count < self.config.min_items() {
            error!(node = id.0, count, "node underfull");
            return false;
        }
        for pair in node.items.windows(2) {
            if self.order.compare(pair[0].key(), pair[1].key()) != Ordering::Less {
                error!(node = id.0, "items out of order");
                return false;
            }
        }
        if let (Some(lower), Some(first)) = (lower, node.first_key()) {
            if self.order.compare(lower, first) != Ordering::Less {
                error!(node = id.0, "item below its separator");
                return false;
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.items.last()) {
            if self.order.compare(last.key(), upper) != Ordering::Less {
                error!(node = id.0, "item above its separator");
                return false;
            }
        }

        if node.is_leaf() {
            return match state.leaf_depth {
                None => {
                    state.leaf_depth = Some(depth);
                    true
                }
                Some(d) if d == depth => true,
                Some(d) => {
                    error!(node = id.0, depth, expected = d, "leaves at unequal depth");
                    false
                }
            };
        }

        if node.children.len() != count + 1 {
            error!(
                node = id.0,
                count,
                children = node.children.len(),
                "child count mismatch"
            );
            return false;
        }
        for (ci, child) in node.children.iter().enumerate() {
            match self.nodes.get(child.0) {
                Some(c) if c.parent == Some(id) => {}
                Some(_) => {
                    error!(node = id.0, child = child.0, "child has a wrong parent link");
                    return false;
                }
                None => {
                    error!(node = id.0, child = child.0, "dangling child link");
                    return false;
                }
            }
            let lo = if ci == 0 {
                lower
            } else {
                Some(node.items[ci - 1].key())
            };
            let hi = if ci == count {
                upper
            } else {
                Some(node.items[ci].key())
            };
            if !self.verify_node(*child, lo, hi, depth + 1, state) {
                return false;
            }
        }
        true
    }
}

impl<K: Debug, V, C> RawTree<K, V, C> {
    /// Indented in-order dump of the keys, four spaces per level.
    pub(crate) fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, indent: usize, out: &mut String) {
        let node = self.node(id);
        for (i, e) in node.items.iter().enumerate() {
            if let Some(child) = node.children.get(i) {
                self.dump_node(*child, indent + 1, out);
            }
            let _ = writeln!(out, "{:width$}{:?}", "", e.key(), width = indent * 4);
        }
        if let Some(child) = node.children.get(node.count()) {
            self.dump_node(*child, indent + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{NaturalOrder, ReverseOrder};
    use rand::seq::SliceRandom;

    fn tree(a: usize, b: usize) -> RawTree<u32, u32, NaturalOrder> {
        RawTree::new(AbTreeConfig::new(a, b).unwrap(), NaturalOrder)
    }

    fn tree_of(a: usize, b: usize, keys: &[u32]) -> RawTree<u32, u32, NaturalOrder> {
        let mut t = tree(a, b);
        for k in keys {
            t.insert(*k, *k);
        }
        assert!(t.verify());
        t
    }

    fn forward_keys<C: KeyOrder<u32>>(t: &RawTree<u32, u32, C>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut pos = t.begin_position();
        while let Some(e) = t.entry_at(pos) {
            out.push(e.key);
            pos = match t.next_position(pos) {
                Some(p) => p,
                None => break,
            };
        }
        assert!(t.is_end(pos));
        out
    }

    fn backward_keys<C: KeyOrder<u32>>(t: &RawTree<u32, u32, C>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut pos = t.end_position();
        while let Some(p) = t.prev_position(pos) {
            out.push(t.entry_at(p).unwrap().key);
            pos = p;
        }
        assert_eq!(pos, t.begin_position());
        out
    }

    #[test]
    fn test_abtree_raw_empty() {
        let t = tree(2, 3);
        assert!(t.verify());
        assert_eq!(t.len(), 0);
        assert_eq!(t.height(), 1);
        assert_eq!(t.begin_position(), t.end_position());
        assert_eq!(t.next_position(t.end_position()), None);
        assert_eq!(t.prev_position(t.begin_position()), None);
        assert_eq!(t.find(&1), t.end_position());
        assert_eq!(t.lower_bound(&1), t.end_position());
        assert_eq!(t.upper_bound(&1), t.end_position());
        assert_eq!(t.dump(), "");
    }

    #[test]
    fn test_abtree_raw_insert_split_root() {
        let mut t = tree_of(2, 3, &[1, 2]);
        assert_eq!(t.height(), 1);
        assert_eq!(t.node_count(), 1);

        let (pos, prev) = t.insert(3, 3);
        assert!(prev.is_none());
        assert_eq!(t.entry_at(pos).unwrap().key, 3);
        assert!(t.verify());
        assert_eq!(t.height(), 2);
        assert_eq!(t.node_count(), 3);
        assert_eq!(t.dump(), "    1\n2\n    3\n");
    }

    #[test]
    fn test_abtree_raw_insert_replace() {
        let mut t = tree_of(2, 3, &[1, 2, 3]);
        let (pos, prev) = t.insert(2, 20);
        assert_eq!(prev, Some(2));
        assert_eq!(t.len(), 3);
        let e = t.entry_at(pos).unwrap();
        assert_eq!((e.key, e.value), (2, 20));
        assert!(t.verify());
    }

    #[test]
    fn test_abtree_raw_insert_tracks_position_through_splits() {
        for (a, b) in [(2, 3), (2, 4), (3, 5), (3, 6), (4, 8)] {
            let mut t = tree(a, b);
            for k in 0..300 {
                let (pos, _) = t.insert(k, k);
                assert_eq!(t.entry_at(pos).unwrap().key, k);
                assert!(t.verify());
            }
            let mut t = tree(a, b);
            for k in (0..300).rev() {
                let (pos, _) = t.insert(k, k);
                assert_eq!(t.entry_at(pos).unwrap().key, k);
            }
            assert!(t.verify());
        }
    }

    #[test]
    fn test_abtree_raw_refill_rotate_right() {
        // root [2], children [0, 1] [3]
        let mut t = tree_of(2, 3, &[1, 2, 3, 0]);
        assert_eq!(t.dump(), "    0\n    1\n2\n    3\n");
        assert_eq!(t.remove(&3).map(Entry::into_pair), Some((3, 3)));
        assert!(t.verify());
        assert_eq!(t.dump(), "    0\n1\n    2\n");
    }

    #[test]
    fn test_abtree_raw_refill_rotate_left() {
        // root [2], children [1] [3, 4]
        let mut t = tree_of(2, 3, &[1, 2, 3, 4]);
        assert_eq!(t.dump(), "    1\n2\n    3\n    4\n");
        assert!(t.remove(&1).is_some());
        assert!(t.verify());
        assert_eq!(t.dump(), "    2\n3\n    4\n");
    }

    #[test]
    fn test_abtree_raw_refill_prefers_left_sibling() {
        // root [2, 6], children [0, 1] [3, 5] [7, 8]: both neighbours of the
        // middle leaf can lend, the left one must be used.
        let mut t = tree_of(2, 4, &[0, 1, 2, 3, 5, 6, 7, 8]);
        let before = t.dump();
        assert_eq!(before, "    0\n    1\n2\n    3\n    5\n6\n    7\n    8\n");
        let middle = match t.locate(&3) {
            Located::Hit(id, _) => id,
            Located::Miss(..) => panic!("3 missing"),
        };
        let parent = t.node(middle).parent.unwrap();
        let i = t.node(parent).child_index(middle).unwrap();
        assert_eq!(i, 1);

        // Drain the middle leaf by hand so refill sees both options.
        t.node_mut(middle).items.clear();
        t.size -= 2;
        assert_eq!(t.refill_node(middle), Some(Refill::RotatedRight));
        assert!(t.verify());
        assert!(t.is_end(t.find(&3)));
        assert!(t.is_end(t.find(&5)));
        assert_eq!(t.dump(), "    0\n1\n    2\n6\n    7\n    8\n");
        assert_eq!(forward_keys(&t), vec![0, 1, 2, 6, 7, 8]);
    }

    #[test]
    fn test_abtree_raw_refill_outcomes() {
        let _ = tracing_subscriber::fmt::try_init();

        // [1] 2 [3]: emptying [3] merges into [1, 2] and drops the root.
        let mut t = tree_of(2, 3, &[1, 2, 3]);
        let leaf = match t.locate(&3) {
            Located::Hit(id, _) => id,
            Located::Miss(..) => panic!("3 missing"),
        };
        t.node_mut(leaf).items.clear();
        t.size -= 1;
        assert_eq!(
            t.refill_node(leaf),
            Some(Refill::Merged {
                cascaded: false,
                shrunk: true
            })
        );
        assert!(t.verify());
        assert_eq!(t.dump(), "1\n2\n");

        // Every node holds one item, so emptying [1] merges at the leaves,
        // underfills [2] and merges again at the root.
        let mut t = tree_of(2, 3, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(t.height(), 3);
        assert_eq!(
            t.dump(),
            "        1\n    2\n        3\n4\n        5\n    6\n        7\n"
        );
        let leaf = match t.locate(&1) {
            Located::Hit(id, _) => id,
            Located::Miss(..) => panic!("1 missing"),
        };
        t.node_mut(leaf).items.clear();
        t.size -= 1;
        assert_eq!(
            t.refill_node(leaf),
            Some(Refill::Merged {
                cascaded: true,
                shrunk: false
            })
        );
        assert!(t.verify());
        assert_eq!(t.height(), 2);
        assert_eq!(t.dump(), "    2\n    3\n4\n    5\n6\n    7\n");

        // A root never refills.
        let mut t = tree_of(2, 3, &[1]);
        let root = t.root();
        assert_eq!(t.refill_node(root), None);
    }

    #[test]
    fn test_abtree_raw_merge_shrinks_root() {
        let mut t = tree_of(2, 3, &[1, 2, 3]);
        assert_eq!(t.height(), 2);
        assert!(t.remove(&3).is_some());
        assert!(t.verify());
        assert_eq!(t.height(), 1);
        assert_eq!(t.node_count(), 1);
        assert_eq!(t.dump(), "1\n2\n");
    }

    #[test]
    fn test_abtree_raw_erase_internal_uses_predecessor() {
        let mut t = tree_of(2, 3, &[1, 2, 3]);
        assert_eq!(t.remove(&2).map(Entry::into_pair), Some((2, 2)));
        assert!(t.verify());
        assert_eq!(t.dump(), "1\n3\n");

        // Predecessor swap without any underflow.
        let mut t = tree_of(2, 4, &[1, 2, 3, 4, 5, 6]);
        let root_key = t.node(t.root()).items[0].key;
        assert!(t.remove(&root_key).is_some());
        assert!(t.verify());
        assert!(t.find(&root_key) == t.end_position());
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn test_abtree_raw_erase_missing_is_noop() {
        let mut t = tree_of(2, 3, &[1, 2, 3, 4, 5]);
        let dump = t.dump();
        assert!(t.remove(&9).is_none());
        assert!(t.remove(&0).is_none());
        assert_eq!(t.len(), 5);
        assert_eq!(t.dump(), dump);
    }

    #[test]
    fn test_abtree_raw_cascading_merge() {
        let keys: Vec<u32> = (0..64).collect();
        let mut t = tree_of(2, 3, &keys);
        let tall = t.height();
        assert!(tall >= 4);
        for k in keys.iter() {
            assert!(t.remove(k).is_some());
            assert!(t.verify(), "after removing {}\n{}", k, t.dump());
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.height(), 1);
        assert_eq!(t.node_count(), 1);
    }

    #[test]
    fn test_abtree_raw_traversal_both_ways() {
        for (a, b) in [(2, 3), (2, 4), (3, 5), (4, 8)] {
            let keys: Vec<u32> = (0..200).map(|x| x * 3).collect();
            let t = tree_of(a, b, &keys);
            assert_eq!(forward_keys(&t), keys);
            let mut rev = keys.clone();
            rev.reverse();
            assert_eq!(backward_keys(&t), rev);
        }
    }

    #[test]
    fn test_abtree_raw_ascent_recomputes_index() {
        // Walk every position and check each step lands exactly one key on.
        let keys: Vec<u32> = (0..120).collect();
        let t = tree_of(2, 3, &keys);
        assert!(t.height() >= 4);
        for k in 0..119u32 {
            let pos = t.find(&k);
            let next = t.next_position(pos).unwrap();
            assert_eq!(t.entry_at(next).unwrap().key, k + 1);
            let back = t.prev_position(next).unwrap();
            assert_eq!(back, pos);
        }
        let last = t.find(&119);
        assert_eq!(t.next_position(last), Some(t.end_position()));
        assert_eq!(t.prev_position(t.end_position()), Some(last));
    }

    #[test]
    fn test_abtree_raw_bounds() {
        for (a, b) in [(2, 3), (2, 5), (3, 5), (4, 8)] {
            let keys: Vec<u32> = (1..100).map(|x| x * 2).collect();
            let t = tree_of(a, b, &keys);
            for q in 0..202u32 {
                let lb = keys.partition_point(|k| *k < q);
                let ub = keys.partition_point(|k| *k <= q);
                let got_lb = t.entry_at(t.lower_bound(&q)).map(|e| e.key);
                let got_ub = t.entry_at(t.upper_bound(&q)).map(|e| e.key);
                assert_eq!(got_lb, keys.get(lb).copied(), "lower_bound {}", q);
                assert_eq!(got_ub, keys.get(ub).copied(), "upper_bound {}", q);
                if lb == keys.len() {
                    assert!(t.is_end(t.lower_bound(&q)));
                }
                if ub == keys.len() {
                    assert!(t.is_end(t.upper_bound(&q)));
                }
            }
        }
    }

    #[test]
    fn test_abtree_raw_reverse_order() {
        let mut t: RawTree<u32, u32, ReverseOrder> =
            RawTree::new(AbTreeConfig::new(2, 3).unwrap(), ReverseOrder);
        for k in 0..50 {
            t.insert(k, k);
        }
        assert!(t.verify());
        let expect: Vec<u32> = (0..50).rev().collect();
        assert_eq!(forward_keys(&t), expect);
        assert_eq!(t.entry_at(t.lower_bound(&60)).map(|e| e.key), Some(49));
        assert_eq!(t.entry_at(t.upper_bound(&10)).map(|e| e.key), Some(9));
    }

    #[test]
    fn test_abtree_raw_random_insert_remove() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut rng = rand::rng();
        for (a, b) in [(2, 3), (2, 4), (3, 5), (3, 7), (4, 8), (5, 12)] {
            let mut ins: Vec<u32> = (0..500).collect();
            ins.shuffle(&mut rng);
            let mut t = tree(a, b);
            for k in ins.iter() {
                t.insert(*k, *k);
            }
            assert!(t.verify());
            assert_eq!(t.len(), 500);

            let mut rem = ins.clone();
            rem.shuffle(&mut rng);
            let (gone, kept) = rem.split_at(250);
            for k in gone {
                assert_eq!(t.remove(k).map(|e| e.value), Some(*k));
                assert!(t.verify(), "({}, {}) removing {}\n{}", a, b, k, t.dump());
            }
            let mut kept: Vec<u32> = kept.to_vec();
            kept.sort_unstable();
            assert_eq!(forward_keys(&t), kept);
            for k in gone {
                assert!(t.is_end(t.find(k)));
            }
        }
    }

    #[test]
    fn test_abtree_raw_clear() {
        let keys: Vec<u32> = (0..50).collect();
        let mut t = tree_of(2, 3, &keys);
        t.clear();
        assert!(t.verify());
        assert_eq!(t.len(), 0);
        assert_eq!(t.node_count(), 1);
        t.insert(4, 4);
        assert_eq!(forward_keys(&t), vec![4]);
    }
}
