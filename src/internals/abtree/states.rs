use super::node::NodeId;

/// Where a root-to-leaf descent for a key stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Located {
    // The key is held at this node and index.
    Hit(NodeId, usize),
    // The key is absent; this is the leaf it would be inserted into, and
    // the slot it would take.
    Miss(NodeId, usize),
}

/// How an underfull node was repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refill {
    // Borrowed the last item of the left sibling through the parent.
    RotatedRight,
    // Borrowed the first item of the right sibling through the parent.
    RotatedLeft,
    // Two siblings and their separator were fused into the left one.
    // `cascaded` is set when the parent then needed a refill of its own,
    // `shrunk` when the parent was a single-item root and the tree lost a
    // level.
    Merged { cascaded: bool, shrunk: bool },
}
