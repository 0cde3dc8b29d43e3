//! The node arena and the structural algorithms behind [crate::AbTree].
//! Nothing here is public; the container and its cursors are the only way
//! in, and they keep every borrow of the arena tied to the tree.

pub(crate) mod abtree;
