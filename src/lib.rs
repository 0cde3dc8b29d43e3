//! abtree - an ordered map on an (a, b)-tree
//!
//! An (a, b)-tree is a B-tree generalised over its fan-out: every node other
//! than the root has between `a` and `b` children, every leaf sits at the
//! same depth, and each node keeps its entries sorted. Insertions that fill a
//! node split it and push the median up; removals that empty a node refill
//! it from a sibling or merge it into one.
//!
//! The map exposed here is [AbTree]. Beyond the usual map operations it hands
//! out cursors ([Cursor], [CursorMut]) that step forwards and backwards in
//! key order without a traversal stack: each node links to its parent, and
//! the cursor recovers where it came from by searching the parent for the
//! first key of the node it is leaving.
//!
//! Keys are ordered by a [KeyOrder] value owned by the tree, which defaults
//! to [NaturalOrder] (the key type's [Ord]). [ReverseOrder] and any other
//! caller supplied order work the same way.
//!
//! # Features
//!
//! * `skinny` - default to `(2, 4)` instead of `(4, 8)` and shrink the inline
//!   node storage to match.
//!
//! The tree is a plain single-owner container. It does no locking; share it
//! between threads the same way you would a `BTreeMap`.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![warn(missing_docs)]
#![allow(clippy::needless_lifetimes)]

// This is where the tree actually lives.
mod internals;
mod utils;

pub mod abtree;
pub mod compare;
pub mod config;
pub mod error;

pub use crate::abtree::{AbTree, Cursor, CursorMut};
pub use crate::compare::{KeyOrder, NaturalOrder, ReverseOrder};
pub use crate::config::AbTreeConfig;
pub use crate::error::{AbTreeError, Result};
