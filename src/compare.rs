//! Key ordering used by the tree.
//!
//! The tree never calls `Ord` directly. Every comparison goes through a
//! [KeyOrder] value stored in the tree, so callers can supply an ordering
//! that differs from the key type's natural one.

use std::cmp::Ordering;

/// A total order over keys of type `K`.
pub trait KeyOrder<K: ?Sized> {
    /// Compare two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [Ord] implementation. This is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> KeyOrder<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of the key type's [Ord] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> KeyOrder<K> for ReverseOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}
