//! Error types for the tree.
//!
//! A lookup miss is not an error - it is reported through the end cursor or
//! an `Option`. The only fallible operation is building a configuration,
//! because an invalid `(a, b)` pair breaks the split and refill arithmetic.

use thiserror::Error;

/// Result type alias for tree construction.
pub type Result<T> = std::result::Result<T, AbTreeError>;

/// Errors raised when constructing an [AbTree](crate::AbTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbTreeError {
    /// Every non-root node must hold at least two children.
    #[error("minimum child count must be at least 2, got {a}")]
    MinChildrenTooSmall {
        /// The rejected minimum child count.
        a: usize,
    },

    /// A split of an overfull node must yield two legal nodes.
    #[error("maximum child count must be at least 2a - 1 = {required}, got a = {a}, b = {b}")]
    MaxChildrenTooSmall {
        /// The requested minimum child count.
        a: usize,
        /// The rejected maximum child count.
        b: usize,
        /// The smallest acceptable maximum child count for `a`.
        required: usize,
    },

    /// `2a - 1` does not fit in a `usize`, so no `b` can satisfy it.
    #[error("minimum child count {a} is too large, 2a - 1 overflows")]
    MinChildrenTooLarge {
        /// The rejected minimum child count.
        a: usize,
    },
}
