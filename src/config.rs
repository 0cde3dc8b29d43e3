//! The `(a, b)` shape parameters of a tree.

use crate::error::{AbTreeError, Result};

#[cfg(feature = "skinny")]
pub(crate) const DEFAULT_MIN_CHILDREN: usize = 2;
#[cfg(feature = "skinny")]
pub(crate) const DEFAULT_MAX_CHILDREN: usize = 4;

#[cfg(not(feature = "skinny"))]
pub(crate) const DEFAULT_MIN_CHILDREN: usize = 4;
#[cfg(not(feature = "skinny"))]
pub(crate) const DEFAULT_MAX_CHILDREN: usize = 8;

/// Shape of an (a, b)-tree.
///
/// Every non-root node has between `a` and `b` children, and so between
/// `a - 1` and `b - 1` items. Construction rejects `a < 2` and `b < 2a - 1`:
/// below those bounds a split can produce an illegal half, or an underfull
/// node can be left without a sibling to borrow from or merge into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbTreeConfig {
    a: usize,
    b: usize,
}

impl AbTreeConfig {
    /// Validate and build a configuration.
    ///
    /// ```
    /// use abtree::{AbTreeConfig, AbTreeError};
    ///
    /// assert!(AbTreeConfig::new(2, 3).is_ok());
    /// assert_eq!(
    ///     AbTreeConfig::new(3, 4),
    ///     Err(AbTreeError::MaxChildrenTooSmall { a: 3, b: 4, required: 5 })
    /// );
    /// ```
    pub fn new(a: usize, b: usize) -> Result<Self> {
        if a < 2 {
            return Err(AbTreeError::MinChildrenTooSmall { a });
        }
        let required = match a.checked_mul(2) {
            Some(twice) => twice - 1,
            None => return Err(AbTreeError::MinChildrenTooLarge { a }),
        };
        if b < required {
            return Err(AbTreeError::MaxChildrenTooSmall { a, b, required });
        }
        Ok(AbTreeConfig { a, b })
    }

    /// The minimum child count `a` of a non-root internal node.
    pub fn min_children(&self) -> usize {
        self.a
    }

    /// The maximum child count `b` of any internal node.
    pub fn max_children(&self) -> usize {
        self.b
    }

    /// The minimum item count `a - 1` of a non-root node.
    pub fn min_items(&self) -> usize {
        self.a - 1
    }

    /// The maximum item count `b - 1` of any node.
    pub fn max_items(&self) -> usize {
        self.b - 1
    }
}

impl Default for AbTreeConfig {
    fn default() -> Self {
        AbTreeConfig {
            a: DEFAULT_MIN_CHILDREN,
            b: DEFAULT_MAX_CHILDREN,
        }
    }
}
