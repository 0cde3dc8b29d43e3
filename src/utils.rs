use std::cmp::Ordering;

use crate::compare::KeyOrder;

/// Binary search for the first element whose key is `>= k`.
///
/// Returns `Ok(idx)` when that element's key is equal to `k`, otherwise
/// `Err(idx)` where `idx` is the insertion point (possibly `slice.len()`).
/// Either way `idx` is the smallest index whose key is not less than `k`.
pub(crate) fn slice_search<T, K, C, F>(slice: &[T], k: &K, key_of: F, order: &C) -> Result<usize, usize>
where
    K: ?Sized,
    C: KeyOrder<K>,
    F: Fn(&T) -> &K,
{
    let idx = slice.partition_point(|item| order.compare(key_of(item), k) == Ordering::Less);
    match slice.get(idx) {
        Some(item) if order.compare(key_of(item), k) == Ordering::Equal => Ok(idx),
        _ => Err(idx),
    }
}

/// Linear scan with the same contract as [slice_search]. Only used to
/// cross-check the binary search.
#[cfg(test)]
pub(crate) fn slice_search_linear<T, K, C, F>(
    slice: &[T],
    k: &K,
    key_of: F,
    order: &C,
) -> Result<usize, usize>
where
    K: ?Sized,
    C: KeyOrder<K>,
    F: Fn(&T) -> &K,
{
    for (idx, item) in slice.iter().enumerate() {
        match order.compare(k, key_of(item)) {
            Ordering::Greater => {}
            Ordering::Equal => return Ok(idx),
            Ordering::Less => return Err(idx),
        }
    }
    Err(slice.len())
}
