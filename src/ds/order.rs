//! Stock comparators.
//!
//! | Comparator          | Bound          | Top of heap | Can fail          |
//! |---------------------|----------------|-------------|-------------------|
//! | [`MinOrder`]        | `Ord`          | smallest    | no                |
//! | [`MaxOrder`]        | `Ord`          | largest     | no                |
//! | [`PartialMinOrder`] | `PartialOrd`   | smallest    | unordered values  |
//! | [`PartialMaxOrder`] | `PartialOrd`   | largest     | unordered values  |
//! | [`FnOrder`]         | closure        | caller      | caller            |
//! | [`ByValue`]         | inner on `V`   | inner       | inner             |
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::ds::{PartialMinOrder, MaxOrder};
//! use heapkit::traits::Comparator;
//!
//! assert_eq!(MaxOrder.less(&3, &1), Ok(true));
//!
//! let cmp = PartialMinOrder;
//! assert_eq!(cmp.less(&1.0, &2.0), Ok(true));
//! assert!(cmp.less(&f64::NAN, &2.0).is_err());
//! ```

use std::cmp::Ordering;

use crate::error::ComparisonError;
use crate::traits::Comparator;

/// Min-heap ordering over `T: Ord`. The default comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinOrder;

impl<T: Ord + ?Sized> Comparator<T> for MinOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        Ok(a < b)
    }
}

/// Max-heap ordering over `T: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxOrder;

impl<T: Ord + ?Sized> Comparator<T> for MaxOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        Ok(a > b)
    }
}

/// Min-heap ordering over `T: PartialOrd`.
///
/// Fails when `partial_cmp` has no answer, e.g. when either side is NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialMinOrder;

impl<T: PartialOrd + ?Sized> Comparator<T> for PartialMinOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        match a.partial_cmp(b) {
            Some(ordering) => Ok(ordering == Ordering::Less),
            None => Err(unordered()),
        }
    }
}

/// Max-heap ordering over `T: PartialOrd`.
///
/// Fails when `partial_cmp` has no answer, e.g. when either side is NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialMaxOrder;

impl<T: PartialOrd + ?Sized> Comparator<T> for PartialMaxOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        match a.partial_cmp(b) {
            Some(ordering) => Ok(ordering == Ordering::Greater),
            None => Err(unordered()),
        }
    }
}

#[cold]
fn unordered() -> ComparisonError {
    ComparisonError::new("values have no defined order")
}

/// Ordering defined by a closure.
///
/// # Example
///
/// ```
/// use heapkit::ds::{FnOrder, IndexedHeap};
///
/// // Shortest string on top.
/// let by_len = FnOrder::new(|a: &String, b: &String| Ok(a.len() < b.len()));
/// let mut heap = IndexedHeap::with_comparator(by_len);
/// heap.push("ccc".to_string()).unwrap();
/// heap.push("a".to_string()).unwrap();
/// assert_eq!(heap.peek_top().unwrap(), "a");
/// ```
#[derive(Clone, Copy)]
pub struct FnOrder<F>(F);

impl<F> FnOrder<F> {
    /// Wraps `less` as a comparator.
    pub fn new<T: ?Sized>(less: F) -> Self
    where
        F: Fn(&T, &T) -> Result<bool, ComparisonError>,
    {
        Self(less)
    }
}

impl<T: ?Sized, F> Comparator<T> for FnOrder<F>
where
    F: Fn(&T, &T) -> Result<bool, ComparisonError>,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        (self.0)(a, b)
    }
}

impl<F> std::fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnOrder(..)")
    }
}

/// Lifts a comparator over `V` to key/value pairs, ignoring the key.
///
/// Used by [`BoundedMap`](crate::policy::bounded_map::BoundedMap) to order its
/// heap of entries by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByValue<C>(pub C);

impl<C> ByValue<C> {
    /// Returns the inner value comparator.
    #[inline]
    pub fn inner(&self) -> &C {
        &self.0
    }
}

impl<K, V, C: Comparator<V>> Comparator<(K, V)> for ByValue<C> {
    #[inline]
    fn less(&self, a: &(K, V), b: &(K, V)) -> Result<bool, ComparisonError> {
        self.0.less(&a.1, &b.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_are_strict() {
        assert_eq!(MinOrder.less(&1, &2), Ok(true));
        assert_eq!(MinOrder.less(&2, &2), Ok(false));
        assert_eq!(MaxOrder.less(&2, &1), Ok(true));
        assert_eq!(MaxOrder.less(&2, &2), Ok(false));
    }

    #[test]
    fn min_order_on_unsized_str() {
        assert_eq!(MinOrder.less("apple", "banana"), Ok(true));
    }

    #[test]
    fn partial_orders_fail_on_nan() {
        assert_eq!(PartialMinOrder.less(&1.0, &1.5), Ok(true));
        assert_eq!(PartialMaxOrder.less(&1.0, &1.5), Ok(false));
        assert!(PartialMinOrder.less(&f64::NAN, &1.0).is_err());
        assert!(PartialMaxOrder.less(&1.0, &f64::NAN).is_err());
    }

    #[test]
    fn fn_order_propagates_errors() {
        let cmp = FnOrder::new(|a: &i32, b: &i32| {
            if *a < 0 || *b < 0 {
                Err(ComparisonError::new("negative"))
            } else {
                Ok(a < b)
            }
        });
        assert_eq!(cmp.less(&1, &2), Ok(true));
        assert_eq!(cmp.less(&-1, &2), Err(ComparisonError::new("negative")));
    }

    #[test]
    fn by_value_ignores_keys() {
        let cmp = ByValue(MinOrder);
        assert_eq!(cmp.less(&("z", 1), &("a", 2)), Ok(true));
        assert_eq!(cmp.less(&("a", 2), &("z", 1)), Ok(false));
    }
}
