//! Integer intervals and even partitioning.
//!
//! [`Range`] is an inclusive `[lower, upper]` span used for sort windows and
//! frequency-bin bands. [`RangeManager`] splits a half-open domain
//! `[lower, upper)` into near-equal contiguous intervals and hands them out
//! one at a time.

mod manager;

pub use manager::RangeManager;

use std::fmt;

/// An inclusive integer interval `[lower, upper]`.
///
/// A range with `upper < lower` is empty. Ranges are plain values: the
/// engines that consume them check them against their own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub lower: i64,
    pub upper: i64,
}

impl Range {
    #[inline]
    pub const fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// Number of integers in the range.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.upper < self.lower {
            0
        } else {
            self.upper.abs_diff(self.lower) + 1
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Iterate the indices of a non-negative range.
    ///
    /// Negative bounds are clipped at zero.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        if self.is_empty() || self.upper < 0 {
            #[allow(clippy::reversed_empty_ranges)]
            return 1..=0;
        }
        (self.lower.max(0) as usize)..=(self.upper as usize)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_inclusive() {
        assert_eq!(Range::new(0, 9).len(), 10);
        assert_eq!(Range::new(5, 5).len(), 1);
        assert_eq!(Range::new(5, 4).len(), 0);
        assert!(Range::new(5, 4).is_empty());
    }

    #[test]
    fn test_contains() {
        let r = Range::new(-2, 3);
        assert!(r.contains(-2));
        assert!(r.contains(3));
        assert!(!r.contains(4));
    }

    #[test]
    fn test_indices() {
        assert_eq!(Range::new(2, 4).indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(Range::new(4, 2).indices().count(), 0);
        assert_eq!(Range::new(-3, 1).indices().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::new(3, 17).to_string(), "(3, 17)");
    }
}
