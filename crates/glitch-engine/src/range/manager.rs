//! Stateful partitioning of a domain into sequential intervals.

use super::Range;

/// Splits the half-open domain `[lower, upper)` into `count` contiguous
/// inclusive intervals and iterates over them.
///
/// Boundaries come from a floating accumulator advanced by `span / count`
/// and rounded, so the intervals cover the domain exactly with no gap or
/// overlap whatever the divisibility. The last interval always ends at
/// `upper - 1`, absorbing any accumulated rounding drift.
///
/// The cursor does not wrap: once [`has_next`](Self::has_next) returns
/// `false`, call [`reset_cursor`](Self::reset_cursor) to start over.
///
/// # Example
///
/// ```
/// use glitch_engine::{Range, RangeManager};
///
/// let mut ranger = RangeManager::new(0, 10, 3);
/// assert_eq!(ranger.next(), Some(Range::new(0, 2)));
/// assert_eq!(ranger.next(), Some(Range::new(3, 6)));
/// assert_eq!(ranger.next(), Some(Range::new(7, 9)));
/// assert!(!ranger.has_next());
/// ranger.reset_cursor();
/// assert_eq!(ranger.next(), Some(Range::new(0, 2)));
/// ```
#[derive(Debug, Clone)]
pub struct RangeManager {
    lower: i64,
    upper: i64,
    count: usize,
    intervals: Vec<Range>,
    cursor: usize,
}

impl RangeManager {
    /// Partition `[lower, upper)` into `count` intervals.
    ///
    /// A `count` of zero or an empty domain yields no intervals.
    pub fn new(lower: i64, upper: i64, count: usize) -> Self {
        let mut manager = Self {
            lower,
            upper,
            count,
            intervals: Vec::new(),
            cursor: 0,
        };
        manager.rebuild();
        manager
    }

    fn rebuild(&mut self) {
        self.intervals.clear();
        self.cursor = 0;
        if self.count == 0 || self.upper <= self.lower {
            return;
        }

        let delta = (self.upper - self.lower) as f64 / self.count as f64;
        let mut pos = self.lower as f64;
        let mut lower = self.lower;
        for _ in 0..self.count {
            pos += delta;
            let upper = pos.round() as i64 - 1;
            self.intervals.push(Range::new(lower, upper));
            lower = upper + 1;
        }
        if let Some(last) = self.intervals.last_mut() {
            last.upper = self.upper - 1;
        }
    }

    /// `true` while unconsumed intervals remain.
    pub fn has_next(&self) -> bool {
        self.cursor < self.intervals.len()
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Change the number of intervals. Rebuilds and resets the cursor.
    pub fn set_interval_count(&mut self, count: usize) {
        self.count = count;
        self.rebuild();
    }

    /// Change the domain to `[lower, upper)`. Rebuilds and resets the cursor.
    pub fn set_domain(&mut self, lower: i64, upper: i64) {
        self.lower = lower;
        self.upper = upper;
        self.rebuild();
    }

    pub fn intervals(&self) -> &[Range] {
        &self.intervals
    }

    pub fn interval_count(&self) -> usize {
        self.count
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The domain as an inclusive range `[lower, upper - 1]`.
    pub fn domain(&self) -> Range {
        Range::new(self.lower, self.upper - 1)
    }
}

impl Iterator for RangeManager {
    type Item = Range;

    fn next(&mut self) -> Option<Range> {
        let range = self.intervals.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_partition(manager: &RangeManager, lower: i64, upper: i64) {
        let intervals = manager.intervals();
        assert_eq!(intervals.first().map(|r| r.lower), Some(lower));
        assert_eq!(intervals.last().map(|r| r.upper), Some(upper - 1));
        for pair in intervals.windows(2) {
            assert_eq!(
                pair[0].upper + 1,
                pair[1].lower,
                "intervals {} and {} are not contiguous",
                pair[0],
                pair[1]
            );
        }
        let total: u64 = intervals.iter().map(Range::len).sum();
        assert_eq!(total, (upper - lower) as u64);
    }

    #[test]
    fn test_even_split() {
        let manager = RangeManager::new(0, 100, 4);
        assert_eq!(
            manager.intervals(),
            &[
                Range::new(0, 24),
                Range::new(25, 49),
                Range::new(50, 74),
                Range::new(75, 99)
            ]
        );
        assert_partition(&manager, 0, 100);
    }

    #[test]
    fn test_uneven_split_is_exhaustive() {
        for count in 1..=13 {
            let manager = RangeManager::new(0, 99, count);
            assert_eq!(manager.intervals().len(), count);
            assert_partition(&manager, 0, 99);
        }
        assert_partition(&RangeManager::new(17, 230, 7), 17, 230);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut manager = RangeManager::new(0, 100, 0);
        assert!(manager.intervals().is_empty());
        assert!(!manager.has_next());
        assert_eq!(manager.next(), None);
    }

    #[test]
    fn test_empty_domain() {
        let manager = RangeManager::new(10, 10, 3);
        assert!(manager.intervals().is_empty());
    }

    #[test]
    fn test_exhaustion_and_reset() {
        let mut manager = RangeManager::new(0, 8, 2);
        assert_eq!(manager.next(), Some(Range::new(0, 3)));
        assert!(manager.has_next());
        assert_eq!(manager.next(), Some(Range::new(4, 7)));
        assert!(!manager.has_next());
        assert_eq!(manager.next(), None);
        manager.reset_cursor();
        assert_eq!(manager.cursor(), 0);
        assert_eq!(manager.next(), Some(Range::new(0, 3)));
    }

    #[test]
    fn test_setters_rebuild_and_reset() {
        let mut manager = RangeManager::new(0, 8, 2);
        manager.next();
        manager.set_interval_count(4);
        assert_eq!(manager.cursor(), 0);
        assert_eq!(manager.intervals().len(), 4);

        manager.next();
        manager.set_domain(0, 20);
        assert_eq!(manager.cursor(), 0);
        assert_partition(&manager, 0, 20);
        assert_eq!(manager.domain(), Range::new(0, 19));
    }

    #[test]
    fn test_more_intervals_than_elements() {
        let manager = RangeManager::new(0, 2, 4);
        assert_eq!(manager.intervals().len(), 4);
        let total: u64 = manager.intervals().iter().map(Range::len).sum();
        assert_eq!(total, 2);
    }
}
