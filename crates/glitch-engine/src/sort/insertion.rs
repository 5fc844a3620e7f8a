//! Insertion sort with glitch breaks.

use super::{PixelSorter, SortContext};

/// Insertion sort by adjacent compare-exchange.
///
/// The inner loop runs all the way down to the start of the range. A break
/// test follows every compare-exchange; when it fires the whole sort stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl PixelSorter for InsertionSort {
    fn sort_range(&self, pixels: &mut [u32], lower: usize, upper: usize, ctx: &mut SortContext<'_>) {
        for i in (lower + 1)..=upper {
            for j in ((lower + 1)..=i).rev() {
                ctx.compare_exchange(pixels, j - 1, j);
                if ctx.break_test() {
                    return;
                }
            }
        }
    }
}
