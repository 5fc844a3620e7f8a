//! Bubble sort with glitch breaks.

use super::{PixelSorter, SortContext};

/// Bubble sort moving the smallest remaining key leftwards on each pass.
///
/// A break test follows every compare-exchange; when it fires the whole
/// sort stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl PixelSorter for BubbleSort {
    fn sort_range(&self, pixels: &mut [u32], lower: usize, upper: usize, ctx: &mut SortContext<'_>) {
        for i in lower..upper {
            for j in ((i + 1)..=upper).rev() {
                ctx.compare_exchange(pixels, j - 1, j);
                if ctx.break_test() {
                    return;
                }
            }
        }
    }
}
