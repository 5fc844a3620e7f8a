//! Quicksort with glitch breaks.

use super::{PixelSorter, SortContext};

/// Hoare-partition quicksort with the last element as pivot.
///
/// After each partition a successful break test returns without sorting
/// either sub-range. Sub-ranges are kept on an explicit stack so already
/// ordered rows cannot exhaust the call stack; processing order is the same
/// as left-then-right recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickSort;

impl PixelSorter for QuickSort {
    fn sort_range(&self, pixels: &mut [u32], lower: usize, upper: usize, ctx: &mut SortContext<'_>) {
        let mut pending = vec![(lower, upper)];
        while let Some((l, r)) = pending.pop() {
            if r <= l {
                continue;
            }
            let p = partition(pixels, l, r, ctx);
            if ctx.break_test() {
                continue;
            }
            pending.push((p + 1, r));
            if p > l {
                pending.push((l, p - 1));
            }
        }
    }
}

fn partition(pixels: &mut [u32], l: usize, r: usize, ctx: &mut SortContext<'_>) -> usize {
    let pivot = pixels[r];
    let mut i = l;
    let mut j = r;
    loop {
        // pixels[r] is the pivot, which never precedes itself
        while ctx.less(pixels[i], pivot) {
            i += 1;
        }
        loop {
            j -= 1;
            if !ctx.less(pivot, pixels[j]) || j == l {
                break;
            }
        }
        if i >= j {
            break;
        }
        ctx.exchange_slots(pixels, i, j);
        i += 1;
    }
    if i != r {
        ctx.exchange_slots(pixels, i, r);
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(pixels: &mut [u32], config: &SortConfig) {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ctx = SortContext::new(config, &mut rng);
        let upper = pixels.len() - 1;
        QuickSort.sort_range(pixels, 0, upper, &mut ctx);
    }

    #[test]
    fn test_sorts_small_array() {
        let mut pixels = vec![5, 3, 1, 4, 2];
        run(&mut pixels, &SortConfig::unbroken());
        assert_eq!(pixels, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sorts_with_duplicates_and_sorted_input() {
        let mut pixels = vec![3, 3, 1, 3, 1, 2, 2, 3];
        run(&mut pixels, &SortConfig::unbroken());
        assert_eq!(pixels, vec![1, 1, 2, 2, 3, 3, 3, 3]);

        let mut sorted: Vec<u32> = (0..2000).collect();
        run(&mut sorted, &SortConfig::unbroken());
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_descending() {
        let mut pixels = vec![5, 3, 1, 4, 2];
        run(&mut pixels, &SortConfig::unbroken().ascending(false));
        assert_eq!(pixels, vec![5, 4, 3, 2, 1]);
    }
}
