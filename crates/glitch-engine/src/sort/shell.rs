//! Shell sort with glitch breaks.

use super::{PixelSorter, SortContext};

/// Shell sort over the gap sequence described by
/// [`ShellParams`](super::ShellParams).
///
/// Elements are shifted rather than exchanged, so channel swap rules do not
/// apply. A break test follows every element placement; when it fires the
/// remaining placements of the current gap are skipped and sorting resumes
/// with the next smaller gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellSort;

impl ShellSort {
    /// The gap sequence used for a range spanning `span` (`upper - lower`).
    pub fn gaps(span: usize, ratio: usize, divisor: usize) -> Vec<usize> {
        let ratio = ratio.max(2);
        let limit = span / divisor.max(1);
        let mut gap = 1;
        while gap <= limit {
            gap = ratio * gap + 1;
        }
        let mut gaps = Vec::new();
        while gap > 0 {
            gaps.push(gap);
            gap /= ratio;
        }
        gaps
    }
}

impl PixelSorter for ShellSort {
    fn sort_range(&self, pixels: &mut [u32], lower: usize, upper: usize, ctx: &mut SortContext<'_>) {
        if upper <= lower {
            return;
        }
        let params = ctx.config().shell;
        for gap in Self::gaps(upper - lower, params.ratio, params.divisor) {
            for i in (lower + gap)..=upper {
                let v = pixels[i];
                let mut j = i;
                while j >= lower + gap && ctx.less(v, pixels[j - gap]) {
                    pixels[j] = pixels[j - gap];
                    ctx.count_move();
                    j -= gap;
                }
                pixels[j] = v;
                if ctx.break_test() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gap_sequence() {
        // span 99 / 9 = 11: gaps grow 1, 4, 13 then shrink by 3
        assert_eq!(ShellSort::gaps(99, 3, 9), vec![13, 4, 1]);
        // tiny ranges still get one insertion pass
        assert_eq!(ShellSort::gaps(3, 3, 9), vec![1]);
        assert_eq!(ShellSort::gaps(1000, 2, 3), vec![511, 255, 127, 63, 31, 15, 7, 3, 1]);
    }

    #[test]
    fn test_sorts_completely_without_breaks() {
        for params in crate::sort::ShellParams::PRESETS {
            let config = SortConfig::unbroken().shell(params.ratio, params.divisor);
            let mut rng = StdRng::seed_from_u64(11);
            let mut ctx = SortContext::new(&config, &mut rng);
            let mut pixels: Vec<u32> = (0..257).map(|i| (i * 7919) % 257).collect();
            ShellSort.sort_range(&mut pixels, 0, 256, &mut ctx);
            assert!(
                pixels.windows(2).all(|w| w[0] <= w[1]),
                "shell sort with {params:?} left the range unsorted"
            );
        }
    }

    #[test]
    fn test_sub_range_only() {
        let config = SortConfig::unbroken();
        let mut rng = StdRng::seed_from_u64(11);
        let mut ctx = SortContext::new(&config, &mut rng);
        let mut pixels = vec![9, 8, 7, 6, 5, 4, 3];
        ShellSort.sort_range(&mut pixels, 2, 5, &mut ctx);
        assert_eq!(pixels, vec![9, 8, 4, 5, 6, 7, 3]);
    }
}
