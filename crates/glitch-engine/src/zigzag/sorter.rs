//! Block-wise glitch sorting along zigzag paths.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, trace};

use super::{centered_grid, ZigzagScanner};
use crate::buffer::PixelBuffer;
use crate::error::ParseEnumError;
use crate::sort::{SortEngine, SortStats};

/// How block orientation varies across the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZigzagStyle {
    /// Mirror the traversal at random after every block.
    #[default]
    Random,
    /// Every block uses the same orientation.
    Align,
    /// Blocks are grouped 2×2; each group uses all four orientations in a
    /// shuffled arrangement.
    Permute,
}

impl fmt::Display for ZigzagStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ZigzagStyle::Random => "random",
            ZigzagStyle::Align => "align",
            ZigzagStyle::Permute => "permute",
        })
    }
}

impl FromStr for ZigzagStyle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(ZigzagStyle::Random),
            "align" | "aligned" => Ok(ZigzagStyle::Align),
            "permute" => Ok(ZigzagStyle::Permute),
            _ => Err(ParseEnumError::new(
                "zigzag style",
                s,
                "random, align, permute",
            )),
        }
    }
}

/// Configuration for [`ZigzagSorter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ZigzagOptions {
    pub style: ZigzagStyle,

    /// Share of blocks to sort, in percent. Default: `100.0`
    pub percent: f32,

    /// Smallest block edge for [`ZigzagSorter::random_edge`]. Default: `8`
    pub floor: u32,

    /// Largest block edge for [`ZigzagSorter::random_edge`]. Default: `64`
    pub ceiling: u32,
}

impl Default for ZigzagOptions {
    fn default() -> Self {
        Self {
            style: ZigzagStyle::Random,
            percent: 100.0,
            floor: 8,
            ceiling: 64,
        }
    }
}

impl ZigzagOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn style(mut self, style: ZigzagStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the share of blocks to sort. Clamped to `[0, 100]`.
    pub fn percent(mut self, percent: f32) -> Self {
        self.percent = if percent.is_nan() {
            100.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        self
    }

    /// Set the block edge bounds. Both are raised to at least 2 and swapped
    /// if given in the wrong order.
    pub fn edge_range(mut self, floor: u32, ceiling: u32) -> Self {
        let (floor, ceiling) = (floor.max(2), ceiling.max(2));
        self.floor = floor.min(ceiling);
        self.ceiling = floor.max(ceiling);
        self
    }
}

/// Result of one zigzag pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZigzagReport {
    pub edge: u32,
    pub blocks_sorted: usize,
    pub blocks_skipped: usize,
    pub stats: SortStats,
}

/// Tiles an image with square blocks and sorts each along a zigzag path.
#[derive(Debug, Clone, Default)]
pub struct ZigzagSorter {
    options: ZigzagOptions,
}

impl ZigzagSorter {
    pub fn new(options: ZigzagOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ZigzagOptions {
        &self.options
    }

    /// Draw a block edge uniformly from `[floor, ceiling]`.
    pub fn random_edge(&self, rng: &mut dyn RngCore) -> u32 {
        let floor = self.options.floor.max(1);
        let ceiling = self.options.ceiling.max(floor);
        rng.gen_range(floor..=ceiling)
    }

    /// Sort with a block edge drawn by [`random_edge`](Self::random_edge).
    pub fn sort_random(
        &self,
        buffer: &mut PixelBuffer,
        engine: &SortEngine,
        rng: &mut dyn RngCore,
    ) -> ZigzagReport {
        let edge = self.random_edge(rng);
        self.sort_blocks(buffer, edge, engine, rng)
    }

    /// Sort every `edge×edge` block of the centred block grid.
    ///
    /// Blocks are selected with probability `percent / 100`. An edge of zero
    /// or larger than the image sorts nothing.
    pub fn sort_blocks(
        &self,
        buffer: &mut PixelBuffer,
        edge: u32,
        engine: &SortEngine,
        rng: &mut dyn RngCore,
    ) -> ZigzagReport {
        let mut report = ZigzagReport {
            edge,
            ..Default::default()
        };
        let ((columns, rows), (ox, oy)) = centered_grid(buffer.width(), buffer.height(), edge);
        if columns == 0 || rows == 0 {
            debug!(edge, "Zigzag block larger than image, nothing to sort");
            return report;
        }

        match self.options.style {
            ZigzagStyle::Random | ZigzagStyle::Align => {
                let mut scanner = ZigzagScanner::new(edge);
                for by in 0..rows {
                    for bx in 0..columns {
                        if self.skip_block(rng) {
                            report.blocks_skipped += 1;
                            continue;
                        }
                        let (x, y) = (bx * edge + ox, by * edge + oy);
                        sort_block(buffer, &scanner, x, y, engine, rng, &mut report);
                        if self.options.style == ZigzagStyle::Random {
                            if rng.gen::<f32>() > 0.5 {
                                scanner.flip_x();
                            }
                            if rng.gen::<f32>() > 0.5 {
                                scanner.flip_y();
                            }
                        }
                    }
                }
            }
            ZigzagStyle::Permute => {
                let orientations = four_orientations(edge);
                let mut perm = [0usize, 1, 2, 3];
                for gy in 0..rows / 2 {
                    for gx in 0..columns / 2 {
                        if self.skip_block(rng) {
                            report.blocks_skipped += 4;
                            continue;
                        }
                        perm.shuffle(rng);
                        let (x, y) = (2 * gx * edge + ox, 2 * gy * edge + oy);
                        // counter-clockwise from the top-left block
                        let corners = [(x, y), (x, y + edge), (x + edge, y + edge), (x + edge, y)];
                        for (&slot, &(cx, cy)) in perm.iter().zip(corners.iter()) {
                            sort_block(buffer, &orientations[slot], cx, cy, engine, rng, &mut report);
                        }
                    }
                }
            }
        }

        debug!(
            edge,
            style = %self.options.style,
            sorted = report.blocks_sorted,
            skipped = report.blocks_skipped,
            "Zigzag sort complete"
        );
        report
    }

    fn skip_block(&self, rng: &mut dyn RngCore) -> bool {
        rng.gen_range(0.0f32..100.0) > self.options.percent
    }
}

/// Identity, mirrored in X, mirrored in X and Y, mirrored in Y.
fn four_orientations(edge: u32) -> [ZigzagScanner; 4] {
    let identity = ZigzagScanner::new(edge);
    let mut flip_x = identity.clone();
    flip_x.flip_x();
    let mut flip_xy = flip_x.clone();
    flip_xy.flip_y();
    let mut flip_y = identity.clone();
    flip_y.flip_y();
    [identity, flip_x, flip_xy, flip_y]
}

fn sort_block(
    buffer: &mut PixelBuffer,
    scanner: &ZigzagScanner,
    x: u32,
    y: u32,
    engine: &SortEngine,
    rng: &mut dyn RngCore,
    report: &mut ZigzagReport,
) {
    let mut block = scanner.pluck(buffer, x, y);
    let stats = engine.sort_all(&mut block, rng);
    scanner.plant(buffer, &block, x, y);
    trace!(x, y, comparisons = stats.comparisons, "Sorted zigzag block");
    report.stats += stats;
    report.blocks_sorted += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels = (0..width * height)
            .map(|_| 0xFF00_0000 | rng.gen_range(0..0x0100_0000))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    fn block_is_zigzag_sorted(buffer: &PixelBuffer, scanner: &ZigzagScanner, x: u32, y: u32) -> bool {
        let block = scanner.pluck(buffer, x, y);
        block.windows(2).all(|w| (w[0] & 0xFF_FFFF) <= (w[1] & 0xFF_FFFF))
    }

    #[test]
    fn test_align_sorts_every_block_along_zigzag() {
        let mut rng = StdRng::seed_from_u64(8);
        let engine = SortEngine::new(SortConfig::unbroken());
        let sorter = ZigzagSorter::new(ZigzagOptions::new().style(ZigzagStyle::Align));
        let mut buffer = make_noise(20, 17, 1);
        let report = sorter.sort_blocks(&mut buffer, 8, &engine, &mut rng);

        assert_eq!(report.blocks_sorted, 4);
        let scanner = ZigzagScanner::new(8);
        // grid is centred: x offset 2, y offset 0
        for (x, y) in [(2, 0), (10, 0), (2, 8), (10, 8)] {
            assert!(block_is_zigzag_sorted(&buffer, &scanner, x, y));
        }
    }

    #[test]
    fn test_margins_untouched() {
        let mut rng = StdRng::seed_from_u64(8);
        let engine = SortEngine::new(SortConfig::unbroken());
        let sorter = ZigzagSorter::default();
        let original = make_noise(21, 10, 2);
        let mut buffer = original.clone();
        sorter.sort_blocks(&mut buffer, 4, &engine, &mut rng);
        // 21 = 5 * 4 + 1, so offset 0 and column 20 lies outside the grid
        for y in 0..10 {
            assert_eq!(buffer.get(20, y), original.get(20, y));
        }
        // 10 = 2 * 4 + 2, so rows 0 and 9 lie outside the grid
        assert_eq!(buffer.row(0), original.row(0));
        assert_eq!(buffer.row(9), original.row(9));
    }

    #[test]
    fn test_zero_percent_skips_everything() {
        let mut rng = StdRng::seed_from_u64(8);
        let engine = SortEngine::new(SortConfig::unbroken());
        let sorter = ZigzagSorter::new(ZigzagOptions::new().percent(0.0));
        let original = make_noise(16, 16, 3);
        let mut buffer = original.clone();
        let report = sorter.sort_blocks(&mut buffer, 4, &engine, &mut rng);
        assert_eq!(report.blocks_sorted, 0);
        assert_eq!(report.blocks_skipped, 16);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_permute_uses_two_by_two_groups() {
        let mut rng = StdRng::seed_from_u64(8);
        let engine = SortEngine::new(SortConfig::unbroken());
        let sorter = ZigzagSorter::new(ZigzagOptions::new().style(ZigzagStyle::Permute));
        let mut buffer = make_noise(24, 16, 4);
        let report = sorter.sort_blocks(&mut buffer, 4, &engine, &mut rng);
        // 6x4 blocks form 3x2 groups of four
        assert_eq!(report.blocks_sorted, 24);

        let orientations = four_orientations(4);
        let (x, y) = (0, 0);
        let sorted_any = orientations
            .iter()
            .filter(|s| block_is_zigzag_sorted(&buffer, s, x, y))
            .count();
        assert!(sorted_any >= 1, "top-left block not sorted in any orientation");
    }

    #[test]
    fn test_oversized_edge_sorts_nothing() {
        let mut rng = StdRng::seed_from_u64(8);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_noise(8, 8, 5);
        let report = ZigzagSorter::default().sort_blocks(&mut buffer, 9, &engine, &mut rng);
        assert_eq!(report.blocks_sorted, 0);
    }

    #[test]
    fn test_random_edge_within_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        let sorter = ZigzagSorter::new(ZigzagOptions::new().edge_range(16, 8));
        assert_eq!(sorter.options().floor, 8);
        assert_eq!(sorter.options().ceiling, 16);
        for _ in 0..100 {
            let edge = sorter.random_edge(&mut rng);
            assert!((8..=16).contains(&edge));
        }
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("PERMUTE".parse::<ZigzagStyle>(), Ok(ZigzagStyle::Permute));
        assert!("spiral".parse::<ZigzagStyle>().is_err());
    }
}
