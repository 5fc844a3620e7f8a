//! Pixel sorting with probabilistic early termination.
//!
//! Four interchangeable algorithms sort an index range of a pixel buffer by
//! a configurable color key. With random breaks enabled each algorithm
//! periodically draws a random number and may abandon the rest of its work,
//! leaving a partially ordered ("glitched") range.
//!
//! # Architecture
//!
//! All algorithms implement [`PixelSorter`] and share the comparison,
//! exchange and break-test primitives of [`SortContext`]. Configuration is
//! done via [`SortConfig`]; [`SortEngine`] ties the two together and is the
//! entry point for callers.
//!
//! # Example
//!
//! ```
//! use glitch_engine::{PixelBuffer, Range, SortConfig, SortEngine};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut buffer = PixelBuffer::from_pixels(5, 1, vec![5, 3, 1, 4, 2]).unwrap();
//! let engine = SortEngine::new(SortConfig::unbroken());
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! engine.sort(&mut buffer, Range::new(0, 4), &mut rng);
//! assert_eq!(buffer.pixels(), &[1, 2, 3, 4, 5]);
//! ```

mod bubble;
mod comparator;
mod insertion;
mod options;
mod order;
mod quick;
mod schedule;
mod shell;

pub use bubble::BubbleSort;
pub use comparator::{ComparedPair, Comparison, SortContext, SortStats};
pub use insertion::InsertionSort;
pub use options::{ShellParams, SortAlgorithm, SortConfig, BREAK_SCALE};
pub use order::{ComponentOrder, RgbChannel, SwapRule};
pub use quick::QuickSort;
pub use schedule::{RowScheduler, RowStepReport};
pub use shell::ShellSort;

use rand::RngCore;

use crate::buffer::PixelBuffer;
use crate::range::Range;

/// A sorting algorithm over an inclusive index range.
///
/// Implementors must only touch `pixels[lower..=upper]` and must route every
/// comparison, exchange and break test through `ctx`.
pub trait PixelSorter {
    /// Sort `pixels[lower..=upper]` in place. `upper <= lower` is a no-op.
    fn sort_range(&self, pixels: &mut [u32], lower: usize, upper: usize, ctx: &mut SortContext<'_>);
}

impl SortAlgorithm {
    /// The sorter implementing this algorithm.
    pub fn sorter(self) -> &'static dyn PixelSorter {
        match self {
            SortAlgorithm::Quick => &QuickSort,
            SortAlgorithm::Shell => &ShellSort,
            SortAlgorithm::Bubble => &BubbleSort,
            SortAlgorithm::Insert => &InsertionSort,
        }
    }
}

/// Sorts ranges of pixels according to a [`SortConfig`].
#[derive(Debug, Clone, Default)]
pub struct SortEngine {
    config: SortConfig,
}

impl SortEngine {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SortConfig) {
        self.config = config;
    }

    /// Sort `buffer` pixels in the inclusive flat index range `range`.
    ///
    /// A degenerate range (`upper <= lower`) is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if a non-degenerate range reaches outside the buffer.
    pub fn sort(&self, buffer: &mut PixelBuffer, range: Range, rng: &mut dyn RngCore) -> SortStats {
        self.sort_slice(buffer.pixels_mut(), range, rng)
    }

    /// Sort the inclusive range `range` of an arbitrary pixel slice, such as
    /// a block plucked by a zigzag scanner.
    pub fn sort_slice(&self, pixels: &mut [u32], range: Range, rng: &mut dyn RngCore) -> SortStats {
        if range.upper <= range.lower {
            return SortStats::default();
        }
        assert!(
            range.lower >= 0 && (range.upper as u64) < pixels.len() as u64,
            "sort range {range} outside pixel slice of length {}",
            pixels.len()
        );
        let mut ctx = SortContext::new(&self.config, rng);
        self.config.algorithm.sorter().sort_range(
            pixels,
            range.lower as usize,
            range.upper as usize,
            &mut ctx,
        );
        ctx.into_stats()
    }

    /// Sort a whole slice.
    pub fn sort_all(&self, pixels: &mut [u32], rng: &mut dyn RngCore) -> SortStats {
        let range = Range::new(0, pixels.len() as i64 - 1);
        self.sort_slice(pixels, range, rng)
    }

    /// Sort the whole of row `y`. Rows of a zero-width buffer are empty
    /// and left alone.
    pub fn sort_row(&self, buffer: &mut PixelBuffer, y: u32, rng: &mut dyn RngCore) -> SortStats {
        let bounds = buffer.row_bounds(y);
        if bounds.is_empty() {
            return SortStats::default();
        }
        self.sort(buffer, Range::new(bounds.start as i64, bounds.end as i64 - 1), rng)
    }
}
