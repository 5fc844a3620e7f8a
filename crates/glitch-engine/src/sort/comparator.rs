//! Comparison, exchange and break-test primitives shared by the sorters.
//!
//! [`SortContext`] threads the configuration, the random source and a
//! statistics accumulator through a sort. [`SortContext::less`] returns the
//! decomposed colors of the pair it compared; [`SortContext::exchange`]
//! takes that pair explicitly, so channel-swap reconstruction never depends
//! on hidden state left behind by an earlier comparison.

use std::ops::AddAssign;

use rand::{Rng, RngCore};

use super::options::{SortConfig, BREAK_SCALE};
use crate::color::{compose, rgb_components};

/// Counters gathered while sorting. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of `less` evaluations.
    pub comparisons: u64,
    /// Number of element writes that moved data (swaps or shell shifts).
    pub exchanges: u64,
    /// Number of break tests that fired.
    pub breaks: u64,
}

impl AddAssign for SortStats {
    fn add_assign(&mut self, other: Self) {
        self.comparisons += other.comparisons;
        self.exchanges += other.exchanges;
        self.breaks += other.breaks;
    }
}

/// The RGB triples of two compared colors.
///
/// `v` is the color that moves into the lower slot of an exchange and `w`
/// the one that moves into the upper slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparedPair {
    pub v: [u8; 3],
    pub w: [u8; 3],
}

impl ComparedPair {
    #[inline]
    pub fn new(v: u32, w: u32) -> Self {
        Self {
            v: rgb_components(v),
            w: rgb_components(w),
        }
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// `true` if `v` must be placed before `w`.
    pub less: bool,
    pub pair: ComparedPair,
}

/// Mutable state of one sort invocation.
pub struct SortContext<'a> {
    config: &'a SortConfig,
    rng: &'a mut dyn RngCore,
    break_point: f32,
    stats: SortStats,
}

impl<'a> SortContext<'a> {
    pub fn new(config: &'a SortConfig, rng: &'a mut dyn RngCore) -> Self {
        Self {
            config,
            rng,
            break_point: config.effective_break_point(),
            stats: SortStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &SortConfig {
        self.config
    }

    #[inline]
    pub fn stats(&self) -> SortStats {
        self.stats
    }

    pub fn into_stats(self) -> SortStats {
        self.stats
    }

    /// Compare two colors under the configured order and direction.
    ///
    /// Ascending: `v` precedes `w` when its key is smaller. Descending: when
    /// its key is larger. Equal keys never precede each other.
    #[inline]
    pub fn compare(&mut self, v: u32, w: u32) -> Comparison {
        self.stats.comparisons += 1;
        let kv = self.config.order.transform_key(v);
        let kw = self.config.order.transform_key(w);
        let less = if self.config.ascending {
            kv < kw
        } else {
            kv > kw
        };
        Comparison {
            less,
            pair: ComparedPair::new(v, w),
        }
    }

    /// Shorthand for `compare(v, w).less`.
    #[inline]
    pub fn less(&mut self, v: u32, w: u32) -> bool {
        self.compare(v, w).less
    }

    /// Exchange `pixels[i]` and `pixels[j]`.
    ///
    /// With channel swapping disabled this is a plain swap. Otherwise both
    /// slots are rebuilt from `pair` under the configured [`SwapRule`]
    /// (slot `i` from `pair.v`, slot `j` from `pair.w`) with alpha forced
    /// opaque. `pair` must describe the colors currently at `j` and `i`
    /// respectively.
    ///
    /// [`SwapRule`]: super::SwapRule
    #[inline]
    pub fn exchange(&mut self, pixels: &mut [u32], i: usize, j: usize, pair: &ComparedPair) {
        self.stats.exchanges += 1;
        if self.config.swap_channels {
            let (into_i, into_j) = self.config.swap.apply(pair.v, pair.w);
            pixels[i] = compose(into_i);
            pixels[j] = compose(into_j);
        } else {
            pixels.swap(i, j);
        }
    }

    /// Exchange `pixels[i]` and `pixels[j]` using their current colors as
    /// the pair, for sorters whose exchanges are not preceded by a
    /// comparison of the same two slots.
    #[inline]
    pub fn exchange_slots(&mut self, pixels: &mut [u32], i: usize, j: usize) {
        let pair = ComparedPair::new(pixels[j], pixels[i]);
        self.exchange(pixels, i, j, &pair);
    }

    /// Exchange `pixels[i]` and `pixels[j]` if `pixels[j]` must precede
    /// `pixels[i]`. Returns whether an exchange happened.
    #[inline]
    pub fn compare_exchange(&mut self, pixels: &mut [u32], i: usize, j: usize) -> bool {
        let cmp = self.compare(pixels[j], pixels[i]);
        if cmp.less {
            self.exchange(pixels, i, j, &cmp.pair);
        }
        cmp.less
    }

    /// Record a plain element move (shell sort shifts).
    #[inline]
    pub(crate) fn count_move(&mut self) {
        self.stats.exchanges += 1;
    }

    /// Draw from `[0, 1000)` and report whether the sort should break.
    ///
    /// Always `false` when random breaks are disabled.
    #[inline]
    pub fn break_test(&mut self) -> bool {
        if !self.config.random_break {
            return false;
        }
        let draw: f32 = self.rng.gen_range(0.0..BREAK_SCALE);
        let fire = self.break_point < draw;
        if fire {
            self.stats.breaks += 1;
        }
        fire
    }
}
