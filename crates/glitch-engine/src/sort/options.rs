//! Sort configuration.
//!
//! This module provides the [`SortConfig`] struct shared by every sort
//! algorithm, plus the shell sort gap parameters.

use std::fmt;
use std::str::FromStr;

use super::order::{ComponentOrder, SwapRule};
use crate::error::ParseEnumError;

/// Upper bound of the uniform draw in the break test.
pub const BREAK_SCALE: f32 = 1000.0;

/// Sorting algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortAlgorithm {
    /// Hoare-partition quicksort; a break abandons both sub-ranges.
    #[default]
    Quick,
    /// Shell sort; a break ends the current gap pass only.
    Shell,
    /// Bubble sort; a break aborts the whole sort.
    Bubble,
    /// Insertion sort; a break aborts the whole sort.
    Insert,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Quick,
        SortAlgorithm::Shell,
        SortAlgorithm::Bubble,
        SortAlgorithm::Insert,
    ];

    /// Break point tuned so each algorithm yields a similar glitch density
    /// given its own number of break tests.
    pub const fn default_break_point(self) -> f32 {
        match self {
            SortAlgorithm::Quick => 144.0,
            SortAlgorithm::Shell => 996.0,
            SortAlgorithm::Bubble => 990.0,
            SortAlgorithm::Insert => 999.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Shell => "shell",
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Insert => "insert",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" | "quicksort" => Ok(SortAlgorithm::Quick),
            "shell" | "shellsort" => Ok(SortAlgorithm::Shell),
            "bubble" => Ok(SortAlgorithm::Bubble),
            "insert" | "insertion" => Ok(SortAlgorithm::Insert),
            _ => Err(ParseEnumError::new(
                "sort algorithm",
                s,
                "quick, shell, bubble, insert",
            )),
        }
    }
}

/// Shell sort gap sequence parameters.
///
/// The starting gap grows as `gap = ratio * gap + 1` while it stays within
/// `(upper - lower) / divisor`, then each pass divides it by `ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellParams {
    pub ratio: usize,
    pub divisor: usize,
}

impl ShellParams {
    /// Preset `(ratio, divisor)` pairs that give visibly different partitions.
    pub const PRESETS: [ShellParams; 11] = [
        ShellParams::new(2, 3),
        ShellParams::new(2, 5),
        ShellParams::new(3, 5),
        ShellParams::new(3, 7),
        ShellParams::new(3, 9),
        ShellParams::new(4, 7),
        ShellParams::new(4, 9),
        ShellParams::new(5, 7),
        ShellParams::new(5, 9),
        ShellParams::new(5, 11),
        ShellParams::new(8, 13),
    ];

    pub const fn new(ratio: usize, divisor: usize) -> Self {
        Self { ratio, divisor }
    }
}

impl Default for ShellParams {
    fn default() -> Self {
        Self::new(3, 9)
    }
}

/// Configuration shared by all sort algorithms.
///
/// # Defaults
///
/// - Algorithm: quicksort
/// - Order: RGB, ascending
/// - Random break: enabled, at the algorithm's default break point
/// - Channel swapping: disabled (rule BB when enabled)
/// - Shell parameters: ratio 3, divisor 9
///
/// # Example
///
/// ```
/// use glitch_engine::{ComponentOrder, SortAlgorithm, SortConfig, SwapRule};
///
/// let config = SortConfig::new()
///     .algorithm(SortAlgorithm::Bubble)
///     .order(ComponentOrder::Hsb)
///     .swap(SwapRule::Rg);
///
/// assert_eq!(config.effective_break_point(), 990.0);
/// assert!(config.swap_channels);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SortConfig {
    /// Sorting algorithm.
    pub algorithm: SortAlgorithm,

    /// How colors are turned into comparison keys.
    pub order: ComponentOrder,

    /// Sort keys from low to high when `true`, high to low otherwise.
    pub ascending: bool,

    /// Enable probabilistic early termination ("glitch breaks").
    pub random_break: bool,

    /// Break threshold in `[0, 1000]`. A break fires when a uniform draw
    /// from `[0, 1000)` exceeds it. `None` uses the algorithm default.
    pub break_point: Option<f32>,

    /// Recombine channels on exchange instead of swapping whole pixels.
    pub swap_channels: bool,

    /// Channel recombination rule used when `swap_channels` is set.
    pub swap: SwapRule,

    /// Shell sort gap parameters.
    pub shell: ShellParams,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            algorithm: SortAlgorithm::Quick,
            order: ComponentOrder::Rgb,
            ascending: true,
            random_break: true,
            break_point: None,
            swap_channels: false,
            swap: SwapRule::Bb,
            shell: ShellParams::default(),
        }
    }
}

impl SortConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that sorts completely: random breaks disabled.
    pub fn unbroken() -> Self {
        Self::default().random_break(false)
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn order(mut self, order: ComponentOrder) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    #[inline]
    pub fn random_break(mut self, enabled: bool) -> Self {
        self.random_break = enabled;
        self
    }

    /// Override the break point. Values outside `[0, 1000]` are clamped.
    pub fn break_point(mut self, break_point: f32) -> Self {
        let clamped = if break_point.is_nan() {
            self.algorithm.default_break_point()
        } else {
            break_point.clamp(0.0, BREAK_SCALE)
        };
        if clamped != break_point {
            tracing::warn!(break_point, clamped, "Break point out of range, clamping");
        }
        self.break_point = Some(clamped);
        self
    }

    /// Enable channel swapping with the given rule.
    #[inline]
    pub fn swap(mut self, rule: SwapRule) -> Self {
        self.swap_channels = true;
        self.swap = rule;
        self
    }

    #[inline]
    pub fn swap_channels(mut self, enabled: bool) -> Self {
        self.swap_channels = enabled;
        self
    }

    /// Set shell sort parameters. `ratio` is raised to at least 2 and
    /// `divisor` to at least 1.
    pub fn shell(mut self, ratio: usize, divisor: usize) -> Self {
        let params = ShellParams::new(ratio.max(2), divisor.max(1));
        if params.ratio != ratio || params.divisor != divisor {
            tracing::warn!(
                ratio,
                divisor,
                clamped_ratio = params.ratio,
                clamped_divisor = params.divisor,
                "Shell parameters out of range, clamping"
            );
        }
        self.shell = params;
        self
    }

    /// The break point in force: the override if set, else the default of
    /// the selected algorithm.
    pub fn effective_break_point(&self) -> f32 {
        self.break_point
            .unwrap_or_else(|| self.algorithm.default_break_point())
    }
}
