//! Row scheduling for repeated glitch-sort passes.

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use super::{SortEngine, SortStats};
use crate::buffer::PixelBuffer;
use crate::range::RangeManager;

/// Result of one [`RowScheduler::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStepReport {
    /// Number of rows sorted in this step.
    pub rows_sorted: usize,
    /// `true` if the cycle was exhausted and restarted with a fresh shuffle.
    pub new_cycle: bool,
    pub stats: SortStats,
}

/// Chooses which image rows each sort pass processes.
///
/// Rows are visited in a shuffled order. The image height is divided into
/// `steps` intervals by a [`RangeManager`].
///
/// - Cycle mode: each step sorts the rows of the next interval of the
///   shuffled order. When every interval has been used the order is
///   reshuffled and a new cycle starts, so `steps` passes sort each row once.
/// - Otherwise: each step sorts the first `round(height / steps)` rows of the
///   shuffled order, then reshuffles.
#[derive(Debug, Clone)]
pub struct RowScheduler {
    rows: Vec<u32>,
    ranger: RangeManager,
    steps: usize,
    cycle: bool,
}

impl RowScheduler {
    /// Schedule `height` rows over `steps` passes (at least one).
    pub fn new(height: u32, steps: usize, cycle: bool, rng: &mut dyn RngCore) -> Self {
        let steps = steps.max(1);
        let mut rows: Vec<u32> = (0..height).collect();
        rows.shuffle(rng);
        Self {
            rows,
            ranger: RangeManager::new(0, i64::from(height), steps),
            steps,
            cycle,
        }
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn cycle(&self) -> bool {
        self.cycle
    }

    /// The current shuffled row order.
    pub fn row_order(&self) -> &[u32] {
        &self.rows
    }

    /// Change the number of passes per cycle. Restarts the cycle.
    pub fn set_steps(&mut self, steps: usize) {
        self.steps = steps.max(1);
        self.ranger.set_interval_count(self.steps);
    }

    /// Switch between cycle and random mode. Switching restarts the
    /// cycle; setting the current mode again keeps the cursor.
    pub fn set_cycle(&mut self, cycle: bool) {
        if self.cycle == cycle {
            return;
        }
        self.cycle = cycle;
        self.ranger.reset_cursor();
    }

    /// Reload row numbers for a new image height and reshuffle.
    pub fn reset(&mut self, height: u32, rng: &mut dyn RngCore) {
        self.rows = (0..height).collect();
        self.rows.shuffle(rng);
        self.ranger.set_domain(0, i64::from(height));
    }

    /// Sort the next batch of rows of `buffer` with `engine`.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is not as tall as the scheduled height.
    pub fn step(
        &mut self,
        buffer: &mut PixelBuffer,
        engine: &SortEngine,
        rng: &mut dyn RngCore,
    ) -> RowStepReport {
        assert_eq!(
            buffer.height() as usize,
            self.rows.len(),
            "row scheduler built for a different image height"
        );
        let mut report = RowStepReport::default();

        if self.cycle {
            let range = match self.ranger.next() {
                Some(range) => range,
                None => {
                    self.ranger.reset_cursor();
                    self.rows.shuffle(rng);
                    report.new_cycle = true;
                    match self.ranger.next() {
                        Some(range) => range,
                        None => return report,
                    }
                }
            };
            debug!(%range, new_cycle = report.new_cycle, "Sorting row interval");
            for index in range.indices() {
                let y = self.rows[index];
                report.stats += engine.sort_row(buffer, y, rng);
                report.rows_sorted += 1;
            }
        } else {
            let count = (self.rows.len() as f64 / self.steps as f64).round() as usize;
            for index in 0..count.min(self.rows.len()) {
                let y = self.rows[index];
                report.stats += engine.sort_row(buffer, y, rng);
                report.rows_sorted += 1;
            }
            self.rows.shuffle(rng);
        }

        debug!(
            rows = report.rows_sorted,
            comparisons = report.stats.comparisons,
            breaks = report.stats.breaks,
            "Row sort step complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_reversed_rows(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..height)
            .flat_map(|_| (0..width).rev().map(|x| 0xFF00_0000 | x))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    fn sorted_rows(buffer: &PixelBuffer) -> usize {
        (0..buffer.height())
            .filter(|&y| buffer.row(y).windows(2).all(|w| w[0] <= w[1]))
            .count()
    }

    #[test]
    fn test_rows_are_a_permutation() {
        let mut rng = StdRng::seed_from_u64(4);
        let scheduler = RowScheduler::new(50, 3, false, &mut rng);
        let mut rows = scheduler.row_order().to_vec();
        rows.sort_unstable();
        assert_eq!(rows, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_step_sorts_every_row() {
        let mut rng = StdRng::seed_from_u64(4);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_reversed_rows(8, 10);
        let mut scheduler = RowScheduler::new(10, 1, false, &mut rng);
        let report = scheduler.step(&mut buffer, &engine, &mut rng);
        assert_eq!(report.rows_sorted, 10);
        assert_eq!(sorted_rows(&buffer), 10);
    }

    #[test]
    fn test_non_cycle_sorts_fraction() {
        let mut rng = StdRng::seed_from_u64(4);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_reversed_rows(8, 10);
        let mut scheduler = RowScheduler::new(10, 4, false, &mut rng);
        let report = scheduler.step(&mut buffer, &engine, &mut rng);
        // round(10 / 4) = 3
        assert_eq!(report.rows_sorted, 3);
        assert_eq!(sorted_rows(&buffer), 3);
    }

    #[test]
    fn test_cycle_covers_each_row_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_reversed_rows(8, 10);
        let mut scheduler = RowScheduler::new(10, 3, true, &mut rng);

        let mut total = 0;
        for _ in 0..3 {
            let report = scheduler.step(&mut buffer, &engine, &mut rng);
            assert!(!report.new_cycle);
            total += report.rows_sorted;
        }
        assert_eq!(total, 10);
        assert_eq!(sorted_rows(&buffer), 10);

        let report = scheduler.step(&mut buffer, &engine, &mut rng);
        assert!(report.new_cycle, "fourth step should start a new cycle");
    }

    #[test]
    fn test_setting_same_mode_keeps_cycle_position() {
        let mut rng = StdRng::seed_from_u64(9);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_reversed_rows(4, 20);
        let mut scheduler = RowScheduler::new(20, 4, true, &mut rng);

        let mut new_cycles = Vec::new();
        for _ in 0..5 {
            scheduler.set_cycle(true);
            new_cycles.push(scheduler.step(&mut buffer, &engine, &mut rng).new_cycle);
        }
        assert_eq!(new_cycles, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_switching_mode_restarts_cycle() {
        let mut rng = StdRng::seed_from_u64(9);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = make_reversed_rows(4, 20);
        let mut scheduler = RowScheduler::new(20, 4, true, &mut rng);
        scheduler.step(&mut buffer, &engine, &mut rng);

        scheduler.set_cycle(false);
        scheduler.set_cycle(true);
        let mut total = 0;
        for _ in 0..4 {
            let report = scheduler.step(&mut buffer, &engine, &mut rng);
            assert!(!report.new_cycle);
            total += report.rows_sorted;
        }
        assert_eq!(total, 20);
    }

    #[test]
    fn test_zero_width_image_steps_without_sorting() {
        let mut rng = StdRng::seed_from_u64(1);
        let engine = SortEngine::new(SortConfig::unbroken());
        let mut buffer = PixelBuffer::new(0, 4);
        for cycle in [false, true] {
            let mut scheduler = RowScheduler::new(4, 1, cycle, &mut rng);
            let report = scheduler.step(&mut buffer, &engine, &mut rng);
            assert_eq!(report.rows_sorted, 4);
            assert_eq!(report.stats, SortStats::default());
        }
    }
}
