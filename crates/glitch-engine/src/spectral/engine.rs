//! Per-block and image-wide spectral glitches.

use tracing::{debug, trace, warn};

use super::bands::{calculate_bands, SAMPLE_RATE};
use super::transform::{RealFftTransform, SpectralTransform};
use super::{Channel, SpectralError};
use crate::buffer::PixelBuffer;
use crate::range::Range;
use crate::zigzag::{centered_grid, ZigzagScanner};

/// Smallest accepted block edge.
pub const MIN_BLOCK_EDGE: u32 = 2;

/// Largest accepted block edge.
pub const MAX_BLOCK_EDGE: u32 = 1024;

/// Tunables for [`SpectralBandEngine::statistical_glitch`].
///
/// The amplitude window is `mean + std_dev * bound` for each bound, so a
/// negative bound lies below the mean. Bins inside the window are scaled by
/// `boost`, bins outside by `cut`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatGlitchParams {
    /// Default: `-0.25`
    pub left_bound: f32,
    /// Default: `5.0`
    pub right_bound: f32,
    /// Default: `2.0`
    pub boost: f32,
    /// Default: `0.5`
    pub cut: f32,
    /// Leave the DC bin out of the statistics and untouched. Default: `true`
    pub low_frequency_cut: bool,
}

impl Default for StatGlitchParams {
    fn default() -> Self {
        Self {
            left_bound: -0.25,
            right_bound: 5.0,
            boost: 2.0,
            cut: 0.5,
            low_frequency_cut: true,
        }
    }
}

impl StatGlitchParams {
    /// Amplitude window `(left, right)` for the given statistics.
    pub fn edges(&self, stats: &BandStats) -> (f32, f32) {
        (
            stats.mean + stats.std_dev * self.left_bound,
            stats.mean + stats.std_dev * self.right_bound,
        )
    }
}

/// Summary statistics of bin amplitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
    /// Pearson's second skewness coefficient, `3 * (mean - median) / std_dev`.
    pub skew: f32,
}

impl BandStats {
    /// Statistics of `values`.
    ///
    /// An empty slice yields all zeros. A zero standard deviation yields zero
    /// skew.
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let (sum, square_sum) = values.iter().fold((0.0f64, 0.0f64), |(s, q), &v| {
            let v = f64::from(v);
            (s + v, q + v * v)
        });
        let mean = sum / n;
        let variance = (square_sum / n - mean * mean).max(0.0);
        let std_dev = variance.sqrt();

        let mut sorted = values.to_vec();
        sorted.sort_by(f32::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let skew = if std_dev > f64::EPSILON {
            3.0 * (mean - f64::from(median)) / std_dev
        } else {
            0.0
        };

        Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: mean as f32,
            median,
            std_dev: std_dev as f32,
            skew: skew as f32,
        }
    }
}

/// Running average of [`BandStats`] over many blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsAccumulator {
    count: usize,
    sum: BandStats,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stats: &BandStats) {
        self.count += 1;
        self.sum.min += stats.min;
        self.sum.max += stats.max;
        self.sum.mean += stats.mean;
        self.sum.median += stats.median;
        self.sum.std_dev += stats.std_dev;
        self.sum.skew += stats.skew;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Field-wise mean of everything pushed so far, zeros if nothing was.
    pub fn mean(&self) -> BandStats {
        if self.count == 0 {
            return BandStats::default();
        }
        let n = self.count as f32;
        BandStats {
            min: self.sum.min / n,
            max: self.sum.max / n,
            mean: self.sum.mean / n,
            median: self.sum.median / n,
            std_dev: self.sum.std_dev / n,
            skew: self.sum.skew / n,
        }
    }
}

/// Result of an image-wide spectral pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralReport {
    pub edge: u32,
    pub blocks: usize,
    /// Channel passes per block.
    pub channels: usize,
    /// Averaged statistics, only filled by statistical passes.
    pub stats: Option<BandStats>,
}

/// Average spectrum of an image's brightness, per band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandAnalysis {
    pub edge: u32,
    pub blocks: usize,
    pub bands: Vec<Range>,
    /// Mean bin amplitude of each band, averaged over all blocks.
    pub band_means: Vec<f32>,
    /// Smallest bin amplitude seen in any block.
    pub min: f32,
    /// Largest bin amplitude seen in any block.
    pub max: f32,
}

/// Map an equalizer slider level in `[-1, 1]` to a band gain.
///
/// Negative levels attenuate linearly down to silence at `-1`; positive
/// levels amplify up to `1 + eq_scale` at `1`.
///
/// # Example
///
/// ```
/// use glitch_engine::gain_from_level;
///
/// assert_eq!(gain_from_level(-0.5, 4.0), 0.5);
/// assert_eq!(gain_from_level(0.5, 4.0), 3.0);
/// ```
pub fn gain_from_level(level: f32, eq_scale: f32) -> f32 {
    let level = level.clamp(-1.0, 1.0);
    if level < 0.0 {
        level + 1.0
    } else {
        level * eq_scale + 1.0
    }
}

/// Runs blocks of pixels through a spectral transform and rescales their
/// frequency bands.
///
/// Blocks are `edge×edge` pixels linearized in zigzag order, so the
/// transform has `edge²` samples. The band table is computed once per engine;
/// build a new engine to change the block size.
pub struct SpectralBandEngine {
    edge: u32,
    transform: Box<dyn SpectralTransform>,
    bands: Vec<Range>,
    scanner: ZigzagScanner,
    samples: Vec<f32>,
}

impl std::fmt::Debug for SpectralBandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralBandEngine")
            .field("edge", &self.edge)
            .field("bands", &self.bands.len())
            .finish_non_exhaustive()
    }
}

impl SpectralBandEngine {
    /// Engine for `edge×edge` blocks on a `realfft` transform.
    ///
    /// `edge` must be a power of two in `[2, 1024]`.
    pub fn new(edge: u32) -> Result<Self, SpectralError> {
        validate_edge(edge)?;
        let size = (edge * edge) as usize;
        Self::with_transform(edge, Box::new(RealFftTransform::new(size, SAMPLE_RATE)))
    }

    /// Engine running on a caller-supplied transform of `edge²` samples.
    pub fn with_transform(
        edge: u32,
        transform: Box<dyn SpectralTransform>,
    ) -> Result<Self, SpectralError> {
        validate_edge(edge)?;
        let size = (edge * edge) as usize;
        if transform.size() != size {
            return Err(SpectralError::BlockLength {
                expected: size,
                actual: transform.size(),
            });
        }
        let bands = calculate_bands(size);
        Ok(Self {
            edge,
            transform,
            bands,
            scanner: ZigzagScanner::new(edge),
            samples: vec![0.0; size],
        })
    }

    pub fn edge(&self) -> u32 {
        self.edge
    }

    /// Samples per block, `edge²`.
    pub fn transform_size(&self) -> usize {
        self.transform.size()
    }

    pub fn spec_size(&self) -> usize {
        self.transform.spec_size()
    }

    pub fn bands(&self) -> &[Range] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Frequency in Hz at the middle of `band`.
    pub fn band_center_frequency(&self, band: &Range) -> f32 {
        let lower = self.transform.index_to_frequency(band.lower as usize);
        let upper = self.transform.index_to_frequency(band.upper as usize);
        (lower + upper) * 0.5
    }

    /// Scale every bin of band `i` by `gains[i]`.
    ///
    /// Bands without a gain are left alone; extra gains are ignored.
    pub fn equalizer_glitch(
        &mut self,
        block: &mut [u32],
        channel: Channel,
        gains: &[f32],
    ) -> Result<(), SpectralError> {
        self.load(block, channel)?;
        for (band, &gain) in self.bands.iter().zip(gains) {
            for bin in band.indices() {
                self.transform.scale_band(bin, gain);
            }
        }
        self.store(block, channel)
    }

    /// Boost bins whose amplitude lies inside the statistical window and cut
    /// the rest. Returns the statistics the window was derived from.
    pub fn statistical_glitch(
        &mut self,
        block: &mut [u32],
        channel: Channel,
        params: &StatGlitchParams,
    ) -> Result<BandStats, SpectralError> {
        self.load(block, channel)?;
        let low = usize::from(params.low_frequency_cut);
        let spec_size = self.transform.spec_size();
        let amplitudes: Vec<f32> = (low..spec_size)
            .map(|bin| self.transform.band_amplitude(bin))
            .collect();
        let stats = BandStats::from_values(&amplitudes);
        let (left, right) = params.edges(&stats);
        for (bin, &amplitude) in (low..spec_size).zip(&amplitudes) {
            let factor = if amplitude < left || amplitude > right {
                params.cut
            } else {
                params.boost
            };
            self.transform.scale_band(bin, factor);
        }
        self.store(block, channel)?;
        Ok(stats)
    }

    /// Run [`equalizer_glitch`](Self::equalizer_glitch) over every block of
    /// the centred block grid, once per selected channel.
    pub fn equalize_image(
        &mut self,
        buffer: &mut PixelBuffer,
        channels: &[Channel],
        gains: &[f32],
    ) -> Result<SpectralReport, SpectralError> {
        if gains.len() != self.bands.len() {
            warn!(
                gains = gains.len(),
                bands = self.bands.len(),
                "Equalizer gain count does not match band count"
            );
        }
        let channels = ordered(channels);
        let mut report = self.report(channels.len());
        for (x, y) in self.block_origins(buffer) {
            let mut block = self.scanner.pluck(buffer, x, y);
            for &channel in &channels {
                self.equalizer_glitch(&mut block, channel, gains)?;
            }
            self.scanner.plant(buffer, &block, x, y);
            trace!(x, y, "Equalized block");
            report.blocks += 1;
        }
        debug!(edge = self.edge, blocks = report.blocks, "Equalizer pass complete");
        Ok(report)
    }

    /// Run [`statistical_glitch`](Self::statistical_glitch) over every block
    /// of the centred block grid, once per selected channel, and average the
    /// statistics.
    pub fn statistical_image(
        &mut self,
        buffer: &mut PixelBuffer,
        channels: &[Channel],
        params: &StatGlitchParams,
    ) -> Result<SpectralReport, SpectralError> {
        let channels = ordered(channels);
        let mut report = self.report(channels.len());
        let mut accumulator = StatsAccumulator::new();
        for (x, y) in self.block_origins(buffer) {
            let mut block = self.scanner.pluck(buffer, x, y);
            for &channel in &channels {
                let stats = self.statistical_glitch(&mut block, channel, params)?;
                accumulator.push(&stats);
            }
            self.scanner.plant(buffer, &block, x, y);
            report.blocks += 1;
        }
        let stats = accumulator.mean();
        debug!(
            edge = self.edge,
            blocks = report.blocks,
            mean = stats.mean,
            std_dev = stats.std_dev,
            "Statistical pass complete"
        );
        report.stats = Some(stats);
        Ok(report)
    }

    /// Measure the brightness spectrum of every block without changing the
    /// image.
    pub fn analyze_bands(&mut self, buffer: &PixelBuffer) -> Result<BandAnalysis, SpectralError> {
        let mut totals = vec![0.0f64; self.bands.len()];
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut blocks = 0usize;
        for (x, y) in self.block_origins(buffer) {
            let block = self.scanner.pluck(buffer, x, y);
            self.load(&block, Channel::Lightness)?;
            for (total, band) in totals.iter_mut().zip(&self.bands) {
                let mut sum = 0.0f64;
                for bin in band.indices() {
                    let amplitude = self.transform.band_amplitude(bin);
                    min = min.min(amplitude);
                    max = max.max(amplitude);
                    sum += f64::from(amplitude);
                }
                *total += sum / band.len() as f64;
            }
            blocks += 1;
        }
        let band_means = totals
            .iter()
            .map(|&t| if blocks == 0 { 0.0 } else { (t / blocks as f64) as f32 })
            .collect();
        if blocks == 0 {
            min = 0.0;
            max = 0.0;
        }
        debug!(edge = self.edge, blocks, min, max, "Band analysis complete");
        Ok(BandAnalysis {
            edge: self.edge,
            blocks,
            bands: self.bands.clone(),
            band_means,
            min,
            max,
        })
    }

    fn load(&mut self, block: &[u32], channel: Channel) -> Result<(), SpectralError> {
        let values = channel.extract(block);
        self.transform.forward(&values)
    }

    fn store(&mut self, block: &mut [u32], channel: Channel) -> Result<(), SpectralError> {
        if block.len() != self.samples.len() {
            return Err(SpectralError::BlockLength {
                expected: self.samples.len(),
                actual: block.len(),
            });
        }
        self.transform.inverse(&mut self.samples)?;
        channel.inject(block, &self.samples);
        Ok(())
    }

    fn report(&self, channels: usize) -> SpectralReport {
        SpectralReport {
            edge: self.edge,
            channels,
            ..Default::default()
        }
    }

    fn block_origins(&self, buffer: &PixelBuffer) -> Vec<(u32, u32)> {
        let edge = self.edge;
        let ((columns, rows), (ox, oy)) = centered_grid(buffer.width(), buffer.height(), edge);
        if columns == 0 || rows == 0 {
            debug!(edge, "FFT block larger than image, nothing to process");
        }
        (0..rows)
            .flat_map(|by| (0..columns).map(move |bx| (bx * edge + ox, by * edge + oy)))
            .collect()
    }
}

fn validate_edge(edge: u32) -> Result<(), SpectralError> {
    if edge.is_power_of_two() && (MIN_BLOCK_EDGE..=MAX_BLOCK_EDGE).contains(&edge) {
        Ok(())
    } else {
        Err(SpectralError::UnsupportedBlockSize(edge))
    }
}

/// Selected channels in processing order, without duplicates.
fn ordered(channels: &[Channel]) -> Vec<Channel> {
    Channel::ALL
        .into_iter()
        .filter(|c| channels.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| {
                let v = (i * 7 % 256) as u8;
                crate::color::compose([v, v / 2, 255 - v])
            })
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn test_rejects_bad_edges() {
        for edge in [0, 1, 3, 12, 2048] {
            assert_eq!(
                SpectralBandEngine::new(edge).unwrap_err(),
                SpectralError::UnsupportedBlockSize(edge)
            );
        }
        assert!(SpectralBandEngine::new(8).is_ok());
    }

    #[test]
    fn test_transform_size_must_match_edge() {
        let transform = Box::new(RealFftTransform::new(32, SAMPLE_RATE));
        assert_eq!(
            SpectralBandEngine::with_transform(8, transform).unwrap_err(),
            SpectralError::BlockLength {
                expected: 64,
                actual: 32
            }
        );
    }

    #[test]
    fn test_unity_gain_leaves_block_unchanged() {
        let mut engine = SpectralBandEngine::new(8).unwrap();
        let original: Vec<u32> = gradient(8, 8).into_pixels();
        let gains = vec![1.0; engine.band_count()];
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            let mut block = original.clone();
            engine.equalizer_glitch(&mut block, channel, &gains).unwrap();
            assert_eq!(block, original);
        }
    }

    #[test]
    fn test_zero_gain_silences_channel() {
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let mut block = vec![0xFF80_4020; 16];
        let gains = vec![0.0; engine.band_count()];
        engine
            .equalizer_glitch(&mut block, Channel::Red, &gains)
            .unwrap();
        assert!(block.iter().all(|&p| p == 0xFF00_4020));
    }

    #[test]
    fn test_wrong_block_length_is_an_error() {
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let mut block = vec![0u32; 15];
        assert_eq!(
            engine.equalizer_glitch(&mut block, Channel::Red, &[]),
            Err(SpectralError::BlockLength {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_statistical_glitch_keeps_dc_with_low_cut() {
        // A flat block has all its energy in DC. With the DC bin excluded
        // every scaled bin is zero, so the block keeps its value.
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let mut block = vec![0xFF40_4040; 16];
        let stats = engine
            .statistical_glitch(&mut block, Channel::Red, &StatGlitchParams::default())
            .unwrap();
        assert!(stats.max < 1e-3);
        assert!(block.iter().all(|&p| p == 0xFF40_4040));
    }

    #[test]
    fn test_statistical_glitch_boosts_dc_without_low_cut() {
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let mut block = vec![0xFF40_4040; 16];
        let params = StatGlitchParams {
            low_frequency_cut: false,
            ..Default::default()
        };
        engine
            .statistical_glitch(&mut block, Channel::Red, &params)
            .unwrap();
        // DC lies inside the window and is boosted, the empty bins are cut.
        assert!(block.iter().all(|&p| p == 0xFF80_4040));
    }

    #[test]
    fn test_band_stats() {
        let stats = BandStats::from_values(&[1.0, 2.0, 3.0, 10.0]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.median, 2.5);
        assert!((stats.std_dev - 3.5355).abs() < 1e-3);
        assert!((stats.skew - 3.0 * 1.5 / 3.5355).abs() < 1e-3);
    }

    #[test]
    fn test_band_stats_degenerate() {
        assert_eq!(BandStats::from_values(&[]), BandStats::default());
        let single = BandStats::from_values(&[7.0]);
        assert_eq!(single.median, 7.0);
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.skew, 0.0);
        assert!(!single.skew.is_nan());
    }

    #[test]
    fn test_stats_accumulator_averages() {
        let mut acc = StatsAccumulator::new();
        assert_eq!(acc.mean(), BandStats::default());
        acc.push(&BandStats { mean: 2.0, max: 4.0, ..Default::default() });
        acc.push(&BandStats { mean: 4.0, max: 8.0, ..Default::default() });
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean().mean, 3.0);
        assert_eq!(acc.mean().max, 6.0);
    }

    #[test]
    fn test_stat_edges_sign_convention() {
        let params = StatGlitchParams {
            left_bound: -0.5,
            right_bound: 2.0,
            ..Default::default()
        };
        let stats = BandStats { mean: 10.0, std_dev: 4.0, ..Default::default() };
        assert_eq!(params.edges(&stats), (8.0, 18.0));
    }

    #[test]
    fn test_gain_from_level() {
        assert_eq!(gain_from_level(-1.0, 2.0), 0.0);
        assert_eq!(gain_from_level(0.0, 2.0), 1.0);
        assert_eq!(gain_from_level(1.0, 2.0), 3.0);
        assert_eq!(gain_from_level(5.0, 2.0), 3.0);
    }

    #[test]
    fn test_equalize_image_counts_blocks() {
        let mut engine = SpectralBandEngine::new(8).unwrap();
        let mut buffer = gradient(20, 17);
        let original = buffer.clone();
        let gains = vec![1.0; engine.band_count()];
        let report = engine
            .equalize_image(&mut buffer, &[Channel::Blue, Channel::Red, Channel::Red], &gains)
            .unwrap();
        assert_eq!(report.blocks, 4);
        assert_eq!(report.channels, 2);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_statistical_image_reports_average() {
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let mut buffer = gradient(8, 8);
        let report = engine
            .statistical_image(&mut buffer, &[Channel::Lightness], &StatGlitchParams::default())
            .unwrap();
        assert_eq!(report.blocks, 4);
        let stats = report.stats.unwrap();
        assert!(stats.max >= stats.mean && stats.mean >= stats.min);
    }

    #[test]
    fn test_analyze_flat_image() {
        let mut engine = SpectralBandEngine::new(4).unwrap();
        let buffer = PixelBuffer::filled(8, 4, 0xFF10_1010);
        let analysis = engine.analyze_bands(&buffer).unwrap();
        assert_eq!(analysis.blocks, 2);
        assert_eq!(analysis.band_means.len(), analysis.bands.len());
        assert!((analysis.max - 256.0).abs() < 1e-3);
        assert!(analysis.min.abs() < 1e-3);
    }

    #[test]
    fn test_analyze_image_smaller_than_block() {
        let mut engine = SpectralBandEngine::new(16).unwrap();
        let buffer = PixelBuffer::filled(8, 8, 0xFF10_1010);
        let analysis = engine.analyze_bands(&buffer).unwrap();
        assert_eq!(analysis.blocks, 0);
        assert_eq!(analysis.min, 0.0);
        assert!(analysis.band_means.iter().all(|&m| m == 0.0));
    }
}
