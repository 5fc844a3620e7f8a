//! Logarithmic partition of FFT bins into equalizer bands.

use tracing::debug;

use crate::range::Range;

/// Nominal sample rate used to label bins with frequencies.
pub const SAMPLE_RATE: f32 = 44_100.0;

/// Number of octaves below Nyquist that receive their own bands.
pub const OCTAVES: usize = 11;

/// Bands per octave.
pub const BANDS_PER_OCTAVE: usize = 3;

/// Frequency in Hz of bin `index` of a `transform_size`-sample transform.
///
/// The first and last bins report the centre of their half-width slot
/// rather than their nominal frequency.
pub fn bin_frequency(index: usize, transform_size: usize, sample_rate: f32) -> f32 {
    let spec_size = transform_size / 2 + 1;
    let width = sample_rate / transform_size as f32;
    if index == 0 {
        width * 0.25
    } else if index + 1 == spec_size {
        sample_rate / 2.0 - width / 2.0 + width * 0.25
    } else {
        index as f32 * width
    }
}

/// Upper edges of the equalizer bands, low to high, ending at Nyquist.
fn band_edges(sample_rate: f32) -> Vec<f32> {
    let mut edges = Vec::with_capacity(OCTAVES * BANDS_PER_OCTAVE);
    let mut high = sample_rate / 2.0;
    for _ in 0..OCTAVES {
        let low = high * 0.5;
        let step = (high - low) / BANDS_PER_OCTAVE as f32;
        for j in (1..=BANDS_PER_OCTAVE).rev() {
            edges.push(low + j as f32 * step);
        }
        high = low;
    }
    edges.reverse();
    edges
}

/// Partition the bins of a `transform_size`-sample transform into bands.
///
/// Each band ends at the first bin whose frequency reaches the band's upper
/// edge. Bands that would hold no bins of their own are dropped, so small
/// transforms yield fewer bands. The bands are contiguous, start at bin 0
/// and the last one always ends at the Nyquist bin.
///
/// # Example
///
/// ```
/// use glitch_engine::calculate_bands;
///
/// let bands = calculate_bands(64);
/// assert_eq!(bands.first().unwrap().lower, 0);
/// assert_eq!(bands.last().unwrap().upper, 32);
/// ```
pub fn calculate_bands(transform_size: usize) -> Vec<Range> {
    let spec_size = transform_size / 2 + 1;
    let last = spec_size - 1;
    if transform_size < 2 {
        return vec![Range::new(0, last as i64)];
    }

    let mut bands: Vec<Range> = Vec::new();
    let mut lower = 0usize;
    for edge in band_edges(SAMPLE_RATE) {
        if lower > last {
            break;
        }
        let upper = (0..spec_size)
            .find(|&k| bin_frequency(k, transform_size, SAMPLE_RATE) >= edge)
            .unwrap_or(last);
        if upper < lower {
            continue;
        }
        bands.push(Range::new(lower as i64, upper as i64));
        lower = upper + 1;
    }
    if let Some(band) = bands.last_mut() {
        band.upper = last as i64;
    }

    debug!(transform_size, bands = bands.len(), "Calculated frequency bands");
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(transform_size: usize) {
        let bands = calculate_bands(transform_size);
        let last = (transform_size / 2) as i64;
        assert!(!bands.is_empty());
        assert_eq!(bands[0].lower, 0, "size {transform_size}");
        for pair in bands.windows(2) {
            assert_eq!(pair[0].upper + 1, pair[1].lower, "size {transform_size}");
        }
        for band in &bands {
            assert!(band.lower <= band.upper, "size {transform_size}: {band}");
        }
        assert_eq!(bands.last().unwrap().upper, last, "size {transform_size}");
    }

    #[test]
    fn test_bands_cover_spectrum() {
        for size in [4, 16, 64, 256, 1024, 4096, 16384] {
            assert_partition(size);
        }
    }

    #[test]
    fn test_band_count_grows_with_size() {
        let small = calculate_bands(64).len();
        let large = calculate_bands(4096).len();
        assert!(small < large);
        assert!(large <= OCTAVES * BANDS_PER_OCTAVE);
    }

    #[test]
    fn test_band_edges_end_at_nyquist() {
        let edges = band_edges(SAMPLE_RATE);
        assert_eq!(edges.len(), 33);
        assert_eq!(*edges.last().unwrap(), 22_050.0);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bin_frequency() {
        assert_eq!(bin_frequency(0, 64, 44_100.0), 689.0625 * 0.25);
        assert_eq!(bin_frequency(3, 64, 44_100.0), 3.0 * 689.0625);
        let nyquist_bin = bin_frequency(32, 64, 44_100.0);
        assert!(nyquist_bin < 22_050.0 && nyquist_bin > 21_000.0);
    }
}
