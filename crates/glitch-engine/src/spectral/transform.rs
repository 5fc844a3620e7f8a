//! The forward/inverse real FFT the band engine runs on.

use std::fmt;
use std::sync::Arc;

use realfft::num_complex::Complex32;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use tracing::warn;

use super::bands::bin_frequency;
use super::SpectralError;

/// A real-valued spectral transform over a fixed number of samples.
///
/// [`forward`](Self::forward) loads a spectrum that can then be read and
/// rescaled bin by bin; [`inverse`](Self::inverse) turns the current
/// spectrum back into samples. Bins run from `0` (DC) to
/// `spec_size() - 1` (Nyquist).
pub trait SpectralTransform: Send {
    /// Number of time-domain samples.
    fn size(&self) -> usize;

    /// Number of frequency bins, `size() / 2 + 1`.
    fn spec_size(&self) -> usize {
        self.size() / 2 + 1
    }

    /// Transform `samples` into the internal spectrum.
    fn forward(&mut self, samples: &[f32]) -> Result<(), SpectralError>;

    /// Transform the internal spectrum back into `samples`.
    fn inverse(&mut self, samples: &mut [f32]) -> Result<(), SpectralError>;

    /// Magnitude of bin `index`.
    fn band_amplitude(&self, index: usize) -> f32;

    /// Multiply bin `index` by `factor`. Negative factors are ignored.
    fn scale_band(&mut self, index: usize, factor: f32);

    /// Centre frequency of bin `index` in Hz.
    fn index_to_frequency(&self, index: usize) -> f32;
}

/// [`SpectralTransform`] backed by `realfft`.
pub struct RealFftTransform {
    size: usize,
    sample_rate: f32,
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    work: Vec<Complex32>,
    forward_scratch: Vec<Complex32>,
    inverse_scratch: Vec<Complex32>,
}

impl RealFftTransform {
    /// Plan a transform over `size` samples recorded at `sample_rate`.
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            size,
            sample_rate,
            input: forward.make_input_vec(),
            spectrum: forward.make_output_vec(),
            work: inverse.make_input_vec(),
            forward_scratch: forward.make_scratch_vec(),
            inverse_scratch: inverse.make_scratch_vec(),
            forward,
            inverse,
        }
    }

    fn check_len(&self, actual: usize) -> Result<(), SpectralError> {
        if actual == self.size {
            Ok(())
        } else {
            Err(SpectralError::BlockLength {
                expected: self.size,
                actual,
            })
        }
    }
}

impl fmt::Debug for RealFftTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealFftTransform")
            .field("size", &self.size)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl SpectralTransform for RealFftTransform {
    fn size(&self) -> usize {
        self.size
    }

    fn forward(&mut self, samples: &[f32]) -> Result<(), SpectralError> {
        self.check_len(samples.len())?;
        self.input.copy_from_slice(samples);
        self.forward
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.forward_scratch)
            .map_err(|e| SpectralError::Transform(e.to_string()))
    }

    fn inverse(&mut self, samples: &mut [f32]) -> Result<(), SpectralError> {
        self.check_len(samples.len())?;
        self.work.copy_from_slice(&self.spectrum);
        // A real signal has purely real DC and Nyquist bins.
        if let Some(first) = self.work.first_mut() {
            first.im = 0.0;
        }
        if self.size % 2 == 0 {
            if let Some(last) = self.work.last_mut() {
                last.im = 0.0;
            }
        }
        self.inverse
            .process_with_scratch(&mut self.work, samples, &mut self.inverse_scratch)
            .map_err(|e| SpectralError::Transform(e.to_string()))?;
        let norm = 1.0 / self.size as f32;
        for sample in samples.iter_mut() {
            *sample *= norm;
        }
        Ok(())
    }

    fn band_amplitude(&self, index: usize) -> f32 {
        self.spectrum.get(index).map_or(0.0, |bin| bin.norm())
    }

    fn scale_band(&mut self, index: usize, factor: f32) {
        if factor < 0.0 {
            warn!(index, factor, "Ignoring negative band scale factor");
            return;
        }
        if let Some(bin) = self.spectrum.get_mut(index) {
            *bin *= factor;
        }
    }

    fn index_to_frequency(&self, index: usize) -> f32 {
        bin_frequency(index, self.size, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f32], b: &[f32]) {
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-3, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_forward_inverse_is_identity() {
        let mut fft = RealFftTransform::new(16, 44_100.0);
        let samples: Vec<f32> = (0..16).map(|i| (i * 13 % 256) as f32).collect();
        fft.forward(&samples).unwrap();
        let mut out = vec![0.0; 16];
        fft.inverse(&mut out).unwrap();
        assert_close(&out, &samples);
    }

    #[test]
    fn test_dc_amplitude_is_sample_sum() {
        let mut fft = RealFftTransform::new(8, 44_100.0);
        fft.forward(&[10.0; 8]).unwrap();
        assert!((fft.band_amplitude(0) - 80.0).abs() < 1e-3);
        for bin in 1..fft.spec_size() {
            assert!(fft.band_amplitude(bin).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scaling_dc_scales_constant_signal() {
        let mut fft = RealFftTransform::new(8, 44_100.0);
        fft.forward(&[10.0; 8]).unwrap();
        fft.scale_band(0, 2.0);
        let mut out = vec![0.0; 8];
        fft.inverse(&mut out).unwrap();
        assert_close(&out, &[20.0; 8]);
    }

    #[test]
    fn test_negative_scale_is_ignored() {
        let mut fft = RealFftTransform::new(8, 44_100.0);
        fft.forward(&[10.0; 8]).unwrap();
        fft.scale_band(0, -1.0);
        assert!((fft.band_amplitude(0) - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let mut fft = RealFftTransform::new(8, 44_100.0);
        assert_eq!(
            fft.forward(&[0.0; 4]),
            Err(SpectralError::BlockLength {
                expected: 8,
                actual: 4
            })
        );
    }

    #[test]
    fn test_spec_size() {
        assert_eq!(RealFftTransform::new(64, 44_100.0).spec_size(), 33);
    }
}
