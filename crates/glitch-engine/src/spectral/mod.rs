//! Frequency-domain glitches on zigzag-linearized pixel blocks.
//!
//! A block of `edge×edge` pixels is read in zigzag order, one color channel
//! is taken as a signal of `edge²` samples and run through a real FFT. The
//! spectrum is split into logarithmic bands (see [`calculate_bands`]) which
//! are then rescaled, either by explicit per-band gains
//! ([`SpectralBandEngine::equalizer_glitch`]) or by boosting and cutting
//! bins according to where their amplitude falls relative to the spectrum's
//! mean ([`SpectralBandEngine::statistical_glitch`]). The inverse transform
//! is written back into the same channel.
//!
//! # Example
//!
//! ```
//! use glitch_engine::{Channel, PixelBuffer, SpectralBandEngine};
//!
//! let mut buffer = PixelBuffer::filled(16, 16, 0xFF80_4020);
//! let mut engine = SpectralBandEngine::new(8).unwrap();
//! let gains = vec![1.0; engine.band_count()];
//!
//! let report = engine.equalize_image(&mut buffer, &[Channel::Red], &gains).unwrap();
//! assert_eq!(report.blocks, 4);
//! ```

mod bands;
mod channel;
mod engine;
mod error;
mod transform;

pub use bands::{bin_frequency, calculate_bands, BANDS_PER_OCTAVE, OCTAVES, SAMPLE_RATE};
pub use channel::Channel;
pub use engine::{
    gain_from_level, BandAnalysis, BandStats, SpectralBandEngine, SpectralReport,
    StatGlitchParams, StatsAccumulator, MAX_BLOCK_EDGE, MIN_BLOCK_EDGE,
};
pub use error::SpectralError;
pub use transform::{RealFftTransform, SpectralTransform};
