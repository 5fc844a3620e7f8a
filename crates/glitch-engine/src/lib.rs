//! glitch-engine: pixel sorting and spectral glitching for raster images
//!
//! This library holds the image-processing engines behind `glitchsort`. Every
//! engine works in place on a [`PixelBuffer`] of packed ARGB pixels, is
//! synchronous, and takes its randomness from an explicitly passed
//! [`rand::RngCore`] so that seeded runs are reproducible.
//!
//! # Quick Start
//!
//! ```
//! use glitch_engine::{PixelBuffer, RowScheduler, SortConfig, SortEngine};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut buffer = PixelBuffer::from_pixels(4, 2, vec![4, 3, 2, 1, 8, 7, 6, 5]).unwrap();
//!
//! let engine = SortEngine::new(SortConfig::unbroken());
//! let mut rows = RowScheduler::new(buffer.height(), 1, false, &mut rng);
//! rows.step(&mut buffer, &engine, &mut rng);
//!
//! assert_eq!(buffer.pixels(), &[1, 2, 3, 4, 5, 6, 7, 8]);
//! ```
//!
//! # Engines
//!
//! - [`SortEngine`]: quick, shell, bubble and insertion sort over a pixel
//!   range, keyed by one of twelve RGB or HSB component orders, with
//!   optional channel swapping and random early termination ("glitch
//!   breaks"). [`RowScheduler`] spreads row sorts over several steps.
//! - [`ZigzagScanner`] / [`ZigzagSorter`]: linearize square blocks in JPEG
//!   zigzag order and sort along that path.
//! - [`SpectralBandEngine`]: FFT a color channel of each zigzag block and
//!   rescale logarithmic frequency bands, by explicit gains or by amplitude
//!   statistics.
//! - [`OctreeQuantizer`]: reduce an image to at most 255 colors.
//! - [`effects`]: munge, channel shift, denoise and rotation.
//!
//! # Errors
//!
//! Out-of-range tuning values are clamped with a `tracing` warning.
//! Contract breaches, such as plucking a block outside the buffer, panic.
//! Everything else is reported through the per-module error enums wrapped
//! by [`GlitchError`].

pub mod buffer;
pub mod color;
pub mod effects;
mod error;
pub mod quantize;
pub mod range;
pub mod sort;
pub mod spectral;
pub mod zigzag;


pub use buffer::{BufferError, PixelBuffer};
pub use error::{GlitchError, ParseEnumError};
pub use quantize::{OctreeQuantizer, Quantized};
pub use range::{Range, RangeManager};
pub use sort::{
    ComponentOrder, RgbChannel, RowScheduler, RowStepReport, ShellParams, SortAlgorithm,
    SortConfig, SortEngine, SortStats, SwapRule,
};
pub use spectral::{
    calculate_bands, gain_from_level, BandAnalysis, BandStats, Channel, SpectralBandEngine,
    SpectralError, SpectralReport, StatGlitchParams,
};
pub use zigzag::{ZigzagOptions, ZigzagReport, ZigzagScanner, ZigzagSorter, ZigzagStyle};
