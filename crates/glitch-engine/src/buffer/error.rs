//! Error types for pixel buffer construction.

use thiserror::Error;

/// Error returned when a [`PixelBuffer`](super::PixelBuffer) cannot be built
/// from the supplied dimensions or data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The pixel vector length does not equal `width * height`.
    #[error("pixel data length mismatch: expected {expected} pixels, got {actual}")]
    LengthMismatch {
        /// `width * height`
        expected: usize,
        /// Length of the supplied data
        actual: usize,
    },

    /// `width * height` does not fit in `usize`.
    #[error("buffer dimensions overflow: {width}x{height}")]
    DimensionOverflow {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// RGBA byte data whose length is not four times the pixel count.
    #[error("RGBA byte length mismatch: expected {expected} bytes, got {actual}")]
    ByteLengthMismatch {
        /// `width * height * 4`
        expected: usize,
        /// Length of the supplied bytes
        actual: usize,
    },

    /// Two buffers that must line up pixel for pixel differ in size.
    #[error("buffer size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
}
