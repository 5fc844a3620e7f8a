//! In-memory ARGB pixel storage.
//!
//! Every engine in this crate mutates a [`PixelBuffer`] in place. Pixels are
//! packed `0xAARRGGBB` words in row-major order.

mod error;
mod pixel_buffer;

pub use error::BufferError;
pub use pixel_buffer::PixelBuffer;
