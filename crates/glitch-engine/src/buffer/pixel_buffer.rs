//! Row-major ARGB pixel buffer.

use super::BufferError;

/// Opaque black, the fill color of a fresh buffer.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// A flat row-major array of packed `0xAARRGGBB` colors.
///
/// The length invariant `pixels.len() == width * height` is established at
/// construction and never broken: the pixel vector can be mutated through
/// [`pixels_mut`](Self::pixels_mut) but not resized.
///
/// # Example
///
/// ```
/// use glitch_engine::PixelBuffer;
///
/// let mut buffer = PixelBuffer::new(4, 2);
/// buffer.set(3, 1, 0xFF11_2233);
/// assert_eq!(buffer.get(3, 1), 0xFF11_2233);
/// assert_eq!(buffer.pixels()[7], 0xFF11_2233);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Create a buffer filled with opaque black.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, OPAQUE_BLACK)
    }

    /// Create a buffer with every pixel set to `color`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        let len = pixel_count(width, height).expect("buffer dimensions overflow usize");
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// Wrap existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LengthMismatch`] if `pixels.len()` is not
    /// `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, BufferError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from interleaved 8-bit RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, BufferError> {
        let count = pixel_count(width, height)?;
        let expected = count
            .checked_mul(4)
            .ok_or(BufferError::DimensionOverflow { width, height })?;
        if bytes.len() != expected {
            return Err(BufferError::ByteLengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                (u32::from(px[3]) << 24)
                    | (u32::from(px[0]) << 16)
                    | (u32::from(px[1]) << 8)
                    | u32::from(px[2])
            })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Interleaved 8-bit RGBA bytes, four per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &argb in &self.pixels {
            bytes.push((argb >> 16) as u8);
            bytes.push((argb >> 8) as u8);
            bytes.push(argb as u8);
            bytes.push((argb >> 24) as u8);
        }
        bytes
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Flat index of `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the buffer.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Read the pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index_of(x, y)]
    }

    /// Write the pixel at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, argb: u32) {
        let idx = self.index_of(x, y);
        self.pixels[idx] = argb;
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable access to the pixel data. The slice cannot change length.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Flat index range of row `y`. Empty for a zero-width buffer.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not a row of the buffer.
    pub fn row_bounds(&self, y: u32) -> std::ops::Range<usize> {
        assert!(y < self.height, "row {y} outside {}x{} buffer", self.width, self.height);
        let first = y as usize * self.width as usize;
        first..first + self.width as usize
    }

    pub fn row(&self, y: u32) -> &[u32] {
        &self.pixels[self.row_bounds(y)]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let bounds = self.row_bounds(y);
        &mut self.pixels[bounds]
    }

    /// `true` if a square block of `edge` pixels at `(x, y)` fits inside.
    pub fn contains_block(&self, x: u32, y: u32, edge: u32) -> bool {
        u64::from(x) + u64::from(edge) <= u64::from(self.width)
            && u64::from(y) + u64::from(edge) <= u64::from(self.height)
    }

    /// `true` if both buffers have the same width and height.
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, BufferError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(BufferError::DimensionOverflow { width, height })
}
