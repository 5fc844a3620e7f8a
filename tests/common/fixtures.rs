//! Test fixtures: synthetic images and temporary PNG files.

use std::path::{Path, PathBuf};

use glitch_engine::PixelBuffer;
use glitchsort::services::encode_png;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Horizontal red ramp with a vertical green ramp; blue is constant.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = x * 255 / width.saturating_sub(1).max(1);
            let g = y * 255 / height.saturating_sub(1).max(1);
            buffer.set(x, y, 0xFF00_0000 | (r << 16) | (g << 8) | 0x40);
        }
    }
    buffer
}

/// Opaque random pixels from a fixed seed.
pub fn noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width * height)
        .map(|_| 0xFF00_0000 | (rng.gen::<u32>() & 0x00FF_FFFF))
        .collect();
    PixelBuffer::from_pixels(width, height, pixels).unwrap()
}

/// Encode `buffer` into `dir/name`.
pub fn write_png(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_png(buffer).unwrap()).unwrap();
    path
}

/// A PNG written to a temporary directory that lives as long as the value.
pub struct TestImage {
    pub dir: TempDir,
    pub path: PathBuf,
    pub buffer: PixelBuffer,
}

impl TestImage {
    pub fn new(buffer: PixelBuffer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "input.png", &buffer);
        Self { dir, path, buffer }
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
