//! Assertion helpers for tests.

use glitch_engine::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert both buffers have the same dimensions
pub fn assert_same_size(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "buffer dimensions differ"
    );
}

/// Assert every pixel is fully opaque
pub fn assert_opaque(buffer: &PixelBuffer) {
    if let Some((i, p)) = buffer.pixels().iter().enumerate().find(|(_, &p)| p >> 24 != 0xFF) {
        panic!("pixel {i} is not opaque: {p:#010X}");
    }
}

/// Assert `actual` holds the same multiset of colors as `expected`
pub fn assert_same_colors(actual: &PixelBuffer, expected: &PixelBuffer) {
    let mut a = actual.pixels().to_vec();
    let mut e = expected.pixels().to_vec();
    a.sort_unstable();
    e.sort_unstable();
    assert_eq!(a, e, "sorting must only permute pixels");
}

/// Assert the PNG signature
pub fn assert_png_bytes(data: &[u8]) {
    assert!(
        data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG data, got {} bytes starting with {:?}",
        data.len(),
        &data[..8.min(data.len())]
    );
}
