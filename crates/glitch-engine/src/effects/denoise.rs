use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::mean_color;

/// 3×3 median filter.
///
/// Interior pixels take the median of their nine neighbours. Edge pixels
/// average the two middle values of their six neighbours and corners the two
/// middle values of their four. Neighbourhoods are ordered by packed value,
/// so with uniform alpha the ordering is by red, then green, then blue.
/// Images narrower or shorter than two pixels are left alone.
pub fn denoise(buffer: &mut PixelBuffer) {
    let (w, h) = (buffer.width(), buffer.height());
    if w < 2 || h < 2 {
        debug!(width = w, height = h, "Image too small to denoise");
        return;
    }
    let source = buffer.clone();
    let mut window: Vec<u32> = Vec::with_capacity(9);
    for y in 0..h {
        for x in 0..w {
            window.clear();
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    window.push(source.get(nx, ny));
                }
            }
            window.sort_unstable();
            let mid = window.len() / 2;
            let value = if window.len() % 2 == 1 {
                window[mid]
            } else {
                mean_color(window[mid - 1], window[mid])
            };
            buffer.set(x, y, value);
        }
    }
    debug!(width = w, height = h, "Denoised image");
}
