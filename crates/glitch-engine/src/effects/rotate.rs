use crate::buffer::PixelBuffer;

/// Rotate 90° clockwise. The result is `height` wide and `width` tall.
pub fn rotate_right(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let mut rotated = PixelBuffer::new(h, w);
    for y in 0..h {
        for x in 0..w {
            rotated.set(h - 1 - y, x, buffer.get(x, y));
        }
    }
    rotated
}

/// Rotate 90° counter-clockwise.
pub fn rotate_left(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let mut rotated = PixelBuffer::new(h, w);
    for y in 0..h {
        for x in 0..w {
            rotated.set(y, w - 1 - x, buffer.get(x, y));
        }
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        // 1 2 3
        // 4 5 6
        PixelBuffer::from_pixels(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_rotate_right() {
        let rotated = rotate_right(&sample());
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.pixels(), &[4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_rotate_left() {
        let rotated = rotate_left(&sample());
        assert_eq!(rotated.pixels(), &[3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_rotations_cancel() {
        assert_eq!(rotate_left(&rotate_right(&sample())), sample());
    }
}
