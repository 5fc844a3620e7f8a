use std::fmt;
use std::str::FromStr;

use crate::buffer::PixelBuffer;
use crate::color::{compose, rgb_components};
use crate::error::ParseEnumError;
use crate::sort::RgbChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShiftDirection {
    #[default]
    Left,
    Right,
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftDirection::Left => "left",
            ShiftDirection::Right => "right",
        })
    }
}

impl FromStr for ShiftDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(ShiftDirection::Left),
            "right" | "r" => Ok(ShiftDirection::Right),
            _ => Err(ParseEnumError::new("shift direction", s, "left, right")),
        }
    }
}

/// Move one RGB channel of every row one pixel left or right, wrapping at
/// the row ends. The other two channels stay put and alpha becomes 255.
pub fn shift_channel(buffer: &mut PixelBuffer, channel: RgbChannel, direction: ShiftDirection) {
    if buffer.width() == 0 {
        return;
    }
    let c = channel.index();
    for y in 0..buffer.height() {
        let row = buffer.row_mut(y);
        let mut values: Vec<u8> = row.iter().map(|&p| rgb_components(p)[c]).collect();
        match direction {
            ShiftDirection::Left => values.rotate_left(1),
            ShiftDirection::Right => values.rotate_right(1),
        }
        for (pixel, value) in row.iter_mut().zip(values) {
            let mut rgb = rgb_components(*pixel);
            rgb[c] = value;
            *pixel = compose(rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_image_is_untouched() {
        let mut buffer = PixelBuffer::new(0, 4);
        shift_channel(&mut buffer, RgbChannel::Green, ShiftDirection::Right);
        assert_eq!(buffer, PixelBuffer::new(0, 4));
    }

    #[test]
    fn test_shift_red_left_wraps() {
        let mut buffer =
            PixelBuffer::from_pixels(3, 1, vec![0xFF01_0A0A, 0xFF02_0B0B, 0xFF03_0C0C]).unwrap();
        shift_channel(&mut buffer, RgbChannel::Red, ShiftDirection::Left);
        assert_eq!(buffer.pixels(), &[0xFF02_0A0A, 0xFF03_0B0B, 0xFF01_0C0C]);
    }

    #[test]
    fn test_shift_blue_right_per_row() {
        let mut buffer = PixelBuffer::from_pixels(
            2,
            2,
            vec![0x0000_0001, 0x0000_0002, 0x0000_0003, 0x0000_0004],
        )
        .unwrap();
        shift_channel(&mut buffer, RgbChannel::Blue, ShiftDirection::Right);
        assert_eq!(
            buffer.pixels(),
            &[0xFF00_0002, 0xFF00_0001, 0xFF00_0004, 0xFF00_0003]
        );
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("Right".parse::<ShiftDirection>().unwrap(), ShiftDirection::Right);
        assert!("up".parse::<ShiftDirection>().is_err());
    }
}
