//! Reading and writing one color channel of a pixel block as samples.

use std::fmt;
use std::str::FromStr;

use crate::color::{compose, hsb_to_rgb, rgb_components, rgb_to_hsb, Hsb};
use crate::error::ParseEnumError;

/// A color component that can be run through the spectral transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Lightness,
}

impl Channel {
    /// Processing order for multi-channel passes.
    pub const ALL: [Channel; 6] = [
        Channel::Lightness,
        Channel::Hue,
        Channel::Saturation,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
    ];

    /// Read this channel from every pixel of `block`, on a `0.0..=255.0` scale.
    pub fn extract(self, block: &[u32]) -> Vec<f32> {
        block.iter().map(|&argb| self.component(argb)).collect()
    }

    /// Write `values` back into this channel of `block`.
    ///
    /// Each value is rounded and clamped to `0..=255`. The other two
    /// components are taken from the pixel already in the block, and alpha
    /// is forced to 255.
    ///
    /// # Panics
    ///
    /// Panics if `values` and `block` differ in length.
    pub fn inject(self, block: &mut [u32], values: &[f32]) {
        assert_eq!(
            block.len(),
            values.len(),
            "channel samples do not match block: expected {}",
            block.len()
        );
        for (argb, &value) in block.iter_mut().zip(values) {
            let v = value.round().clamp(0.0, 255.0);
            let rgb = rgb_components(*argb);
            let out = match self {
                Channel::Red => [v as u8, rgb[1], rgb[2]],
                Channel::Green => [rgb[0], v as u8, rgb[2]],
                Channel::Blue => [rgb[0], rgb[1], v as u8],
                Channel::Hue | Channel::Saturation | Channel::Lightness => {
                    let [h, s, b] = rgb_to_hsb(rgb).quantized().map(f32::from);
                    let hsb = match self {
                        Channel::Hue => Hsb { hue: v, saturation: s, brightness: b },
                        Channel::Saturation => Hsb { hue: h, saturation: v, brightness: b },
                        _ => Hsb { hue: h, saturation: s, brightness: v },
                    };
                    hsb_to_rgb(hsb)
                }
            };
            *argb = compose(out);
        }
    }

    fn component(self, argb: u32) -> f32 {
        let rgb = rgb_components(argb);
        match self {
            Channel::Red => f32::from(rgb[0]),
            Channel::Green => f32::from(rgb[1]),
            Channel::Blue => f32::from(rgb[2]),
            Channel::Hue => rgb_to_hsb(rgb).hue,
            Channel::Saturation => rgb_to_hsb(rgb).saturation,
            Channel::Lightness => rgb_to_hsb(rgb).brightness,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Lightness => "brightness",
        })
    }
}

impl FromStr for Channel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::Red),
            "g" | "green" => Ok(Channel::Green),
            "b" | "blue" => Ok(Channel::Blue),
            "h" | "hue" => Ok(Channel::Hue),
            "s" | "saturation" => Ok(Channel::Saturation),
            "l" | "brightness" | "lightness" => Ok(Channel::Lightness),
            _ => Err(ParseEnumError::new(
                "channel",
                s,
                "red, green, blue, hue, saturation, brightness",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rgb() {
        let block = [0xFF10_2030, 0xFFFF_0080];
        assert_eq!(Channel::Red.extract(&block), vec![16.0, 255.0]);
        assert_eq!(Channel::Green.extract(&block), vec![32.0, 0.0]);
        assert_eq!(Channel::Blue.extract(&block), vec![48.0, 128.0]);
    }

    #[test]
    fn test_extract_lightness_is_max_channel() {
        let block = [0xFF10_2030, 0xFF00_0000];
        assert_eq!(Channel::Lightness.extract(&block), vec![48.0, 0.0]);
    }

    #[test]
    fn test_inject_rounds_and_clamps() {
        let mut block = [0x0010_2030; 3];
        Channel::Green.inject(&mut block, &[-12.0, 99.6, 400.0]);
        assert_eq!(block, [0xFF10_0030, 0xFF10_6430, 0xFF10_FF30]);
    }

    #[test]
    fn test_inject_keeps_other_channels() {
        let mut block = [0xFF33_6699];
        Channel::Red.inject(&mut block, &[0.0]);
        assert_eq!(block, [0xFF00_6699]);
    }

    #[test]
    fn test_extract_then_inject_hsb_is_stable_on_gray() {
        let original = [0xFF80_8080, 0xFF00_0000, 0xFFFF_FFFF];
        for channel in [Channel::Hue, Channel::Saturation, Channel::Lightness] {
            let mut block = original;
            let values = channel.extract(&block);
            channel.inject(&mut block, &values);
            assert_eq!(block, original, "{channel}");
        }
    }

    #[test]
    fn test_inject_lightness_on_black_gives_gray() {
        let mut block = [0xFF00_0000];
        Channel::Lightness.inject(&mut block, &[128.0]);
        assert_eq!(block, [0xFF80_8080]);
    }

    #[test]
    #[should_panic(expected = "expected 2")]
    fn test_inject_length_mismatch_panics() {
        let mut block = [0u32; 2];
        Channel::Red.inject(&mut block, &[1.0]);
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!("L".parse::<Channel>().unwrap(), Channel::Lightness);
        assert_eq!("hue".parse::<Channel>().unwrap(), Channel::Hue);
        assert_eq!(
            Channel::Lightness.to_string().parse::<Channel>().unwrap(),
            Channel::Lightness
        );
        assert!("alpha".parse::<Channel>().is_err());
    }
}
