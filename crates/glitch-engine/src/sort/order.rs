//! Comparison key orders and channel swap rules.

use std::fmt;
use std::str::FromStr;

use crate::color::{rgb_components, rgb_to_hsb};
use crate::error::ParseEnumError;

/// One of the three RGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RgbChannel {
    Red,
    Green,
    Blue,
}

impl RgbChannel {
    /// Position of the channel in an `[r, g, b]` triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            RgbChannel::Red => 0,
            RgbChannel::Green => 1,
            RgbChannel::Blue => 2,
        }
    }
}

impl fmt::Display for RgbChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RgbChannel::Red => "r",
            RgbChannel::Green => "g",
            RgbChannel::Blue => "b",
        })
    }
}

impl FromStr for RgbChannel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(RgbChannel::Red),
            "g" | "green" => Ok(RgbChannel::Green),
            "b" | "blue" => Ok(RgbChannel::Blue),
            _ => Err(ParseEnumError::new("RGB channel", s, "r, g, b")),
        }
    }
}

/// How a color is turned into a 24-bit comparison key.
///
/// The first six variants permute the R, G and B bytes. The last six
/// convert to hue, saturation and brightness (each rounded to `0..=255`)
/// and permute those. The variant name lists the components from most to
/// least significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentOrder {
    #[default]
    Rgb,
    Rbg,
    Gbr,
    Grb,
    Brg,
    Bgr,
    Hsb,
    Hbs,
    Sbh,
    Shb,
    Bhs,
    Bsh,
}

impl ComponentOrder {
    pub const ALL: [ComponentOrder; 12] = [
        ComponentOrder::Rgb,
        ComponentOrder::Rbg,
        ComponentOrder::Gbr,
        ComponentOrder::Grb,
        ComponentOrder::Brg,
        ComponentOrder::Bgr,
        ComponentOrder::Hsb,
        ComponentOrder::Hbs,
        ComponentOrder::Sbh,
        ComponentOrder::Shb,
        ComponentOrder::Bhs,
        ComponentOrder::Bsh,
    ];

    /// `true` for the six hue/saturation/brightness orders.
    pub fn is_hsb(self) -> bool {
        matches!(
            self,
            ComponentOrder::Hsb
                | ComponentOrder::Hbs
                | ComponentOrder::Sbh
                | ComponentOrder::Shb
                | ComponentOrder::Bhs
                | ComponentOrder::Bsh
        )
    }

    /// Compute the 24-bit comparison key of `argb`. Alpha never takes part.
    ///
    /// # Example
    ///
    /// ```
    /// use glitch_engine::ComponentOrder;
    ///
    /// assert_eq!(ComponentOrder::Rgb.transform_key(0xFF12_3456), 0x12_3456);
    /// assert_eq!(ComponentOrder::Bgr.transform_key(0xFF12_3456), 0x56_3412);
    /// ```
    pub fn transform_key(self, argb: u32) -> u32 {
        let [r, g, b] = rgb_components(argb);
        let [k0, k1, k2] = match self {
            ComponentOrder::Rgb => return argb & 0x00FF_FFFF,
            ComponentOrder::Rbg => [r, b, g],
            ComponentOrder::Gbr => [g, b, r],
            ComponentOrder::Grb => [g, r, b],
            ComponentOrder::Brg => [b, r, g],
            ComponentOrder::Bgr => [b, g, r],
            hsb_order => {
                let [h, s, v] = rgb_to_hsb([r, g, b]).quantized();
                match hsb_order {
                    ComponentOrder::Hsb => [h, s, v],
                    ComponentOrder::Hbs => [h, v, s],
                    ComponentOrder::Sbh => [s, v, h],
                    ComponentOrder::Shb => [s, h, v],
                    ComponentOrder::Bhs => [v, h, s],
                    _ => [v, s, h],
                }
            }
        };
        (u32::from(k0) << 16) | (u32::from(k1) << 8) | u32::from(k2)
    }

    fn name(self) -> &'static str {
        match self {
            ComponentOrder::Rgb => "rgb",
            ComponentOrder::Rbg => "rbg",
            ComponentOrder::Gbr => "gbr",
            ComponentOrder::Grb => "grb",
            ComponentOrder::Brg => "brg",
            ComponentOrder::Bgr => "bgr",
            ComponentOrder::Hsb => "hsb",
            ComponentOrder::Hbs => "hbs",
            ComponentOrder::Sbh => "sbh",
            ComponentOrder::Shb => "shb",
            ComponentOrder::Bhs => "bhs",
            ComponentOrder::Bsh => "bsh",
        }
    }
}

impl fmt::Display for ComponentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ComponentOrder::ALL
            .into_iter()
            .find(|order| order.name() == lower)
            .ok_or_else(|| {
                ParseEnumError::new(
                    "component order",
                    s,
                    "rgb, rbg, gbr, grb, brg, bgr, hsb, hbs, sbh, shb, bhs, bsh",
                )
            })
    }
}

/// Channel exchange rule applied when channel swapping is enabled.
///
/// For rule `XY` and an exchange that moves `v` into slot `i` and `w` into
/// slot `j`, slot `i` receives `v` with its `X` channel replaced by `w`'s `Y`
/// channel, and slot `j` receives `w` with its `Y` channel replaced by `v`'s
/// `X` channel. The untouched channels come from each value's own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapRule {
    Rr,
    Rg,
    Rb,
    Gr,
    Gg,
    Gb,
    Br,
    Bg,
    #[default]
    Bb,
}

impl SwapRule {
    pub const ALL: [SwapRule; 9] = [
        SwapRule::Rr,
        SwapRule::Rg,
        SwapRule::Rb,
        SwapRule::Gr,
        SwapRule::Gg,
        SwapRule::Gb,
        SwapRule::Br,
        SwapRule::Bg,
        SwapRule::Bb,
    ];

    /// The `(source, target)` channel pair.
    pub fn channels(self) -> (RgbChannel, RgbChannel) {
        use RgbChannel::{Blue, Green, Red};
        match self {
            SwapRule::Rr => (Red, Red),
            SwapRule::Rg => (Red, Green),
            SwapRule::Rb => (Red, Blue),
            SwapRule::Gr => (Green, Red),
            SwapRule::Gg => (Green, Green),
            SwapRule::Gb => (Green, Blue),
            SwapRule::Br => (Blue, Red),
            SwapRule::Bg => (Blue, Green),
            SwapRule::Bb => (Blue, Blue),
        }
    }

    /// Recombine two RGB triples. Returns the new `(slot_i, slot_j)` colors.
    pub fn apply(self, v: [u8; 3], w: [u8; 3]) -> ([u8; 3], [u8; 3]) {
        let (source, target) = self.channels();
        let (x, y) = (source.index(), target.index());
        let mut into_i = v;
        let mut into_j = w;
        into_i[x] = w[y];
        into_j[y] = v[x];
        (into_i, into_j)
    }

    fn name(self) -> &'static str {
        match self {
            SwapRule::Rr => "rr",
            SwapRule::Rg => "rg",
            SwapRule::Rb => "rb",
            SwapRule::Gr => "gr",
            SwapRule::Gg => "gg",
            SwapRule::Gb => "gb",
            SwapRule::Br => "br",
            SwapRule::Bg => "bg",
            SwapRule::Bb => "bb",
        }
    }
}

impl fmt::Display for SwapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SwapRule {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SwapRule::ALL
            .into_iter()
            .find(|rule| rule.name() == lower)
            .ok_or_else(|| {
                ParseEnumError::new("swap rule", s, "rr, rg, rb, gr, gg, gb, br, bg, bb")
            })
    }
}
