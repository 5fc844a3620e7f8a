//! RGB to HSB conversion on a 0..=255 scale.
//!
//! Follows the AWT hexcone model: brightness is the largest channel,
//! saturation is the channel spread relative to brightness, hue is the
//! position on the color wheel. Hue wraps at 255.

/// Hue, saturation and brightness, each in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Hsb {
    /// Components rounded to bytes, as used for comparison keys.
    pub fn quantized(&self) -> [u8; 3] {
        [
            to_byte(self.hue),
            to_byte(self.saturation),
            to_byte(self.brightness),
        ]
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert `[r, g, b]` bytes to HSB.
pub fn rgb_to_hsb(rgb: [u8; 3]) -> Hsb {
    let [r, g, b] = rgb.map(f32::from);
    let cmax = r.max(g).max(b);
    let cmin = r.min(g).min(b);
    let brightness = cmax;
    let saturation = if cmax > 0.0 {
        (cmax - cmin) / cmax
    } else {
        0.0
    };

    let hue = if saturation == 0.0 {
        0.0
    } else {
        let span = cmax - cmin;
        let redc = (cmax - r) / span;
        let greenc = (cmax - g) / span;
        let bluec = (cmax - b) / span;
        let sector = if r == cmax {
            bluec - greenc
        } else if g == cmax {
            2.0 + redc - bluec
        } else {
            4.0 + greenc - redc
        };
        let mut h = sector / 6.0;
        if h < 0.0 {
            h += 1.0;
        }
        h
    };

    Hsb {
        hue: hue * 255.0,
        saturation: saturation * 255.0,
        brightness,
    }
}

/// Convert HSB back to `[r, g, b]` bytes. Inputs are clamped to range.
pub fn hsb_to_rgb(hsb: Hsb) -> [u8; 3] {
    let s = (hsb.saturation / 255.0).clamp(0.0, 1.0);
    let v = (hsb.brightness / 255.0).clamp(0.0, 1.0);
    if s == 0.0 {
        let grey = to_byte(v * 255.0);
        return [grey, grey, grey];
    }

    let hue = (hsb.hue / 255.0).clamp(0.0, 1.0);
    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match h as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_byte(r * 255.0), to_byte(g * 255.0), to_byte(b * 255.0)]
}
