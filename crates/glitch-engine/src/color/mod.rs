//! Packed ARGB helpers and the HSB color model.
//!
//! Colors travel through the engines as packed `0xAARRGGBB` words. This module
//! splits and recombines them, and converts between RGB and the
//! hue/saturation/brightness model used by the HSB comparison orders and the
//! hue, saturation and lightness spectral channels.
//!
//! All HSB components are expressed on a `0.0..=255.0` scale so they can be
//! mixed freely with RGB bytes.

mod argb;
mod hsb;

pub use argb::{
    blue, compose, green, max_color_diff, mean_color, red, rgb_components, with_opaque_alpha,
    OPAQUE,
};
pub use hsb::{hsb_to_rgb, rgb_to_hsb, Hsb};
