//! Whole-image pixel effects that complement the sorting and spectral
//! engines: munging against a backup, channel shifting, median denoising
//! and quarter-turn rotation.

mod denoise;
mod munge;
mod rotate;
mod shift;

pub use denoise::denoise;
pub use munge::{munge, MungeOptions};
pub use rotate::{rotate_left, rotate_right};
pub use shift::{shift_channel, ShiftDirection};
