//! Glitchsort
//!
//! Command-line glitch art: pixel sorting, zigzag FFT equalization and
//! octree color quantization on PNG images. The image engines live in the
//! `glitch-engine` crate; this crate adds PNG I/O, YAML presets, and an
//! editing session with undo and snapshot buffers.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
