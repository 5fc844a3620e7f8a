//! Palette reduction with an octree over the RGB cube.
//!
//! Every pixel is filed into a tree whose nodes split their color cube into
//! eight octants. The tree is then pruned bottom-up, lightest subtrees
//! first, until no more than the requested number of nodes still hold
//! pixels. Each survivor contributes the mean of its pixels to the palette,
//! and every pixel is replaced by the nearest palette entry.
//!
//! # Example
//!
//! ```
//! use glitch_engine::{OctreeQuantizer, PixelBuffer};
//!
//! let buffer = PixelBuffer::from_pixels(2, 1, vec![0xFF00_0000, 0xFFFF_FFFF]).unwrap();
//! let quantized = OctreeQuantizer::new(2).quantize(&buffer);
//!
//! assert_eq!(quantized.colormap, vec![0xFF00_0000, 0xFFFF_FFFF]);
//! assert_eq!(quantized.buffer, buffer);
//! ```

mod octree;

pub use octree::{OctreeQuantizer, Quantized, MAX_COLORS, MAX_NODES, MAX_TREE_DEPTH, MIN_COLORS};
