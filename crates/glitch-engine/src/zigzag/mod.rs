//! Zigzag traversal of square pixel blocks.
//!
//! A [`ZigzagScanner`] linearizes a `d×d` block of a buffer in the diagonal
//! order used for JPEG coefficients, and writes linear data back the same
//! way. [`ZigzagSorter`] tiles an image with such blocks and glitch-sorts
//! each one along its zigzag path.

mod scanner;
mod sorter;

pub use scanner::ZigzagScanner;
pub use sorter::{ZigzagOptions, ZigzagReport, ZigzagSorter, ZigzagStyle};

/// Top-left corners of the `edge×edge` blocks that tile a `width×height`
/// image, centred so the leftover margin is split evenly on both sides.
///
/// Returns the block grid size `(columns, rows)` and the margin offset.
pub(crate) fn centered_grid(width: u32, height: u32, edge: u32) -> ((u32, u32), (u32, u32)) {
    if edge == 0 {
        return ((0, 0), (0, 0));
    }
    let columns = width / edge;
    let rows = height / edge;
    let offset_x = (width - columns * edge) / 2;
    let offset_y = (height - rows * edge) / 2;
    ((columns, rows), (offset_x, offset_y))
}
