//! Zigzag coordinate tables with pluck and plant.

use std::fmt;

use crate::buffer::PixelBuffer;

/// Precomputed zigzag coordinates for an `edge×edge` block.
///
/// # Example
///
/// ```
/// use glitch_engine::{PixelBuffer, ZigzagScanner};
///
/// let scanner = ZigzagScanner::new(2);
/// let buffer = PixelBuffer::from_pixels(2, 2, vec![1, 2, 3, 4]).unwrap();
/// // (0,0), (1,0), (0,1), (1,1)
/// assert_eq!(scanner.pluck(&buffer, 0, 0), vec![1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigzagScanner {
    edge: u32,
    xs: Vec<u32>,
    ys: Vec<u32>,
}

impl ZigzagScanner {
    /// Build the traversal for blocks of `edge` pixels per side.
    ///
    /// Diagonals `x + y = s` are visited in increasing `s`; even diagonals
    /// run with increasing `x`, odd diagonals with decreasing `x`.
    pub fn new(edge: u32) -> Self {
        let len = edge as usize * edge as usize;
        let mut xs = Vec::with_capacity(len);
        let mut ys = Vec::with_capacity(len);
        if edge > 0 {
            for s in 0..(2 * edge - 1) {
                let x_min = s.saturating_sub(edge - 1);
                let x_max = s.min(edge - 1);
                if s % 2 == 0 {
                    for x in x_min..=x_max {
                        xs.push(x);
                        ys.push(s - x);
                    }
                } else {
                    for x in (x_min..=x_max).rev() {
                        xs.push(x);
                        ys.push(s - x);
                    }
                }
            }
        }
        Self { edge, xs, ys }
    }

    #[inline]
    pub fn edge(&self) -> u32 {
        self.edge
    }

    /// Number of pixels in a block.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Block-relative `(x, y)` coordinates in traversal order.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Mirror future traversals horizontally.
    pub fn flip_x(&mut self) {
        let m = self.edge.saturating_sub(1);
        for x in &mut self.xs {
            *x = m - *x;
        }
    }

    /// Mirror future traversals vertically.
    pub fn flip_y(&mut self) {
        let m = self.edge.saturating_sub(1);
        for y in &mut self.ys {
            *y = m - *y;
        }
    }

    fn assert_fits(&self, buffer: &PixelBuffer, x: u32, y: u32) {
        assert!(
            buffer.contains_block(x, y, self.edge),
            "zigzag block of edge {} at ({x}, {y}) outside {}x{} buffer",
            self.edge,
            buffer.width(),
            buffer.height()
        );
    }

    /// Read the block whose top-left corner is `(x, y)` in zigzag order.
    ///
    /// # Panics
    ///
    /// Panics if the block does not fit inside `buffer`.
    pub fn pluck(&self, buffer: &PixelBuffer, x: u32, y: u32) -> Vec<u32> {
        self.assert_fits(buffer, x, y);
        let width = buffer.width() as usize;
        let pixels = buffer.pixels();
        self.coords()
            .map(|(dx, dy)| pixels[(y + dy) as usize * width + (x + dx) as usize])
            .collect()
    }

    /// Write `block` back to the block at `(x, y)`, inverting [`pluck`](Self::pluck).
    ///
    /// # Panics
    ///
    /// Panics if the block does not fit inside `buffer` or `block` does not
    /// hold exactly `edge²` pixels.
    pub fn plant(&self, buffer: &mut PixelBuffer, block: &[u32], x: u32, y: u32) {
        self.assert_fits(buffer, x, y);
        assert_eq!(
            block.len(),
            self.len(),
            "zigzag block has {} pixels, expected {}",
            block.len(),
            self.len()
        );
        let width = buffer.width() as usize;
        let pixels = buffer.pixels_mut();
        for ((dx, dy), &argb) in self.coords().zip(block) {
            pixels[(y + dy) as usize * width + (x + dx) as usize] = argb;
        }
    }
}

impl fmt::Display for ZigzagScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zigzag {}x{}:", self.edge, self.edge)?;
        for (x, y) in self.coords() {
            write!(f, " ({x}, {y})")?;
        }
        Ok(())
    }
}
