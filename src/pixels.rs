//! The frame every pattern draws into

use alloc::vec;
use alloc::vec::Vec;

use crate::color::{BLACK, Rgb};
use crate::layout::LineLayout;

/// Flat pixel buffer partitioned into one block per output line
///
/// The buffer lives as long as the program and keeps its contents between
/// ticks; patterns that are throttled this tick simply leave their last frame
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    layout: LineLayout,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Allocate an all-black buffer for `layout`
    pub fn new(layout: LineLayout) -> Self {
        Self {
            layout,
            pixels: vec![BLACK; layout.total_leds()],
        }
    }

    pub const fn layout(&self) -> LineLayout {
        self.layout
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Pixels of one line, `None` for lines outside the layout
    pub fn line(&self, line: u8) -> Option<&[Rgb]> {
        let range = self.layout.line_range(line)?;
        self.pixels.get(range)
    }

    /// Mutable pixels of one line, `None` for lines outside the layout
    pub fn line_mut(&mut self, line: u8) -> Option<&mut [Rgb]> {
        let range = self.layout.line_range(line)?;
        self.pixels.get_mut(range)
    }

    /// Paint a whole line with one color
    pub fn fill_line(&mut self, line: u8, color: Rgb) {
        if let Some(pixels) = self.line_mut(line) {
            pixels.fill(color);
        }
    }

    /// Turn a whole line off
    pub fn clear_line(&mut self, line: u8) {
        self.fill_line(line, BLACK);
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(BLACK);
    }

    /// Overwrite this buffer with the contents of `other`
    ///
    /// Both buffers must share a layout; the shorter length wins otherwise.
    pub fn copy_from(&mut self, other: &Self) {
        let len = self.pixels.len().min(other.pixels.len());
        self.pixels[..len].copy_from_slice(&other.pixels[..len]);
    }
}
