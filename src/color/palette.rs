//! Ordered color lists that patterns cycle or blend through

use heapless::Vec;

use crate::color::{BLACK, Rgb, blend_colors};

/// Maximum number of colors a palette keeps
pub const MAX_PALETTE_SIZE: usize = 16;

/// Fixed, ordered list of colors
///
/// Indexing always wraps modulo the palette length. An empty palette is
/// representable so requests with no colors can still be built; patterns
/// treat it as "nothing to draw".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb, MAX_PALETTE_SIZE>,
}

impl Palette {
    /// Build a palette, keeping at most `MAX_PALETTE_SIZE` colors
    pub fn new(colors: &[Rgb]) -> Self {
        let mut palette = Self::default();
        for color in colors.iter().take(MAX_PALETTE_SIZE) {
            // Capacity is checked by `take`
            let _ = palette.colors.push(*color);
        }
        palette
    }

    /// Palette with a single color
    pub fn single(color: Rgb) -> Self {
        Self::new(&[color])
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at `index`, wrapping around the palette
    ///
    /// Returns black for an empty palette.
    pub fn color(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    /// Blend from the color at `index` toward the next one
    pub fn blend(&self, index: usize, amount: u8) -> Rgb {
        blend_colors(self.color(index), self.color(index + 1), amount)
    }
}

impl From<&[Rgb]> for Palette {
    fn from(colors: &[Rgb]) -> Self {
        Self::new(colors)
    }
}
