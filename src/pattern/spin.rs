//! Rotating palette spans or gradients
//!
//! Every line keeps its own rotation offset. Two drawing modes exist:
//! - continuous: the whole line is one gradient (or one block per color)
//! - segmented: `span` lit pixels per color separated by `separation` dark
//!   pixels, tiled across the line or drawn once per palette pass

use super::{Pattern, RenderContext, Throttle};
use crate::{
    color::{BLACK, Palette, Rgb},
    layout::{MAX_LINES, mirror_index},
    math8::speed_interval,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinParams {
    /// 1-100, higher spins faster
    pub speed: u8,
    /// Dark pixels between two spans
    pub separation: u16,
    /// Lit pixels per palette color
    pub span: u16,
    pub palette: Palette,
    /// Tile the spans across the whole line
    pub looping: bool,
    /// Fill the whole line instead of drawing spans
    pub continuous: bool,
    /// Blend toward the next palette color
    pub blend: bool,
}

#[derive(Debug, Clone)]
pub struct SpinPattern {
    params: SpinParams,
    throttle: Throttle,
    positions: [usize; MAX_LINES],
}

impl SpinPattern {
    pub const fn new(params: SpinParams) -> Self {
        Self {
            params,
            throttle: Throttle { last: None },
            positions: [0; MAX_LINES],
        }
    }

    pub const fn params(&self) -> &SpinParams {
        &self.params
    }

    /// Rotation offset of a line
    pub fn position(&self, line: u8) -> Option<usize> {
        self.positions.get(line as usize).copied()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_continuous(&self, pixels: &mut [Rgb], position: usize, reverse: bool) {
        let palette = &self.params.palette;
        let len = pixels.len();
        let colors = palette.len();

        for i in 0..len {
            let cycle = (i + position) % len;
            let color = if self.params.blend {
                // 8.8 fixed point position inside the palette
                let scaled = cycle * colors * 256 / len;
                palette.blend(scaled >> 8, (scaled & 0xFF) as u8)
            } else {
                palette.color(cycle * colors / len)
            };
            pixels[mirror_index(len, i, reverse)] = color;
        }
    }

    fn span_color(&self, color_index: usize, offset: usize) -> Rgb {
        let palette = &self.params.palette;
        let span = usize::from(self.params.span);
        if self.params.blend && span > 1 {
            let amount = u8::try_from(offset * 255 / (span - 1)).unwrap_or(u8::MAX);
            palette.blend(color_index, amount)
        } else {
            palette.color(color_index)
        }
    }

    fn draw_segmented(&self, pixels: &mut [Rgb], position: usize, reverse: bool) {
        let len = pixels.len();
        let colors = self.params.palette.len();
        let span = usize::from(self.params.span);
        let period = span + usize::from(self.params.separation);

        if self.params.looping {
            let pattern_len = colors * period;
            for i in 0..len {
                let pattern_pos = (i + position) % pattern_len;
                let offset = pattern_pos % period;
                if offset < span {
                    pixels[mirror_index(len, i, reverse)] =
                        self.span_color(pattern_pos / period, offset);
                }
            }
        } else {
            for color_index in 0..colors {
                let start = position + color_index * period;
                for offset in 0..span {
                    let pos = (start + offset) % len;
                    pixels[mirror_index(len, pos, reverse)] = self.span_color(color_index, offset);
                }
            }
        }
    }
}

impl Pattern for SpinPattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.speed == 0 || self.params.palette.is_empty() || self.params.span == 0 {
            return;
        }
        let interval = speed_interval(self.params.speed, 200, 10);
        if !self.throttle.ready(ctx.now, interval) {
            return;
        }

        for line in ctx.lines.iter() {
            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            let len = pixels.len();
            let position = self.positions[line as usize] % len;

            // Claimed lines keep rotating without being drawn
            if !ctx.claims.is_claimed(line) {
                pixels.fill(BLACK);
                if self.params.continuous {
                    self.draw_continuous(pixels, position, ctx.reverse);
                } else {
                    self.draw_segmented(pixels, position, ctx.reverse);
                }
            }

            self.positions[line as usize] = (position + 1) % len;
        }
    }

    fn reset(&mut self) {
        self.throttle.reset();
        self.positions = [0; MAX_LINES];
    }
}
