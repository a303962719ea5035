//! Whole-line breathing in a slowly shifting palette color

use embassy_time::Duration;

use super::{ColorCycle, Pattern, RenderContext, Throttle};
use crate::{
    color::{Palette, scale_color},
    math8::speed_interval,
};

/// Palette cross-fade moves one step every this many milliseconds
const COLOR_STEP_MS: u64 = 50;
/// Cross-fade steps between two palette colors
const COLOR_STEPS: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathingParams {
    /// 1-100, higher breathes faster
    pub speed: u8,
    pub palette: Palette,
}

/// One brightness ramp 0 -> 255 -> 0 shared by every owned line
#[derive(Debug, Clone)]
pub struct BreathingPattern {
    params: BreathingParams,
    throttle: Throttle,
    brightness: u8,
    increasing: bool,
    color: ColorCycle,
}

impl BreathingPattern {
    pub const fn new(params: BreathingParams) -> Self {
        Self {
            params,
            throttle: Throttle { last: None },
            brightness: 0,
            increasing: true,
            color: ColorCycle::new(COLOR_STEPS),
        }
    }

    pub const fn params(&self) -> &BreathingParams {
        &self.params
    }

    /// Brightness reached by the last step
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn increasing(&self) -> bool {
        self.increasing
    }

    fn step_brightness(&mut self) {
        if self.increasing {
            self.brightness = self.brightness.saturating_add(1);
            if self.brightness == u8::MAX {
                self.increasing = false;
            }
        } else {
            self.brightness = self.brightness.saturating_sub(1);
            if self.brightness == 0 {
                self.increasing = true;
            }
        }
    }
}

impl Pattern for BreathingPattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.speed == 0 || self.params.palette.is_empty() {
            return;
        }
        let interval = speed_interval(self.params.speed, 100, 5);
        if !self.throttle.ready(ctx.now, interval) {
            return;
        }

        self.step_brightness();
        self.color.advance(
            ctx.now,
            Duration::from_millis(COLOR_STEP_MS),
            self.params.palette.len(),
        );

        // Uniform fill, mirroring has nothing to change
        let color = scale_color(self.color.color(&self.params.palette), self.brightness);
        for line in ctx.lines.iter() {
            ctx.pixels.fill_line(line, color);
        }
    }

    fn reset(&mut self) {
        self.throttle.reset();
        self.brightness = 0;
        self.increasing = true;
        self.color.reset();
    }
}
