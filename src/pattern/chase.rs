//! Chase that fills a line LED by LED, holds it, and retracts again

use embassy_time::{Duration, Instant};

use super::{ColorCycle, Pattern, RenderContext, Throttle};
use crate::{
    color::{BLACK, Palette},
    layout::{MAX_LINES, mirror_index},
    math8::speed_interval,
};

/// Cross-fade steps between two palette colors
const COLOR_STEPS: u16 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaseParams {
    /// 1-100, higher chases faster
    pub speed: u8,
    pub palette: Palette,
    /// 1-100, speed of the palette cross-fade
    pub transition_speed: u8,
    /// How long a fully lit line is held
    pub hold_delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChasePhase {
    #[default]
    Forward,
    Holding,
    Retracting,
}

#[derive(Debug, Clone, Copy)]
struct ChaseLine {
    phase: ChasePhase,
    lit: usize,
    phase_start: Instant,
    throttle: Throttle,
    color: ColorCycle,
}

impl Default for ChaseLine {
    fn default() -> Self {
        Self {
            phase: ChasePhase::Forward,
            lit: 0,
            phase_start: Instant::from_millis(0),
            throttle: Throttle::default(),
            color: ColorCycle::new(COLOR_STEPS),
        }
    }
}

impl ChaseLine {
    fn step(&mut self, now: Instant, len: usize, hold_delay: Duration) {
        match self.phase {
            ChasePhase::Forward => {
                self.lit = (self.lit + 1).min(len);
                if self.lit == len {
                    self.phase = ChasePhase::Holding;
                    self.phase_start = now;
                }
            }
            ChasePhase::Holding => {
                if now.saturating_duration_since(self.phase_start) >= hold_delay {
                    self.phase = ChasePhase::Retracting;
                    self.lit = len;
                }
            }
            ChasePhase::Retracting => {
                self.lit = self.lit.saturating_sub(1);
                if self.lit == 0 {
                    self.phase = ChasePhase::Forward;
                }
            }
        }
    }

    const fn lit_pixels(&self, len: usize) -> usize {
        match self.phase {
            ChasePhase::Holding => len,
            ChasePhase::Forward | ChasePhase::Retracting => self.lit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChasePattern {
    params: ChaseParams,
    lines: [ChaseLine; MAX_LINES],
}

impl ChasePattern {
    pub fn new(params: ChaseParams) -> Self {
        Self {
            params,
            lines: [ChaseLine::default(); MAX_LINES],
        }
    }

    pub const fn params(&self) -> &ChaseParams {
        &self.params
    }

    pub fn phase(&self, line: u8) -> Option<ChasePhase> {
        self.lines.get(line as usize).map(|state| state.phase)
    }

    /// Number of lit LEDs counted from the start of the line
    pub fn lit(&self, line: u8) -> Option<usize> {
        self.lines.get(line as usize).map(|state| state.lit)
    }
}

impl Pattern for ChasePattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.speed == 0 || self.params.palette.is_empty() {
            return;
        }

        let step_interval = speed_interval(self.params.speed, 200, 20);
        let color_interval = speed_interval(self.params.transition_speed, 100, 10);

        for line in ctx.lines.iter() {
            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            let len = pixels.len();
            let state = &mut self.lines[line as usize];

            state
                .color
                .advance(ctx.now, color_interval, self.params.palette.len());
            if state.throttle.ready(ctx.now, step_interval) {
                state.step(ctx.now, len, self.params.hold_delay);
            }

            // The lit span follows the cross-fade between steps too
            let color = state.color.color(&self.params.palette);
            pixels.fill(BLACK);
            for i in 0..state.lit_pixels(len) {
                pixels[mirror_index(len, i, ctx.reverse)] = color;
            }
        }
    }

    fn reset(&mut self) {
        self.lines = [ChaseLine::default(); MAX_LINES];
    }
}
