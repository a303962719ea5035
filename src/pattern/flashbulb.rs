//! One-shot camera flash over whatever the lines were showing
//!
//! The first update captures the target lines and turns them white. Each line
//! then fades to black and blends back into the captured frame, after which
//! the captured colors are restored exactly.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use super::{Pattern, RenderContext};
use crate::{
    color::{BLACK, Rgb, WHITE, blend_colors},
    layout::{LineClaims, LineSet, MAX_LINES},
    math8::progress8,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashbulbParams {
    /// How long the lines stay white
    pub flash_duration: Duration,
    /// White to black fade time
    pub fade_duration: Duration,
    /// Black to captured frame blend time
    pub transition_duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlashbulbPhase {
    Flash,
    FadeToBlack,
    TransitionBack,
    #[default]
    Complete,
}

#[derive(Debug, Clone, Default)]
struct FlashbulbLine {
    phase: FlashbulbPhase,
    phase_start: Option<Instant>,
    saved: Vec<Rgb>,
}

impl FlashbulbLine {
    fn advance(&mut self, now: Instant, params: &FlashbulbParams, pixels: &mut [Rgb]) {
        let start = *self.phase_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);

        match self.phase {
            FlashbulbPhase::Flash => {
                if elapsed >= params.flash_duration {
                    self.enter(FlashbulbPhase::FadeToBlack, now);
                }
                pixels.fill(WHITE);
            }
            FlashbulbPhase::FadeToBlack => {
                if elapsed >= params.fade_duration {
                    self.enter(FlashbulbPhase::TransitionBack, now);
                    pixels.fill(BLACK);
                } else {
                    let level = 255 - progress8(elapsed, params.fade_duration);
                    pixels.fill(Rgb {
                        r: level,
                        g: level,
                        b: level,
                    });
                }
            }
            FlashbulbPhase::TransitionBack => {
                if elapsed >= params.transition_duration {
                    self.phase = FlashbulbPhase::Complete;
                    self.restore(pixels);
                } else {
                    let amount = progress8(elapsed, params.transition_duration);
                    for (pixel, &saved) in pixels.iter_mut().zip(&self.saved) {
                        *pixel = blend_colors(BLACK, saved, amount);
                    }
                }
            }
            FlashbulbPhase::Complete => {}
        }
    }

    fn enter(&mut self, phase: FlashbulbPhase, now: Instant) {
        self.phase = phase;
        self.phase_start = Some(now);
    }

    fn restore(&self, pixels: &mut [Rgb]) {
        let len = pixels.len().min(self.saved.len());
        pixels[..len].copy_from_slice(&self.saved[..len]);
    }
}

#[derive(Debug, Clone)]
pub struct FlashbulbPattern {
    params: FlashbulbParams,
    lines: [FlashbulbLine; MAX_LINES],
    started: bool,
}

impl FlashbulbPattern {
    pub fn new(params: FlashbulbParams) -> Self {
        Self {
            params,
            lines: Default::default(),
            started: false,
        }
    }

    pub const fn params(&self) -> &FlashbulbParams {
        &self.params
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub fn phase(&self, line: u8) -> Option<FlashbulbPhase> {
        self.lines.get(line as usize).map(|state| state.phase)
    }

    /// Captured frame of a line
    pub fn saved(&self, line: u8) -> &[Rgb] {
        self.lines
            .get(line as usize)
            .map_or(&[], |state| state.saved.as_slice())
    }

    /// `true` once the flash ran and every line got its frame back
    pub fn is_complete(&self) -> bool {
        self.started
            && self
                .lines
                .iter()
                .all(|state| state.phase == FlashbulbPhase::Complete)
    }

    /// Lines of `lines` that are still mid-flash
    pub fn claims(&self, lines: &LineSet) -> LineClaims {
        let mut claims = LineClaims::NONE;
        if !self.started {
            return claims;
        }
        for line in lines.iter() {
            if self.phase(line).is_some_and(|phase| phase != FlashbulbPhase::Complete) {
                claims.claim(line);
            }
        }
        claims
    }

    fn capture(&mut self, ctx: &mut RenderContext<'_>) {
        for line in ctx.lines.iter() {
            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            let state = &mut self.lines[line as usize];
            state.saved.clear();
            state.saved.extend_from_slice(pixels);
            state.phase = FlashbulbPhase::Flash;
            state.phase_start = Some(ctx.now);
            pixels.fill(WHITE);
        }
        self.started = true;
    }
}

impl Pattern for FlashbulbPattern {
    // Every write is uniform or a verbatim copy, so mirroring is a no-op
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if !self.started {
            self.capture(ctx);
            return;
        }

        for line in ctx.lines.iter() {
            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            self.lines[line as usize].advance(ctx.now, &self.params, pixels);
        }
    }

    fn reset(&mut self) {
        for state in &mut self.lines {
            state.phase = FlashbulbPhase::Complete;
            state.phase_start = None;
            state.saved.clear();
        }
        self.started = false;
    }
}
