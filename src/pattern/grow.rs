//! Lines that fill up, hold, and drain again with soft per-LED fades

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use super::{ColorCycle, Pattern, RenderContext, Throttle};
use crate::{
    color::{BLACK, Palette, scale_color},
    layout::{MAX_LINES, mirror_index},
    math8::{SPEED_MAX, SPEED_MIN, map_range, speed_interval},
};

/// Cross-fade steps between two palette colors
const COLOR_STEPS: u16 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowParams {
    /// 1-100, controls how fast single LEDs fade
    pub speed: u8,
    /// LEDs added or removed per growth step
    pub n: u16,
    /// Time between growth steps
    pub fade_delay: Duration,
    /// How long a full line stays lit
    pub hold_delay: Duration,
    pub palette: Palette,
    /// 1-100, speed of the palette cross-fade
    pub transition_speed: u8,
    /// Start delay between two consecutive lines
    pub offset_delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowPhase {
    #[default]
    Growing,
    Holding,
    Shrinking,
}

#[derive(Debug, Clone)]
struct GrowLine {
    phase: GrowPhase,
    active_leds: usize,
    phase_start: Instant,
    next_step: Option<Instant>,
    levels: Vec<u8>,
    fade: Throttle,
    color: ColorCycle,
}

impl Default for GrowLine {
    fn default() -> Self {
        Self {
            phase: GrowPhase::Growing,
            active_leds: 0,
            phase_start: Instant::from_millis(0),
            next_step: None,
            levels: Vec::new(),
            fade: Throttle::default(),
            color: ColorCycle::new(COLOR_STEPS),
        }
    }
}

impl GrowLine {
    fn step(&mut self, now: Instant, len: usize, params: &GrowParams) {
        if self.next_step.is_some_and(|next| now < next) {
            return;
        }
        let n = usize::from(params.n);

        match self.phase {
            GrowPhase::Growing => {
                self.active_leds += n.min(len - self.active_leds.min(len));
                self.next_step = Some(now + params.fade_delay);
                if self.active_leds >= len {
                    self.phase = GrowPhase::Holding;
                    self.phase_start = now;
                }
            }
            GrowPhase::Holding => {
                if now.saturating_duration_since(self.phase_start) >= params.hold_delay {
                    self.phase = GrowPhase::Shrinking;
                    self.next_step = None;
                }
            }
            GrowPhase::Shrinking => {
                self.active_leds -= n.min(self.active_leds);
                self.next_step = Some(now + params.fade_delay);
                if self.active_leds == 0 {
                    self.phase = GrowPhase::Growing;
                }
            }
        }
    }

    fn fade(&mut self, fade_step: u8) {
        let lit = match self.phase {
            GrowPhase::Holding => self.levels.len(),
            GrowPhase::Growing | GrowPhase::Shrinking => self.active_leds,
        };
        for (i, level) in self.levels.iter_mut().enumerate() {
            *level = if i < lit {
                level.saturating_add(fade_step)
            } else {
                level.saturating_sub(fade_step)
            };
        }
    }
}

#[derive(Debug, Clone)]
pub struct GrowPattern {
    params: GrowParams,
    lines: [GrowLine; MAX_LINES],
    started_at: Option<Instant>,
}

impl GrowPattern {
    pub fn new(params: GrowParams) -> Self {
        Self {
            params,
            lines: Default::default(),
            started_at: None,
        }
    }

    pub const fn params(&self) -> &GrowParams {
        &self.params
    }

    pub fn phase(&self, line: u8) -> Option<GrowPhase> {
        self.lines.get(line as usize).map(|state| state.phase)
    }

    /// LEDs the line is currently growing towards
    pub fn active_leds(&self, line: u8) -> Option<usize> {
        self.lines.get(line as usize).map(|state| state.active_leds)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fade_step(&self) -> u8 {
        let speed = self.params.speed.clamp(SPEED_MIN, SPEED_MAX);
        map_range(
            i32::from(speed),
            i32::from(SPEED_MIN),
            i32::from(SPEED_MAX),
            2,
            15,
        ) as u8
    }
}

impl Pattern for GrowPattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.n == 0 || self.params.speed == 0 || self.params.palette.is_empty() {
            return;
        }

        let started_at = *self.started_at.get_or_insert(ctx.now);
        let since_start = ctx.now.saturating_duration_since(started_at);
        let color_interval = speed_interval(self.params.transition_speed, 100, 10);
        let fade_interval = speed_interval(self.params.speed, 50, 5);
        let fade_step = self.fade_step();
        let layout = ctx.pixels.layout();

        // Lines outside the layout take no rank
        let lines = ctx.lines.iter().filter(|&line| layout.contains(line));
        for (rank, line) in lines.enumerate() {
            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            let len = pixels.len();

            let offset = self.params.offset_delay * u32::try_from(rank).unwrap_or(u32::MAX);
            if since_start < offset {
                pixels.fill(BLACK);
                continue;
            }

            let state = &mut self.lines[line as usize];
            if state.levels.len() != len {
                state.levels.resize(len, 0);
            }

            state
                .color
                .advance(ctx.now, color_interval, self.params.palette.len());
            state.step(ctx.now, len, &self.params);

            if !state.fade.ready(ctx.now, fade_interval) {
                continue;
            }
            state.fade(fade_step);

            let color = state.color.color(&self.params.palette);
            for (i, &level) in state.levels.iter().enumerate() {
                pixels[mirror_index(len, i, ctx.reverse)] = scale_color(color, level);
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.lines {
            let levels = core::mem::take(&mut state.levels);
            *state = GrowLine {
                levels,
                ..GrowLine::default()
            };
            state.levels.fill(0);
        }
        self.started_at = None;
    }
}
