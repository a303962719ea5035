//! Fire simulation, one heat map per line
//!
//! Every line keeps a heat value per LED. Each step cools every cell a little,
//! lets heat drift away from the base, randomly ignites sparks near the base
//! and maps the heat onto the black-red-yellow-white flame ramp.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{DEFAULT_SEED, Pattern, RenderContext, Throttle};
use crate::{
    color::heat_color,
    layout::{MAX_LINES, mirror_index},
    math8::{scale8, speed_interval},
};

/// Upper bound of the per-step random delay added to the base interval
const MAX_JITTER_MS: u64 = 20;
/// Sparks ignite somewhere in the first cells of a line
const SPARK_ZONE: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlameParams {
    /// 1-100, higher flickers faster
    pub speed: u8,
    /// How much heat is lost per step
    pub cooling: u8,
    /// Chance (out of 256) of a new spark per step
    pub sparking: u8,
    /// Keep the base of the flame glowing
    pub warm_base: bool,
}

#[derive(Debug, Clone, Default)]
struct FlameLine {
    heat: Vec<u8>,
    throttle: Throttle,
    jitter: Duration,
}

#[derive(Debug, Clone)]
pub struct FlamePattern {
    params: FlameParams,
    lines: [FlameLine; MAX_LINES],
    seed: u64,
    rng: SmallRng,
}

impl FlamePattern {
    pub fn new(params: FlameParams) -> Self {
        Self::with_seed(params, DEFAULT_SEED)
    }

    pub fn with_seed(params: FlameParams, seed: u64) -> Self {
        Self {
            params,
            lines: Default::default(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub const fn params(&self) -> &FlameParams {
        &self.params
    }

    /// Restart the random sequence from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Heat map of a line, empty until the line has been drawn once
    pub fn heat(&self, line: u8) -> &[u8] {
        self.lines
            .get(line as usize)
            .map_or(&[], |state| state.heat.as_slice())
    }

    fn step_line(&mut self, state_index: usize) {
        let params = &self.params;
        let rng = &mut self.rng;
        let heat = &mut self.lines[state_index].heat;
        let len = heat.len();

        // Cool down every cell a little
        let len_u32 = u32::try_from(len).unwrap_or(u32::MAX);
        let cooling_cap = (u32::from(params.cooling) * 10 / len_u32 + 2).min(256);
        for cell in heat.iter_mut() {
            let cooldown = u8::try_from(rng.gen_range(0..cooling_cap)).unwrap_or(u8::MAX);
            *cell = cell.saturating_sub(cooldown);
        }

        // Heat drifts away from the base and diffuses a little
        for k in (2..len).rev() {
            let sum = u16::from(heat[k - 1]) + 2 * u16::from(heat[k - 2]);
            heat[k] = u8::try_from(sum / 3).unwrap_or(u8::MAX);
        }

        // Randomly ignite new sparks near the base
        if rng.gen_range(0..=u8::MAX) < params.sparking {
            let y = rng.gen_range(0..SPARK_ZONE.min(len));
            heat[y] = heat[y].saturating_add(rng.gen_range(160..255));
        }

        if params.warm_base {
            for cell in heat.iter_mut().take(len / 12) {
                *cell = cell.saturating_add(rng.gen_range(0..16));
            }
        }

        self.lines[state_index].jitter = Duration::from_millis(rng.gen_range(0..=MAX_JITTER_MS));
    }

    fn due(&mut self, state_index: usize, now: Instant) -> bool {
        let base = speed_interval(self.params.speed, 100, 10);
        let state = &mut self.lines[state_index];
        state.throttle.ready(now, base + state.jitter)
    }
}

impl Pattern for FlamePattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.speed == 0 {
            return;
        }

        for line in ctx.lines.iter() {
            let state_index = line as usize;
            let Some(len) = ctx.pixels.line(line).map(<[_]>::len) else {
                continue;
            };
            if len == 0 || !self.due(state_index, ctx.now) {
                continue;
            }
            if self.lines[state_index].heat.len() != len {
                self.lines[state_index].heat.resize(len, 0);
            }

            self.step_line(state_index);

            let Some(pixels) = ctx.pixels.line_mut(line) else {
                continue;
            };
            for (i, &heat) in self.lines[state_index].heat.iter().enumerate() {
                pixels[mirror_index(len, i, ctx.reverse)] = heat_color(scale8(heat, 240));
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.lines {
            state.heat.fill(0);
            state.throttle.reset();
            state.jitter = Duration::from_millis(0);
        }
        self.rng = SmallRng::seed_from_u64(self.seed);
    }
}
