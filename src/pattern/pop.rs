//! Whole lines popping on one after another

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use super::{DEFAULT_SEED, Pattern, RenderContext, Throttle};
use crate::{
    color::Palette,
    layout::{LineLayout, LineSet, MAX_LINES},
    math8::{SPEED_MAX, SPEED_MIN, map_range},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopParams {
    /// 0-100, higher pops faster
    pub speed: u8,
    /// How long a line stays lit
    pub hold_delay: Duration,
    pub palette: Palette,
    /// Visit lines in a shuffled order, reshuffled every round
    pub random: bool,
    /// Ramp up from the slowest speed over this time, zero disables the ramp
    pub acceleration_time: Duration,
}

/// One lit line at a time, cycling through the line set and the palette
#[derive(Debug, Clone)]
pub struct PopPattern {
    params: PopParams,
    throttle: Throttle,
    sequence: Vec<u8, MAX_LINES>,
    position: usize,
    color_index: usize,
    filled: bool,
    fill_start: Instant,
    started_at: Option<Instant>,
    reshuffles: u32,
    seed: u64,
    rng: SmallRng,
}

impl PopPattern {
    pub fn new(params: PopParams) -> Self {
        Self::with_seed(params, DEFAULT_SEED)
    }

    pub fn with_seed(params: PopParams, seed: u64) -> Self {
        Self {
            params,
            throttle: Throttle::default(),
            sequence: Vec::new(),
            position: 0,
            color_index: 0,
            filled: false,
            fill_start: Instant::from_millis(0),
            started_at: None,
            reshuffles: 0,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub const fn params(&self) -> &PopParams {
        &self.params
    }

    /// Restart the random sequence from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Visiting order of the current round, empty before the first update
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Position inside the visiting order
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Line that is lit, or is about to be lit next
    pub fn current_line(&self) -> Option<u8> {
        self.sequence.get(self.position).copied()
    }

    /// Number of times the visiting order was reshuffled after a round
    pub const fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Speed after applying the acceleration ramp
    fn effective_speed(&self, now: Instant) -> u8 {
        let speed = self.params.speed.min(SPEED_MAX);
        let ramp = self.params.acceleration_time;
        let Some(started_at) = self.started_at else {
            return speed;
        };
        if ramp.as_millis() == 0 {
            return speed;
        }

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= ramp {
            return speed;
        }
        let span = u64::from(speed.saturating_sub(SPEED_MIN));
        let gained = span * elapsed.as_millis() / ramp.as_millis();
        SPEED_MIN.saturating_add(u8::try_from(gained).unwrap_or(u8::MAX))
    }

    #[allow(clippy::cast_sign_loss)]
    fn interval(&self, now: Instant) -> Duration {
        let ms = map_range(i32::from(self.effective_speed(now)), 0, 100, 200, 10);
        Duration::from_millis(ms.max(0) as u64)
    }

    fn build_sequence(&mut self, lines: &LineSet, layout: LineLayout, reverse: bool) {
        self.sequence.clear();
        let lines = lines.iter().filter(|&line| layout.contains(line));
        if reverse && !self.params.random {
            self.sequence.extend(lines.rev());
        } else {
            self.sequence.extend(lines);
        }
        if self.params.random {
            self.sequence.shuffle(&mut self.rng);
        }
    }
}

impl Pattern for PopPattern {
    fn update(&mut self, ctx: &mut RenderContext<'_>) {
        if self.params.speed == 0 || self.params.palette.is_empty() || ctx.lines.is_empty() {
            return;
        }

        if self.started_at.is_none() {
            self.started_at = Some(ctx.now);
            self.build_sequence(ctx.lines, ctx.pixels.layout(), ctx.reverse);
        }

        let interval = self.interval(ctx.now);
        if !self.throttle.ready(ctx.now, interval) {
            return;
        }
        let Some(line) = self.current_line() else {
            return;
        };

        if !self.filled {
            ctx.pixels
                .fill_line(line, self.params.palette.color(self.color_index));
            self.filled = true;
            self.fill_start = ctx.now;
        } else if ctx.now.saturating_duration_since(self.fill_start) >= self.params.hold_delay {
            ctx.pixels.clear_line(line);
            self.filled = false;
            self.color_index = (self.color_index + 1) % self.params.palette.len();
            self.position = (self.position + 1) % self.sequence.len();
            if self.position == 0 && self.params.random {
                self.sequence.shuffle(&mut self.rng);
                self.reshuffles += 1;
            }
        }
    }

    fn reset(&mut self) {
        self.throttle.reset();
        self.sequence.clear();
        self.position = 0;
        self.color_index = 0;
        self.filled = false;
        self.fill_start = Instant::from_millis(0);
        self.started_at = None;
        self.reshuffles = 0;
        self.rng = SmallRng::seed_from_u64(self.seed);
    }
}
