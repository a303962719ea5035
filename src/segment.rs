//! Timed group of pattern instances

use alloc::vec;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::{
    layout::LineClaims,
    pattern::{PatternInstance, PatternParams},
    pixels::PixelBuffer,
};

/// One or more patterns running side by side for a fixed duration
#[derive(Debug, Clone)]
pub struct Segment {
    patterns: Vec<PatternInstance>,
    duration: Duration,
    start_time: Instant,
    active: bool,
}

impl Segment {
    /// Segment running a single pattern on `lines`
    pub fn single(params: impl Into<PatternParams>, lines: &[u8], duration: Duration) -> Self {
        Self::new(vec![PatternInstance::new(params, lines)], duration)
    }

    /// Segment running several patterns at once
    pub fn new(patterns: Vec<PatternInstance>, duration: Duration) -> Self {
        Self {
            patterns,
            duration,
            start_time: Instant::from_millis(0),
            active: false,
        }
    }

    /// Segment lasting whole seconds, the unit playlists are written in
    pub fn with_seconds(patterns: Vec<PatternInstance>, seconds: u64) -> Self {
        Self::new(patterns, Duration::from_secs(seconds))
    }

    pub fn patterns(&self) -> &[PatternInstance] {
        &self.patterns
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the segment with fresh pattern state
    pub fn start(&mut self, now: Instant) {
        for pattern in &mut self.patterns {
            pattern.reset();
        }
        self.start_time = now;
        self.active = true;
    }

    /// Deactivate the segment and black out every line it draws on
    ///
    /// Nothing is flushed here, the black-out shows with the next frame.
    pub fn stop(&mut self, pixels: &mut PixelBuffer) {
        self.active = false;
        for pattern in &self.patterns {
            pattern.clear(pixels);
        }
    }

    /// Whether an active segment has used up its duration
    pub fn is_finished(&self, now: Instant) -> bool {
        self.active && now.saturating_duration_since(self.start_time) >= self.duration
    }

    /// Update every pattern once
    pub fn update(&mut self, now: Instant, pixels: &mut PixelBuffer, claims: LineClaims) {
        if !self.active {
            return;
        }
        for pattern in &mut self.patterns {
            pattern.update(now, pixels, claims);
        }
    }

    /// Time left before the segment finishes
    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            Duration::from_millis(0)
        } else {
            self.duration - elapsed
        }
    }

    /// Reactivate a paused segment so exactly `remaining` is left
    ///
    /// Pattern state is kept, only the start time moves.
    pub fn resume_with_remaining(&mut self, now: Instant, remaining: Duration) {
        let remaining = remaining.min(self.duration);
        let elapsed = self.duration - remaining;
        self.start_time = now.checked_sub(elapsed).unwrap_or(Instant::from_millis(0));
        self.active = true;
    }

    /// Lines currently held by an override pattern in this segment
    pub(crate) fn claims(&self) -> LineClaims {
        let mut claims = LineClaims::NONE;
        for pattern in &self.patterns {
            claims = claims.union(pattern.claims());
        }
        claims
    }

    /// `Some(complete)` when the segment runs a flashbulb
    pub(crate) fn flashbulb_complete(&self) -> Option<bool> {
        self.patterns
            .iter()
            .find_map(PatternInstance::flashbulb_complete)
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        for (offset, pattern) in (0u64..).zip(&mut self.patterns) {
            pattern.reseed(seed.wrapping_add(offset));
        }
    }
}
