//! Playlist scheduler with interrupts
//!
//! The program cycles through its segments and renders the current one every
//! tick. An interrupt pauses the playlist, fades the output to black, runs its
//! own segment for the requested time and fades back into the playlist, which
//! then continues with exactly the time it had left. A flashbulb interrupt
//! skips the fades and runs on top of the playlist until it completes.
//!
//! ```text
//! None -> TransitioningOut -> Active -> TransitioningIn -> None
//! None -> Active -> None                       (flashbulb)
//! ```

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
use rand::{RngCore, SeedableRng, rngs::SmallRng};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    channel::Receiver,
    color::Rgb,
    filter::{BrightnessFilter, Filter},
    layout::{LineClaims, LineLayout},
    pattern::{DEFAULT_SEED, PatternType},
    pixels::PixelBuffer,
    request::InterruptRequest,
    segment::Segment,
};

/// Default fade time around interrupts
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

/// Construction-time settings of a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    pub layout: LineLayout,
    /// Fade-out and fade-in time around non-flashbulb interrupts
    pub transition: Duration,
    /// Brightness the show runs at
    pub brightness: u8,
    /// Seeds the random source of every interrupt
    pub seed: u64,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            layout: LineLayout::default(),
            transition: DEFAULT_TRANSITION,
            brightness: 255,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterruptState {
    #[default]
    None,
    TransitioningOut,
    Active,
    TransitioningIn,
}

/// How an interrupt decides it is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Runs for the requested duration
    Timed,
    /// Runs until the flash has given every line its frame back
    Flashbulb,
}

#[derive(Debug, Clone)]
pub struct Interrupt {
    pub segment: Segment,
    pub completion: Completion,
}

/// Where the playlist stood when an interrupt paused it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedSegmentState {
    pub index: usize,
    pub paused_at: Instant,
    pub remaining: Duration,
}

pub struct Program {
    slots: Vec<Option<Segment>>,
    current: usize,
    running: bool,

    interrupt_state: InterruptState,
    interrupt: Option<Interrupt>,
    saved: Option<SavedSegmentState>,
    transition: Duration,
    transition_start: Instant,

    pixels: PixelBuffer,
    output: Vec<Rgb>,
    brightness: BrightnessFilter,
    rng: SmallRng,
}

impl Program {
    /// Create a stopped program with `slots` empty playlist slots
    pub fn new(config: ProgramConfig, slots: usize) -> Self {
        let pixels = PixelBuffer::new(config.layout);
        let output = pixels.as_slice().to_vec();
        Self {
            slots: (0..slots).map(|_| None).collect(),
            current: 0,
            running: false,
            interrupt_state: InterruptState::None,
            interrupt: None,
            saved: None,
            transition: config.transition,
            transition_start: Instant::from_millis(0),
            pixels,
            output,
            brightness: BrightnessFilter::new(config.brightness),
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// Put `segment` into playlist slot `index`
    ///
    /// The segment's random patterns are reseeded from the program. Hands the
    /// segment back when the slot does not exist.
    pub fn add_segment(&mut self, index: usize, mut segment: Segment) -> Result<(), Segment> {
        match self.slots.get_mut(index) {
            Some(slot) => {
                segment.reseed(self.rng.next_u64());
                *slot = Some(segment);
                Ok(())
            }
            None => Err(segment),
        }
    }

    /// Start the playlist at slot 0
    ///
    /// Does nothing while slot 0 is empty.
    pub fn start(&mut self, now: Instant) {
        let Some(Some(segment)) = self.slots.first_mut() else {
            return;
        };
        segment.start(now);
        self.current = 0;
        self.running = true;

        #[cfg(feature = "esp32-log")]
        println!("[Program.start] slots: {}", self.slots.len());
    }

    /// Stop the playlist and drop any interrupt
    pub fn stop(&mut self) {
        if let Some(segment) = self.slots.get_mut(self.current).and_then(Option::as_mut) {
            segment.stop(&mut self.pixels);
        }
        if let Some(mut interrupt) = self.interrupt.take() {
            interrupt.segment.stop(&mut self.pixels);
        }
        self.interrupt_state = InterruptState::None;
        self.saved = None;
        self.brightness.restore();
        self.running = false;
    }

    /// Advance the show by one tick and return the frame to display
    pub fn update(&mut self, now: Instant) -> &[Rgb] {
        if self.running {
            self.advance_transitions(now);

            match self.interrupt_state {
                InterruptState::None => self.update_playlist(now),
                InterruptState::TransitioningOut => {}
                InterruptState::Active => self.update_interrupt(now),
                InterruptState::TransitioningIn => {
                    // The playlist clock stays frozen until the fade-in ends
                    if let Some(segment) = self.slots.get_mut(self.current).and_then(Option::as_mut) {
                        segment.update(now, &mut self.pixels, LineClaims::NONE);
                    }
                }
            }
        }

        self.output.copy_from_slice(self.pixels.as_slice());
        self.brightness.apply(&mut self.output);
        &self.output
    }

    /// Pause the playlist and run `request` in its place
    ///
    /// The request is handed back while another interrupt is in progress or
    /// the program is not running.
    pub fn trigger_interrupt(
        &mut self,
        request: InterruptRequest,
        now: Instant,
    ) -> Result<(), InterruptRequest> {
        if !self.running || self.interrupt_state != InterruptState::None {
            #[cfg(feature = "esp32-log")]
            println!(
                "[Program.trigger_interrupt] rejected {}",
                request.pattern_type().as_str()
            );
            return Err(request);
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[Program.trigger_interrupt] {} on {} lines",
            request.pattern_type().as_str(),
            request.lines.len()
        );

        self.saved = self
            .current_segment()
            .map(|segment| SavedSegmentState {
                index: self.current,
                paused_at: now,
                remaining: segment.remaining(now),
            });

        let completion = if request.pattern_type() == PatternType::Flashbulb {
            Completion::Flashbulb
        } else {
            Completion::Timed
        };
        let mut segment = request.into_segment();
        segment.reseed(self.rng.next_u64());

        match completion {
            Completion::Flashbulb => {
                segment.start(now);
                self.interrupt_state = InterruptState::Active;
            }
            Completion::Timed => {
                self.transition_start = now;
                self.brightness.fade_out(self.transition, now);
                self.interrupt_state = InterruptState::TransitioningOut;
            }
        }
        self.interrupt = Some(Interrupt {
            segment,
            completion,
        });

        Ok(())
    }

    /// Trigger every queued request in order
    ///
    /// Requests arriving while one is in progress are dropped. Returns the
    /// number of accepted requests.
    pub fn process_requests<const SIZE: usize>(
        &mut self,
        requests: &Receiver<'_, InterruptRequest, SIZE>,
        now: Instant,
    ) -> usize {
        let mut accepted = 0;
        while let Ok(request) = requests.try_receive() {
            if self.trigger_interrupt(request, now).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the playlist slot that is playing or paused
    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub const fn interrupt_state(&self) -> InterruptState {
        self.interrupt_state
    }

    pub const fn interrupt(&self) -> Option<&Interrupt> {
        self.interrupt.as_ref()
    }

    pub const fn saved_state(&self) -> Option<&SavedSegmentState> {
        self.saved.as_ref()
    }

    /// Brightness applied to the last returned frame
    pub const fn brightness(&self) -> u8 {
        self.brightness.current()
    }

    /// Frame before brightness is applied
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Frame returned by the last update
    pub fn output(&self) -> &[Rgb] {
        &self.output
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn current_segment(&self) -> Option<&Segment> {
        self.segment(self.current)
    }

    fn current_segment_mut(&mut self) -> Option<&mut Segment> {
        self.slots.get_mut(self.current).and_then(Option::as_mut)
    }

    fn advance_transitions(&mut self, now: Instant) {
        self.brightness.tick(now);

        let done = now.saturating_duration_since(self.transition_start) >= self.transition;
        match self.interrupt_state {
            InterruptState::TransitioningOut if done => {
                #[cfg(feature = "esp32-log")]
                println!("[Program.advance_transitions] interrupt active");

                if let Some(interrupt) = self.interrupt.as_mut() {
                    interrupt.segment.start(now);
                }
                self.brightness.restore();
                self.interrupt_state = InterruptState::Active;
            }
            InterruptState::TransitioningIn if done => {
                #[cfg(feature = "esp32-log")]
                println!("[Program.advance_transitions] playlist resumed");

                self.resume_playlist(now);
                self.brightness.restore();
                self.interrupt_state = InterruptState::None;
            }
            _ => {}
        }
    }

    fn update_interrupt(&mut self, now: Instant) {
        let Some(interrupt) = self.interrupt.as_mut() else {
            self.interrupt_state = InterruptState::None;
            return;
        };

        let completion = interrupt.completion;
        let finished = match completion {
            Completion::Flashbulb => {
                // The playlist keeps running on every line the flash does not hold
                let claims = interrupt.segment.claims();
                if let Some(segment) = self.slots.get_mut(self.current).and_then(Option::as_mut) {
                    segment.update(now, &mut self.pixels, claims);
                }
                interrupt.segment.update(now, &mut self.pixels, LineClaims::NONE);
                interrupt.segment.flashbulb_complete().unwrap_or(true)
            }
            Completion::Timed => {
                interrupt.segment.update(now, &mut self.pixels, LineClaims::NONE);
                interrupt.segment.is_finished(now)
            }
        };
        if !finished {
            return;
        }

        match completion {
            Completion::Flashbulb => {
                #[cfg(feature = "esp32-log")]
                println!("[Program.update_interrupt] flashbulb complete");

                // The flash already restored its lines, no black-out
                self.interrupt = None;
                self.resume_playlist(now);
                self.interrupt_state = InterruptState::None;
                if let Some(segment) = self.slots.get_mut(self.current).and_then(Option::as_mut) {
                    segment.update(now, &mut self.pixels, LineClaims::NONE);
                }
            }
            Completion::Timed => {
                #[cfg(feature = "esp32-log")]
                println!("[Program.update_interrupt] interrupt finished");

                interrupt.segment.stop(&mut self.pixels);
                self.interrupt = None;
                self.transition_start = now;
                self.brightness.fade_in(self.transition, now);
                self.interrupt_state = InterruptState::TransitioningIn;
            }
        }
    }

    fn update_playlist(&mut self, now: Instant) {
        let Some(segment) = self.slots.get_mut(self.current).and_then(Option::as_mut) else {
            return;
        };
        segment.update(now, &mut self.pixels, LineClaims::NONE);
        if !segment.is_finished(now) {
            return;
        }
        segment.stop(&mut self.pixels);

        let Some(next) = self.next_slot() else {
            return;
        };
        #[cfg(feature = "esp32-log")]
        println!("[Program.update_playlist] segment {} -> {}", self.current, next);

        self.current = next;
        if let Some(segment) = self.current_segment_mut() {
            segment.start(now);
        }
    }

    /// Next filled slot after the current one, wrapping around
    fn next_slot(&self) -> Option<usize> {
        let count = self.slots.len();
        (1..=count)
            .map(|offset| (self.current + offset) % count)
            .find(|&index| self.slots[index].is_some())
    }

    fn resume_playlist(&mut self, now: Instant) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        self.current = saved.index;
        if let Some(segment) = self.current_segment_mut() {
            segment.resume_with_remaining(now, saved.remaining);
        }
    }
}
