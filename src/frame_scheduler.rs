//! Frame pacing for the render loop.
//!
//! Portable, no async and no platform timers: the scheduler renders one frame
//! per call and tells the caller how long to wait before the next one.

use embassy_time::{Duration, Instant};

use crate::{OutputDriver, program::Program, request::RequestReceiver};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero when behind schedule).
    pub sleep_duration: Duration,
}

/// Drives a [`Program`] and pushes every frame to the output driver.
///
/// Each tick:
/// - triggers the interrupt requests queued since the last frame
/// - updates the program
/// - writes the frame to the driver, exactly once
///
/// ```ignore
/// static REQUESTS: RequestChannel<4> = RequestChannel::new();
///
/// let mut scheduler = FrameScheduler::new(program, REQUESTS.receiver(), driver);
/// loop {
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const REQUEST_CHANNEL_SIZE: usize> {
    output: O,
    program: Program,
    requests: RequestReceiver<'a, REQUEST_CHANNEL_SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: OutputDriver, const REQUEST_CHANNEL_SIZE: usize>
    FrameScheduler<'a, O, REQUEST_CHANNEL_SIZE>
{
    /// Create a scheduler running at [`DEFAULT_FPS`].
    pub fn new(
        program: Program,
        requests: RequestReceiver<'a, REQUEST_CHANNEL_SIZE>,
        driver: O,
    ) -> Self {
        Self::with_frame_duration(program, requests, driver, DEFAULT_FRAME_DURATION)
    }

    pub fn with_frame_duration(
        program: Program,
        requests: RequestReceiver<'a, REQUEST_CHANNEL_SIZE>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            program,
            requests,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Render one frame and return when the next one is due.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // After a long stall skip the backlog instead of catching up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.program.process_requests(&self.requests, now);
        let frame = self.program.update(now);
        self.output.write(frame);

        self.next_frame += self.frame_duration;
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }

    pub const fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    pub const fn output(&self) -> &O {
        &self.output
    }
}
