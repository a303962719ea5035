#![no_std]

extern crate alloc;

pub mod channel;
pub mod color;
pub mod filter;
pub mod frame_scheduler;
pub mod layout;
pub mod math8;
pub mod pattern;
pub mod pixels;
pub mod program;
pub mod request;
pub mod segment;
pub mod transition;

pub use frame_scheduler::FrameScheduler;
pub use layout::{DEFAULT_LAYOUT, LineClaims, LineLayout, LineSet, MAX_LINES};
pub use pattern::{PatternInstance, PatternParams, PatternType};
pub use pixels::PixelBuffer;
pub use program::{InterruptState, Program, ProgramConfig, SavedSegmentState};
pub use request::{InterruptRequest, RequestChannel, RequestReceiver, RequestSender};
pub use segment::Segment;

pub use color::{Palette, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to push frames to the hardware. The frame scheduler
/// calls it once per frame with the brightness-adjusted colors of every line.
pub trait OutputDriver {
    /// Write colors to the LED lines
    fn write(&mut self, colors: &[Rgb]);
}
