//! Interrupt requests
//!
//! Requests are built by whatever receives show commands (network handler,
//! buttons, a preview window) and either handed straight to
//! [`Program::trigger_interrupt`](crate::Program::trigger_interrupt) or queued
//! in a [`RequestChannel`] that the render loop drains every frame.

use alloc::vec;

use embassy_time::Duration;

use crate::{
    channel::{Channel, Receiver, Sender},
    layout::LineSet,
    pattern::{PatternInstance, PatternParams, PatternType},
    segment::Segment,
};

/// Ad-hoc pattern that temporarily replaces the playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptRequest {
    pub params: PatternParams,
    pub lines: LineSet,
    /// How long the interrupt runs, ignored by self-completing patterns
    pub duration: Duration,
    pub reverse: bool,
}

impl InterruptRequest {
    pub fn new(params: impl Into<PatternParams>, lines: &[u8], duration: Duration) -> Self {
        Self {
            params: params.into(),
            lines: LineSet::new(lines),
            duration,
            reverse: false,
        }
    }

    /// Request a pattern with all of its default parameters
    pub fn with_defaults(pattern: PatternType, lines: &[u8], duration: Duration) -> Self {
        Self::new(pattern.default_params(), lines, duration)
    }

    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub const fn pattern_type(&self) -> PatternType {
        self.params.pattern_type()
    }

    /// Build the segment that runs this request
    pub fn into_segment(self) -> Segment {
        let instance =
            PatternInstance::new(self.params, self.lines.as_slice()).with_reverse(self.reverse);
        Segment::new(vec![instance], self.duration)
    }
}

/// Type alias for request sender
pub type RequestSender<'a, const SIZE: usize> = Sender<'a, InterruptRequest, SIZE>;

/// Type alias for request receiver
pub type RequestReceiver<'a, const SIZE: usize> = Receiver<'a, InterruptRequest, SIZE>;

/// Type alias for the request channel
pub type RequestChannel<const SIZE: usize> = Channel<InterruptRequest, SIZE>;
