use embassy_time::Instant;

use crate::color::Rgb;

mod brightness;

pub use brightness::BrightnessFilter;

/// Post-processing applied to the output copy of a frame
pub(crate) trait Filter {
    /// Apply the filter to a frame
    fn apply(&mut self, frame: &mut [Rgb]);

    fn tick(&mut self, _now: Instant) {}
}
