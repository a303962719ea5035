//! Global output brightness with smooth fades
//!
//! Used for the fade-out before an interrupt and the fade-in when the
//! playlist comes back. The filter works on the output copy of the frame, so
//! the pixel buffer keeps the undimmed picture while brightness ramps.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::Filter;
use crate::{color::Rgb, math8::scale8, transition::ValueTransition};

/// Brightness transition applied to outgoing frames
#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    /// Brightness the show runs at when no fade is in progress
    full: u8,
    /// Current brightness value (0-255)
    brightness: ValueTransition<u8>,
}

impl BrightnessFilter {
    /// Create a filter sitting at its full brightness
    pub const fn new(full: u8) -> Self {
        Self {
            full,
            brightness: ValueTransition::new_u8(full),
        }
    }

    /// Brightness the filter returns to
    pub const fn full(&self) -> u8 {
        self.full
    }

    /// Brightness applied to the next frame
    pub const fn current(&self) -> u8 {
        self.brightness.current()
    }

    /// Check if a fade is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.brightness.is_transitioning()
    }

    /// Ramp linearly from the current brightness down to black
    pub fn fade_out(&mut self, duration: Duration, now: Instant) {
        #[cfg(feature = "esp32-log")]
        println!("[BrightnessFilter.fade_out] {}ms", duration.as_millis());
        self.brightness.set(0, duration, now);
    }

    /// Start from black and ramp linearly up to full brightness
    pub fn fade_in(&mut self, duration: Duration, now: Instant) {
        #[cfg(feature = "esp32-log")]
        println!("[BrightnessFilter.fade_in] {}ms", duration.as_millis());
        self.brightness.snap(0);
        self.brightness.set(self.full, duration, now);
    }

    /// Jump straight back to full brightness
    pub fn restore(&mut self) {
        self.brightness.snap(self.full);
    }
}

impl Filter for BrightnessFilter {
    fn apply(&mut self, frame: &mut [Rgb]) {
        let current = self.brightness.current();

        if current == 255 {
            return;
        }

        if current == 0 {
            frame.fill(Rgb { r: 0, g: 0, b: 0 });
            return;
        }

        for pixel in frame.iter_mut() {
            pixel.r = scale8(pixel.r, current);
            pixel.g = scale8(pixel.g, current);
            pixel.b = scale8(pixel.b, current);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.brightness.tick(now);
    }
}
