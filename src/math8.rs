//! 8-bit fixed point helpers in the spirit of `FastLED`'s `lib8tion`.

use embassy_time::Duration;

/// Lowest speed on the 1-100 speed scale
pub const SPEED_MIN: u8 = 1;
/// Highest speed on the 1-100 speed scale
pub const SPEED_MAX: u8 = 100;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale an 8-bit value, never letting a non-zero input fall to zero
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = ((value as u16 * scale as u16) >> 8) as u8;
    if value != 0 && scale != 0 {
        scaled + 1
    } else {
        scaled
    }
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Calculate progress (0-255) based on elapsed time and duration
///
/// A zero duration counts as already complete.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

/// Re-map a number from one range to another (Arduino `map()`)
///
/// Integer division truncates toward zero, exactly like the Arduino core.
/// A degenerate input range maps everything to `out_min`.
pub const fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Map a 1-100 speed onto an update interval, slowest at speed 1
///
/// Speeds outside of the scale are clamped first so a bad request can never
/// produce a negative interval.
#[allow(clippy::cast_sign_loss)]
pub fn speed_interval(speed: u8, slowest_ms: u16, fastest_ms: u16) -> Duration {
    let speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    let ms = map_range(
        i32::from(speed),
        i32::from(SPEED_MIN),
        i32::from(SPEED_MAX),
        i32::from(slowest_ms),
        i32::from(fastest_ms),
    );
    Duration::from_millis(ms.max(0) as u64)
}
