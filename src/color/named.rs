//! Web/`FastLED` named colors used by the built-in defaults
#![allow(clippy::unreadable_literal)]

use super::{Rgb, rgb_from_u32};

pub const RED: Rgb = rgb_from_u32(0xFF0000);
pub const ORANGE: Rgb = rgb_from_u32(0xFFA500);
pub const YELLOW: Rgb = rgb_from_u32(0xFFFF00);
pub const GREEN: Rgb = rgb_from_u32(0x008000);
pub const TEAL: Rgb = rgb_from_u32(0x008080);
pub const CYAN: Rgb = rgb_from_u32(0x00FFFF);
pub const BLUE: Rgb = rgb_from_u32(0x0000FF);
pub const PURPLE: Rgb = rgb_from_u32(0x800080);
pub const MAGENTA: Rgb = rgb_from_u32(0xFF00FF);
pub const PINK: Rgb = rgb_from_u32(0xFFC0CB);
