pub mod named;
mod palette;
mod utils;

pub use palette::{MAX_PALETTE_SIZE, Palette};
use smart_leds::RGB8;
pub use utils::{BLACK, WHITE, blend_colors, heat_color, parse_hex_color, rgb_from_u32, scale_color};

pub type Rgb = RGB8;
