//! Pattern system with compile-time known pattern variants
//!
//! Every pattern keeps its own per-line state next to its parameters, so two
//! instances of the same pattern never share animation state. All patterns
//! are stored in an enum and dispatched with a `match`.

mod breathing;
mod chase;
mod flame;
mod flashbulb;
mod grow;
mod pop;
mod spin;

use embassy_time::{Duration, Instant};

pub use breathing::{BreathingParams, BreathingPattern};
pub use chase::{ChaseParams, ChasePattern, ChasePhase};
pub use flame::{FlameParams, FlamePattern};
pub use flashbulb::{FlashbulbParams, FlashbulbPattern, FlashbulbPhase};
pub use grow::{GrowParams, GrowPattern, GrowPhase};
pub use pop::{PopParams, PopPattern};
pub use spin::{SpinParams, SpinPattern};

use crate::{
    color::{
        Palette, Rgb,
        named::{BLUE, CYAN, GREEN, MAGENTA, ORANGE, PINK, PURPLE, RED, YELLOW},
        WHITE,
    },
    layout::{LineClaims, LineSet},
    pixels::PixelBuffer,
};

const PATTERN_NAME_BREATHING: &str = "breathing";
const PATTERN_NAME_FLAME: &str = "flame";
const PATTERN_NAME_GROW: &str = "grow";
const PATTERN_NAME_CHASE: &str = "chase";
const PATTERN_NAME_POP: &str = "pop";
const PATTERN_NAME_SPIN: &str = "spin";
const PATTERN_NAME_FLASHBULB: &str = "flashbulb";

const PATTERN_ID_BREATHING: u8 = 0;
const PATTERN_ID_FLAME: u8 = 1;
const PATTERN_ID_GROW: u8 = 2;
const PATTERN_ID_CHASE: u8 = 3;
const PATTERN_ID_POP: u8 = 4;
const PATTERN_ID_SPIN: u8 = 5;
const PATTERN_ID_FLASHBULB: u8 = 6;

/// Seed used by patterns that have not been given one explicitly
pub const DEFAULT_SEED: u64 = 0x5eed_f1a3_e000_0001;

/// Everything a pattern needs for one update
pub struct RenderContext<'a> {
    /// Current time
    pub now: Instant,
    /// Frame to draw into
    pub pixels: &'a mut PixelBuffer,
    /// Lines this pattern owns
    pub lines: &'a LineSet,
    /// Mirror the write order inside every line
    pub reverse: bool,
    /// Lines currently owned by an override
    pub claims: LineClaims,
}

pub trait Pattern {
    /// Advance by at most one step and draw into the owned lines
    fn update(&mut self, ctx: &mut RenderContext<'_>);

    /// Return every piece of animation state to its initial value
    fn reset(&mut self);
}

/// Self-throttling helper shared by the patterns
///
/// A fresh throttle fires on its first check; afterwards it fires once the
/// interval has elapsed since the last time it fired.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Throttle {
    last: Option<Instant>,
}

impl Throttle {
    pub(crate) fn ready(&mut self, now: Instant, interval: Duration) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub(crate) fn reset(&mut self) {
        self.last = None;
    }
}

/// Slow cross-fade through a palette, one blend step per timer tick
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColorCycle {
    steps_per_color: u16,
    throttle: Throttle,
    index: usize,
    step: u16,
}

impl ColorCycle {
    pub(crate) const fn new(steps_per_color: u16) -> Self {
        Self {
            steps_per_color,
            throttle: Throttle { last: None },
            index: 0,
            step: 0,
        }
    }

    /// Move one blend step forward if the interval elapsed
    pub(crate) fn advance(&mut self, now: Instant, interval: Duration, palette_len: usize) {
        if palette_len == 0 || !self.throttle.ready(now, interval) {
            return;
        }
        self.step += 1;
        if self.step >= self.steps_per_color {
            self.step = 0;
            self.index = (self.index + 1) % palette_len;
        }
    }

    /// Color between the current palette entry and the next one
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn color(&self, palette: &Palette) -> Rgb {
        let amount = (u32::from(self.step) * 255 / u32::from(self.steps_per_color.max(1))) as u8;
        palette.blend(self.index, amount)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.steps_per_color);
    }
}

/// Known pattern ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternType {
    Breathing = PATTERN_ID_BREATHING,
    Flame = PATTERN_ID_FLAME,
    Grow = PATTERN_ID_GROW,
    Chase = PATTERN_ID_CHASE,
    Pop = PATTERN_ID_POP,
    Spin = PATTERN_ID_SPIN,
    Flashbulb = PATTERN_ID_FLASHBULB,
}

impl PatternType {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_BREATHING => Self::Breathing,
            PATTERN_ID_FLAME => Self::Flame,
            PATTERN_ID_GROW => Self::Grow,
            PATTERN_ID_CHASE => Self::Chase,
            PATTERN_ID_POP => Self::Pop,
            PATTERN_ID_SPIN => Self::Spin,
            PATTERN_ID_FLASHBULB => Self::Flashbulb,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breathing => PATTERN_NAME_BREATHING,
            Self::Flame => PATTERN_NAME_FLAME,
            Self::Grow => PATTERN_NAME_GROW,
            Self::Chase => PATTERN_NAME_CHASE,
            Self::Pop => PATTERN_NAME_POP,
            Self::Spin => PATTERN_NAME_SPIN,
            Self::Flashbulb => PATTERN_NAME_FLASHBULB,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_BREATHING => Some(Self::Breathing),
            PATTERN_NAME_FLAME => Some(Self::Flame),
            PATTERN_NAME_GROW => Some(Self::Grow),
            PATTERN_NAME_CHASE => Some(Self::Chase),
            PATTERN_NAME_POP => Some(Self::Pop),
            PATTERN_NAME_SPIN => Some(Self::Spin),
            PATTERN_NAME_FLASHBULB => Some(Self::Flashbulb),
            _ => None,
        }
    }

    /// Parameters used for every field a request leaves out
    pub fn default_params(self) -> PatternParams {
        match self {
            Self::Breathing => BreathingParams {
                speed: 50,
                palette: Palette::new(&[PURPLE, MAGENTA, BLUE]),
            }
            .into(),
            Self::Flame => FlameParams {
                speed: 80,
                cooling: 55,
                sparking: 120,
                warm_base: true,
            }
            .into(),
            Self::Grow => GrowParams {
                speed: 60,
                n: 1,
                fade_delay: Duration::from_millis(100),
                hold_delay: Duration::from_millis(2000),
                palette: Palette::new(&[CYAN, BLUE, PURPLE, MAGENTA, RED, ORANGE]),
                transition_speed: 40,
                offset_delay: Duration::from_millis(1000),
            }
            .into(),
            Self::Chase => ChaseParams {
                speed: 50,
                palette: Palette::new(&[RED, BLUE, GREEN]),
                transition_speed: 40,
                hold_delay: Duration::from_millis(1000),
            }
            .into(),
            Self::Pop => PopParams {
                speed: 10,
                hold_delay: Duration::from_millis(300),
                palette: Palette::new(&[RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, PINK, WHITE]),
                random: true,
                acceleration_time: Duration::from_secs(8),
            }
            .into(),
            Self::Spin => SpinParams {
                speed: 75,
                separation: 20,
                span: 15,
                palette: Palette::new(&[RED, BLUE, GREEN, YELLOW]),
                looping: true,
                continuous: true,
                blend: true,
            }
            .into(),
            Self::Flashbulb => FlashbulbParams {
                flash_duration: Duration::from_millis(100),
                fade_duration: Duration::from_millis(400),
                transition_duration: Duration::from_millis(1000),
            }
            .into(),
        }
    }
}

/// Parameters of one pattern, the variant selects the pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternParams {
    Breathing(BreathingParams),
    Flame(FlameParams),
    Grow(GrowParams),
    Chase(ChaseParams),
    Pop(PopParams),
    Spin(SpinParams),
    Flashbulb(FlashbulbParams),
}

impl PatternParams {
    pub const fn pattern_type(&self) -> PatternType {
        match self {
            Self::Breathing(_) => PatternType::Breathing,
            Self::Flame(_) => PatternType::Flame,
            Self::Grow(_) => PatternType::Grow,
            Self::Chase(_) => PatternType::Chase,
            Self::Pop(_) => PatternType::Pop,
            Self::Spin(_) => PatternType::Spin,
            Self::Flashbulb(_) => PatternType::Flashbulb,
        }
    }

    /// Build the pattern, with fresh state, for these parameters
    pub fn into_slot(self) -> PatternSlot {
        match self {
            Self::Breathing(params) => PatternSlot::Breathing(BreathingPattern::new(params)),
            Self::Flame(params) => PatternSlot::Flame(FlamePattern::new(params)),
            Self::Grow(params) => PatternSlot::Grow(GrowPattern::new(params)),
            Self::Chase(params) => PatternSlot::Chase(ChasePattern::new(params)),
            Self::Pop(params) => PatternSlot::Pop(PopPattern::new(params)),
            Self::Spin(params) => PatternSlot::Spin(SpinPattern::new(params)),
            Self::Flashbulb(params) => PatternSlot::Flashbulb(FlashbulbPattern::new(params)),
        }
    }
}

macro_rules! params_from {
    ($($params:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$params> for PatternParams {
                fn from(params: $params) -> Self {
                    Self::$variant(params)
                }
            }
        )*
    };
}

params_from! {
    BreathingParams => Breathing,
    FlameParams => Flame,
    GrowParams => Grow,
    ChaseParams => Chase,
    PopParams => Pop,
    SpinParams => Spin,
    FlashbulbParams => Flashbulb,
}

/// Pattern slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum PatternSlot {
    Breathing(BreathingPattern),
    Flame(FlamePattern),
    Grow(GrowPattern),
    Chase(ChasePattern),
    Pop(PopPattern),
    Spin(SpinPattern),
    Flashbulb(FlashbulbPattern),
}

impl PatternSlot {
    /// Update the current pattern
    pub fn update(&mut self, ctx: &mut RenderContext<'_>) {
        match self {
            Self::Breathing(pattern) => pattern.update(ctx),
            Self::Flame(pattern) => pattern.update(ctx),
            Self::Grow(pattern) => pattern.update(ctx),
            Self::Chase(pattern) => pattern.update(ctx),
            Self::Pop(pattern) => pattern.update(ctx),
            Self::Spin(pattern) => pattern.update(ctx),
            Self::Flashbulb(pattern) => pattern.update(ctx),
        }
    }

    /// Reset the pattern state
    pub fn reset(&mut self) {
        match self {
            Self::Breathing(pattern) => Pattern::reset(pattern),
            Self::Flame(pattern) => Pattern::reset(pattern),
            Self::Grow(pattern) => Pattern::reset(pattern),
            Self::Chase(pattern) => Pattern::reset(pattern),
            Self::Pop(pattern) => Pattern::reset(pattern),
            Self::Spin(pattern) => Pattern::reset(pattern),
            Self::Flashbulb(pattern) => Pattern::reset(pattern),
        }
    }

    /// Get the pattern type for external observation
    pub const fn pattern_type(&self) -> PatternType {
        match self {
            Self::Breathing(_) => PatternType::Breathing,
            Self::Flame(_) => PatternType::Flame,
            Self::Grow(_) => PatternType::Grow,
            Self::Chase(_) => PatternType::Chase,
            Self::Pop(_) => PatternType::Pop,
            Self::Spin(_) => PatternType::Spin,
            Self::Flashbulb(_) => PatternType::Flashbulb,
        }
    }

    /// Reseed the random source of patterns that use one
    pub fn reseed(&mut self, seed: u64) {
        match self {
            Self::Flame(pattern) => pattern.reseed(seed),
            Self::Pop(pattern) => pattern.reseed(seed),
            _ => {}
        }
    }
}

/// One pattern bound to the lines it draws on
#[derive(Debug, Clone)]
pub struct PatternInstance {
    slot: PatternSlot,
    lines: LineSet,
    reverse: bool,
}

impl PatternInstance {
    /// Bind a pattern to a set of lines
    ///
    /// Line indices that are out of range or repeated are skipped.
    pub fn new(params: impl Into<PatternParams>, lines: &[u8]) -> Self {
        Self {
            slot: params.into().into_slot(),
            lines: LineSet::new(lines),
            reverse: false,
        }
    }

    /// Mirror the write order inside every line
    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Use a specific random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.slot.reseed(seed);
        self
    }

    pub const fn pattern_type(&self) -> PatternType {
        self.slot.pattern_type()
    }

    pub const fn lines(&self) -> &LineSet {
        &self.lines
    }

    pub const fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub const fn slot(&self) -> &PatternSlot {
        &self.slot
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.slot.reseed(seed);
    }

    pub(crate) fn reset(&mut self) {
        self.slot.reset();
    }

    pub(crate) fn update(&mut self, now: Instant, pixels: &mut PixelBuffer, claims: LineClaims) {
        let mut ctx = RenderContext {
            now,
            pixels,
            lines: &self.lines,
            reverse: self.reverse,
            claims,
        };
        self.slot.update(&mut ctx);
    }

    /// Turn off every line this instance draws on
    pub(crate) fn clear(&self, pixels: &mut PixelBuffer) {
        for line in self.lines.iter() {
            pixels.clear_line(line);
        }
    }

    /// Lines this instance currently holds as an override
    pub(crate) fn claims(&self) -> LineClaims {
        match &self.slot {
            PatternSlot::Flashbulb(pattern) => pattern.claims(&self.lines),
            _ => LineClaims::NONE,
        }
    }

    /// Completion of a flashbulb instance, `None` for any other pattern
    pub(crate) fn flashbulb_complete(&self) -> Option<bool> {
        match &self.slot {
            PatternSlot::Flashbulb(pattern) => Some(pattern.is_complete()),
            _ => None,
        }
    }
}
