//! Physical output geometry: lines, line sets and line claims

use core::ops::Range;

use heapless::Vec;

/// Maximum number of physical output lines
pub const MAX_LINES: usize = 8;

/// The installation the controller was built for: 8 pins, each driving two
/// chained strips of 122 LEDs
pub const DEFAULT_LAYOUT: LineLayout = LineLayout {
    lines: 8,
    strips_per_line: 2,
    leds_per_strip: 122,
};

/// Geometry of the pixel buffer
///
/// Every line owns a contiguous block of `strips_per_line * leds_per_strip`
/// pixels; line `n` starts at `n * leds_per_line()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    lines: u8,
    strips_per_line: u16,
    leds_per_strip: u16,
}

impl LineLayout {
    /// Create a layout
    ///
    /// Returns `None` when there are no lines, more than [`MAX_LINES`] lines
    /// or no LEDs on a line.
    pub const fn new(lines: u8, strips_per_line: u16, leds_per_strip: u16) -> Option<Self> {
        if lines == 0 || lines as usize > MAX_LINES {
            return None;
        }
        if strips_per_line == 0 || leds_per_strip == 0 {
            return None;
        }
        Some(Self {
            lines,
            strips_per_line,
            leds_per_strip,
        })
    }

    /// Number of output lines
    pub const fn lines(self) -> u8 {
        self.lines
    }

    /// Number of LEDs driven by one line
    pub const fn leds_per_line(self) -> usize {
        self.strips_per_line as usize * self.leds_per_strip as usize
    }

    /// Total number of pixels across all lines
    pub const fn total_leds(self) -> usize {
        self.lines as usize * self.leds_per_line()
    }

    /// Whether `line` is a physical line of this layout
    pub const fn contains(self, line: u8) -> bool {
        line < self.lines
    }

    /// Pixel index range owned by `line`
    pub const fn line_range(self, line: u8) -> Option<Range<usize>> {
        if !self.contains(line) {
            return None;
        }
        let start = line as usize * self.leds_per_line();
        Some(start..start + self.leds_per_line())
    }
}

impl Default for LineLayout {
    fn default() -> Self {
        DEFAULT_LAYOUT
    }
}

/// Map a logical index onto a physical one inside a line of `len` pixels
///
/// With `reverse` the line is mirrored: `i -> len - 1 - i`.
#[inline]
pub const fn mirror_index(len: usize, index: usize, reverse: bool) -> usize {
    if reverse { len - 1 - index } else { index }
}

/// Ordered set of line indices a pattern runs on
///
/// Order matters: it is the visiting order of pop and the rank used for the
/// grow start offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet {
    lines: Vec<u8, MAX_LINES>,
}

impl LineSet {
    /// Build a line set
    ///
    /// Entries outside `0..MAX_LINES` and repeated entries are skipped one by
    /// one; the remaining order is kept.
    pub fn new(indices: &[u8]) -> Self {
        let mut set = Self::default();
        for &line in indices {
            set.insert(line);
        }
        set
    }

    /// All lines `0..count`
    pub fn first(count: u8) -> Self {
        let mut set = Self::default();
        for line in 0..count {
            set.insert(line);
        }
        set
    }

    /// Append a line, returns `false` if it was skipped
    pub fn insert(&mut self, line: u8) -> bool {
        if line as usize >= MAX_LINES || self.contains(line) {
            return false;
        }
        self.lines.push(line).is_ok()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, line: u8) -> bool {
        self.lines.contains(&line)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.lines
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u8> + '_ {
        self.lines.iter().copied()
    }
}

impl From<&[u8]> for LineSet {
    fn from(indices: &[u8]) -> Self {
        Self::new(indices)
    }
}

/// Lines temporarily owned by an override pattern
///
/// The scheduler builds this every tick from the running override and hands
/// it to every pattern; patterns that honor claims leave those lines alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClaims(u8);

impl LineClaims {
    /// No line is claimed
    pub const NONE: Self = Self(0);

    /// Mark `line` as claimed, out of range lines are ignored
    pub fn claim(&mut self, line: u8) {
        if (line as usize) < MAX_LINES {
            self.0 |= 1 << line;
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_claimed(self, line: u8) -> bool {
        (line as usize) < MAX_LINES && self.0 & (1 << line) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
