use std::cmp::Ordering;

/// Line-breaking behaviour of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BreakClass {
    /// Letters, digits and everything not listed elsewhere.
    Alphabetic,
    /// Line feed; always ends the line.
    Newline,
    /// Breakable whitespace; hangs at the end of a line.
    Space,
    /// Invisible break opportunity.
    ZeroWidthSpace,
    /// Break allowed after.
    Hyphen,
    /// CJK ideographs, kana and hangul; break allowed on both sides.
    Ideographic,
    /// Joiners, variation selectors, combining marks, no-break spaces; never break around.
    Glue,
    /// Never break before.
    ClosePunct,
    /// Never break after.
    OpenPunct,
}

/// Sorted, non-overlapping inclusive code point ranges; anything else is alphabetic.
type RangeTable = &'static [(u32, u32, BreakClass)];

const DEFAULT_TABLE: RangeTable = {
    use BreakClass::*;
    &[
        (0x09, 0x09, Space),
        (0x0A, 0x0A, Newline),
        (0x20, 0x20, Space),
        (0x21, 0x21, ClosePunct),
        (0x28, 0x28, OpenPunct),
        (0x29, 0x29, ClosePunct),
        (0x2C, 0x2C, ClosePunct),
        (0x2D, 0x2D, Hyphen),
        (0x2E, 0x2E, ClosePunct),
        (0x3A, 0x3B, ClosePunct),
        (0x3F, 0x3F, ClosePunct),
        (0x5B, 0x5B, OpenPunct),
        (0x5D, 0x5D, ClosePunct),
        (0x7B, 0x7B, OpenPunct),
        (0x7D, 0x7D, ClosePunct),
        (0xA0, 0xA0, Glue),
        (0xA1, 0xA1, OpenPunct),
        (0xAD, 0xAD, Hyphen),
        (0xBF, 0xBF, OpenPunct),
        (0x300, 0x36F, Glue),
        (0x1680, 0x1680, Space),
        (0x1AB0, 0x1AFF, Glue),
        (0x1DC0, 0x1DFF, Glue),
        (0x2000, 0x2006, Space),
        (0x2007, 0x2007, Glue),
        (0x2008, 0x200A, Space),
        (0x200B, 0x200B, ZeroWidthSpace),
        (0x200C, 0x200D, Glue),
        (0x2010, 0x2010, Hyphen),
        (0x2011, 0x2011, Glue),
        (0x2012, 0x2014, Hyphen),
        (0x2018, 0x2018, OpenPunct),
        (0x2019, 0x2019, ClosePunct),
        (0x201C, 0x201C, OpenPunct),
        (0x201D, 0x201D, ClosePunct),
        (0x2026, 0x2026, ClosePunct),
        (0x202F, 0x202F, Glue),
        (0x205F, 0x205F, Space),
        (0x2060, 0x2060, Glue),
        (0x20D0, 0x20FF, Glue),
        (0x2E80, 0x2FFF, Ideographic),
        (0x3000, 0x3000, Space),
        (0x3001, 0x3002, ClosePunct),
        (0x3003, 0x3007, Ideographic),
        (0x3008, 0x3008, OpenPunct),
        (0x3009, 0x3009, ClosePunct),
        (0x300A, 0x300A, OpenPunct),
        (0x300B, 0x300B, ClosePunct),
        (0x300C, 0x300C, OpenPunct),
        (0x300D, 0x300D, ClosePunct),
        (0x300E, 0x300E, OpenPunct),
        (0x300F, 0x300F, ClosePunct),
        (0x3010, 0x3010, OpenPunct),
        (0x3011, 0x3011, ClosePunct),
        (0x3012, 0x303F, Ideographic),
        (0x3040, 0x30FF, Ideographic),
        (0x3100, 0x31FF, Ideographic),
        (0x3400, 0x4DBF, Ideographic),
        (0x4E00, 0x9FFF, Ideographic),
        (0xA000, 0xA4CF, Ideographic),
        (0xAC00, 0xD7AF, Ideographic),
        (0xF900, 0xFAFF, Ideographic),
        (0xFE00, 0xFE0F, Glue),
        (0xFE20, 0xFE2F, Glue),
        (0xFEFF, 0xFEFF, Glue),
        (0xFF01, 0xFF01, ClosePunct),
        (0xFF08, 0xFF08, OpenPunct),
        (0xFF09, 0xFF09, ClosePunct),
        (0xFF0C, 0xFF0C, ClosePunct),
        (0xFF0E, 0xFF0E, ClosePunct),
        (0xFF1A, 0xFF1B, ClosePunct),
        (0xFF1F, 0xFF1F, ClosePunct),
        (0xFF5B, 0xFF5B, OpenPunct),
        (0xFF5D, 0xFF5D, ClosePunct),
        (0x1F3FB, 0x1F3FF, Glue),
        (0x20000, 0x3FFFF, Ideographic),
        (0xE0020, 0xE007F, Glue),
        (0xE0100, 0xE01EF, Glue),
    ]
};

/// Table-driven line-break rules.
#[derive(Clone, Copy, Debug)]
pub struct BreakPolicy {
    table: RangeTable,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BreakPolicy {
    /// Rules covering Latin punctuation, CJK and emoji sequences.
    pub const DEFAULT: Self = Self {
        table: DEFAULT_TABLE,
    };

    /// Class of `ch`.
    pub fn class(&self, ch: char) -> BreakClass {
        let c = u32::from(ch);
        self.table
            .binary_search_by(|&(lo, hi, _)| {
                if hi < c {
                    Ordering::Less
                } else if lo > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .map_or(BreakClass::Alphabetic, |i| self.table[i].2)
    }

    /// Return `true` when `ch` is breakable whitespace.
    pub fn is_space(&self, ch: char) -> bool {
        self.class(ch) == BreakClass::Space
    }

    /// Return `true` when a line may end after `before` and continue with `after`.
    pub fn can_break_between(&self, before: char, after: char) -> bool {
        use BreakClass::*;
        match (self.class(before), self.class(after)) {
            (Glue, _) | (_, Glue) => false,
            (Newline, _) => true,
            (_, Space | Newline | ClosePunct) => false,
            (OpenPunct, _) => false,
            (Space | ZeroWidthSpace | Hyphen, _) => true,
            (Ideographic, _) | (_, Ideographic) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/breaks.rs"]
mod tests;
