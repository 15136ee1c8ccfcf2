use crate::foundation::core::PackedColor;

const CHAR_BITS: u32 = 21;
const CHAR_MASK: u64 = (1 << CHAR_BITS) - 1;

const FLAGS_SHIFT: u32 = 21;
const FLAGS_MASK: u64 = 0x1FF;

const SCRIPT_SHIFT: u32 = 30;
const SCRIPT_MASK: u64 = 0x3;

const FONT_SHIFT: u32 = 32;
const FONT_MASK: u64 = 0xF;

const SIZE_SHIFT: u32 = 36;
const SIZE_MASK: u64 = 0x3FF;

/// Largest font selector that fits the encoding.
pub const MAX_FONT: u8 = FONT_MASK as u8;
/// Largest size percent that fits the encoding.
pub const MAX_SIZE_PERCENT: u16 = SIZE_MASK as u16;

/// Independent per-glyph style bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleFlags(u16);

impl StyleFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Bold weight.
    pub const BOLD: Self = Self(1 << 0);
    /// Oblique (italic) slant.
    pub const OBLIQUE: Self = Self(1 << 1);
    /// Underline decoration.
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Strikethrough decoration.
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    /// Highlighted background.
    pub const HIGHLIGHT: Self = Self(1 << 4);
    /// Drop shadow.
    pub const SHADOW: Self = Self(1 << 5);
    /// Error squiggle.
    pub const ERROR: Self = Self(1 << 6);
    /// Outlined glyph (outline color is stored on the record).
    pub const OUTLINE: Self = Self(1 << 7);
    /// Inline image placeholder rather than a font glyph.
    pub const IMAGE: Self = Self(1 << 8);

    /// Alternate modes set by `[?mode]`; at most one is active at a time.
    pub const MODES: Self = Self(Self::HIGHLIGHT.0 | Self::SHADOW.0 | Self::ERROR.0 | Self::OUTLINE.0);

    /// Raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Return `true` when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `self` without the bits of `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Flip the bits of `other`.
    pub const fn toggle(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }
}

/// Vertical script position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Script {
    /// Regular baseline text.
    #[default]
    Normal,
    /// Raised, reduced-size text.
    Superscript,
    /// Lowered, reduced-size text.
    Subscript,
    /// Vertically centered, reduced-size text.
    Midscript,
}

impl Script {
    fn to_bits(self) -> u64 {
        match self {
            Self::Normal => 0,
            Self::Superscript => 1,
            Self::Subscript => 2,
            Self::Midscript => 3,
        }
    }

    fn from_bits(bits: u64) -> Self {
        match bits & SCRIPT_MASK {
            1 => Self::Superscript,
            2 => Self::Subscript,
            3 => Self::Midscript,
            _ => Self::Normal,
        }
    }
}

/// Resolved style without a character: what the style stack holds.
///
/// Uses the same bit layout as [`GlyphRecord`] with the character bits cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphStyle {
    bits: u64,
    color: PackedColor,
    outline: PackedColor,
}

impl GlyphStyle {
    /// Plain style in `color`, 100% size, primary font.
    pub fn new(color: PackedColor) -> Self {
        Self {
            bits: 100u64 << SIZE_SHIFT,
            color,
            outline: PackedColor::TRANSPARENT,
        }
    }

    /// Foreground color.
    pub fn color(self) -> PackedColor {
        self.color
    }

    /// Replace the foreground color.
    pub fn with_color(mut self, color: PackedColor) -> Self {
        self.color = color;
        self
    }

    /// Outline color when [`StyleFlags::OUTLINE`] is set.
    pub fn outline(self) -> Option<PackedColor> {
        self.flags()
            .contains(StyleFlags::OUTLINE)
            .then_some(self.outline)
    }

    /// Replace the outline color (does not touch the flag).
    pub fn with_outline_color(mut self, outline: PackedColor) -> Self {
        self.outline = outline;
        self
    }

    /// Style flags.
    pub fn flags(self) -> StyleFlags {
        StyleFlags(((self.bits >> FLAGS_SHIFT) & FLAGS_MASK) as u16)
    }

    /// Replace all style flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.bits = (self.bits & !(FLAGS_MASK << FLAGS_SHIFT))
            | ((u64::from(flags.0) & FLAGS_MASK) << FLAGS_SHIFT);
        self
    }

    /// Script position.
    pub fn script(self) -> Script {
        Script::from_bits(self.bits >> SCRIPT_SHIFT)
    }

    /// Replace the script position.
    pub fn with_script(mut self, script: Script) -> Self {
        self.bits = (self.bits & !(SCRIPT_MASK << SCRIPT_SHIFT)) | (script.to_bits() << SCRIPT_SHIFT);
        self
    }

    /// Font selector (0 = primary).
    pub fn font(self) -> u8 {
        ((self.bits >> FONT_SHIFT) & FONT_MASK) as u8
    }

    /// Replace the font selector, saturating at [`MAX_FONT`].
    pub fn with_font(mut self, font: u8) -> Self {
        let font = u64::from(font.min(MAX_FONT));
        self.bits = (self.bits & !(FONT_MASK << FONT_SHIFT)) | (font << FONT_SHIFT);
        self
    }

    /// Size multiplier in percent (100 = natural size).
    pub fn size_percent(self) -> u16 {
        ((self.bits >> SIZE_SHIFT) & SIZE_MASK) as u16
    }

    /// Replace the size percent, saturating at [`MAX_SIZE_PERCENT`].
    pub fn with_size_percent(mut self, size: u16) -> Self {
        let size = u64::from(size.min(MAX_SIZE_PERCENT));
        self.bits = (self.bits & !(SIZE_MASK << SIZE_SHIFT)) | (size << SIZE_SHIFT);
        self
    }

    /// Build the record for `ch` in this style.
    pub fn glyph(self, ch: char) -> GlyphRecord {
        GlyphRecord {
            bits: self.bits | (u64::from(u32::from(ch)) & CHAR_MASK),
            color: self.color,
            outline: self.outline,
        }
    }
}

/// One visible character plus its resolved style, in a fixed-width encoding.
///
/// Bit layout of the packed word:
///
/// | bits | field |
/// | --- | --- |
/// | 0..21 | code point |
/// | 21..30 | [`StyleFlags`] |
/// | 30..32 | [`Script`] |
/// | 32..36 | font selector |
/// | 36..46 | size percent |
///
/// Colors are stored next to the word as packed RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphRecord {
    bits: u64,
    color: PackedColor,
    outline: PackedColor,
}

impl GlyphRecord {
    /// The character to render.
    pub fn ch(self) -> char {
        char::from_u32((self.bits & CHAR_MASK) as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Style part of the record.
    pub fn style(self) -> GlyphStyle {
        GlyphStyle {
            bits: self.bits & !CHAR_MASK,
            color: self.color,
            outline: self.outline,
        }
    }

    /// Packed style word including the code point.
    pub fn packed(self) -> u64 {
        self.bits
    }

    /// Foreground color.
    pub fn color(self) -> PackedColor {
        self.color
    }

    /// Outline color, if outlined.
    pub fn outline(self) -> Option<PackedColor> {
        self.style().outline()
    }

    /// Style flags.
    pub fn flags(self) -> StyleFlags {
        self.style().flags()
    }

    /// Script position.
    pub fn script(self) -> Script {
        self.style().script()
    }

    /// Font selector.
    pub fn font(self) -> u8 {
        self.style().font()
    }

    /// Size percent as authored.
    pub fn size_percent(self) -> u16 {
        self.style().size_percent()
    }

    /// Size percent used for metrics: scripts render at half size.
    pub fn effective_size_percent(self) -> u16 {
        match self.script() {
            Script::Normal => self.size_percent(),
            _ => self.size_percent() / 2,
        }
    }

    /// Return `true` for inline image placeholders.
    pub fn is_image(self) -> bool {
        self.flags().contains(StyleFlags::IMAGE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/record.rs"]
mod tests;
