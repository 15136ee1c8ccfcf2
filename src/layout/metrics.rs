/// Horizontal advance and vertical extent of one glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metric {
    /// Pen advance.
    pub advance: f64,
    /// Height above the baseline.
    pub ascent: f64,
    /// Depth below the baseline.
    pub descent: f64,
}

impl Metric {
    /// Every dimension multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            advance: self.advance * factor,
            ascent: self.ascent * factor,
            descent: self.descent * factor,
        }
    }
}

/// Font metrics provider supplied by the host.
pub trait GlyphMetrics {
    /// Metrics of `ch` in font `font` at `size_percent` of the nominal size.
    fn metrics(&self, ch: char, font: u8, size_percent: u16) -> Metric;

    /// Extra advance between `left` and `right` set in the same font and size.
    fn kerning(&self, _left: char, _right: char, _font: u8, _size_percent: u16) -> f64 {
        0.0
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn metrics(&self, ch: char, font: u8, size_percent: u16) -> Metric {
        (**self).metrics(ch, font, size_percent)
    }

    fn kerning(&self, left: char, right: char, font: u8, size_percent: u16) -> f64 {
        (**self).kerning(left, right, font, size_percent)
    }
}

/// Fixed-cell metrics: one cell per character, two for wide East Asian characters, none for
/// joiners, combining marks and line feeds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonospaceMetrics {
    /// Cell advance at 100% size.
    pub advance: f64,
    /// Ascent at 100% size.
    pub ascent: f64,
    /// Descent at 100% size.
    pub descent: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 8.0,
            ascent: 12.0,
            descent: 4.0,
        }
    }
}

impl MonospaceMetrics {
    /// Metrics with `advance`-wide cells and the default vertical extent.
    pub fn with_advance(advance: f64) -> Self {
        Self {
            advance,
            ..Self::default()
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn metrics(&self, ch: char, _font: u8, size_percent: u16) -> Metric {
        let scale = f64::from(size_percent) / 100.0;
        Metric {
            advance: self.advance * cells(ch),
            ascent: self.ascent,
            descent: self.descent,
        }
        .scaled(scale)
    }
}

/// Number of fixed cells `ch` occupies.
pub(crate) fn cells(ch: char) -> f64 {
    match u32::from(ch) {
        0x0A
        | 0x200B..=0x200D
        | 0x2060
        | 0xFEFF
        | 0x0300..=0x036F
        | 0x1AB0..=0x1AFF
        | 0x1DC0..=0x1DFF
        | 0x20D0..=0x20FF
        | 0xFE00..=0xFE0F
        | 0xFE20..=0xFE2F
        | 0x1F3FB..=0x1F3FF
        | 0xE0020..=0xE007F
        | 0xE0100..=0xE01EF => 0.0,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3040..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD => 2.0,
        _ => 1.0,
    }
}
