use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Vec2;
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::record::{GlyphRecord, Script, StyleFlags};
use crate::layout::breaks::{BreakClass, BreakPolicy};
use crate::layout::metrics::{GlyphMetrics, Metric};
use crate::markup::context::ImagePlaceholder;
use crate::markup::tokenizer::ParsedText;

const EPSILON: f64 = 1e-9;

/// Placement of lines inside the layout box, on one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Left or top.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

impl Align {
    fn factor(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Extra spacing distributed across wrapped lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    /// Ragged lines.
    #[default]
    None,
    /// Stretch inter-word spaces of wrapped lines to the target width.
    Spaces,
}

/// Whether spaces at wrap points count towards line width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacePolicy {
    /// Spaces at a wrap point hang and are excluded from the width.
    #[default]
    TrimWrapSpaces,
    /// Every space counts.
    Keep,
}

/// Why a line ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// A `\n` in the text.
    Forced,
    /// The next glyph did not fit.
    Wrap,
    /// End of text.
    End,
    /// Truncated by the line limit; ends with the ellipsis.
    Ellipsis,
}

/// Layout parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Target width; `None` never wraps.
    pub width: Option<f64>,
    /// Height of the box used for vertical alignment; `None` uses the content height.
    pub height: Option<f64>,
    /// Break lines that exceed `width`.
    pub wrap: bool,
    /// Maximum number of lines kept.
    pub max_lines: Option<usize>,
    /// Text appended when lines are dropped.
    pub ellipsis: String,
    /// Horizontal alignment.
    pub align_x: Align,
    /// Vertical alignment.
    pub align_y: Align,
    /// Justification of wrapped lines.
    pub justify: Justify,
    /// Treatment of spaces at wrap points.
    pub space_policy: SpacePolicy,
    /// Line height as a multiple of ascent plus descent.
    pub line_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            wrap: true,
            max_lines: None,
            ellipsis: "...".to_owned(),
            align_x: Align::Start,
            align_y: Align::Start,
            justify: Justify::None,
            space_policy: SpacePolicy::TrimWrapSpaces,
            line_height: 1.0,
        }
    }
}

impl LayoutOptions {
    /// Wrapping options for `width`.
    pub fn wrapped(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Reject values no layout can honor.
    pub fn validate(&self) -> GlyphResult<()> {
        if let Some(w) = self.width {
            if w.is_nan() || w < 0.0 {
                return Err(GlyphError::validation(format!(
                    "layout width must be >= 0, got {w}"
                )));
            }
        }
        if let Some(h) = self.height {
            if h.is_nan() || h < 0.0 {
                return Err(GlyphError::validation(format!(
                    "layout height must be >= 0, got {h}"
                )));
            }
        }
        if self.max_lines == Some(0) {
            return Err(GlyphError::validation("max_lines must be > 0"));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(GlyphError::validation("line_height must be finite and > 0"));
        }
        Ok(())
    }
}

/// One laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Glyph indices, including hanging spaces and the terminating `\n`.
    pub range: Range<usize>,
    /// Part of `range` that counts towards `width`.
    pub content: Range<usize>,
    /// Measured width after the space policy.
    pub width: f64,
    /// Line box height.
    pub height: f64,
    /// Largest ascent on the line.
    pub ascent: f64,
    /// Largest descent on the line.
    pub descent: f64,
    /// Horizontal alignment offset.
    pub x: f64,
    /// Top of the line box.
    pub y: f64,
    /// Baseline position.
    pub baseline: f64,
    /// Extra space added after each inter-word space by justification.
    pub justify_gap: f64,
    /// Why the line ended.
    pub break_kind: BreakKind,
}

/// Base position of one glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPosition {
    /// Glyph.
    pub glyph: GlyphRecord,
    /// Pen position: x and baseline y (script shift included).
    pub position: Vec2,
    /// Horizontal advance.
    pub advance: f64,
    /// Index of the line holding the glyph.
    pub line: usize,
}

/// Immutable result of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    glyphs: Vec<GlyphRecord>,
    positions: Vec<GlyphPosition>,
    lines: Vec<Line>,
    width: Option<f64>,
    max_lines: Option<usize>,
    truncated: bool,
    source_len: usize,
    size: Vec2,
}

impl Layout {
    /// Laid-out glyphs, ellipsis included.
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    /// Lines in order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Target width.
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Line limit.
    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Return `true` when lines were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of glyphs kept from the parsed text; the rest of [`Self::glyphs`] is ellipsis.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Widest line and total height.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Every glyph with its base position and advance.
    pub fn glyph_positions(&self) -> impl Iterator<Item = &GlyphPosition> + '_ {
        self.positions.iter()
    }

    /// Characters of line `index`, without the trailing `\n`.
    pub fn line_text(&self, index: usize) -> String {
        self.lines
            .get(index)
            .map(|line| {
                self.glyphs[line.range.clone()]
                    .iter()
                    .map(|g| g.ch())
                    .filter(|c| *c != '\n')
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Lay out `parsed` with the default break rules.
pub fn layout(
    parsed: &ParsedText,
    options: &LayoutOptions,
    metrics: &dyn GlyphMetrics,
) -> GlyphResult<Layout> {
    layout_with_policy(parsed, options, metrics, &BreakPolicy::DEFAULT)
}

/// Lay out `parsed` with custom break rules.
#[tracing::instrument(skip_all, fields(glyphs = parsed.glyphs.len(), width = ?options.width))]
pub fn layout_with_policy(
    parsed: &ParsedText,
    options: &LayoutOptions,
    metrics: &dyn GlyphMetrics,
    policy: &BreakPolicy,
) -> GlyphResult<Layout> {
    options.validate()?;

    let mut stream = Stream::new(metrics, &parsed.images);
    for glyph in &parsed.glyphs {
        stream.push(*glyph);
    }

    let limit = match options.width {
        Some(w) if options.wrap => w,
        _ => f64::INFINITY,
    };
    let keep_spaces = options.space_policy == SpacePolicy::Keep;
    let mut breaks = break_lines(&stream, limit, keep_spaces, policy);

    let mut truncated = false;
    let mut source_len = stream.len();
    if let Some(max) = options.max_lines {
        if breaks.len() > max {
            breaks.truncate(max);
            let last = max - 1;
            let start = breaks[last].0.start;
            let end = truncate_with_ellipsis(&mut stream, start, breaks[last].0.end, options, policy);
            source_len = stream.cut;
            breaks[last] = (start..end, BreakKind::Ellipsis);
            truncated = true;
            tracing::debug!(lines = max, "layout truncated");
        }
    }

    let lines = place_lines(&stream, &breaks, options, policy);
    let positions = position_glyphs(&stream, &lines, policy);
    let content_width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let content_height = lines.iter().map(|l| l.height).sum();

    Ok(Layout {
        glyphs: stream.glyphs,
        positions,
        lines,
        width: options.width,
        max_lines: options.max_lines,
        truncated,
        source_len,
        size: Vec2::new(content_width, content_height),
    })
}

#[derive(Clone, Copy, Debug)]
struct Measure {
    metric: Metric,
    /// Baseline shift, positive downwards.
    shift: f64,
}

/// Glyphs with their measurements and the kerning applied before each one.
struct Stream<'m> {
    metrics: &'m dyn GlyphMetrics,
    images: &'m BTreeMap<char, ImagePlaceholder>,
    glyphs: Vec<GlyphRecord>,
    measures: Vec<Measure>,
    kerns: Vec<f64>,
    /// Number of glyphs that came from the text; the rest is ellipsis.
    cut: usize,
}

impl<'m> Stream<'m> {
    fn new(metrics: &'m dyn GlyphMetrics, images: &'m BTreeMap<char, ImagePlaceholder>) -> Self {
        Self {
            metrics,
            images,
            glyphs: Vec::new(),
            measures: Vec::new(),
            kerns: Vec::new(),
            cut: 0,
        }
    }

    fn len(&self) -> usize {
        self.glyphs.len()
    }

    fn push(&mut self, glyph: GlyphRecord) {
        let measure = self.measure(glyph);
        let kern = match self.glyphs.last() {
            Some(prev)
                if !prev.is_image()
                    && !glyph.is_image()
                    && prev.font() == glyph.font()
                    && prev.effective_size_percent() == glyph.effective_size_percent()
                    && prev.ch() != '\n'
                    && glyph.ch() != '\n' =>
            {
                self.metrics.kerning(
                    prev.ch(),
                    glyph.ch(),
                    glyph.font(),
                    glyph.effective_size_percent(),
                )
            }
            _ => 0.0,
        };
        self.glyphs.push(glyph);
        self.measures.push(measure);
        self.kerns.push(kern);
        self.cut = self.glyphs.len();
    }

    fn truncate(&mut self, len: usize) {
        self.glyphs.truncate(len);
        self.measures.truncate(len);
        self.kerns.truncate(len);
        self.cut = self.cut.min(len);
    }

    fn measure(&self, glyph: GlyphRecord) -> Measure {
        if glyph.is_image() {
            if let Some(image) = self.images.get(&glyph.ch()) {
                return Measure {
                    metric: Metric {
                        advance: image.advance,
                        ascent: image.ascent,
                        descent: image.descent,
                    },
                    shift: 0.0,
                };
            }
        }
        let metric = self
            .metrics
            .metrics(glyph.ch(), glyph.font(), glyph.effective_size_percent());
        let shift = match glyph.script() {
            Script::Normal => 0.0,
            script => {
                let full = self
                    .metrics
                    .metrics(glyph.ch(), glyph.font(), glyph.size_percent());
                match script {
                    Script::Superscript => -0.4 * full.ascent,
                    Script::Subscript => 0.2 * full.ascent,
                    _ => -0.25 * (full.ascent - full.descent),
                }
            }
        };
        Measure { metric, shift }
    }

    /// Width of `range` with the kerning inside it.
    fn width(&self, range: Range<usize>) -> f64 {
        let start = range.start;
        range
            .map(|i| {
                let kern = if i > start { self.kerns[i] } else { 0.0 };
                kern + self.measures[i].metric.advance
            })
            .sum()
    }
}

/// Split the stream into line ranges.
///
/// Spaces hang past the limit unless `keep_spaces` is set. A line with no legal break point is
/// cut at the overflowing glyph, even inside a glued pair.
fn break_lines(
    stream: &Stream<'_>,
    limit: f64,
    keep_spaces: bool,
    policy: &BreakPolicy,
) -> Vec<(Range<usize>, BreakKind)> {
    let n = stream.len();
    let mut out = Vec::new();
    let mut start = 0;

    while start < n {
        let mut x = stream.measures[start].metric.advance;
        let mut last_break = None;
        let mut i = start;
        let (end, kind) = loop {
            if i == n {
                break (n, BreakKind::End);
            }
            let ch = stream.glyphs[i].ch();
            if ch == '\n' {
                break (i + 1, BreakKind::Forced);
            }
            if i > start {
                if policy.can_break_between(stream.glyphs[i - 1].ch(), ch) {
                    last_break = Some(i);
                }
                let next_x = x + stream.kerns[i] + stream.measures[i].metric.advance;
                let hangs = policy.is_space(ch) && !keep_spaces;
                if next_x > limit + EPSILON && !hangs {
                    break (last_break.unwrap_or(i), BreakKind::Wrap);
                }
                x = next_x;
            }
            i += 1;
        };
        out.push((start..end, kind));
        start = end;
    }

    if matches!(out.last(), Some((_, BreakKind::Forced))) {
        out.push((n..n, BreakKind::End));
    }
    out
}

/// Return `true` when glyph `i` may not be separated from glyph `i - 1`.
fn glued(stream: &Stream<'_>, policy: &BreakPolicy, i: usize) -> bool {
    policy.class(stream.glyphs[i].ch()) == BreakClass::Glue
        || policy.class(stream.glyphs[i - 1].ch()) == BreakClass::Glue
}

/// Drop glyphs from the end of `start..end` until the ellipsis fits, then append the ellipsis.
///
/// Returns the new end of the line.
fn truncate_with_ellipsis(
    stream: &mut Stream<'_>,
    start: usize,
    end: usize,
    options: &LayoutOptions,
    policy: &BreakPolicy,
) -> usize {
    let mut cut = end;
    if cut > start && stream.glyphs[cut - 1].ch() == '\n' {
        cut -= 1;
    }

    let style = stream.glyphs[..cut]
        .iter()
        .rev()
        .find(|g| g.ch() != '\n')
        .or(stream.glyphs.first())
        .map(|g| {
            let style = g.style();
            style.with_flags(style.flags().difference(StyleFlags::IMAGE))
        });
    let ellipsis: Vec<GlyphRecord> = match style {
        Some(style) => options
            .ellipsis
            .chars()
            .filter(|c| *c != '\n')
            .map(|c| style.glyph(c))
            .collect(),
        None => Vec::new(),
    };

    let mut measured = Stream::new(stream.metrics, stream.images);
    for g in &ellipsis {
        measured.push(*g);
    }
    let ellipsis_width = measured.width(0..measured.len());
    let limit = options.width.unwrap_or(f64::INFINITY);

    let kept_width = |stream: &Stream<'_>, cut: usize| {
        let mut visible = cut;
        while visible > start && policy.is_space(stream.glyphs[visible - 1].ch()) {
            visible -= 1;
        }
        stream.width(start..visible)
    };
    while cut > start && kept_width(stream, cut) + ellipsis_width > limit + EPSILON {
        cut -= 1;
    }
    while cut > start && cut < stream.len() && glued(stream, policy, cut) {
        cut -= 1;
    }
    while cut > start && policy.is_space(stream.glyphs[cut - 1].ch()) {
        cut -= 1;
    }

    stream.truncate(cut);
    for g in ellipsis {
        stream.push(g);
    }
    stream.cut = cut;
    stream.len()
}

fn place_lines(
    stream: &Stream<'_>,
    breaks: &[(Range<usize>, BreakKind)],
    options: &LayoutOptions,
    policy: &BreakPolicy,
) -> Vec<Line> {
    let trim = options.space_policy == SpacePolicy::TrimWrapSpaces;
    let mut lines = Vec::with_capacity(breaks.len());
    let mut prev_wrap = false;

    for (range, kind) in breaks {
        let mut visible = range.clone();
        if trim && prev_wrap {
            while visible.start < visible.end && policy.is_space(stream.glyphs[visible.start].ch()) {
                visible.start += 1;
            }
        }
        if trim && *kind == BreakKind::Wrap {
            while visible.end > visible.start && policy.is_space(stream.glyphs[visible.end - 1].ch()) {
                visible.end -= 1;
            }
        }
        let mut width = stream.width(visible.clone());

        let mut justify_gap = 0.0;
        if options.justify == Justify::Spaces && *kind == BreakKind::Wrap {
            if let Some(target) = options.width.filter(|w| w.is_finite()) {
                let gaps = stream.glyphs[visible.clone()]
                    .iter()
                    .filter(|g| policy.is_space(g.ch()))
                    .count();
                if gaps > 0 && target > width {
                    justify_gap = (target - width) / gaps as f64;
                    width = target;
                }
            }
        }

        let (ascent, descent) = if range.is_empty() {
            range
                .start
                .checked_sub(1)
                .map(|i| stream.measures[i])
                .map_or((0.0, 0.0), |m| (m.metric.ascent, m.metric.descent))
        } else {
            stream.measures[range.clone()]
                .iter()
                .fold((0.0f64, 0.0f64), |(a, d), m| {
                    (a.max(m.metric.ascent - m.shift), d.max(m.metric.descent + m.shift))
                })
        };

        lines.push(Line {
            range: range.clone(),
            content: visible,
            width,
            height: (ascent + descent) * options.line_height,
            ascent,
            descent,
            x: 0.0,
            y: 0.0,
            baseline: 0.0,
            justify_gap,
            break_kind: *kind,
        });
        prev_wrap = *kind == BreakKind::Wrap;
    }

    let box_width = match options.width {
        Some(w) if w.is_finite() => w,
        _ => lines.iter().map(|l| l.width).fold(0.0, f64::max),
    };
    let total_height: f64 = lines.iter().map(|l| l.height).sum();
    let box_height = options.height.unwrap_or(total_height);

    let mut y = ((box_height - total_height) * options.align_y.factor()).max(0.0);
    for line in &mut lines {
        line.x = ((box_width - line.width) * options.align_x.factor()).max(0.0);
        line.y = y;
        line.baseline = y + (line.height - (line.ascent + line.descent)) / 2.0 + line.ascent;
        y += line.height;
    }
    lines
}

fn position_glyphs(stream: &Stream<'_>, lines: &[Line], policy: &BreakPolicy) -> Vec<GlyphPosition> {
    let mut out = Vec::with_capacity(stream.len());

    for (index, line) in lines.iter().enumerate() {
        let mut x = line.x - stream.width(line.range.start..line.content.start);
        for i in line.range.clone() {
            if i > line.range.start {
                x += stream.kerns[i];
            }
            let m = stream.measures[i];
            out.push(GlyphPosition {
                glyph: stream.glyphs[i],
                position: Vec2::new(x, line.baseline + m.shift),
                advance: m.metric.advance,
                line: index,
            });
            x += m.metric.advance;
            if line.justify_gap > 0.0
                && line.content.contains(&i)
                && policy.is_space(stream.glyphs[i].ch())
            {
                x += line.justify_gap;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
