use std::collections::BTreeMap;
use std::ops::Range;

use crate::effects::params::parse_number;
use crate::foundation::core::PackedColor;
use crate::glyph::record::{GlyphRecord, MAX_SIZE_PERCENT, Script, StyleFlags};
use crate::markup::context::{ImagePlaceholder, ParseContext};
use crate::markup::style_stack::StyleStack;
use crate::markup::vars::split_tag;

/// Lowest accepted `{SPEED=..}` factor.
const MIN_SPEED: f64 = 0.01;
/// Highest accepted `{SPEED=..}` factor.
const MAX_SPEED: f64 = 100.0;

/// Reveal-time instruction attached to a glyph position.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlKind {
    /// Hold the reveal cursor for this many seconds.
    Wait(f64),
    /// Fire a named event.
    Event(String),
    /// Multiply the per-character delay by this factor from here on.
    Speed(f64),
    /// Reveal this many characters at once (`None` = everything that is left).
    Skip(Option<usize>),
    /// Set the active color.
    Color(PackedColor),
    /// Clear the active color back to the base color.
    ClearColor,
}

/// A control token and the glyph index that triggers it.
///
/// The token fires once the reveal cursor reaches `position` visible glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlToken {
    /// Number of glyphs preceding the tag.
    pub position: usize,
    /// What to do.
    pub kind: ControlKind,
}

/// An effect tag and the glyphs it governs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSpan {
    /// Upper-cased effect name.
    pub name: String,
    /// Raw `;`-separated parameter text.
    pub params: String,
    /// Governed glyph indices.
    pub range: Range<usize>,
}

/// Output of one tokenizer pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedText {
    /// Visible glyphs in order.
    pub glyphs: Vec<GlyphRecord>,
    /// Control tokens sorted by position.
    pub tokens: Vec<ControlToken>,
    /// Effect spans in opening order.
    pub effects: Vec<EffectSpan>,
    /// Metrics of the inline images used, keyed by placeholder code point.
    pub images: BTreeMap<char, ImagePlaceholder>,
}

impl ParsedText {
    /// The visible characters as a string.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch()).collect()
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Return `true` when no glyph was produced.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Turn markup into glyph records, control tokens and effect spans.
///
/// Never fails: unknown bracket tags stay literal, unknown brace tags are dropped.
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub fn tokenize(text: &str, cx: &ParseContext<'_>) -> ParsedText {
    let mut t = Tokenizer {
        cx,
        stack: StyleStack::new(cx.base_style(), cx.config.style_stack_depth),
        out: ParsedText::default(),
        open: Vec::new(),
    };
    t.run(text);
    t.finish()
}

struct Tokenizer<'c, 'a> {
    cx: &'c ParseContext<'a>,
    stack: StyleStack,
    out: ParsedText,
    /// Indices into `out.effects` of spans still open.
    open: Vec<usize>,
}

impl Tokenizer<'_, '_> {
    fn run(&mut self, text: &str) {
        let mut i = 0usize;
        while i < text.len() {
            let rest = &text[i..];
            let Some(c) = rest.chars().next() else {
                break;
            };
            match c {
                '[' => {
                    if rest[1..].starts_with('[') {
                        self.emit('[');
                        i += 2;
                        continue;
                    }
                    if let Some(close) = rest[1..].find(']') {
                        let body = &rest[1..1 + close];
                        if self.apply_bracket(body) {
                            i += close + 2;
                            continue;
                        }
                        tracing::debug!(tag = body, "unrecognized bracket tag kept as text");
                    }
                    self.emit('[');
                    i += 1;
                }
                '{' => {
                    match rest[1..].find(['{', '}']) {
                        Some(close) if rest.as_bytes()[1 + close] == b'}' => {
                            self.apply_brace(&rest[1..1 + close]);
                            i += close + 2;
                        }
                        _ => {
                            self.emit('{');
                            i += 1;
                        }
                    }
                }
                '\r' => i += 1,
                c => {
                    self.emit(c);
                    i += c.len_utf8();
                }
            }
        }
    }

    fn finish(mut self) -> ParsedText {
        let len = self.out.glyphs.len();
        for idx in self.open.drain(..) {
            self.out.effects[idx].range.end = len;
        }
        self.out.effects.retain(|e| !e.range.is_empty());
        self.out
    }

    fn emit(&mut self, ch: char) {
        self.out.glyphs.push(self.stack.current().glyph(ch));
    }

    fn token(&mut self, kind: ControlKind) {
        self.out.tokens.push(ControlToken {
            position: self.out.glyphs.len(),
            kind,
        });
    }

    fn apply_bracket(&mut self, body: &str) -> bool {
        if body.is_empty() {
            self.stack.pop();
            return true;
        }
        if body.trim().is_empty() {
            self.stack.reset();
            return true;
        }

        match body {
            "*" => return self.toggle(StyleFlags::BOLD),
            "/" => return self.toggle(StyleFlags::OBLIQUE),
            "_" => return self.toggle(StyleFlags::UNDERLINE),
            "~" => return self.toggle(StyleFlags::STRIKETHROUGH),
            "^" => return self.toggle_script(Script::Superscript),
            "." => return self.toggle_script(Script::Subscript),
            "=" => return self.toggle_script(Script::Midscript),
            _ => {}
        }

        if let Some(rest) = body.strip_prefix('%') {
            return self.set_size(rest);
        }
        if let Some(rest) = body.strip_prefix('@') {
            return self.set_font(rest);
        }
        if let Some(rest) = body.strip_prefix('+') {
            return self.insert_image(rest);
        }
        if let Some(rest) = body.strip_prefix('?') {
            return self.set_mode(rest);
        }

        match self.cx.colors.try_resolve(body) {
            Some(color) => {
                self.stack.push_with(|s| s.with_color(color));
                true
            }
            None => false,
        }
    }

    fn toggle(&mut self, flag: StyleFlags) -> bool {
        self.stack.push_with(|s| s.with_flags(s.flags().toggle(flag)));
        true
    }

    fn toggle_script(&mut self, script: Script) -> bool {
        self.stack.push_with(|s| {
            if s.script() == script {
                s.with_script(Script::Normal)
            } else {
                s.with_script(script)
            }
        });
        true
    }

    fn set_size(&mut self, arg: &str) -> bool {
        let arg = arg.trim();
        let arg = arg.strip_suffix('%').unwrap_or(arg).trim();
        if arg.is_empty() {
            self.stack.push_with(|s| s.with_size_percent(100));
            return true;
        }
        let Some(v) = parse_number(arg).filter(|v| *v >= 0.0) else {
            return false;
        };
        let max = f64::from(MAX_SIZE_PERCENT);
        if v > max {
            tracing::warn!(size = v, "size percent clamped to {max}");
        }
        let size = v.min(max).round() as u16;
        self.stack.push_with(|s| s.with_size_percent(size));
        true
    }

    fn set_font(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.stack.push_with(|s| s.with_font(0));
            return true;
        }
        match self.cx.fonts.font_index(name) {
            Some(font) => {
                self.stack.push_with(|s| s.with_font(font));
                true
            }
            None => {
                tracing::debug!(font = name, "unknown font family");
                false
            }
        }
    }

    fn insert_image(&mut self, name: &str) -> bool {
        let Some(image) = self.cx.images.image(name) else {
            tracing::debug!(image = name, "unknown inline image");
            return false;
        };
        let style = self.stack.current();
        let glyph = style
            .with_flags(style.flags().union(StyleFlags::IMAGE))
            .glyph(image.code_point);
        self.out.glyphs.push(glyph);
        self.out.images.insert(image.code_point, image);
        true
    }

    fn set_mode(&mut self, mode: &str) -> bool {
        let flag = match mode.trim().to_ascii_lowercase().as_str() {
            "" => StyleFlags::NONE,
            "highlight" => StyleFlags::HIGHLIGHT,
            "shadow" | "dropshadow" => StyleFlags::SHADOW,
            "error" => StyleFlags::ERROR,
            "outline" | "blackoutline" => StyleFlags::OUTLINE,
            _ => return false,
        };
        self.stack
            .push_with(|s| s.with_flags(s.flags().difference(StyleFlags::MODES).union(flag)));
        true
    }

    fn apply_brace(&mut self, body: &str) {
        let (tag, arg) = split_tag(body);
        let arg = arg.map(str::trim).filter(|a| !a.is_empty());
        let cfg = self.cx.config;

        match tag.as_str() {
            "WAIT" => {
                let secs = match arg {
                    None => cfg.default_wait,
                    Some(a) => match parse_number(a) {
                        Some(v) if v.is_finite() && v >= 0.0 => v,
                        _ => {
                            tracing::warn!(value = a, "malformed WAIT duration, using default");
                            cfg.default_wait
                        }
                    },
                };
                self.token(ControlKind::Wait(secs));
            }
            "EVENT" => match arg {
                Some(name) => self.token(ControlKind::Event(name.to_owned())),
                None => tracing::debug!("EVENT without a name dropped"),
            },
            "SPEED" => {
                let factor = self.speed_factor(arg);
                self.token(ControlKind::Speed(factor));
            }
            "SLOWER" | "SLOW" | "NORMAL" | "FAST" | "FASTER" => {
                if let Some(factor) = cfg.speed_presets.get(&tag) {
                    self.token(ControlKind::Speed(factor));
                }
            }
            "SKIP" => {
                let count = arg.and_then(|a| match a.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        tracing::warn!(value = a, "malformed SKIP count, skipping to the end");
                        None
                    }
                });
                self.token(ControlKind::Skip(count));
            }
            "COLOR" => match arg.and_then(|a| self.cx.colors.try_resolve(a)) {
                Some(color) => {
                    self.stack.push_with(|s| s.with_color(color));
                    self.token(ControlKind::Color(color));
                }
                None => tracing::debug!(value = ?arg, "unknown COLOR dropped"),
            },
            "CLEARCOLOR" => {
                let base = self.stack.base().color();
                self.stack.push_with(|s| s.with_color(base));
                self.token(ControlKind::ClearColor);
            }
            "SIZE" => {
                if !self.set_size(arg.unwrap_or("")) {
                    tracing::debug!(value = ?arg, "malformed SIZE dropped");
                }
            }
            "CLEARSIZE" => {
                self.set_size("");
            }
            "FONT" => {
                if !self.set_font(arg.unwrap_or("")) {
                    tracing::debug!(value = ?arg, "unknown FONT dropped");
                }
            }
            "CLEARFONT" => {
                self.set_font("");
            }
            "STYLE" => {
                let inner = arg.unwrap_or("");
                if !self.apply_bracket(inner) {
                    tracing::debug!(value = inner, "unknown STYLE dropped");
                }
            }
            "RESET" => self.stack.reset(),
            "END" | "ENDEFFECT" => {
                if let Some(idx) = self.open.pop() {
                    self.close(idx);
                }
            }
            "ENDEFFECTS" => {
                while let Some(idx) = self.open.pop() {
                    self.close(idx);
                }
            }
            "EFFECT" => {
                let (name, params) = match arg {
                    Some(a) => a.split_once(';').unwrap_or((a, "")),
                    None => ("", ""),
                };
                let name = name.trim().to_ascii_uppercase();
                if self.cx.effects.contains(&name) {
                    self.open_effect(&name, params);
                } else {
                    tracing::debug!(effect = name.as_str(), "unknown effect dropped");
                }
            }
            name if self.cx.effects.contains(name) => self.open_effect(name, arg.unwrap_or("")),
            name => match name.strip_prefix("END") {
                Some(effect) if self.cx.effects.contains(effect) => {
                    let found = self
                        .open
                        .iter()
                        .rposition(|&idx| self.out.effects[idx].name == effect);
                    match found {
                        Some(pos) => {
                            let idx = self.open.remove(pos);
                            self.close(idx);
                        }
                        None => tracing::debug!(effect, "END tag without an open effect"),
                    }
                }
                _ => tracing::debug!(tag = name, "unrecognized brace tag dropped"),
            },
        }
    }

    fn open_effect(&mut self, name: &str, params: &str) {
        self.open.push(self.out.effects.len());
        let start = self.out.glyphs.len();
        self.out.effects.push(EffectSpan {
            name: name.to_owned(),
            params: params.to_owned(),
            range: start..start,
        });
    }

    fn close(&mut self, idx: usize) {
        self.out.effects[idx].range.end = self.out.glyphs.len();
    }

    fn speed_factor(&self, arg: Option<&str>) -> f64 {
        let presets = &self.cx.config.speed_presets;
        let Some(a) = arg else {
            return presets.normal;
        };
        if let Some(preset) = presets.get(a) {
            return preset;
        }
        match parse_number(a) {
            Some(v) if v > 0.0 => {
                let clamped = v.clamp(MIN_SPEED, MAX_SPEED);
                if clamped != v {
                    tracing::warn!(value = v, clamped, "SPEED factor out of range");
                }
                1.0 / clamped
            }
            _ => {
                tracing::warn!(value = a, "malformed SPEED, using normal speed");
                presets.normal
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/tokenizer.rs"]
mod tests;
