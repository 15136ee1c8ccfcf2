use std::collections::BTreeMap;
use std::fmt;

use kurbo::Vec2;

use crate::color::palette::{BasicPalette, ColorNames};
use crate::color::resolver::ColorResolver;
use crate::effects::engine::EffectEngine;
use crate::effects::params::EffectParams;
use crate::effects::registry::{Effect, EffectRegistry};
use crate::effects::transform::GlyphTransform;
use crate::foundation::config::TypingConfig;
use crate::foundation::core::PackedColor;
use crate::foundation::error::GlyphResult;
use crate::glyph::record::GlyphRecord;
use crate::layout::engine::{Align, Layout, LayoutOptions, layout};
use crate::layout::metrics::{GlyphMetrics, MonospaceMetrics};
use crate::markup::context::{FontRegistry, ImageRegistry, NoFonts, NoImages, ParseContext};
use crate::markup::tokenizer::{ParsedText, tokenize};
use crate::markup::vars::{VariableScope, resolve_variables};
use crate::reveal::controller::{RevealController, RevealState};

/// Resolver for variables bound in neither scope.
pub type VariableFallback = Box<dyn Fn(&str) -> Option<String>>;

/// A visible glyph ready to draw: base placement plus the current effect transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleGlyph {
    /// Index into [`Layout::glyphs`].
    pub index: usize,
    /// Structural record.
    pub glyph: GlyphRecord,
    /// Pen position before effects.
    pub position: Vec2,
    /// Horizontal advance.
    pub advance: f64,
    /// Line holding the glyph.
    pub line: usize,
    /// Effect output for this frame.
    pub transform: GlyphTransform,
}

impl VisibleGlyph {
    /// Pen position with the effect offset applied.
    pub fn final_position(&self) -> Vec2 {
        self.position + self.transform.offset
    }

    /// Color to draw with: effect color, else the record's own color.
    pub fn final_color(&self) -> PackedColor {
        self.transform.color.unwrap_or_else(|| self.glyph.color())
    }
}

/// Markup text that lays itself out and types itself in over time.
///
/// Owns the source text, variable bindings, parsed glyphs, layout, effect instances and reveal
/// state. Every structural change rebuilds the parsed text and the layout from scratch.
pub struct TypingLabel {
    config: TypingConfig,
    colors: Box<dyn ColorNames>,
    fonts: Box<dyn FontRegistry>,
    images: Box<dyn ImageRegistry>,
    metrics: Box<dyn GlyphMetrics>,
    effects: EffectRegistry,
    fallback: Option<VariableFallback>,

    source: String,
    variables: BTreeMap<String, String>,
    options: LayoutOptions,

    parsed: ParsedText,
    layout: Layout,
    engine: EffectEngine,
    reveal: RevealController,
}

impl fmt::Debug for TypingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingLabel")
            .field("source", &self.source)
            .field("variables", &self.variables)
            .field("options", &self.options)
            .field("lines", &self.layout.lines().len())
            .field("reveal", &self.reveal)
            .finish_non_exhaustive()
    }
}

impl TypingLabel {
    /// Label over `text` with default collaborators.
    pub fn new(text: impl Into<String>) -> GlyphResult<Self> {
        TypingLabelBuilder::default().text(text).build()
    }

    /// Start configuring a label.
    pub fn builder() -> TypingLabelBuilder {
        TypingLabelBuilder::default()
    }

    /// Replace the markup text and restart the reveal.
    pub fn set_text(&mut self, text: impl Into<String>) -> GlyphResult<()> {
        self.source = text.into();
        self.parse_tokens()
    }

    /// Re-run variable substitution, tokenization and layout, then restart the reveal.
    ///
    /// Running it twice without other changes yields the same layout.
    pub fn parse_tokens(&mut self) -> GlyphResult<()> {
        let parsed = self.parse();
        let layout = layout(&parsed, &self.options, &*self.metrics)?;
        self.parsed = parsed;
        self.layout = layout;
        self.engine = self.build_engine();
        self.reveal
            .retokenize(self.parsed.tokens.clone(), self.layout.source_len());
        Ok(())
    }

    /// Bind `name` at label scope. Takes effect on the next [`Self::parse_tokens`].
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Drop a label-scope binding. Takes effect on the next [`Self::parse_tokens`].
    pub fn remove_variable(&mut self, name: &str) -> Option<String> {
        self.variables.remove(name)
    }

    /// Resolver for names bound in neither scope.
    pub fn set_variable_fallback(&mut self, fallback: impl Fn(&str) -> Option<String> + 'static) {
        self.fallback = Some(Box::new(fallback));
    }

    /// Register a custom effect. Takes effect on the next [`Self::parse_tokens`].
    pub fn register_effect(
        &mut self,
        name: &str,
        factory: impl Fn(&EffectParams<'_>) -> Box<dyn Effect> + Send + Sync + 'static,
    ) -> &mut Self {
        self.effects.register(name, factory);
        self
    }

    /// Toggle wrapping at the target width.
    pub fn set_wrap(&mut self, wrap: bool) -> GlyphResult<()> {
        self.relayout(|o| o.wrap = wrap)
    }

    /// Cap the number of lines (`None` = unlimited).
    pub fn set_max_lines(&mut self, max_lines: Option<usize>) -> GlyphResult<()> {
        self.relayout(|o| o.max_lines = max_lines)
    }

    /// Text appended when lines are dropped.
    pub fn set_ellipsis(&mut self, ellipsis: impl Into<String>) -> GlyphResult<()> {
        let ellipsis = ellipsis.into();
        self.relayout(|o| o.ellipsis = ellipsis)
    }

    /// Target width (`None` = unbounded).
    pub fn set_width(&mut self, width: Option<f64>) -> GlyphResult<()> {
        self.relayout(|o| o.width = width)
    }

    /// Box height used by vertical alignment.
    pub fn set_height(&mut self, height: Option<f64>) -> GlyphResult<()> {
        self.relayout(|o| o.height = height)
    }

    /// Horizontal and vertical alignment.
    pub fn set_alignment(&mut self, x: Align, y: Align) -> GlyphResult<()> {
        self.relayout(|o| {
            o.align_x = x;
            o.align_y = y;
        })
    }

    /// Replace every layout option at once.
    pub fn set_layout_options(&mut self, options: LayoutOptions) -> GlyphResult<()> {
        self.relayout(|o| *o = options)
    }

    /// Hide everything and replay from the start, effects included.
    pub fn restart(&mut self) {
        self.reveal.restart();
        self.engine = self.build_engine();
    }

    /// Reveal everything now; remaining events fire unless `fire_events` is false.
    pub fn skip_to_the_end(&mut self, fire_events: bool) {
        self.reveal.skip_to_end(fire_events);
        self.engine.update(0.0, self.reveal.visible_count());
    }

    /// Freeze the reveal. Effects keep animating.
    pub fn pause(&mut self) {
        self.reveal.pause();
    }

    /// Unfreeze the reveal.
    pub fn resume(&mut self) {
        self.reveal.resume();
    }

    /// Global reveal time scale.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.reveal.set_speed(multiplier);
    }

    /// Called with the name of every fired `{EVENT}`.
    pub fn on_event(&mut self, callback: impl FnMut(&str) + 'static) {
        self.reveal.on_event(callback);
    }

    /// Called once each time the reveal completes.
    pub fn on_end(&mut self, callback: impl FnMut() + 'static) {
        self.reveal.on_end(callback);
    }

    /// Events fired since the last drain.
    pub fn drain_events(&mut self) -> Vec<String> {
        self.reveal.drain_events()
    }

    /// Advance by one frame of `dt` seconds. Returns the number of glyphs revealed.
    pub fn advance(&mut self, dt: f64) -> usize {
        let revealed = self.reveal.advance(dt);
        self.engine.update(dt, self.reveal.visible_count());
        revealed
    }

    /// Glyphs to draw this frame, newlines excluded.
    ///
    /// The ellipsis of a truncated layout shows once the reveal has ended.
    pub fn visible_glyphs(&self) -> Vec<VisibleGlyph> {
        let limit = if self.reveal.is_finished() {
            self.layout.glyphs().len()
        } else {
            self.reveal.visible_count()
        };
        self.layout
            .glyph_positions()
            .enumerate()
            .take(limit)
            .filter(|(_, p)| p.glyph.ch() != '\n')
            .map(|(index, p)| VisibleGlyph {
                index,
                glyph: p.glyph,
                position: p.position,
                advance: p.advance,
                line: p.line,
                transform: self.engine.transform(index, p.glyph),
            })
            .collect()
    }

    /// Visible characters as a string, newlines included.
    pub fn visible_text(&self) -> String {
        let limit = if self.reveal.is_finished() {
            self.layout.glyphs().len()
        } else {
            self.reveal.visible_count()
        };
        self.layout.glyphs()[..limit].iter().map(|g| g.ch()).collect()
    }

    /// Markup text as set by the caller.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current label-scope bindings.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Output of the last tokenizer pass.
    pub fn parsed(&self) -> &ParsedText {
        &self.parsed
    }

    /// Current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Configuration snapshot.
    pub fn config(&self) -> &TypingConfig {
        &self.config
    }

    /// Live effect instances.
    pub fn effects(&self) -> &EffectEngine {
        &self.engine
    }

    /// Reveal state.
    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    /// Reveal lifecycle state.
    pub fn state(&self) -> RevealState {
        self.reveal.state()
    }

    /// Return `true` once every glyph is visible.
    pub fn is_finished(&self) -> bool {
        self.reveal.is_finished()
    }

    fn resolver(&self) -> ColorResolver<'_> {
        ColorResolver::new(&*self.colors)
    }

    fn parse(&self) -> ParsedText {
        let scope = VariableScope::new(&self.variables, &self.config.variables);
        let no_fallback = |_: &str| -> Option<String> { None };
        let fallback: &dyn Fn(&str) -> Option<String> = match &self.fallback {
            Some(f) => &**f,
            None => &no_fallback,
        };
        let text = resolve_variables(&self.source, &scope, fallback);

        let cx = ParseContext::new(&self.config, self.resolver(), &self.effects)
            .with_fonts(&*self.fonts)
            .with_images(&*self.images);
        tokenize(&text, &cx)
    }

    fn build_engine(&self) -> EffectEngine {
        EffectEngine::from_spans(
            &self.parsed.effects,
            &self.effects,
            self.resolver(),
            self.config.effect_seed,
            self.layout.source_len(),
        )
    }

    /// Apply `change` to a copy of the options and re-lay out; nothing changes on error.
    fn relayout(&mut self, change: impl FnOnce(&mut LayoutOptions)) -> GlyphResult<()> {
        let mut options = self.options.clone();
        change(&mut options);
        let layout = layout(&self.parsed, &options, &*self.metrics)?;
        self.options = options;
        self.layout = layout;
        self.engine = self.build_engine();
        self.engine.update(0.0, self.reveal.visible_count());
        self.reveal.set_total(self.layout.source_len());
        Ok(())
    }
}

/// Builder for [`TypingLabel`].
pub struct TypingLabelBuilder {
    config: TypingConfig,
    colors: Box<dyn ColorNames>,
    fonts: Box<dyn FontRegistry>,
    images: Box<dyn ImageRegistry>,
    metrics: Box<dyn GlyphMetrics>,
    effects: EffectRegistry,
    fallback: Option<VariableFallback>,
    variables: BTreeMap<String, String>,
    options: Option<LayoutOptions>,
    text: String,
}

impl Default for TypingLabelBuilder {
    fn default() -> Self {
        Self {
            config: TypingConfig::shared().clone(),
            colors: Box::new(BasicPalette),
            fonts: Box::new(NoFonts),
            images: Box::new(NoImages),
            metrics: Box::new(MonospaceMetrics::default()),
            effects: EffectRegistry::new(),
            fallback: None,
            variables: BTreeMap::new(),
            options: None,
            text: String::new(),
        }
    }
}

impl fmt::Debug for TypingLabelBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingLabelBuilder")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl TypingLabelBuilder {
    /// Timing and palette settings; checked by [`build`](Self::build).
    pub fn config(mut self, config: TypingConfig) -> Self {
        self.config = config;
        self
    }

    /// Names accepted by color tags.
    pub fn colors(mut self, colors: impl ColorNames + 'static) -> Self {
        self.colors = Box::new(colors);
        self
    }

    /// Fonts addressed by `[@name]`.
    pub fn fonts(mut self, fonts: impl FontRegistry + 'static) -> Self {
        self.fonts = Box::new(fonts);
        self
    }

    /// Inline images addressed by `[+name]`.
    pub fn images(mut self, images: impl ImageRegistry + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// Glyph measurement used by layout.
    pub fn metrics(mut self, metrics: impl GlyphMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Effect registry; defaults to the built-ins.
    pub fn effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    /// Resolver for variable names with no binding.
    pub fn variable_fallback(mut self, fallback: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Bind `{VAR=name}` for this label.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Layout options; by default nothing wraps and the config's ellipsis is used.
    pub fn options(mut self, options: LayoutOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Markup source.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Validate, parse and lay out.
    pub fn build(self) -> GlyphResult<TypingLabel> {
        self.config.validate()?;
        let options = self.options.unwrap_or_else(|| LayoutOptions {
            ellipsis: self.config.default_ellipsis.clone(),
            ..LayoutOptions::default()
        });
        let reveal = RevealController::new(&self.config, Vec::new(), 0);

        let mut label = TypingLabel {
            config: self.config,
            colors: self.colors,
            fonts: self.fonts,
            images: self.images,
            metrics: self.metrics,
            effects: self.effects,
            fallback: self.fallback,
            source: self.text,
            variables: self.variables,
            options,
            parsed: ParsedText::default(),
            layout: layout(
                &ParsedText::default(),
                &LayoutOptions::default(),
                &MonospaceMetrics::default(),
            )?,
            engine: EffectEngine::default(),
            reveal,
        };
        label.parse_tokens()?;
        Ok(label)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/label/typing.rs"]
mod tests;
