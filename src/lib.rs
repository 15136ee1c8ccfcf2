//! glyphwright turns inline-markup strings into styled, positioned and animated glyphs, then
//! reveals them progressively like a typewriter.
//!
//! The pipeline is frame-driven and deterministic:
//!
//! - [`resolve_variables`] substitutes `{VAR=..}` and evaluates `{IF=..}`
//! - [`tokenize`] produces [`GlyphRecord`]s, control tokens and effect spans
//! - [`layout`] breaks the glyphs into [`Line`]s
//! - [`EffectEngine`] and [`RevealController`] advance once per frame
//!
//! [`TypingLabel`] owns the whole pipeline for one block of text.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod color;
pub(crate) mod effects;
pub(crate) mod glyph;
pub(crate) mod label;
pub(crate) mod layout;
pub(crate) mod markup;
pub(crate) mod reveal;

pub use crate::foundation::config::{SpeedPresets, TypingConfig};
pub use crate::foundation::core::{PackedColor, Vec2};
pub use crate::foundation::error::{GlyphError, GlyphResult};
pub use crate::foundation::rng::Rng64;

pub use crate::animation::ease::Ease;
pub use crate::color::palette::{BasicPalette, ColorNames};
pub use crate::color::resolver::ColorResolver;
pub use crate::effects::builtins::{BuiltinEffect, BuiltinKind};
pub use crate::effects::engine::EffectEngine;
pub use crate::effects::params::{EffectParams, ParamSpec};
pub use crate::effects::registry::{
    BASE_UNIT, Effect, EffectContext, EffectFactory, EffectInstance, EffectRegistry,
};
pub use crate::effects::transform::GlyphTransform;
pub use crate::glyph::record::{
    GlyphRecord, GlyphStyle, MAX_FONT, MAX_SIZE_PERCENT, Script, StyleFlags,
};
pub use crate::label::typing::{TypingLabel, TypingLabelBuilder, VariableFallback, VisibleGlyph};
pub use crate::layout::breaks::{BreakClass, BreakPolicy};
pub use crate::layout::engine::{
    Align, BreakKind, GlyphPosition, Justify, Layout, LayoutOptions, Line, SpacePolicy, layout,
    layout_with_policy,
};
pub use crate::layout::metrics::{GlyphMetrics, Metric, MonospaceMetrics};
pub use crate::markup::context::{
    FontRegistry, ImagePlaceholder, ImageRegistry, NoFonts, NoImages, ParseContext,
};
pub use crate::markup::tokenizer::{ControlKind, ControlToken, EffectSpan, ParsedText, tokenize};
pub use crate::markup::vars::{VariableScope, resolve_variables};
pub use crate::reveal::controller::{EndCallback, EventCallback, RevealController, RevealState};
