use std::collections::BTreeMap;

use crate::color::palette::BasicPalette;
use crate::color::resolver::ColorResolver;
use crate::effects::registry::EffectRegistry;
use crate::foundation::config::TypingConfig;
use crate::glyph::record::GlyphStyle;

/// External font-family registry used by `[@Name]`.
pub trait FontRegistry {
    /// Font selector for `name`, or `None` when the family is unknown.
    fn font_index(&self, name: &str) -> Option<u8>;
}

/// Registry that knows no fonts; every `[@Name]` tag stays literal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFonts;

impl FontRegistry for NoFonts {
    fn font_index(&self, _name: &str) -> Option<u8> {
        None
    }
}

impl FontRegistry for BTreeMap<String, u8> {
    fn font_index(&self, name: &str) -> Option<u8> {
        let name = name.trim();
        self.get(name).copied().or_else(|| {
            self.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        })
    }
}

/// Fixed-metric stand-in for an inline image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImagePlaceholder {
    /// Code point the placeholder glyph carries (usually from a private-use area).
    pub code_point: char,
    /// Horizontal advance.
    pub advance: f64,
    /// Height above the baseline.
    pub ascent: f64,
    /// Depth below the baseline.
    pub descent: f64,
}

/// External inline-image registry used by `[+name]`.
pub trait ImageRegistry {
    /// Placeholder for `name`, or `None` when the image is unknown.
    fn image(&self, name: &str) -> Option<ImagePlaceholder>;
}

/// Registry that knows no images; every `[+name]` tag stays literal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImages;

impl ImageRegistry for NoImages {
    fn image(&self, _name: &str) -> Option<ImagePlaceholder> {
        None
    }
}

impl ImageRegistry for BTreeMap<String, ImagePlaceholder> {
    fn image(&self, name: &str) -> Option<ImagePlaceholder> {
        self.get(name.trim()).copied()
    }
}

/// Everything the tokenizer reads besides the text itself.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    /// Configuration snapshot.
    pub config: &'a TypingConfig,
    /// Color token resolver.
    pub colors: ColorResolver<'a>,
    /// Font registry for `[@Name]`.
    pub fonts: &'a dyn FontRegistry,
    /// Image registry for `[+name]`.
    pub images: &'a dyn ImageRegistry,
    /// Known effect names.
    pub effects: &'a EffectRegistry,
}

impl<'a> ParseContext<'a> {
    /// Context with no fonts or images registered.
    pub fn new(config: &'a TypingConfig, colors: ColorResolver<'a>, effects: &'a EffectRegistry) -> Self {
        Self {
            config,
            colors,
            fonts: &NoFonts,
            images: &NoImages,
            effects,
        }
    }

    /// Process-wide defaults: shared config, [`BasicPalette`], built-in effects only.
    pub fn shared() -> ParseContext<'static> {
        ParseContext::new(
            TypingConfig::shared(),
            ColorResolver::new(&BasicPalette),
            EffectRegistry::builtin(),
        )
    }

    /// Use `fonts` for `[@Name]` lookups.
    pub fn with_fonts(mut self, fonts: &'a dyn FontRegistry) -> Self {
        self.fonts = fonts;
        self
    }

    /// Use `images` for `[+name]` lookups.
    pub fn with_images(mut self, images: &'a dyn ImageRegistry) -> Self {
        self.images = images;
        self
    }

    /// Style of text outside any tag.
    pub fn base_style(&self) -> GlyphStyle {
        GlyphStyle::new(self.config.base_color).with_outline_color(self.config.outline_color)
    }
}
