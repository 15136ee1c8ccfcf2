use crate::color::resolver::ColorResolver;
use crate::effects::params::EffectParams;
use crate::effects::registry::{EffectInstance, EffectRegistry};
use crate::effects::transform::GlyphTransform;
use crate::glyph::record::GlyphRecord;
use crate::markup::tokenizer::EffectSpan;

/// Owns the live effect instances of one layout.
///
/// Rebuilt together with the layout; instances whose lifetime has elapsed are dropped.
#[derive(Debug, Default)]
pub struct EffectEngine {
    instances: Vec<EffectInstance>,
    clock: f64,
}

impl EffectEngine {
    /// Instantiate every span of `spans` that is known to `registry`.
    ///
    /// Spans are clipped to `glyph_count`; spans left empty are skipped.
    #[tracing::instrument(skip_all, fields(spans = spans.len()))]
    pub fn from_spans(
        spans: &[EffectSpan],
        registry: &EffectRegistry,
        colors: ColorResolver<'_>,
        seed: u64,
        glyph_count: usize,
    ) -> Self {
        let mut instances = Vec::with_capacity(spans.len());
        for span in spans {
            let range = span.range.start.min(glyph_count)..span.range.end.min(glyph_count);
            if range.is_empty() {
                continue;
            }
            let params = EffectParams::parse(&span.name, &span.params, colors);
            match registry.create(&span.name, &params, range) {
                Some(instance) => instances.push(instance.with_seed(seed)),
                None => tracing::debug!(effect = span.name.as_str(), "effect not registered"),
            }
        }
        Self {
            instances,
            clock: 0.0,
        }
    }

    /// Live instances.
    pub fn instances(&self) -> &[EffectInstance] {
        &self.instances
    }

    /// Seconds since the engine was built.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Return `true` when no instance is alive.
    pub fn is_idle(&self) -> bool {
        self.instances.is_empty()
    }

    /// Advance every instance by `dt`, record newly revealed glyphs and drop finished instances.
    pub fn update(&mut self, dt: f64, visible: usize) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        for instance in &mut self.instances {
            instance.update(dt);
            instance.reveal(visible);
        }
        self.instances.retain(|instance| !instance.is_finished());
    }

    /// Combined transform of `glyph` at `index`, in span opening order.
    pub fn transform(&self, index: usize, glyph: GlyphRecord) -> GlyphTransform {
        self.instances
            .iter()
            .fold(GlyphTransform::IDENTITY, |acc, instance| {
                acc.then(instance.apply(index, glyph))
            })
    }

    /// Transforms of the first `visible` glyphs of `glyphs`.
    pub fn transforms(&self, glyphs: &[GlyphRecord], visible: usize) -> Vec<GlyphTransform> {
        glyphs
            .iter()
            .take(visible)
            .enumerate()
            .map(|(i, g)| self.transform(i, *g))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/engine.rs"]
mod tests;
