use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use xxhash_rust::xxh3::Xxh3;

use crate::effects::builtins::BuiltinEffect;
use crate::effects::params::EffectParams;
use crate::effects::transform::GlyphTransform;
use crate::foundation::rng::Rng64;
use crate::glyph::record::GlyphRecord;

const XXH3_SEED: u64 = 0x5f0e_c1a7_9b3d_2e61;

/// Pixels per unit of effect "distance" at 100% glyph size.
pub const BASE_UNIT: f64 = 16.0;

/// Inputs of one effect evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EffectContext {
    /// Glyph being transformed.
    pub glyph: GlyphRecord,
    /// Glyph index relative to the start of the effect span.
    pub index: usize,
    /// Number of glyphs in the span.
    pub count: usize,
    /// Seconds since the effect instance was created.
    pub time: f64,
    /// Seconds since this glyph was revealed (`0` while hidden).
    pub glyph_time: f64,
    /// Pixels per unit of distance for this glyph.
    pub unit: f64,
    /// Deterministic seed of the instance.
    pub seed: u64,
}

/// Per-glyph animation.
pub trait Effect: Send + Sync {
    /// Lifetime in seconds; infinite lifetimes never expire.
    fn duration(&self) -> f64;

    /// Whether the lifetime counts from each glyph's reveal instead of the instance start.
    fn per_glyph(&self) -> bool {
        false
    }

    /// Transform of one glyph at the given instant.
    fn apply(&self, cx: &EffectContext) -> GlyphTransform;
}

/// Builds a user effect from its parsed parameters.
pub type EffectFactory = Box<dyn Fn(&EffectParams<'_>) -> Box<dyn Effect> + Send + Sync>;

/// Effect name to factory map. Built-ins are always known; user effects may shadow them.
#[derive(Default)]
pub struct EffectRegistry {
    custom: BTreeMap<String, EffectFactory>,
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EffectRegistry {
    /// Registry with the built-in effects only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the built-ins only.
    pub fn builtin() -> &'static Self {
        static REGISTRY: OnceLock<EffectRegistry> = OnceLock::new();
        REGISTRY.get_or_init(EffectRegistry::new)
    }

    /// Register `factory` under `name` (case-insensitive).
    pub fn register(
        &mut self,
        name: &str,
        factory: impl Fn(&EffectParams<'_>) -> Box<dyn Effect> + Send + Sync + 'static,
    ) -> &mut Self {
        self.custom
            .insert(name.trim().to_ascii_uppercase(), Box::new(factory));
        self
    }

    /// Return `true` when `name` opens an effect.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim().to_ascii_uppercase();
        self.custom.contains_key(&name) || BuiltinEffect::NAMES.contains(&name.as_str())
    }

    /// Every known effect name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = BuiltinEffect::NAMES
            .iter()
            .map(|n| (*n).to_owned())
            .chain(self.custom.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Instantiate the effect `name` over `range`; `None` when the name is unknown.
    pub fn create(
        &self,
        name: &str,
        params: &EffectParams<'_>,
        range: Range<usize>,
    ) -> Option<EffectInstance> {
        let key = name.trim().to_ascii_uppercase();
        let effect: Box<dyn Effect> = match self.custom.get(&key) {
            Some(factory) => factory(params),
            None => Box::new(BuiltinEffect::from_params(&key, params)?),
        };

        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(key.as_bytes());
        h.update(&(range.start as u64).to_le_bytes());
        h.update(&(range.end as u64).to_le_bytes());
        for i in 0..params.len() {
            h.update(params.raw(i).unwrap_or("").as_bytes());
            h.update(b";");
        }

        Some(EffectInstance {
            name: key,
            effect,
            revealed_at: vec![None; range.len()],
            range,
            elapsed: 0.0,
            seed: h.digest(),
        })
    }
}

/// A live effect bound to a glyph range.
pub struct EffectInstance {
    name: String,
    effect: Box<dyn Effect>,
    range: Range<usize>,
    elapsed: f64,
    seed: u64,
    /// Instance time at which each glyph of the range was revealed.
    revealed_at: Vec<Option<f64>>,
}

impl fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectInstance")
            .field("name", &self.name)
            .field("range", &self.range)
            .field("elapsed", &self.elapsed)
            .field("seed", &self.seed)
            .finish()
    }
}

impl EffectInstance {
    /// Mix a caller seed into the instance seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed ^= Rng64::new(seed).next_u64();
        self
    }

    /// Upper-cased effect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Governed glyph indices.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Seconds since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Deterministic seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advance local time.
    pub fn update(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Record that the first `visible` glyphs of the whole text are now shown.
    pub fn reveal(&mut self, visible: usize) {
        let upto = visible.clamp(self.range.start, self.range.end) - self.range.start;
        for slot in &mut self.revealed_at[..upto] {
            slot.get_or_insert(self.elapsed);
        }
    }

    /// Return `true` once the lifetime has elapsed.
    pub fn is_finished(&self) -> bool {
        let duration = self.effect.duration();
        if !duration.is_finite() {
            return false;
        }
        if !self.effect.per_glyph() {
            return self.elapsed > duration;
        }
        self.revealed_at
            .iter()
            .all(|at| at.is_some_and(|at| self.elapsed - at > duration))
    }

    /// Transform of glyph `index` (absolute). Identity outside the range or once finished.
    pub fn apply(&self, index: usize, base: GlyphRecord) -> GlyphTransform {
        if !self.range.contains(&index) || self.is_finished() {
            return GlyphTransform::IDENTITY;
        }
        let rel = index - self.range.start;
        let glyph_time = self.revealed_at[rel].map_or(0.0, |at| self.elapsed - at);
        let cx = EffectContext {
            glyph: base,
            index: rel,
            count: self.range.len(),
            time: self.elapsed,
            glyph_time,
            unit: BASE_UNIT * f64::from(base.effective_size_percent()) / 100.0,
            seed: self.seed,
        };
        self.effect.apply(&cx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
