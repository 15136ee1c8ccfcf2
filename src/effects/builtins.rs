use std::f64::consts::{PI, TAU};

use crate::animation::ease::Ease;
use crate::color::hsl_to_rgb;
use crate::effects::params::{EffectParams, ParamSpec};
use crate::effects::registry::{Effect, EffectContext};
use crate::effects::transform::GlyphTransform;
use crate::foundation::core::{PackedColor, Vec2};
use crate::foundation::rng::{lattice_rng, noise01};

const DISTANCE: ParamSpec = ParamSpec::new("distance", 1.0, 0.0, 10.0);
const FREQUENCY: ParamSpec = ParamSpec::new("frequency", 1.0, 0.0, 20.0);
const INTENSITY: ParamSpec = ParamSpec::new("intensity", 1.0, 0.0, 20.0);
const SPEED_INTENSITY: ParamSpec = ParamSpec::new("intensity", 1.0, 0.01, 20.0);
const CHANCE: ParamSpec = ParamSpec::new("chance", 0.2, 0.0, 1.0);
const ELASTIC: ParamSpec = ParamSpec::new("elastic", 0.0, 0.0, 1.0);
const ROTATIONS: ParamSpec = ParamSpec::new("extent", 1.0, -20.0, 20.0);
const PULSE_SCALE: ParamSpec = ParamSpec::new("scale", 0.25, 0.0, 4.0);
const EXPANSION: ParamSpec = ParamSpec::new("expansion", 1.0, 0.0, 4.0);
const WOBBLE_EXTENT: ParamSpec = ParamSpec::new("extent", 1.0, 0.0, 20.0);
const ALPHA: ParamSpec = ParamSpec::new("alpha", 0.0, 0.0, 1.0);
const FADE_DURATION: ParamSpec = ParamSpec::new("fadeDuration", 1.0, 0.01, 20.0);
const THRESHOLD: ParamSpec = ParamSpec::new("threshold", 0.5, 0.0, 1.0);
const SATURATION: ParamSpec = ParamSpec::new("saturation", 1.0, 0.0, 1.0);
const LIGHTNESS: ParamSpec = ParamSpec::new("lightness", 0.5, 0.0, 1.0);
const FOREVER: ParamSpec = ParamSpec::duration(f64::INFINITY);
const ONCE: ParamSpec = ParamSpec::duration(1.0);

/// Phase lag between neighbouring glyphs, in turns.
const GLYPH_PHASE: f64 = 0.08;
/// Noise lattice steps per second for SHAKE and JOLT at intensity 1.
const SHAKE_RATE: f64 = 30.0;
const JOLT_SALT: u64 = 0x4A4F_4C54;

const GRADIENT_FROM: PackedColor = PackedColor::WHITE;
const GRADIENT_TO: PackedColor = PackedColor(0x7F7F_7FFF);

/// Parameters of one built-in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuiltinKind {
    /// Sine bob along the line.
    Wave {
        /// Peak offset in base units.
        distance: f64,
        /// Cycles per second.
        frequency: f64,
        /// Speed multiplier.
        intensity: f64,
    },
    /// Random jitter every frame step.
    Shake {
        /// Maximum offset in base units.
        distance: f64,
        /// Jitter rate multiplier.
        intensity: f64,
    },
    /// Occasional random jitter.
    Jolt {
        /// Maximum offset in base units.
        distance: f64,
        /// Jitter rate multiplier.
        intensity: f64,
        /// Probability that a glyph jolts on a given step.
        chance: f64,
    },
    /// Bouncing hops.
    Jump {
        /// Hop height in base units.
        distance: f64,
        /// Hops per second.
        frequency: f64,
        /// Speed multiplier.
        intensity: f64,
    },
    /// Glyphs droop below the baseline one after another.
    Sick {
        /// Droop depth in base units.
        distance: f64,
        /// Speed multiplier.
        intensity: f64,
    },
    /// Glyphs slide in from the left when revealed.
    Slide {
        /// Starting offset in base units.
        distance: f64,
        /// Speed multiplier.
        intensity: f64,
        /// Overshoot before settling.
        elastic: bool,
    },
    /// Glyphs drop in from above when revealed.
    Hang {
        /// Starting height in base units.
        distance: f64,
        /// Speed multiplier.
        intensity: f64,
    },
    /// Glyphs spin into place when revealed.
    Spin {
        /// Full turns before settling.
        rotations: f64,
    },
    /// Rhythmic grow and shrink.
    Pulse {
        /// Extra scale at the peak.
        scale: f64,
        /// Pulses per second.
        frequency: f64,
    },
    /// Double-beat pulse.
    Heartbeat {
        /// Extra scale at the peak.
        expansion: f64,
        /// Beats per second.
        frequency: f64,
    },
    /// Rocking rotation.
    Wobble {
        /// Rotation amplitude; `1.0` rocks 12 degrees each way.
        extent: f64,
        /// Rocks per second.
        frequency: f64,
    },
    /// Glyphs shrink from a larger size when revealed.
    Shrink {
        /// Extra scale at the start.
        expansion: f64,
        /// Speed multiplier.
        intensity: f64,
    },
    /// Glyphs grow out of the baseline when revealed.
    Emerge {
        /// Speed multiplier.
        intensity: f64,
    },
    /// Glyphs fade in from a start color when revealed.
    Fade {
        /// Start color; the glyph's own color when absent.
        from: Option<PackedColor>,
        /// Start alpha relative to the glyph's own, used when `from` is absent.
        alpha: f64,
        /// Seconds to reach the glyph's color.
        fade_duration: f64,
    },
    /// Alternates between two colors.
    Blink {
        /// Color for the off phase; transparent when absent.
        off: Option<PackedColor>,
        /// Color for the on phase; the glyph's own color when absent.
        on: Option<PackedColor>,
        /// Blinks per second.
        frequency: f64,
        /// Fraction of each cycle spent on.
        threshold: f64,
    },
    /// Hue cycle across the span.
    Rainbow {
        /// Hue spread between neighboring glyphs.
        distance: f64,
        /// Cycles per second.
        frequency: f64,
        /// HSL saturation.
        saturation: f64,
        /// HSL lightness.
        lightness: f64,
    },
    /// Moving blend between two colors.
    Gradient {
        /// First color.
        from: PackedColor,
        /// Second color.
        to: PackedColor,
        /// Phase spread between neighboring glyphs.
        distance: f64,
        /// Cycles per second.
        frequency: f64,
    },
    /// Glyphs spiral inwards when revealed.
    Spiral {
        /// Starting radius in base units.
        distance: f64,
        /// Speed multiplier.
        intensity: f64,
        /// Turns before settling.
        rotations: f64,
    },
}

/// Built-in effect with its lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuiltinEffect {
    /// Effect-specific parameters.
    pub kind: BuiltinKind,
    /// Lifetime parameter in seconds.
    pub duration: f64,
}

impl BuiltinEffect {
    /// Names of every built-in effect.
    pub const NAMES: [&'static str; 18] = [
        "WAVE",
        "SHAKE",
        "JOLT",
        "JUMP",
        "SICK",
        "SLIDE",
        "HANG",
        "SPIN",
        "PULSE",
        "HEARTBEAT",
        "WOBBLE",
        "SHRINK",
        "EMERGE",
        "FADE",
        "BLINK",
        "RAINBOW",
        "GRADIENT",
        "SPIRAL",
    ];

    /// Build the effect `name` (upper case) from `p`; `None` for unknown names.
    pub fn from_params(name: &str, p: &EffectParams<'_>) -> Option<Self> {
        let (kind, duration) = match name {
            "WAVE" => (
                BuiltinKind::Wave {
                    distance: p.number(0, DISTANCE),
                    frequency: p.number(1, FREQUENCY),
                    intensity: p.number(2, INTENSITY),
                },
                p.number(3, FOREVER),
            ),
            "SHAKE" => (
                BuiltinKind::Shake {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, INTENSITY),
                },
                p.number(2, FOREVER),
            ),
            "JOLT" => (
                BuiltinKind::Jolt {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, INTENSITY),
                    chance: p.number(2, CHANCE),
                },
                p.number(3, FOREVER),
            ),
            "JUMP" => (
                BuiltinKind::Jump {
                    distance: p.number(0, DISTANCE),
                    frequency: p.number(1, FREQUENCY),
                    intensity: p.number(2, INTENSITY),
                },
                p.number(3, FOREVER),
            ),
            "SICK" => (
                BuiltinKind::Sick {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, INTENSITY),
                },
                p.number(2, FOREVER),
            ),
            "SLIDE" => (
                BuiltinKind::Slide {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, SPEED_INTENSITY),
                    elastic: p.number(2, ELASTIC) >= 0.5,
                },
                p.number(3, ONCE),
            ),
            "HANG" => (
                BuiltinKind::Hang {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, SPEED_INTENSITY),
                },
                p.number(2, ONCE),
            ),
            "SPIN" => (
                BuiltinKind::Spin {
                    rotations: p.number(0, ROTATIONS),
                },
                p.number(1, ONCE),
            ),
            "PULSE" => (
                BuiltinKind::Pulse {
                    scale: p.number(0, PULSE_SCALE),
                    frequency: p.number(1, FREQUENCY),
                },
                p.number(2, FOREVER),
            ),
            "HEARTBEAT" => (
                BuiltinKind::Heartbeat {
                    expansion: p.number(0, EXPANSION),
                    frequency: p.number(1, FREQUENCY),
                },
                p.number(2, FOREVER),
            ),
            "WOBBLE" => (
                BuiltinKind::Wobble {
                    extent: p.number(0, WOBBLE_EXTENT),
                    frequency: p.number(1, FREQUENCY),
                },
                p.number(2, FOREVER),
            ),
            "SHRINK" => (
                BuiltinKind::Shrink {
                    expansion: p.number(0, EXPANSION),
                    intensity: p.number(1, SPEED_INTENSITY),
                },
                p.number(2, ONCE),
            ),
            "EMERGE" => (
                BuiltinKind::Emerge {
                    intensity: p.number(0, SPEED_INTENSITY),
                },
                p.number(1, ONCE),
            ),
            "FADE" => (
                BuiltinKind::Fade {
                    from: p.color(0),
                    alpha: p.number(1, ALPHA),
                    fade_duration: p.number(2, FADE_DURATION),
                },
                p.number(3, ONCE),
            ),
            "BLINK" => (
                BuiltinKind::Blink {
                    off: p.color(0),
                    on: p.color(1),
                    frequency: p.number(2, FREQUENCY),
                    threshold: p.number(3, THRESHOLD),
                },
                p.number(4, FOREVER),
            ),
            "RAINBOW" => (
                BuiltinKind::Rainbow {
                    distance: p.number(0, DISTANCE),
                    frequency: p.number(1, FREQUENCY),
                    saturation: p.number(2, SATURATION),
                    lightness: p.number(3, LIGHTNESS),
                },
                p.number(4, FOREVER),
            ),
            "GRADIENT" => (
                BuiltinKind::Gradient {
                    from: p.color(0).unwrap_or(GRADIENT_FROM),
                    to: p.color(1).unwrap_or(GRADIENT_TO),
                    distance: p.number(2, DISTANCE),
                    frequency: p.number(3, FREQUENCY),
                },
                p.number(4, FOREVER),
            ),
            "SPIRAL" => (
                BuiltinKind::Spiral {
                    distance: p.number(0, DISTANCE),
                    intensity: p.number(1, SPEED_INTENSITY),
                    rotations: p.number(2, ROTATIONS),
                },
                p.number(3, ONCE),
            ),
            _ => return None,
        };
        Some(Self { kind, duration })
    }

    /// Rate at which an entrance animation plays; `None` for looping effects.
    fn entrance_rate(&self) -> Option<f64> {
        match self.kind {
            BuiltinKind::Slide { intensity, .. }
            | BuiltinKind::Hang { intensity, .. }
            | BuiltinKind::Shrink { intensity, .. }
            | BuiltinKind::Emerge { intensity }
            | BuiltinKind::Spiral { intensity, .. } => Some(intensity),
            BuiltinKind::Spin { .. } | BuiltinKind::Fade { .. } => Some(1.0),
            _ => None,
        }
    }

    /// Entrance progress in `[0, 1]` for a glyph revealed `glyph_time` seconds ago.
    fn progress(&self, glyph_time: f64) -> f64 {
        let length = self.duration();
        let p = if length.is_finite() && length > 0.0 {
            glyph_time / length
        } else {
            glyph_time * self.entrance_rate().unwrap_or(1.0)
        };
        p.clamp(0.0, 1.0)
    }
}

impl Effect for BuiltinEffect {
    fn duration(&self) -> f64 {
        match self.kind {
            BuiltinKind::Fade { fade_duration, .. } => self.duration.max(fade_duration),
            _ => match self.entrance_rate() {
                Some(rate) => self.duration / rate,
                None => self.duration,
            },
        }
    }

    fn per_glyph(&self) -> bool {
        self.entrance_rate().is_some()
    }

    fn apply(&self, cx: &EffectContext) -> GlyphTransform {
        let i = cx.index as f64;
        let t = cx.time;
        let u = cx.unit;
        let base = cx.glyph.color();

        match self.kind {
            BuiltinKind::Wave {
                distance,
                frequency,
                intensity,
            } => {
                let phase = TAU * (frequency * intensity * t - i * GLYPH_PHASE);
                GlyphTransform::offset(Vec2::new(0.0, -phase.sin() * distance * u * 0.3))
            }
            BuiltinKind::Shake {
                distance,
                intensity,
            } => GlyphTransform::offset(jitter(cx.seed, cx.index, t, intensity) * (distance * u * 0.1)),
            BuiltinKind::Jolt {
                distance,
                intensity,
                chance,
            } => {
                let step = (t * SHAKE_RATE * intensity).floor() as u64;
                if noise01(cx.seed ^ JOLT_SALT, cx.index as u64, step) >= chance {
                    return GlyphTransform::IDENTITY;
                }
                GlyphTransform::offset(jitter(cx.seed, cx.index, t, intensity) * (distance * u * 0.2))
            }
            BuiltinKind::Jump {
                distance,
                frequency,
                intensity,
            } => {
                let phase = PI * (frequency * intensity * t - i * GLYPH_PHASE);
                GlyphTransform::offset(Vec2::new(0.0, -phase.sin().abs() * distance * u * 0.5))
            }
            BuiltinKind::Sick {
                distance,
                intensity,
            } => {
                let phase = TAU * (0.5 * intensity * t - i * GLYPH_PHASE);
                GlyphTransform::offset(Vec2::new(0.0, phase.sin().max(0.0) * distance * u * 0.25))
            }
            BuiltinKind::Slide {
                distance, elastic, ..
            } => {
                let ease = if elastic { Ease::OutElastic } else { Ease::OutCubic };
                let rest = 1.0 - ease.apply(self.progress(cx.glyph_time));
                GlyphTransform::offset(Vec2::new(-rest * distance * u * 2.0, 0.0))
            }
            BuiltinKind::Hang { distance, .. } => {
                let rest = 1.0 - Ease::OutBack.apply(self.progress(cx.glyph_time));
                GlyphTransform::offset(Vec2::new(0.0, -rest * distance * u))
            }
            BuiltinKind::Spin { rotations } => {
                let rest = 1.0 - Ease::OutCubic.apply(self.progress(cx.glyph_time));
                GlyphTransform::rotation(360.0 * rotations * rest)
            }
            BuiltinKind::Pulse { scale, frequency } => {
                let wave = 0.5 - 0.5 * (TAU * (frequency * t - i * GLYPH_PHASE)).cos();
                GlyphTransform::scale(1.0 + scale * wave)
            }
            BuiltinKind::Heartbeat {
                expansion,
                frequency,
            } => {
                let beat = (frequency * t).rem_euclid(1.0);
                let pulse = bump(beat, 0.0, 0.12) + 0.6 * bump(beat, 0.2, 0.32);
                GlyphTransform::scale(1.0 + expansion * 0.2 * pulse)
            }
            BuiltinKind::Wobble { extent, frequency } => {
                let phase = TAU * (frequency * t - i * GLYPH_PHASE);
                GlyphTransform::rotation(phase.sin() * extent * 12.0)
            }
            BuiltinKind::Shrink { expansion, .. } => {
                let rest = 1.0 - Ease::OutCubic.apply(self.progress(cx.glyph_time));
                GlyphTransform::scale(1.0 + expansion * rest)
            }
            BuiltinKind::Emerge { .. } => {
                let eased = Ease::OutCubic.apply(self.progress(cx.glyph_time));
                GlyphTransform {
                    offset: Vec2::new(0.0, (1.0 - eased) * u * 0.5),
                    scale: eased,
                    ..GlyphTransform::IDENTITY
                }
            }
            BuiltinKind::Fade {
                from,
                alpha,
                fade_duration,
            } => {
                let start = from.unwrap_or_else(|| base.with_alpha(alpha * base.to_rgba_f64()[3]));
                let p = (cx.glyph_time / fade_duration).clamp(0.0, 1.0);
                GlyphTransform::color(PackedColor::lerp(start, base, p))
            }
            BuiltinKind::Blink {
                off,
                on,
                frequency,
                threshold,
            } => {
                let phase = (frequency * t).rem_euclid(1.0);
                let color = if phase < threshold {
                    on.unwrap_or(base)
                } else {
                    off.unwrap_or_else(|| base.with_alpha(0.0))
                };
                GlyphTransform::color(color)
            }
            BuiltinKind::Rainbow {
                distance,
                frequency,
                saturation,
                lightness,
            } => {
                let hue = 0.5 * frequency * t - i * distance * 0.05;
                let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
                GlyphTransform::color(PackedColor::from_rgba_f64(r, g, b, base.to_rgba_f64()[3]))
            }
            BuiltinKind::Gradient {
                from,
                to,
                distance,
                frequency,
            } => {
                let p = 0.5 - 0.5 * (TAU * (0.5 * frequency * t - i * distance * 0.05)).cos();
                GlyphTransform::color(PackedColor::lerp(from, to, p))
            }
            BuiltinKind::Spiral {
                distance,
                rotations,
                ..
            } => {
                let eased = Ease::OutCubic.apply(self.progress(cx.glyph_time));
                let rest = 1.0 - eased;
                let angle = TAU * rotations * rest;
                let radius = rest * distance * u * 1.5;
                GlyphTransform {
                    offset: Vec2::new(angle.cos() * radius, angle.sin() * radius),
                    scale: eased,
                    ..GlyphTransform::IDENTITY
                }
            }
        }
    }
}

/// Unit-range random offset for `glyph`, constant within one noise step.
fn jitter(seed: u64, glyph: usize, t: f64, intensity: f64) -> Vec2 {
    let step = (t * SHAKE_RATE * intensity).floor() as u64;
    let mut rng = lattice_rng(seed, glyph as u64, step);
    Vec2::new(rng.next_signed(), rng.next_signed())
}

/// Half-sine bump over `[start, end)`, zero elsewhere.
fn bump(x: f64, start: f64, end: f64) -> f64 {
    if (start..end).contains(&x) {
        (PI * (x - start) / (end - start)).sin()
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/builtins.rs"]
mod tests;
