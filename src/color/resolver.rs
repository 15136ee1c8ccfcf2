use crate::color::palette::ColorNames;
use crate::foundation::core::PackedColor;

/// Lightness step applied per adjective level.
const LIGHTNESS_STEP: f64 = 0.1;
/// Saturation step applied per adjective level.
const SATURATION_STEP: f64 = 0.15;

/// Maps color tokens (hex literals or short descriptions) to packed colors.
///
/// A description is a whitespace-separated list of words. Hue words are looked up in the
/// external [`ColorNames`] table and may carry a `name:weight` mixing ratio; adjectives such as
/// `light`, `darker` or `richest` then shift lightness and saturation of the mix.
///
/// Resolution never fails: [`ColorResolver::resolve`] falls back to [`ColorResolver::MISSING`].
#[derive(Clone, Copy)]
pub struct ColorResolver<'a> {
    names: &'a dyn ColorNames,
}

impl std::fmt::Debug for ColorResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorResolver").finish_non_exhaustive()
    }
}

impl<'a> ColorResolver<'a> {
    /// Fallback returned for unrecognized tokens: fully transparent black.
    pub const MISSING: PackedColor = PackedColor::TRANSPARENT;

    /// Build a resolver over a name table.
    pub fn new(names: &'a dyn ColorNames) -> Self {
        Self { names }
    }

    /// Resolve a token, falling back to [`Self::MISSING`].
    pub fn resolve(&self, token: &str) -> PackedColor {
        self.try_resolve(token).unwrap_or(Self::MISSING)
    }

    /// Resolve a token, returning `None` when nothing in it is recognized.
    pub fn try_resolve(&self, token: &str) -> Option<PackedColor> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if token.starts_with('#') {
            return parse_hex(token);
        }
        if let Some(c) = self.names.lookup(token) {
            return Some(c);
        }
        self.describe(token)
    }

    fn describe(&self, description: &str) -> Option<PackedColor> {
        let mut lightness = 0i32;
        let mut saturation = 0i32;
        let mut mix: Vec<(PackedColor, f64)> = Vec::new();

        for word in description.split_whitespace() {
            let (name, weight) = match word.split_once(':') {
                Some((name, w)) => (name, parse_weight(w)?),
                None => {
                    if let Some((dl, ds)) = adjective(word) {
                        lightness += dl;
                        saturation += ds;
                        continue;
                    }
                    (word, 1.0)
                }
            };

            let color = if name.starts_with('#') {
                parse_hex(name)?
            } else {
                self.names.lookup(name)?
            };
            if weight > 0.0 {
                mix.push((color, weight));
            }
        }

        let mixed = mix_weighted(&mix)?;
        if lightness == 0 && saturation == 0 {
            return Some(mixed);
        }

        let [r, g, b, a] = mixed.to_rgba_f64();
        let (h, s, l) = rgb_to_hsl(r, g, b);
        let l = (l + f64::from(lightness) * LIGHTNESS_STEP).clamp(0.0, 1.0);
        let s = (s + f64::from(saturation) * SATURATION_STEP).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Some(PackedColor::from_rgba_f64(r, g, b, a))
    }
}

fn parse_weight(s: &str) -> Option<f64> {
    let w: f64 = s.trim().parse().ok()?;
    (w.is_finite() && w >= 0.0).then_some(w)
}

/// `(lightness levels, saturation levels)` for a modifier word.
fn adjective(word: &str) -> Option<(i32, i32)> {
    let w = word.to_ascii_lowercase();
    let (stem, level) = if let Some(stem) = w.strip_suffix("est") {
        (stem.to_owned(), 3)
    } else if let Some(stem) = w.strip_suffix("er") {
        (stem.to_owned(), 2)
    } else {
        (w.clone(), 1)
    };
    // "paler", "palest" strip to "pal".
    let stem = match stem.as_str() {
        "pal" => "pale",
        s => s,
    };
    let (dl, ds) = match stem {
        "light" => (1, 0),
        "dark" => (-1, 0),
        "rich" => (0, 1),
        "dull" => (0, -1),
        "bright" => (1, 1),
        "pale" => (1, -1),
        "deep" => (-1, 1),
        "weak" => (-1, -1),
        _ => return None,
    };
    Some((dl * level, ds * level))
}

fn mix_weighted(mix: &[(PackedColor, f64)]) -> Option<PackedColor> {
    let total: f64 = mix.iter().map(|(_, w)| *w).sum();
    if mix.is_empty() || total <= 0.0 {
        return None;
    }
    let mut acc = [0.0f64; 4];
    for (color, w) in mix {
        for (slot, v) in acc.iter_mut().zip(color.to_rgba_f64()) {
            *slot += v * w;
        }
    }
    Some(PackedColor::from_rgba_f64(
        acc[0] / total,
        acc[1] / total,
        acc[2] / total,
        acc[3] / total,
    ))
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub(crate) fn parse_hex(s: &str) -> Option<PackedColor> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn nibble(s: &str, i: usize) -> Option<u8> {
        let v = u8::from_str_radix(s.get(i..=i)?, 16).ok()?;
        Some(v * 17)
    }
    fn byte(s: &str, i: usize) -> Option<u8> {
        u8::from_str_radix(s.get(i..i + 2)?, 16).ok()
    }

    let (r, g, b, a) = match s.len() {
        3 => (nibble(s, 0)?, nibble(s, 1)?, nibble(s, 2)?, 255),
        4 => (nibble(s, 0)?, nibble(s, 1)?, nibble(s, 2)?, nibble(s, 3)?),
        6 => (byte(s, 0)?, byte(s, 2)?, byte(s, 4)?, 255),
        8 => (byte(s, 0)?, byte(s, 2)?, byte(s, 4)?, byte(s, 6)?),
        _ => return None,
    };
    Some(PackedColor::from_rgba8(r, g, b, a))
}

/// Normalized RGB to `(hue in [0, 1), saturation, lightness)`.
pub(crate) fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d <= f64::EPSILON {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

/// Hue in turns (`[0, 1)`, wrapped), saturation and lightness to normalized RGB.
pub(crate) fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/color/resolver.rs"]
mod tests;
