use smallvec::SmallVec;

use crate::color::resolver::ColorResolver;
use crate::foundation::core::PackedColor;

/// Parse a markup number: decimal, or `inf` / `infinity` / `∞` for unbounded.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "inf" | "infinity" | "∞" | "+inf" => return Some(f64::INFINITY),
        _ => {}
    }
    let v: f64 = s.parse().ok()?;
    (!v.is_nan()).then_some(v)
}

/// Default and sane range for one numeric effect parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Name used in log messages.
    pub name: &'static str,
    /// Value used when the parameter is blank or malformed.
    pub default: f64,
    /// Lowest accepted value.
    pub min: f64,
    /// Highest accepted value.
    pub max: f64,
    /// Whether `inf` is meaningful (durations); otherwise `inf` saturates at `max`.
    pub unbounded: bool,
}

impl ParamSpec {
    /// Bounded parameter.
    pub const fn new(name: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            default,
            min,
            max,
            unbounded: false,
        }
    }

    /// Duration parameter: non-negative, `inf` allowed.
    pub const fn duration(default: f64) -> Self {
        Self {
            name: "duration",
            default,
            min: 0.0,
            max: f64::INFINITY,
            unbounded: true,
        }
    }
}

/// Semicolon-separated effect arguments, parsed on demand.
#[derive(Clone, Debug)]
pub struct EffectParams<'a> {
    effect: &'a str,
    raw: SmallVec<[&'a str; 8]>,
    colors: ColorResolver<'a>,
}

impl<'a> EffectParams<'a> {
    /// Split `params` on `;`.
    pub fn parse(effect: &'a str, params: &'a str, colors: ColorResolver<'a>) -> Self {
        let raw = if params.trim().is_empty() {
            SmallVec::new()
        } else {
            params.split(';').collect()
        };
        Self {
            effect,
            raw,
            colors,
        }
    }

    /// Effect name the parameters belong to.
    pub fn effect(&self) -> &str {
        self.effect
    }

    /// Number of positional arguments supplied.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Return `true` when no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw text of argument `i`, `None` when absent or blank.
    pub fn raw(&self, i: usize) -> Option<&'a str> {
        self.raw
            .get(i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Numeric argument `i`, defaulted and clamped according to `param`.
    pub fn number(&self, i: usize, param: ParamSpec) -> f64 {
        let Some(raw) = self.raw(i) else {
            return param.default;
        };
        let Some(v) = parse_number(raw) else {
            tracing::warn!(
                effect = self.effect,
                param = param.name,
                value = raw,
                "malformed effect parameter, using default"
            );
            return param.default;
        };
        if v.is_infinite() && v > 0.0 && param.unbounded {
            return v;
        }
        let clamped = v.clamp(param.min, param.max);
        if clamped != v {
            tracing::warn!(
                effect = self.effect,
                param = param.name,
                value = v,
                clamped,
                "effect parameter out of range"
            );
        }
        clamped
    }

    /// Color argument `i`; `None` when absent or unresolvable.
    pub fn color(&self, i: usize) -> Option<PackedColor> {
        let raw = self.raw(i)?;
        let c = self.colors.try_resolve(raw);
        if c.is_none() {
            tracing::warn!(
                effect = self.effect,
                value = raw,
                "unknown color in effect parameter"
            );
        }
        c
    }
}
