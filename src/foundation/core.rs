use serde::{Deserialize, Serialize};

pub use kurbo::Vec2;

/// Straight-alpha RGBA8 color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedColor(pub u32);

impl PackedColor {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque black.
    pub const BLACK: Self = Self(0x0000_00FF);

    /// Pack four 8-bit channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Pack normalized `[0, 1]` channels, clamping out-of-range input.
    pub fn from_rgba_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            if x.is_nan() {
                return 0;
            }
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::from_rgba8(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Channels as normalized `[r, g, b, a]`.
    pub fn to_rgba_f64(self) -> [f64; 4] {
        [
            f64::from(self.r()) / 255.0,
            f64::from(self.g()) / 255.0,
            f64::from(self.b()) / 255.0,
            f64::from(self.a()) / 255.0,
        ]
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let [r, g, b, _] = self.to_rgba_f64();
        Self::from_rgba_f64(r, g, b, alpha)
    }

    /// Channel-wise interpolation from `a` to `b`; `t` is clamped to `[0, 1]`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self::from_rgba8(
            lerp_u8(a.r(), b.r(), t),
            lerp_u8(a.g(), b.g(), t),
            lerp_u8(a.b(), b.b(), t),
            lerp_u8(a.a(), b.a(), t),
        )
    }

    /// `#RRGGBBAA` hex form.
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}

impl Serialize for PackedColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PackedColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Packed(u32),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => crate::color::parse_hex(&s).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid color \"{s}\" (expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA)"
                ))
            }),
            Repr::Packed(v) => Ok(Self(v)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
