use crate::foundation::core::{PackedColor, Vec2};

/// Transient per-frame adjustment of one glyph.
///
/// Never stored in the glyph record; the effect engine recomputes it every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphTransform {
    /// Offset from the laid-out position, in pixels (y grows downwards).
    pub offset: Vec2,
    /// Clockwise rotation in degrees around the glyph center.
    pub rotation: f64,
    /// Uniform scale around the glyph center.
    pub scale: f64,
    /// Replacement color; `None` keeps the glyph's own color.
    pub color: Option<PackedColor>,
}

impl Default for GlyphTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GlyphTransform {
    /// No change at all.
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
        color: None,
    };

    /// Pure translation.
    pub fn offset(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation.
    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: degrees,
            ..Self::IDENTITY
        }
    }

    /// Pure scale.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Pure recolor.
    pub fn color(color: PackedColor) -> Self {
        Self {
            color: Some(color),
            ..Self::IDENTITY
        }
    }

    /// Stack `next` on top of `self`: offsets and rotations add, scales multiply, the later color wins.
    pub fn then(self, next: Self) -> Self {
        Self {
            offset: self.offset + next.offset,
            rotation: self.rotation + next.rotation,
            scale: self.scale * next.scale,
            color: next.color.or(self.color),
        }
    }

    /// Return `true` when applying the transform changes nothing.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
