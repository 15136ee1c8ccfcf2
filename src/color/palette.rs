use crate::foundation::core::PackedColor;

/// External color-name dictionary.
///
/// Implementations decide their own naming rules; [`ColorResolver`](crate::ColorResolver) passes
/// each hue word through unchanged.
pub trait ColorNames {
    /// Look up a single color name.
    fn lookup(&self, name: &str) -> Option<PackedColor>;
}

impl<F> ColorNames for F
where
    F: Fn(&str) -> Option<PackedColor>,
{
    fn lookup(&self, name: &str) -> Option<PackedColor> {
        self(name)
    }
}

/// Built-in palette of conventional color names, matched case-insensitively.
///
/// `-` and spaces inside a name are treated as `_`, so `light-gray` finds `LIGHT_GRAY`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicPalette;

const BASIC_COLORS: &[(&str, u32)] = &[
    ("CLEAR", 0x0000_0000),
    ("BLACK", 0x0000_00FF),
    ("WHITE", 0xFFFF_FFFF),
    ("LIGHT_GRAY", 0xBFBF_BFFF),
    ("GRAY", 0x7F7F_7FFF),
    ("GREY", 0x7F7F_7FFF),
    ("DARK_GRAY", 0x3F3F_3FFF),
    ("BLUE", 0x0000_FFFF),
    ("NAVY", 0x0000_80FF),
    ("ROYAL", 0x4169_E1FF),
    ("SLATE", 0x7080_90FF),
    ("SKY", 0x87CE_EBFF),
    ("CYAN", 0x00FF_FFFF),
    ("TEAL", 0x007F_7FFF),
    ("GREEN", 0x00FF_00FF),
    ("CHARTREUSE", 0x7FFF_00FF),
    ("LIME", 0x32CD_32FF),
    ("FOREST", 0x228B_22FF),
    ("OLIVE", 0x6B8E_23FF),
    ("YELLOW", 0xFFFF_00FF),
    ("GOLD", 0xFFD7_00FF),
    ("GOLDENROD", 0xDAA5_20FF),
    ("ORANGE", 0xFFA5_00FF),
    ("BROWN", 0x8B45_13FF),
    ("TAN", 0xD2B4_8CFF),
    ("FIREBRICK", 0xB222_22FF),
    ("RED", 0xFF00_00FF),
    ("SCARLET", 0xFF34_1CFF),
    ("CORAL", 0xFF7F_50FF),
    ("SALMON", 0xFA80_72FF),
    ("PINK", 0xFF69_B4FF),
    ("MAGENTA", 0xFF00_FFFF),
    ("PURPLE", 0xA020_F0FF),
    ("VIOLET", 0xEE82_EEFF),
    ("MAROON", 0xB030_60FF),
];

impl BasicPalette {
    /// All entries as `(NAME, color)` pairs.
    pub fn entries() -> impl Iterator<Item = (&'static str, PackedColor)> {
        BASIC_COLORS
            .iter()
            .map(|&(name, rgba)| (name, PackedColor(rgba)))
    }
}

impl ColorNames for BasicPalette {
    fn lookup(&self, name: &str) -> Option<PackedColor> {
        let key: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        BASIC_COLORS
            .iter()
            .find(|(n, _)| *n == key)
            .map(|&(_, rgba)| PackedColor(rgba))
    }
}
