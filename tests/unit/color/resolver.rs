use super::*;
use crate::color::palette::BasicPalette;

fn resolver() -> ColorResolver<'static> {
    ColorResolver::new(&BasicPalette)
}

#[test]
fn hex_forms_parse() {
    let r = resolver();
    assert_eq!(r.try_resolve("#ff0000"), Some(PackedColor(0xFF00_00FF)));
    assert_eq!(r.try_resolve("#0000ff80"), Some(PackedColor(0x0000_FF80)));
    assert_eq!(r.try_resolve("#f00"), Some(PackedColor(0xFF00_00FF)));
    assert_eq!(r.try_resolve("#f008"), Some(PackedColor(0xFF00_0088)));
    assert_eq!(r.try_resolve("#12345"), None);
    assert_eq!(r.try_resolve("#gg0000"), None);
}

#[test]
fn names_are_case_insensitive() {
    let r = resolver();
    assert_eq!(r.try_resolve("RED"), Some(PackedColor(0xFF00_00FF)));
    assert_eq!(r.try_resolve("red"), Some(PackedColor(0xFF00_00FF)));
    assert_eq!(r.try_resolve("light gray"), Some(PackedColor(0xBFBF_BFFF)));
}

#[test]
fn unknown_tokens_fall_back_without_error() {
    let r = resolver();
    assert_eq!(r.try_resolve("citation needed"), None);
    assert_eq!(r.try_resolve(""), None);
    assert_eq!(r.resolve("no such colour"), ColorResolver::MISSING);
    assert_eq!(r.resolve("red:abc"), ColorResolver::MISSING);
}

#[test]
fn equal_mix_averages_channels() {
    let r = resolver();
    let c = r.try_resolve("red blue").unwrap();
    assert_eq!((c.r(), c.g(), c.b(), c.a()), (128, 0, 128, 255));
}

#[test]
fn weighted_mix_respects_ratio() {
    let r = resolver();
    let c = r.try_resolve("red:3 blue:1").unwrap();
    assert_eq!(c.r(), 191);
    assert_eq!(c.b(), 64);
    assert_eq!(r.try_resolve("red:0"), None);
}

#[test]
fn adjectives_shift_lightness_and_saturation() {
    let r = resolver();
    let base = r.try_resolve("red").unwrap();
    let light = r.try_resolve("light red").unwrap();
    let darkest = r.try_resolve("darkest red").unwrap();
    let dull = r.try_resolve("dull red").unwrap();

    let lum = |c: PackedColor| {
        let [r, g, b, _] = c.to_rgba_f64();
        rgb_to_hsl(r, g, b).2
    };
    let sat = |c: PackedColor| {
        let [r, g, b, _] = c.to_rgba_f64();
        rgb_to_hsl(r, g, b).1
    };

    assert!(lum(light) > lum(base));
    assert!(lum(darkest) < lum(base) - 0.25);
    assert!(sat(dull) < sat(base));
    assert_eq!(r.try_resolve("light"), None);
}

#[test]
fn hsl_round_trip_is_stable() {
    for &(rr, gg, bb) in &[(1.0, 0.0, 0.0), (0.2, 0.6, 0.4), (0.5, 0.5, 0.5)] {
        let (h, s, l) = rgb_to_hsl(rr, gg, bb);
        let (r2, g2, b2) = hsl_to_rgb(h, s, l);
        assert!((rr - r2).abs() < 1e-9);
        assert!((gg - g2).abs() < 1e-9);
        assert!((bb - b2).abs() < 1e-9);
    }
}
