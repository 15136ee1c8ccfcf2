use super::*;
use crate::color::palette::BasicPalette;
use crate::color::resolver::ColorResolver;
use crate::glyph::record::GlyphStyle;

fn effect(name: &str, raw: &str) -> BuiltinEffect {
    let p = EffectParams::parse(name, raw, ColorResolver::new(&BasicPalette));
    BuiltinEffect::from_params(name, &p).expect("builtin")
}

fn cx(index: usize, time: f64, glyph_time: f64) -> EffectContext {
    EffectContext {
        glyph: GlyphStyle::new(PackedColor::WHITE).glyph('x'),
        index,
        count: 4,
        time,
        glyph_time,
        unit: 16.0,
        seed: 42,
    }
}

#[test]
fn every_name_builds() {
    for name in BuiltinEffect::NAMES {
        assert!(effect(name, "").duration() >= 0.0, "{name}");
    }
}

#[test]
fn defaults_follow_the_parameter_table() {
    assert_eq!(
        effect("WAVE", ""),
        BuiltinEffect {
            kind: BuiltinKind::Wave {
                distance: 1.0,
                frequency: 1.0,
                intensity: 1.0,
            },
            duration: f64::INFINITY,
        }
    );
    assert_eq!(effect("SLIDE", "").duration, 1.0);
    assert_eq!(
        effect("JOLT", "").kind,
        BuiltinKind::Jolt {
            distance: 1.0,
            intensity: 1.0,
            chance: 0.2,
        }
    );
}

#[test]
fn extreme_parameters_saturate() {
    assert_eq!(
        effect("WAVE", "1e9;-3;inf").kind,
        BuiltinKind::Wave {
            distance: 10.0,
            frequency: 0.0,
            intensity: 20.0,
        }
    );
    assert_eq!(
        effect("SPIN", "-100").kind,
        BuiltinKind::Spin { rotations: -20.0 }
    );
}

#[test]
fn wave_is_periodic_and_bounded() {
    let wave = effect("WAVE", "");
    let a = wave.apply(&cx(2, 0.3, 0.0));
    let b = wave.apply(&cx(2, 1.3, 0.0));
    assert!((a.offset.y - b.offset.y).abs() < 1e-9);
    for step in 0..100 {
        let t = wave.apply(&cx(step % 4, step as f64 * 0.05, 0.0));
        assert!(t.offset.y.abs() <= 16.0 * 0.3 + 1e-9);
        assert_eq!(t.offset.x, 0.0);
    }
}

#[test]
fn shake_is_deterministic_for_a_seed() {
    let shake = effect("SHAKE", "");
    assert_eq!(shake.apply(&cx(1, 0.5, 0.0)), shake.apply(&cx(1, 0.5, 0.0)));
    let mut other = cx(1, 0.5, 0.0);
    other.seed = 43;
    assert_ne!(shake.apply(&cx(1, 0.5, 0.0)), shake.apply(&other));
}

#[test]
fn jolt_with_zero_chance_never_moves() {
    let jolt = effect("JOLT", "1;1;0");
    for step in 0..50 {
        assert!(jolt.apply(&cx(0, f64::from(step) * 0.1, 0.0)).is_identity());
    }
}

#[test]
fn entrance_effects_settle_at_identity() {
    for name in ["SLIDE", "HANG", "SPIN", "SHRINK", "EMERGE", "SPIRAL"] {
        let e = effect(name, "");
        assert!(e.per_glyph(), "{name}");
        let start = e.apply(&cx(0, 0.0, 0.0));
        let settled = e.apply(&cx(0, 5.0, 5.0));
        assert!(!start.is_identity(), "{name} should start displaced");
        assert!((settled.offset.x).abs() < 1e-9, "{name}");
        assert!((settled.offset.y).abs() < 1e-9, "{name}");
        assert!((settled.rotation).abs() < 1e-9, "{name}");
        assert!((settled.scale - 1.0).abs() < 1e-9, "{name}");
    }
}

#[test]
fn slower_entrances_live_longer() {
    assert_eq!(effect("SLIDE", "1;0.5").duration(), 2.0);
    assert_eq!(effect("SLIDE", "1;2").duration(), 0.5);
}

#[test]
fn fade_blends_from_transparent() {
    let fade = effect("FADE", "");
    assert_eq!(
        fade.apply(&cx(0, 0.0, 0.0)).color,
        Some(PackedColor::WHITE.with_alpha(0.0))
    );
    assert_eq!(fade.apply(&cx(0, 1.0, 1.0)).color, Some(PackedColor::WHITE));
}

#[test]
fn blink_alternates() {
    let blink = effect("BLINK", ";red;1;0.5");
    assert_eq!(
        blink.apply(&cx(0, 0.25, 0.0)).color,
        Some(PackedColor(0xFF00_00FF))
    );
    assert_eq!(
        blink.apply(&cx(0, 0.75, 0.0)).color,
        Some(PackedColor::WHITE.with_alpha(0.0))
    );
}

#[test]
fn rainbow_and_gradient_recolor() {
    let rainbow = effect("RAINBOW", "");
    assert_eq!(rainbow.apply(&cx(0, 0.0, 0.0)).color, Some(PackedColor(0xFF00_00FF)));
    let gradient = effect("GRADIENT", "");
    assert_eq!(gradient.apply(&cx(0, 0.0, 0.0)).color, Some(PackedColor::WHITE));
}

#[test]
fn pulse_and_heartbeat_scale_up_only() {
    for name in ["PULSE", "HEARTBEAT"] {
        let e = effect(name, "");
        for step in 0..40 {
            let s = e.apply(&cx(1, f64::from(step) * 0.037, 0.0)).scale;
            assert!(s >= 1.0 - 1e-9, "{name}: {s}");
        }
    }
}
