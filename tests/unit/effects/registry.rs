use super::*;
use crate::color::palette::BasicPalette;
use crate::color::resolver::ColorResolver;
use crate::foundation::core::PackedColor;
use crate::glyph::record::GlyphStyle;

fn params<'a>(name: &'a str, raw: &'a str) -> EffectParams<'a> {
    EffectParams::parse(name, raw, ColorResolver::new(&BasicPalette))
}

fn glyph() -> GlyphRecord {
    GlyphStyle::new(PackedColor::WHITE).glyph('a')
}

struct Nudge;

impl Effect for Nudge {
    fn duration(&self) -> f64 {
        0.5
    }

    fn apply(&self, cx: &EffectContext) -> GlyphTransform {
        GlyphTransform::offset(crate::foundation::core::Vec2::new(cx.index as f64, 0.0))
    }
}

#[test]
fn builtins_are_known_case_insensitively() {
    let reg = EffectRegistry::builtin();
    assert!(reg.contains("wave"));
    assert!(reg.contains("Rainbow"));
    assert!(!reg.contains("GLOW"));
    assert_eq!(reg.names().len(), BuiltinEffect::NAMES.len());
}

#[test]
fn unknown_names_do_not_instantiate() {
    let reg = EffectRegistry::new();
    assert!(reg.create("GLOW", &params("GLOW", ""), 0..3).is_none());
}

#[test]
fn custom_factories_shadow_builtins() {
    let mut reg = EffectRegistry::new();
    reg.register("wave", |_| Box::new(Nudge) as Box<dyn Effect>);
    let inst = reg
        .create("WAVE", &params("WAVE", ""), 2..5)
        .expect("registered");
    assert_eq!(
        inst.apply(4, glyph()).offset,
        crate::foundation::core::Vec2::new(2.0, 0.0)
    );
    assert_eq!(reg.names().iter().filter(|n| *n == "WAVE").count(), 1);
}

#[test]
fn apply_is_identity_outside_the_range() {
    let reg = EffectRegistry::new();
    let inst = reg
        .create("SHAKE", &params("SHAKE", "5"), 1..3)
        .expect("builtin");
    assert!(inst.apply(0, glyph()).is_identity());
    assert!(inst.apply(3, glyph()).is_identity());
}

#[test]
fn seeds_depend_on_name_range_and_params() {
    let reg = EffectRegistry::new();
    let a = reg.create("SHAKE", &params("SHAKE", "1"), 0..3).expect("a");
    let b = reg.create("SHAKE", &params("SHAKE", "1"), 0..3).expect("b");
    let c = reg.create("SHAKE", &params("SHAKE", "2"), 0..3).expect("c");
    let d = reg.create("SHAKE", &params("SHAKE", "1"), 0..4).expect("d");
    assert_eq!(a.seed(), b.seed());
    assert_ne!(a.seed(), c.seed());
    assert_ne!(a.seed(), d.seed());
    assert_ne!(a.seed(), b.with_seed(9).seed());
}

#[test]
fn finite_effects_expire_into_identity() {
    let mut reg = EffectRegistry::new();
    reg.register("NUDGE", |_| Box::new(Nudge) as Box<dyn Effect>);
    let mut inst = reg.create("NUDGE", &params("NUDGE", ""), 0..2).expect("nudge");
    inst.update(0.4);
    assert!(!inst.is_finished());
    assert!(!inst.apply(1, glyph()).is_identity());
    inst.update(0.2);
    assert!(inst.is_finished());
    assert!(inst.apply(1, glyph()).is_identity());
}

#[test]
fn infinite_effects_never_expire() {
    let reg = EffectRegistry::new();
    let mut inst = reg.create("WAVE", &params("WAVE", "1;1;1;inf"), 0..2).expect("wave");
    inst.update(1.0e6);
    assert!(!inst.is_finished());
}

#[test]
fn entrance_effects_wait_for_every_glyph() {
    let reg = EffectRegistry::new();
    let mut inst = reg.create("SLIDE", &params("SLIDE", ""), 0..2).expect("slide");
    inst.reveal(1);
    inst.update(2.0);
    assert!(!inst.is_finished());
    inst.reveal(2);
    inst.update(0.5);
    assert!(!inst.is_finished());
    inst.update(0.6);
    assert!(inst.is_finished());
}
