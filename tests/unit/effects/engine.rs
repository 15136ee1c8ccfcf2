use super::*;
use crate::color::palette::BasicPalette;
use crate::foundation::core::PackedColor;
use crate::glyph::record::GlyphStyle;

fn span(name: &str, params: &str, range: std::ops::Range<usize>) -> EffectSpan {
    EffectSpan {
        name: name.to_owned(),
        params: params.to_owned(),
        range,
    }
}

fn glyphs(n: usize) -> Vec<GlyphRecord> {
    (0..n)
        .map(|_| GlyphStyle::new(PackedColor::WHITE).glyph('a'))
        .collect()
}

fn engine(spans: &[EffectSpan], count: usize) -> EffectEngine {
    EffectEngine::from_spans(
        spans,
        EffectRegistry::builtin(),
        ColorResolver::new(&BasicPalette),
        0,
        count,
    )
}

#[test]
fn spans_are_clipped_and_unknown_names_skipped() {
    let e = engine(
        &[
            span("WAVE", "", 0..10),
            span("GLOW", "", 0..2),
            span("SHAKE", "", 6..9),
        ],
        4,
    );
    assert_eq!(e.instances().len(), 1);
    assert_eq!(e.instances()[0].range(), 0..4);
}

#[test]
fn transforms_stack_in_opening_order() {
    let mut e = engine(&[span("WOBBLE", "", 0..3), span("PULSE", "", 0..3)], 3);
    e.update(0.3, 3);
    let g = glyphs(3);
    let t = e.transform(1, g[1]);
    let wobble = e.instances()[0].apply(1, g[1]);
    let pulse = e.instances()[1].apply(1, g[1]);
    assert_eq!(t, wobble.then(pulse));
    assert_eq!(e.transforms(&g, 2).len(), 2);
}

#[test]
fn finished_instances_are_dropped() {
    let mut e = engine(&[span("WAVE", "1;1;1;0.5", 0..2)], 2);
    e.update(0.25, 2);
    assert!(!e.is_idle());
    e.update(0.5, 2);
    assert!(e.is_idle());
    assert!(e.transform(0, glyphs(1)[0]).is_identity());
}

#[test]
fn same_inputs_same_frames() {
    let spans = [span("SHAKE", "", 0..4), span("RAINBOW", "", 1..3)];
    let mut a = engine(&spans, 4);
    let mut b = engine(&spans, 4);
    let g = glyphs(4);
    for _ in 0..10 {
        a.update(1.0 / 60.0, 4);
        b.update(1.0 / 60.0, 4);
        assert_eq!(a.transforms(&g, 4), b.transforms(&g, 4));
    }
}
