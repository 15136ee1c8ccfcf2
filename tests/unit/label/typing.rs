use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::effects::registry::EffectContext;
use crate::foundation::error::GlyphError;
use crate::layout::engine::BreakKind;

const CELL: f64 = 8.0;

fn label(text: &str) -> TypingLabel {
    TypingLabel::new(text).unwrap()
}

#[test]
fn new_label_starts_hidden() {
    let l = label("[RED]Hi[] there");
    assert_eq!(l.state(), RevealState::Stopped);
    assert!(l.visible_glyphs().is_empty());
    assert_eq!(l.parsed().text(), "Hi there");
    assert_eq!(l.layout().lines().len(), 1);
}

#[test]
fn advance_reveals_and_positions() {
    let mut l = label("abc");
    l.advance(0.1);
    let shown = l.visible_glyphs();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[1].glyph.ch(), 'b');
    assert_eq!(shown[1].position.x, CELL);
    assert_eq!(shown[1].final_position(), shown[1].position);
    assert_eq!(l.visible_text(), "ab");
}

#[test]
fn variables_are_applied_on_parse() {
    let mut l = TypingLabel::builder()
        .text("Hi {VAR=name}!")
        .variable("name", "Ada")
        .build()
        .unwrap();
    assert_eq!(l.parsed().text(), "Hi Ada!");

    l.set_variable("name", "Grace");
    assert_eq!(l.parsed().text(), "Hi Ada!");
    l.parse_tokens().unwrap();
    assert_eq!(l.parsed().text(), "Hi Grace!");
}

#[test]
fn fallback_fills_unbound_names() {
    let l = TypingLabel::builder()
        .text("<{VAR=missing}>")
        .variable_fallback(|name| Some(format!("?{name}")))
        .build()
        .unwrap();
    assert_eq!(l.parsed().text(), "<?missing>");
}

#[test]
fn parse_tokens_is_idempotent() {
    let mut l = label("{WAVE}hello{ENDWAVE} [*]world[] {IF=x;a=A;=B}");
    l.set_width(Some(6.0 * CELL)).unwrap();
    let before = l.layout().clone();
    l.parse_tokens().unwrap();
    assert_eq!(*l.layout(), before);
    l.parse_tokens().unwrap();
    assert_eq!(*l.layout(), before);
}

#[test]
fn width_changes_keep_reveal_progress() {
    let mut l = label("one two three");
    l.advance(0.2);
    let shown = l.reveal().visible_count();
    assert!(shown > 0);
    l.set_width(Some(5.0 * CELL)).unwrap();
    assert_eq!(l.reveal().visible_count(), shown);
    assert!(l.layout().lines().len() > 1);
}

#[test]
fn invalid_options_leave_the_label_untouched() {
    let mut l = label("abc");
    let err = l.set_width(Some(-4.0)).unwrap_err();
    assert!(matches!(err, GlyphError::Validation(_)));
    assert_eq!(l.options().width, None);
    assert!(l.set_max_lines(Some(0)).is_err());
    assert_eq!(l.options().max_lines, None);
}

#[test]
fn ellipsis_shows_after_the_reveal_ends() {
    let mut l = label("first\nsecond\nthird");
    l.set_max_lines(Some(1)).unwrap();
    l.set_ellipsis("~").unwrap();
    assert_eq!(l.layout().lines()[0].break_kind, BreakKind::Ellipsis);
    assert_eq!(l.reveal().total(), 5);

    l.advance(0.1);
    assert!(!l.visible_text().contains('~'));
    l.skip_to_the_end(true);
    assert_eq!(l.visible_text(), "first~");
}

#[test]
fn default_ellipsis_comes_from_the_config() {
    let config = TypingConfig {
        default_ellipsis: "…".to_owned(),
        ..TypingConfig::default()
    };
    let mut l = TypingLabel::builder()
        .config(config)
        .text("a\nb")
        .build()
        .unwrap();
    l.set_max_lines(Some(1)).unwrap();
    assert_eq!(l.layout().line_text(0), "a…");
}

#[test]
fn alignment_moves_lines() {
    let mut l = label("ab");
    l.set_width(Some(10.0 * CELL)).unwrap();
    l.set_alignment(Align::End, Align::Start).unwrap();
    assert_eq!(l.layout().lines()[0].x, 8.0 * CELL);
}

#[test]
fn wrap_toggle() {
    let mut l = label("aaa bbb");
    l.set_width(Some(4.0 * CELL)).unwrap();
    assert_eq!(l.layout().lines().len(), 2);
    l.set_wrap(false).unwrap();
    assert_eq!(l.layout().lines().len(), 1);
}

#[test]
fn callbacks_and_restart() {
    let mut l = label("a{EVENT=ping}b");
    let events = Rc::new(Cell::new(0));
    let ends = Rc::new(Cell::new(0));
    let (e, n) = (Rc::clone(&events), Rc::clone(&ends));
    l.on_event(move |name| {
        assert_eq!(name, "ping");
        e.set(e.get() + 1);
    });
    l.on_end(move || n.set(n.get() + 1));

    l.advance(1.0);
    assert_eq!((events.get(), ends.get()), (1, 1));
    l.restart();
    assert!(l.visible_glyphs().is_empty());
    l.skip_to_the_end(false);
    assert_eq!((events.get(), ends.get()), (1, 2));
}

#[test]
fn pause_freezes_reveal() {
    let mut l = label("abc");
    l.pause();
    l.advance(1.0);
    assert!(l.visible_glyphs().is_empty());
    l.resume();
    l.advance(1.0);
    assert!(l.is_finished());
}

#[test]
fn set_text_restarts() {
    let mut l = label("abc");
    l.skip_to_the_end(true);
    l.set_text("xyz!").unwrap();
    assert_eq!(l.state(), RevealState::Stopped);
    assert_eq!(l.reveal().total(), 4);
    assert_eq!(l.source(), "xyz!");
}

#[test]
fn effects_move_visible_glyphs() {
    let mut l = label("{SHAKE}abc{ENDSHAKE}");
    l.advance(0.5);
    let shown = l.visible_glyphs();
    assert_eq!(shown.len(), 3);
    assert!(shown.iter().any(|g| g.transform.offset != Vec2::ZERO));
    assert_eq!(l.effects().instances().len(), 1);
}

struct Tint;

impl Effect for Tint {
    fn duration(&self) -> f64 {
        f64::INFINITY
    }

    fn apply(&self, _cx: &EffectContext) -> GlyphTransform {
        GlyphTransform::color(PackedColor(0x00FF_00FF))
    }
}

#[test]
fn custom_effects_register_per_label() {
    let mut l = label("{TINT}ab{ENDTINT}c");
    assert_eq!(l.parsed().text(), "abc");
    assert!(l.parsed().effects.is_empty());
    l.register_effect("tint", |_| Box::new(Tint) as Box<dyn Effect>);
    l.parse_tokens().unwrap();
    assert_eq!(l.parsed().effects.len(), 1);
    l.skip_to_the_end(true);
    let shown = l.visible_glyphs();
    assert_eq!(shown[0].final_color(), PackedColor(0x00FF_00FF));
    assert_eq!(shown[2].final_color(), PackedColor::WHITE);
}

#[test]
fn identical_labels_render_identically() {
    let text = "{WAVE}{SHAKE}deterministic{ENDSHAKE}{ENDWAVE} [RED]text";
    let mut a = label(text);
    let mut b = label(text);
    for _ in 0..20 {
        a.advance(0.016);
        b.advance(0.016);
    }
    assert_eq!(a.visible_glyphs(), b.visible_glyphs());
}
