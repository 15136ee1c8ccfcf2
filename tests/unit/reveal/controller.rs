use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::markup::context::ParseContext;
use crate::markup::tokenizer::tokenize;

const SPC: f64 = 0.035;

fn controller(text: &str) -> RevealController {
    let parsed = tokenize(text, &ParseContext::shared());
    RevealController::new(TypingConfig::shared(), parsed.tokens, parsed.glyphs.len())
}

#[test]
fn wait_holds_the_cursor() {
    let mut r = controller("{WAIT=1}ab");
    assert_eq!(r.advance(0.5), 0);
    assert_eq!(r.visible_count(), 0);
    assert_eq!(r.state(), RevealState::Running);
    r.advance(1.0);
    assert_eq!(r.visible_count(), 2);
    assert!(r.is_finished());
}

#[test]
fn characters_cost_seconds_per_char() {
    let mut r = controller("abcdef");
    r.advance(SPC * 3.5);
    assert_eq!(r.visible_count(), 3);
    r.advance(SPC);
    assert_eq!(r.visible_count(), 4);
}

#[test]
fn visible_count_never_decreases() {
    let mut r = controller("{SLOW}hello{FAST} world{WAIT=0.1}!{SKIP=2}abc");
    let mut last = 0;
    for _ in 0..200 {
        r.advance(0.013);
        assert!(r.visible_count() >= last);
        last = r.visible_count();
    }
    assert!(r.is_finished());
    assert_eq!(r.visible_count(), r.total());
}

#[test]
fn speed_tokens_scale_the_delay() {
    let mut r = controller("{SPEED=0.5}abcd");
    r.advance(SPC * 2.0 + 1e-9);
    assert_eq!(r.token_speed(), 2.0);
    assert_eq!(r.visible_count(), 1);

    let mut r = controller("{FASTER}abcd");
    r.advance(SPC + 1e-9);
    assert_eq!(r.visible_count(), 4);
}

#[test]
fn global_speed_scales_time() {
    let mut r = controller("abcd");
    r.set_speed(2.0);
    r.advance(SPC + 1e-9);
    assert_eq!(r.visible_count(), 2);
    r.set_speed(0.0);
    assert_eq!(r.speed(), 2.0);
}

#[test]
fn skip_reveals_at_once_and_ignores_waits() {
    let mut r = controller("{SKIP=3}ab{WAIT=5}cdef");
    r.advance(0.0);
    assert_eq!(r.visible_count(), 3);

    let mut r = controller("a{SKIP}bc{WAIT=5}def");
    r.advance(SPC);
    assert!(r.is_finished());
}

#[test]
fn char_limit_caps_each_frame() {
    let config = TypingConfig {
        char_limit_per_frame: Some(2),
        ..TypingConfig::default()
    };
    let parsed = tokenize("abcdefg", &ParseContext::shared());
    let mut r = RevealController::new(&config, parsed.tokens, parsed.glyphs.len());
    assert_eq!(r.advance(10.0), 2);
    assert_eq!(r.advance(0.0), 2);
    assert_eq!(r.visible_count(), 4);
}

#[test]
fn events_fire_once_in_order() {
    let mut r = controller("a{EVENT=one}b{EVENT=two}c");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    r.on_event(move |name| sink.borrow_mut().push(name.to_owned()));

    r.advance(SPC + 1e-9);
    assert_eq!(*seen.borrow(), ["one"]);
    r.advance(1.0);
    assert_eq!(*seen.borrow(), ["one", "two"]);
    assert_eq!(r.drain_events(), ["one", "two"]);
    assert!(r.drain_events().is_empty());
}

#[test]
fn end_fires_once_per_run() {
    let mut r = controller("ab");
    let ends = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&ends);
    r.on_end(move || *sink.borrow_mut() += 1);

    r.advance(1.0);
    r.advance(1.0);
    r.skip_to_end(true);
    assert_eq!(*ends.borrow(), 1);

    r.restart();
    assert_eq!(r.state(), RevealState::Stopped);
    assert_eq!(r.visible_count(), 0);
    r.advance(1.0);
    assert_eq!(*ends.borrow(), 2);
}

#[test]
fn skip_to_end_reveals_everything() {
    let mut r = controller("{WAIT=100}ab{EVENT=x}cd{SPEED=2}e");
    r.advance(0.1);
    r.skip_to_end(true);
    assert!(r.is_finished());
    assert_eq!(r.visible_count(), 5);
    assert_eq!(r.drain_events(), ["x"]);
    assert_eq!(r.token_speed(), 0.5);

    let mut r = controller("a{EVENT=x}b");
    r.skip_to_end(false);
    assert!(r.drain_events().is_empty());
}

#[test]
fn paused_controllers_do_not_move() {
    let mut r = controller("abc");
    r.pause();
    assert_eq!(r.advance(1.0), 0);
    assert_eq!(r.state(), RevealState::Paused);
    r.resume();
    r.advance(1.0);
    assert!(r.is_finished());
}

#[test]
fn colors_follow_the_cursor() {
    let mut r = controller("a{COLOR=red}b{CLEARCOLOR}c");
    r.advance(SPC + 1e-9);
    assert_eq!(r.active_color(), Some(PackedColor(0xFF00_00FF)));
    r.advance(SPC);
    assert_eq!(r.active_color(), None);
}

#[test]
fn invalid_deltas_are_ignored() {
    let mut r = controller("abc");
    assert_eq!(r.advance(f64::NAN), 0);
    assert_eq!(r.advance(-1.0), 0);
    assert_eq!(r.visible_count(), 0);
}

#[test]
fn empty_text_ends_on_first_advance() {
    let mut r = controller("");
    r.advance(0.0);
    assert!(r.is_finished());
}

#[test]
fn shrinking_the_total_keeps_progress() {
    let mut r = controller("abcdef");
    r.advance(SPC * 4.0 + 1e-9);
    r.set_total(3);
    assert_eq!(r.visible_count(), 3);
    r.advance(0.0);
    assert!(r.is_finished());
    r.set_total(6);
    assert_eq!(r.state(), RevealState::Running);
}

#[test]
fn tokens_past_a_shorter_total_fire_on_finish() {
    let mut run = controller("abcdef{EVENT=done}");
    run.set_total(3);
    run.advance(1.0);
    assert!(run.is_finished());
    assert_eq!(run.drain_events(), ["done"]);

    let mut skipped = controller("abcdef{EVENT=done}");
    skipped.set_total(3);
    skipped.skip_to_end(true);
    assert_eq!(skipped.drain_events(), ["done"]);
}
