use super::*;

#[test]
fn table_is_sorted_and_disjoint() {
    for pair in DEFAULT_TABLE.windows(2) {
        assert!(pair[0].0 <= pair[0].1);
        assert!(pair[0].1 < pair[1].0, "{:X} overlaps {:X}", pair[0].1, pair[1].0);
    }
}

#[test]
fn classes() {
    let p = BreakPolicy::DEFAULT;
    assert_eq!(p.class('a'), BreakClass::Alphabetic);
    assert_eq!(p.class(' '), BreakClass::Space);
    assert_eq!(p.class('\n'), BreakClass::Newline);
    assert_eq!(p.class('-'), BreakClass::Hyphen);
    assert_eq!(p.class('漢'), BreakClass::Ideographic);
    assert_eq!(p.class('か'), BreakClass::Ideographic);
    assert_eq!(p.class('\u{200D}'), BreakClass::Glue);
    assert_eq!(p.class('\u{FE0F}'), BreakClass::Glue);
    assert_eq!(p.class('\u{301}'), BreakClass::Glue);
    assert_eq!(p.class('。'), BreakClass::ClosePunct);
}

#[test]
fn breaks_after_spaces_and_hyphens() {
    let p = BreakPolicy::DEFAULT;
    assert!(p.can_break_between(' ', 'w'));
    assert!(!p.can_break_between('o', ' '));
    assert!(!p.can_break_between(' ', ' '));
    assert!(p.can_break_between('-', 'b'));
    assert!(p.can_break_between('\u{200B}', 'b'));
    assert!(!p.can_break_between('a', 'b'));
}

#[test]
fn cjk_breaks_on_both_sides_but_not_before_closing_punct() {
    let p = BreakPolicy::DEFAULT;
    assert!(p.can_break_between('漢', '字'));
    assert!(p.can_break_between('a', '漢'));
    assert!(p.can_break_between('漢', 'a'));
    assert!(!p.can_break_between('字', '。'));
    assert!(!p.can_break_between('「', '字'));
}

#[test]
fn emoji_sequences_stay_together() {
    let p = BreakPolicy::DEFAULT;
    assert!(!p.can_break_between('👩', '\u{200D}'));
    assert!(!p.can_break_between('\u{200D}', '💻'));
    assert!(!p.can_break_between('❤', '\u{FE0F}'));
    assert!(!p.can_break_between('e', '\u{301}'));
}

#[test]
fn no_break_spaces_glue() {
    let p = BreakPolicy::DEFAULT;
    assert!(!p.can_break_between('\u{A0}', 'x'));
    assert!(!p.can_break_between('x', '\u{A0}'));
}
