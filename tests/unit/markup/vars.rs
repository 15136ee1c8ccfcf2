use super::*;

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn no_fallback(_: &str) -> Option<String> {
    None
}

#[test]
fn instance_bindings_shadow_globals() {
    let global = map(&[("name", "World"), ("place", "Earth")]);
    let local = map(&[("name", "Ada")]);
    let scope = VariableScope::new(&local, &global);
    let out = resolve_variables("Hi {VAR=name} of {var=place}!", &scope, &no_fallback);
    assert_eq!(out, "Hi Ada of Earth!");
}

#[test]
fn unbound_variables_use_fallback_or_empty() {
    let empty = BTreeMap::new();
    let scope = VariableScope::new(&empty, &empty);
    assert_eq!(resolve_variables("[{VAR=x}]", &scope, &no_fallback), "[]");

    let placeholder = |name: &str| Some(format!("<{name}>"));
    assert_eq!(resolve_variables("{VAR=x}", &scope, &placeholder), "<x>");
}

#[test]
fn other_tags_pass_through() {
    let empty = BTreeMap::new();
    let scope = VariableScope::new(&empty, &empty);
    let src = "{WAVE=1;2}hey{ENDWAVE} {WAIT} [RED]x[] {unclosed";
    assert_eq!(resolve_variables(src, &scope, &no_fallback), src);
}

#[test]
fn if_selects_matching_case() {
    let global = BTreeMap::new();
    let local = map(&[("mood", "happy")]);
    let scope = VariableScope::new(&local, &global);
    let src = "{IF=mood;happy=Yay!;sad=Oh.;=Hmm}";
    assert_eq!(resolve_variables(src, &scope, &no_fallback), "Yay!");
}

#[test]
fn if_falls_back_to_default_branch() {
    let global = BTreeMap::new();
    let local = map(&[("mood", "bored")]);
    let scope = VariableScope::new(&local, &global);
    let src = "{IF=mood;happy=Yay!;=Hmm}";
    assert_eq!(resolve_variables(src, &scope, &no_fallback), "Hmm");

    let empty = BTreeMap::new();
    let unbound = VariableScope::new(&empty, &empty);
    assert_eq!(resolve_variables(src, &unbound, &no_fallback), "Hmm");
    assert_eq!(resolve_variables("{IF=mood;a=b}", &unbound, &no_fallback), "");
}

#[test]
fn if_branches_may_hold_nested_tags() {
    let global = BTreeMap::new();
    let local = map(&[("mood", "happy"), ("who", "Bo")]);
    let scope = VariableScope::new(&local, &global);
    let src = "{IF=mood;happy={WAVE=1;2}hi {VAR=who}{ENDWAVE};=no}";
    assert_eq!(
        resolve_variables(src, &scope, &no_fallback),
        "{WAVE=1;2}hi Bo{ENDWAVE}"
    );
}

#[test]
fn values_are_not_rescanned_and_pass_is_idempotent() {
    let global = BTreeMap::new();
    let local = map(&[("a", "{VAR=a}")]);
    let scope = VariableScope::new(&local, &global);
    let once = resolve_variables("x{VAR=a}y", &scope, &no_fallback);
    assert_eq!(once, "x{VAR=a}y");
    assert_eq!(resolve_variables("x{VAR=a}y", &scope, &no_fallback), once);
}

#[test]
fn stray_open_brace_stays_literal() {
    let global = BTreeMap::new();
    let local = map(&[("name", "Ada")]);
    let scope = VariableScope::new(&local, &global);
    assert_eq!(
        resolve_variables("set {x {VAR=name}", &scope, &no_fallback),
        "set {x Ada"
    );
    assert_eq!(
        resolve_variables("{{VAR=name}} {", &scope, &no_fallback),
        "{Ada} {"
    );
}
