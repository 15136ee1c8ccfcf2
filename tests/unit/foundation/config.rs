use super::*;

#[test]
fn missing_fields_take_defaults() {
    let cfg = TypingConfig::from_json_str(r#"{ "seconds_per_char": 0.1 }"#).unwrap();
    assert_eq!(cfg.seconds_per_char, 0.1);
    assert_eq!(cfg.default_wait, 0.25);
    assert_eq!(cfg.speed_presets, SpeedPresets::default());
    assert_eq!(cfg.base_color, PackedColor::WHITE);
}

#[test]
fn colors_and_variables_deserialize() {
    let cfg = TypingConfig::from_json_str(
        r##"{ "base_color": "#336699", "variables": { "player": "Ada" } }"##,
    )
    .unwrap();
    assert_eq!(cfg.base_color, PackedColor(0x3366_99FF));
    assert_eq!(cfg.variables.get("player").map(String::as_str), Some("Ada"));
}

#[test]
fn invalid_values_are_rejected() {
    let err = TypingConfig::from_json_str(r#"{ "seconds_per_char": -1.0 }"#).unwrap_err();
    assert!(matches!(err, GlyphError::Validation(_)));

    let err = TypingConfig::from_json_str(r#"{ "char_limit_per_frame": 0 }"#).unwrap_err();
    assert!(matches!(err, GlyphError::Validation(_)));

    let err = TypingConfig::from_json_str("not json").unwrap_err();
    assert!(matches!(err, GlyphError::Config(_)));
}

#[test]
fn speed_presets_are_case_insensitive() {
    let p = SpeedPresets::default();
    assert_eq!(p.get("faster"), Some(0.25));
    assert_eq!(p.get(" Slow "), Some(1.5));
    assert_eq!(p.get("ludicrous"), None);
}

#[test]
fn shared_is_default() {
    assert_eq!(TypingConfig::shared(), &TypingConfig::default());
}
