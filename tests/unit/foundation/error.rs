use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GlyphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GlyphError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlyphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
