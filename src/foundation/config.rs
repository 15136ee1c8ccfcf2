use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::PackedColor;
use crate::foundation::error::{GlyphError, GlyphResult};

/// Delay multipliers for the named `{SPEED=..}` presets.
///
/// A multiplier scales the per-character delay: `2.0` types at half speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedPresets {
    /// `{SLOWER}`.
    pub slower: f64,
    /// `{SLOW}`.
    pub slow: f64,
    /// `{NORMAL}`.
    pub normal: f64,
    /// `{FAST}`.
    pub fast: f64,
    /// `{FASTER}`.
    pub faster: f64,
}

impl Default for SpeedPresets {
    fn default() -> Self {
        Self {
            slower: 2.0,
            slow: 1.5,
            normal: 1.0,
            fast: 0.5,
            faster: 0.25,
        }
    }
}

impl SpeedPresets {
    /// Look up a preset by its (case-insensitive) tag name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name.trim().to_ascii_uppercase().as_str() {
            "SLOWER" => Some(self.slower),
            "SLOW" => Some(self.slow),
            "NORMAL" => Some(self.normal),
            "FAST" => Some(self.fast),
            "FASTER" => Some(self.faster),
            _ => None,
        }
    }
}

/// Immutable configuration snapshot shared by the tokenizer and the reveal controller.
///
/// Nothing in the parsing or reveal code reads global state; callers pass a snapshot explicitly.
/// [`TypingConfig::shared`] exists only as a convenient default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Base delay between two revealed characters, in seconds.
    pub seconds_per_char: f64,
    /// Maximum number of characters revealed by one `advance` call (`None` = unlimited).
    pub char_limit_per_frame: Option<usize>,
    /// Duration of a bare `{WAIT}`, in seconds.
    pub default_wait: f64,
    /// Named speed presets.
    pub speed_presets: SpeedPresets,
    /// Foreground color of unstyled text.
    pub base_color: PackedColor,
    /// Color used by the `[?outline]` mode.
    pub outline_color: PackedColor,
    /// Text appended to the last kept line when a layout is truncated.
    pub default_ellipsis: String,
    /// Maximum depth of the bracket style stack.
    pub style_stack_depth: usize,
    /// Seed mixed into every stochastic effect.
    pub effect_seed: u64,
    /// Global variable bindings; label-level bindings override these.
    pub variables: BTreeMap<String, String>,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            seconds_per_char: 0.035,
            char_limit_per_frame: None,
            default_wait: 0.250,
            speed_presets: SpeedPresets::default(),
            base_color: PackedColor::WHITE,
            outline_color: PackedColor::BLACK,
            default_ellipsis: "...".to_owned(),
            style_stack_depth: 64,
            effect_seed: 0,
            variables: BTreeMap::new(),
        }
    }
}

impl TypingConfig {
    /// Process-wide default snapshot.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<TypingConfig> = OnceLock::new();
        SHARED.get_or_init(Self::default)
    }

    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GlyphResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| GlyphError::config(format!("parse typing config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read typing config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check numeric fields for contract violations.
    pub fn validate(&self) -> GlyphResult<()> {
        if !self.seconds_per_char.is_finite() || self.seconds_per_char < 0.0 {
            return Err(GlyphError::validation(
                "seconds_per_char must be finite and >= 0",
            ));
        }
        if !self.default_wait.is_finite() || self.default_wait < 0.0 {
            return Err(GlyphError::validation("default_wait must be finite and >= 0"));
        }
        if self.char_limit_per_frame == Some(0) {
            return Err(GlyphError::validation("char_limit_per_frame must be > 0"));
        }
        if self.style_stack_depth == 0 {
            return Err(GlyphError::validation("style_stack_depth must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
