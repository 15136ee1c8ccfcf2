/// Convenience result type used across glyphwright.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Top-level error taxonomy.
///
/// Markup content never produces an error: malformed tags degrade to literal text or defaults.
/// Errors are reserved for caller contract violations and configuration loading.
#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    /// Invalid caller-provided arguments (negative width, zero max lines, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or deserializing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphError {
    /// Build a [`GlyphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
