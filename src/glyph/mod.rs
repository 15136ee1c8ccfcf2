//! Compact per-glyph style encoding.

pub(crate) mod record;
