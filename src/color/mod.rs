//! Color token resolution: hex literals, palette names and short descriptions.

pub(crate) mod palette;
pub(crate) mod resolver;

pub(crate) use resolver::{hsl_to_rgb, parse_hex};
