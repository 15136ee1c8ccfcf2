pub(crate) mod builtins;
pub(crate) mod engine;
pub(crate) mod params;
pub(crate) mod registry;
pub(crate) mod transform;
