pub(crate) mod breaks;
pub(crate) mod engine;
pub(crate) mod metrics;
