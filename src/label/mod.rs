pub(crate) mod typing;
