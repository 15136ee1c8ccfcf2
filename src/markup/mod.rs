pub(crate) mod context;
pub(crate) mod style_stack;
pub(crate) mod tokenizer;
pub(crate) mod vars;
