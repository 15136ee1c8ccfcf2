use crate::glyph::record::GlyphStyle;

/// Bounded history of styles set by markup tags.
///
/// Every style change pushes; `[]` pops one level. Popping at the base is a no-op, and pushing
/// past the depth limit forgets the oldest non-base entry, so neither direction can fail.
#[derive(Clone, Debug)]
pub(crate) struct StyleStack {
    base: GlyphStyle,
    stack: Vec<GlyphStyle>,
    depth: usize,
}

impl StyleStack {
    pub(crate) fn new(base: GlyphStyle, depth: usize) -> Self {
        Self {
            base,
            stack: Vec::new(),
            depth: depth.max(1),
        }
    }

    pub(crate) fn current(&self) -> GlyphStyle {
        self.stack.last().copied().unwrap_or(self.base)
    }

    pub(crate) fn base(&self) -> GlyphStyle {
        self.base
    }

    pub(crate) fn push(&mut self, style: GlyphStyle) {
        if self.stack.len() >= self.depth {
            self.stack.remove(0);
        }
        self.stack.push(style);
    }

    /// Apply `f` to the current style and push the result.
    pub(crate) fn push_with(&mut self, f: impl FnOnce(GlyphStyle) -> GlyphStyle) {
        let next = f(self.current());
        self.push(next);
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn reset(&mut self) {
        self.stack.clear();
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}
