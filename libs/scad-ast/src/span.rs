//! # Source Spans
//!
//! Byte-offset spans into the original SCAD source. Spans are opaque to the
//! geometry pipeline; they exist so diagnostics can point back at the text
//! that produced a bad primitive, and they ride along on every generated
//! point for the same reason.

use serde::{Deserialize, Serialize};

/// A half-open byte range in the source text.
///
/// ## Example
///
/// ```rust
/// use scad_ast::Span;
///
/// let span = Span::new(10, 24);
/// assert_eq!(span.len(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a span from start/end offsets.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A span that points nowhere; used for synthesized geometry.
    #[must_use]
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_span_is_empty() {
        assert!(Span::synthetic().is_empty());
    }

    #[test]
    fn span_roundtrips_through_serde() {
        let span = Span::new(3, 9);
        let json = serde_json::to_string(&span).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(span, back);
    }
}
