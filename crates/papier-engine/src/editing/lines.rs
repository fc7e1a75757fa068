/// A byte range `[start, end)` into the edit buffer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Span of the line containing `offset`, excluding its trailing newline.
///
/// The line starts after the previous `\n` (or at 0) and ends at the next
/// `\n` at or after `offset` (or at the end of the text). An offset sitting
/// exactly on a `\n` belongs to the line that newline terminates.
///
/// `offset` must be a char boundary within `text`.
pub fn line_span_at(text: &str, offset: usize) -> Span {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    Span { start, end }
}
