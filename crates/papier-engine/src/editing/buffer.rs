use std::ops::Range;

use thiserror::Error;

/// Caller supplied a selection that does not describe a range of the text.
///
/// These are never clamped: a bad range means the UI lost track of its
/// selection and should find out about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("selection {start}..{end} is outside the buffer (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("selection start {start} is after selection end {end}")]
    Reversed { start: usize, end: usize },

    #[error("selection offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Text plus the selection a toolbar action applies to.
///
/// Offsets are UTF-8 byte offsets and always satisfy
/// `selection.start <= selection.end <= text.len()` with both ends on
/// character boundaries. An empty selection is a plain caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    selection: Range<usize>,
}

impl EditBuffer {
    pub fn new(
        text: impl Into<String>,
        selection: Range<usize>,
    ) -> Result<Self, InvariantViolation> {
        let text = text.into();
        let Range { start, end } = selection;

        if start > end {
            return Err(InvariantViolation::Reversed { start, end });
        }
        if end > text.len() {
            return Err(InvariantViolation::OutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                return Err(InvariantViolation::NotCharBoundary { offset });
            }
        }

        Ok(Self { text, selection })
    }

    /// Buffer with a collapsed selection at `caret`
    pub fn with_caret(text: impl Into<String>, caret: usize) -> Result<Self, InvariantViolation> {
        Self::new(text, caret..caret)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// The selected substring (empty for a caret)
    pub fn selected(&self) -> &str {
        &self.text[self.selection.clone()]
    }

    pub(crate) fn before(&self) -> &str {
        &self.text[..self.selection.start]
    }

    pub(crate) fn after(&self) -> &str {
        &self.text[self.selection.end..]
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_accepts_full_range() {
        let buffer = EditBuffer::new("Hello", 0..5).unwrap();
        assert_eq!(buffer.selected(), "Hello");
        assert_eq!(buffer.before(), "");
        assert_eq!(buffer.after(), "");
    }

    #[test]
    fn test_new_accepts_caret_at_end() {
        let buffer = EditBuffer::with_caret("Hello", 5).unwrap();
        assert_eq!(buffer.selection(), 5..5);
        assert_eq!(buffer.selected(), "");
    }

    #[test]
    fn test_new_rejects_start_past_end_of_text() {
        let err = EditBuffer::new("Hello", 6..6).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::OutOfBounds {
                start: 6,
                end: 6,
                len: 5
            }
        );
    }

    #[test]
    fn test_new_rejects_end_past_end_of_text() {
        let err = EditBuffer::new("Hello", 2..9).unwrap_err();
        assert!(matches!(err, InvariantViolation::OutOfBounds { .. }));
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_new_rejects_reversed_selection() {
        let err = EditBuffer::new("Hello", 4..1).unwrap_err();
        assert_eq!(err, InvariantViolation::Reversed { start: 4, end: 1 });
    }

    #[test]
    fn test_new_rejects_offset_inside_multibyte_char() {
        // 'é' is two bytes in UTF-8
        let err = EditBuffer::new("café", 4..4).unwrap_err();
        assert_eq!(err, InvariantViolation::NotCharBoundary { offset: 4 });
    }

    #[test]
    fn test_error_message_mentions_length() {
        let err = EditBuffer::new("abc", 7..7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "selection 7..7 is outside the buffer (length 3)"
        );
    }
}
