use std::ops::Range;

use papier_engine::{Document, DocumentId, EditBuffer, InvariantViolation, Transformation};

/// Editable text surface for one document.
///
/// Offsets are UTF-8 byte offsets kept on char boundaries. The selection runs
/// between `anchor` and `caret`; when they are equal it is a plain caret.
#[derive(Debug, Clone)]
pub struct Editor {
    document_id: DocumentId,
    title: String,
    text: String,
    anchor: usize,
    caret: usize,
    dirty: bool,
}

impl Editor {
    /// Open a document with the caret at the end of its content
    pub fn open(document: &Document) -> Self {
        let end = document.content.len();
        Self {
            document_id: document.id,
            title: document.title.clone(),
            text: document.content.clone(),
            anchor: end,
            caret: end,
            dirty: false,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Range<usize> {
        self.anchor.min(self.caret)..self.anchor.max(self.caret)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Apply a toolbar transformation to the current selection.
    ///
    /// On success the text is replaced and the selection collapses to the
    /// returned caret. On failure nothing changes.
    pub fn apply(&mut self, transformation: Transformation) -> Result<(), InvariantViolation> {
        let buffer = EditBuffer::new(self.text.as_str(), self.selection())?;
        let result = buffer.apply(transformation);

        self.text = result.text;
        self.collapse_to(result.caret);
        self.dirty = true;
        Ok(())
    }

    /// Replace the selection with `s`
    pub fn insert_str(&mut self, s: &str) {
        let range = self.selection();
        self.text.replace_range(range.clone(), s);
        self.collapse_to(range.start + s.len());
        self.dirty = true;
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Delete the selection, or the character before the caret
    pub fn backspace(&mut self) {
        if self.anchor != self.caret {
            self.insert_str("");
        } else if let Some(prev) = self.prev_boundary(self.caret) {
            self.anchor = prev;
            self.insert_str("");
        }
    }

    /// Delete the selection, or the character after the caret
    pub fn delete(&mut self) {
        if self.anchor != self.caret {
            self.insert_str("");
        } else if let Some(next) = self.next_boundary(self.caret) {
            self.anchor = next;
            self.insert_str("");
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        let target = self.prev_boundary(self.caret).unwrap_or(0);
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let target = self.next_boundary(self.caret).unwrap_or(self.text.len());
        self.move_to(target, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        let target = self.line_start(self.caret);
        self.move_to(target, extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        let target = self.line_end(self.caret);
        self.move_to(target, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let start = self.line_start(self.caret);
        if start == 0 {
            self.move_to(0, extend);
            return;
        }
        let column = self.text[start..self.caret].chars().count();
        let prev_start = self.line_start(start - 1);
        let target = self.offset_at_column(prev_start, column);
        self.move_to(target, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let end = self.line_end(self.caret);
        if end == self.text.len() {
            self.move_to(end, extend);
            return;
        }
        let column = self.text[self.line_start(self.caret)..self.caret]
            .chars()
            .count();
        let target = self.offset_at_column(end + 1, column);
        self.move_to(target, extend);
    }

    /// Zero-based (line, char column) of the caret
    pub fn caret_position(&self) -> (usize, usize) {
        let before = &self.text[..self.caret];
        let line = before.matches('\n').count();
        let column = before[self.line_start(self.caret)..].chars().count();
        (line, column)
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        self.caret = target;
        if !extend {
            self.anchor = target;
        }
    }

    fn collapse_to(&mut self, offset: usize) {
        self.anchor = offset;
        self.caret = offset;
    }

    fn prev_boundary(&self, offset: usize) -> Option<usize> {
        self.text[..offset].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self, offset: usize) -> Option<usize> {
        self.text[offset..]
            .chars()
            .next()
            .map(|ch| offset + ch.len_utf8())
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i)
    }

    /// Byte offset of `column` chars into the line starting at `line_start`,
    /// stopping at the end of that line
    fn offset_at_column(&self, line_start: usize, column: usize) -> usize {
        let line_end = self.line_end(line_start);
        self.text[line_start..line_end]
            .char_indices()
            .nth(column)
            .map_or(line_end, |(i, _)| line_start + i)
    }
}
