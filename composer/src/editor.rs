//! Document boundary between the composer core and the host editor.
//!
//! The composer never owns the document. Every entry point borrows an
//! [`EditorSurface`] for the duration of one event and performs its edits
//! through it, so the same core drives a rich-text host editor and the
//! plain [`TextArea`] used in tests.

use std::ops::Range;

/// Operations the composer needs from the host's editor.
///
/// Offsets are byte offsets into the plain text and always lie on char
/// boundaries. Block breaks are surfaced as `\n` in the plain text.
pub trait EditorSurface {
    /// Entire document as plain text.
    fn text(&self) -> String;

    /// Cursor position as a byte offset into [`EditorSurface::text`].
    fn cursor(&self) -> usize;

    /// Up to `max_chars` characters immediately before the cursor.
    fn text_window_before_cursor(&self, max_chars: usize) -> String;

    /// Replace `range` with `replacement` and place the cursor after it.
    fn replace_range(&mut self, range: Range<usize>, replacement: &str);

    fn insert_at_cursor(&mut self, text: &str);

    /// Replace the whole document and place the cursor at the end.
    fn replace_all(&mut self, text: &str);

    fn clear(&mut self);

    /// Whether the document spans multiple blocks or hard breaks.
    fn has_block_break(&self) -> bool;

    fn focus(&mut self);
}

/// Plain-text editor for tests and hosts without a rich document engine.
#[derive(Debug, Default)]
pub struct TextArea {
    text: String,
    cursor: usize,
    focused: bool,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and move the cursor to the end, like pasting
    /// into an empty editor.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = self.clamp_to_char_boundary(cursor);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn clamp_to_char_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while offset > 0 && !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl EditorSurface for TextArea {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn text_window_before_cursor(&self, max_chars: usize) -> String {
        let before = &self.text[..self.cursor];
        let start = before
            .char_indices()
            .rev()
            .take(max_chars)
            .last()
            .map_or(before.len(), |(idx, _)| idx);
        before[start..].to_string()
    }

    fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        let start = self.clamp_to_char_boundary(range.start);
        let end = self.clamp_to_char_boundary(range.end.max(start));
        self.text.replace_range(start..end, replacement);
        self.cursor = start + replacement.len();
    }

    fn insert_at_cursor(&mut self, text: &str) {
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn replace_all(&mut self, text: &str) {
        self.set_text(text);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn has_block_break(&self) -> bool {
        self.text.contains('\n')
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
