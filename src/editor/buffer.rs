use ropey::Rope;

use super::{CursorPosition, TextDocument};

/// A text buffer backed by a rope data structure.
///
/// Lines are addressed by index and edited as whole strings; the cursor
/// column is a character offset into the cursor line.
pub struct EditorBuffer {
    rope: Rope,
    cursor: CursorPosition,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: CursorPosition::default(),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in characters (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Move cursor to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, column: usize) {
        let max_line = self.line_count().saturating_sub(1);
        let line = line.min(max_line);
        let column = column.min(self.line_len(line));
        self.cursor = CursorPosition::new(line, column);
    }
}

impl TextDocument for EditorBuffer {
    fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn line(&self, index: usize) -> Option<String> {
        self.line_at(index)
    }

    fn set_line(&mut self, index: usize, text: &str) {
        if index >= self.rope.len_lines() {
            tracing::warn!(index, lines = self.rope.len_lines(), "set_line past end of buffer");
            return;
        }
        let start = self.rope.line_to_char(index);
        let end = start + self.line_len(index);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.dirty = true;
    }

    fn set_cursor(&mut self, position: CursorPosition) {
        self.move_to(position.line, position.column);
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_line_at_strips_crlf() {
        let buf = EditorBuffer::from_text("one\r\ntwo");
        assert_eq!(buf.line_at(0), Some("one".to_string()));
    }

    #[test]
    fn test_form_feed_and_line_separator_stay_inside_a_line() {
        let buf = EditorBuffer::from_text("a\x0cb\n- [ ] task\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_at(0), Some("a\x0cb".to_string()));
        assert_eq!(buf.line_at(1), Some("- [ ] task".to_string()));

        let buf = EditorBuffer::from_text("a\u{2028}b\u{85}c\n- [ ] task\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_at(1), Some("- [ ] task".to_string()));
    }

    #[test]
    fn test_set_line_after_line_with_form_feed() {
        let mut buf = EditorBuffer::from_text("a\x0cb\n- [ ] task\n");
        buf.set_line(1, "- [/] task");
        assert_eq!(buf.text(), "a\x0cb\n- [/] task\n");
    }

    #[test]
    fn test_line_len_counts_chars() {
        let buf = EditorBuffer::from_text("café\nhi");
        assert_eq!(buf.line_len(0), 4);
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn test_new_buffer_is_clean() {
        let buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
    }

    // --- set_line ---

    #[test]
    fn test_set_line_replaces_middle_line() {
        let mut buf = EditorBuffer::from_text("a\nb\nc\n");
        buf.set_line(1, "- [ ] b");
        assert_eq!(buf.text(), "a\n- [ ] b\nc\n");
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_set_line_keeps_crlf() {
        let mut buf = EditorBuffer::from_text("a\r\nb\r\n");
        buf.set_line(0, "- [x] a");
        assert_eq!(buf.text(), "- [x] a\r\nb\r\n");
    }

    #[test]
    fn test_set_line_last_line_without_newline() {
        let mut buf = EditorBuffer::from_text("first\nlast");
        buf.set_line(1, "- [ ] last");
        assert_eq!(buf.text(), "first\n- [ ] last");
    }

    #[test]
    fn test_set_line_multibyte() {
        let mut buf = EditorBuffer::from_text("café\nnext");
        buf.set_line(0, "- [ ] café");
        assert_eq!(buf.text(), "- [ ] café\nnext");
    }

    #[test]
    fn test_set_line_past_end_is_noop() {
        let mut buf = EditorBuffer::from_text("only");
        buf.set_line(3, "nope");
        assert_eq!(buf.text(), "only");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.set_line(0, "bye");
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    // --- Cursor ---

    #[test]
    fn test_cursor_starts_at_origin() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.cursor(), CursorPosition::new(0, 0));
    }

    #[test]
    fn test_move_to_clamps_line_and_column() {
        let mut buf = EditorBuffer::from_text("hello\nhi");
        buf.move_to(9, 9);
        assert_eq!(buf.cursor(), CursorPosition::new(1, 2));
    }

    #[test]
    fn test_set_cursor_after_set_line() {
        let mut buf = EditorBuffer::from_text("task\nnext");
        buf.set_line(0, "- [ ] task");
        buf.set_cursor(CursorPosition::new(0, 10));
        assert_eq!(buf.cursor(), CursorPosition::new(0, 10));
    }
}
