//! The document side of the checkbox command.
//!
//! [`TextDocument`] is the narrow interface a host editor has to provide;
//! [`EditorBuffer`] is a rope-backed implementation used by the CLI and
//! in tests.

mod buffer;

pub use buffer::EditorBuffer;

/// Cursor position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in characters.
    pub column: usize,
}

impl CursorPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Line-level access to an editable document.
pub trait TextDocument {
    /// Current cursor position.
    fn cursor(&self) -> CursorPosition;

    /// Text of line `index` without its line ending, or `None` past the end.
    fn line(&self, index: usize) -> Option<String>;

    /// Replace the text of line `index`, keeping its line ending.
    fn set_line(&mut self, index: usize, text: &str);

    /// Move the cursor.
    fn set_cursor(&mut self, position: CursorPosition);
}
