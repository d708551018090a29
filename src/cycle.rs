//! Checkbox marker detection and cycling for a single line.
//!
//! A marker line looks like `- [x] content`: the literal `- [`, exactly one
//! marker character, `]`, an optional space, then the content. Cycling is
//! total: every line, including an empty one, produces a new line.

use std::sync::LazyLock;

use regex::Regex;

use crate::sequence::{FALLBACK_MARKER, MarkerSequence};

static MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \[(.)\] ?(.*)$").expect("marker line regex is valid")
});

/// A line split into its checkbox marker and the text after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineState {
    /// The character between the brackets, if the line has a checkbox.
    pub marker: Option<char>,
    /// Everything after the checkbox token and its delimiter space. For a
    /// line without a checkbox this is the whole line.
    pub content: String,
}

impl LineState {
    /// Split `line` into marker and content.
    pub fn parse(line: &str) -> Self {
        MARKER_LINE
            .captures(line)
            .and_then(|caps| {
                let marker = caps.get(1)?.as_str().chars().next()?;
                let content = caps.get(2).map_or("", |m| m.as_str());
                Some(Self {
                    marker: Some(marker),
                    content: content.to_string(),
                })
            })
            .unwrap_or_else(|| Self {
                marker: None,
                content: line.to_string(),
            })
    }

    /// Rebuild the line text, always with one space after the token.
    pub fn render(&self) -> String {
        let marker = self.marker.unwrap_or(FALLBACK_MARKER);
        format!("- [{marker}] {}", self.content)
    }

    /// The state after one cycle step.
    ///
    /// A known marker advances to the next one in `sequence`; an unknown
    /// marker, or a missing checkbox, becomes the unchecked marker.
    #[must_use]
    pub fn advance(self, sequence: &MarkerSequence) -> Self {
        let next = match self.marker {
            Some(marker) => sequence.next_after(marker).unwrap_or_else(|| {
                tracing::debug!(marker = %marker, "unrecognized marker, resetting to unchecked");
                FALLBACK_MARKER
            }),
            None => FALLBACK_MARKER,
        };
        Self {
            marker: Some(next),
            content: self.content,
        }
    }
}

/// Result of cycling a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub line: String,
    /// Cursor column in characters: the end of `line`.
    pub column: usize,
}

/// Cycle the checkbox on `line` through `sequence`.
///
/// The incoming cursor column does not affect the result; the cursor
/// always moves to the end of the new line.
pub fn cycle(line: &str, _cursor_column: usize, sequence: &MarkerSequence) -> CycleOutcome {
    let state = LineState::parse(line);
    let before = state.marker;
    let line = state.advance(sequence).render();
    tracing::debug!(?before, line = %line, "cycled checkbox");
    let column = line.chars().count();
    CycleOutcome { line, column }
}
