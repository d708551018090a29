//! Named actions a host can bind to a key or menu entry.

use crate::cycle::cycle;
use crate::editor::{CursorPosition, TextDocument};
use crate::sequence::MarkerSequence;

/// An action the host can trigger against the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CycleCheckbox,
}

impl Command {
    pub const ALL: [Self; 1] = [Self::CycleCheckbox];

    /// Stable identifier used for key bindings.
    pub const fn id(self) -> &'static str {
        match self {
            Self::CycleCheckbox => "cycle-checkbox",
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CycleCheckbox => "Cycle Checkbox State",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Run the action on the cursor line of `doc`.
    ///
    /// Returns the new cursor position, or `None` if the cursor line does
    /// not exist and nothing was changed.
    pub fn run(
        self,
        doc: &mut dyn TextDocument,
        markers: &MarkerSequence,
    ) -> Option<CursorPosition> {
        match self {
            Self::CycleCheckbox => cycle_checkbox(doc, markers),
        }
    }
}

fn cycle_checkbox(
    doc: &mut dyn TextDocument,
    markers: &MarkerSequence,
) -> Option<CursorPosition> {
    let cursor = doc.cursor();
    let Some(line) = doc.line(cursor.line) else {
        tracing::warn!(line = cursor.line, "cursor line does not exist");
        return None;
    };
    let outcome = cycle(&line, cursor.column, markers);
    doc.set_line(cursor.line, &outcome.line);
    let position = CursorPosition::new(cursor.line, outcome.column);
    doc.set_cursor(position);
    Some(position)
}
