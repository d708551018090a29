//! The ordered list of marker characters a checkbox cycles through.
//!
//! The list is flat: it is the entire cycle, and the unchecked state `' '`
//! is an ordinary member that can be moved or removed like any other.

use crate::error::SequenceError;

/// Marker used when the sequence is empty.
pub const FALLBACK_MARKER: char = ' ';

/// Default cycle: unchecked, in progress, done, cancelled, forwarded, scheduled.
pub const BASIC_MARKERS: [char; 6] = [' ', '/', 'x', '-', '>', '<'];

/// Alternate markers appended to [`BASIC_MARKERS`] by the extended preset.
pub const EXTENDED_MARKERS: [char; 16] = [
    '?', '!', '*', '"', 'l', 'b', 'i', 'S', 'I', 'p', 'c', 'f', 'k', 'w', 'u', 'd',
];

/// Built-in marker sets the sequence can be reset to.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Basic,
    Extended,
}

impl Preset {
    /// The markers of this preset, in cycle order.
    pub fn markers(self) -> Vec<char> {
        match self {
            Self::Basic => BASIC_MARKERS.to_vec(),
            Self::Extended => BASIC_MARKERS
                .iter()
                .chain(EXTENDED_MARKERS.iter())
                .copied()
                .collect(),
        }
    }
}

/// Check that `ch` can sit between the brackets of a checkbox token.
///
/// # Errors
/// Returns [`SequenceError::InvalidValue`] for line breaks, which can never
/// appear inside a single line.
pub fn validate_marker(ch: char) -> Result<char, SequenceError> {
    if ch == '\n' || ch == '\r' {
        return Err(SequenceError::InvalidValue {
            value: ch.to_string(),
            reason: "line breaks cannot be markers",
        });
    }
    Ok(ch)
}

/// Parse user-entered text into a single marker character.
///
/// # Errors
/// Returns [`SequenceError::InvalidValue`] unless `value` is exactly one
/// valid character.
pub fn parse_marker(value: &str) -> Result<char, SequenceError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(SequenceError::InvalidValue {
            value: value.to_string(),
            reason: "marker cannot be empty",
        }),
        (Some(ch), None) => validate_marker(ch),
        (Some(_), Some(_)) => Err(SequenceError::InvalidValue {
            value: value.to_string(),
            reason: "marker must be a single character",
        }),
    }
}

/// Ordered, editable list of marker characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSequence {
    items: Vec<char>,
}

impl MarkerSequence {
    /// Build a sequence from already validated markers.
    ///
    /// # Errors
    /// Returns the first [`SequenceError::InvalidValue`] found.
    pub fn new(items: impl IntoIterator<Item = char>) -> Result<Self, SequenceError> {
        let items = items
            .into_iter()
            .map(validate_marker)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    /// The sequence for a built-in preset.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            items: preset.markers(),
        }
    }

    /// Markers in cycle order.
    pub fn items(&self) -> &[char] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.items.get(index).copied()
    }

    /// Index of the first occurrence of `marker`.
    ///
    /// Later duplicates are never found.
    pub fn position(&self, marker: char) -> Option<usize> {
        self.items.iter().position(|&m| m == marker)
    }

    pub fn contains(&self, marker: char) -> bool {
        self.position(marker).is_some()
    }

    /// The cycle actually stepped through: the items, or the single
    /// fallback marker when the list is empty.
    pub fn runtime_cycle(&self) -> &[char] {
        if self.items.is_empty() {
            &[FALLBACK_MARKER]
        } else {
            &self.items
        }
    }

    /// The marker that follows `marker`, wrapping at the end.
    ///
    /// Returns `None` when `marker` is not part of the cycle.
    pub fn next_after(&self, marker: char) -> Option<char> {
        let cycle = self.runtime_cycle();
        let index = cycle.iter().position(|&m| m == marker)?;
        Some(cycle[(index + 1) % cycle.len()])
    }

    /// Add a marker at the end of the sequence.
    ///
    /// Duplicates are accepted but logged, since only the first occurrence
    /// is reachable while cycling.
    ///
    /// # Errors
    /// Returns [`SequenceError::InvalidValue`] if `marker` is a line break.
    pub fn append(&mut self, marker: char) -> Result<(), SequenceError> {
        let marker = validate_marker(marker)?;
        if let Some(existing) = self.position(marker) {
            tracing::warn!(
                marker = %marker,
                existing,
                "duplicate marker appended; it will be unreachable while cycling"
            );
        }
        self.items.push(marker);
        Ok(())
    }

    /// Remove and return the marker at `index`.
    ///
    /// # Errors
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<char, SequenceError> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        if self.items.is_empty() {
            tracing::warn!(
                fallback = ?FALLBACK_MARKER,
                "marker sequence is now empty; cycling will use the fallback marker"
            );
        }
        Ok(removed)
    }

    /// Move the marker at `from` so that it ends up at `to`, shifting the
    /// markers in between.
    ///
    /// # Errors
    /// Returns [`SequenceError::IndexOutOfRange`] if either index is invalid.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<(), SequenceError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let marker = self.items.remove(from);
        self.items.insert(to, marker);
        Ok(())
    }

    /// Replace the marker at `index` with the single character in `value`.
    ///
    /// # Errors
    /// Returns [`SequenceError::IndexOutOfRange`] for a bad index and
    /// [`SequenceError::InvalidValue`] unless `value` is exactly one valid
    /// character. The old marker is kept on error.
    pub fn replace_at(&mut self, index: usize, value: &str) -> Result<char, SequenceError> {
        self.check_index(index)?;
        let marker = parse_marker(value)?;
        if self
            .position(marker)
            .is_some_and(|existing| existing != index)
        {
            tracing::warn!(marker = %marker, index, "marker now appears more than once");
        }
        Ok(std::mem::replace(&mut self.items[index], marker))
    }

    fn check_index(&self, index: usize) -> Result<(), SequenceError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(SequenceError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl Default for MarkerSequence {
    fn default() -> Self {
        Self::from_preset(Preset::Basic)
    }
}
