// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. error::ConfigError)
    clippy::module_name_repetitions
)]

//! # Checkcycle
//!
//! Cycle markdown checkbox markers through a configurable sequence.
//!
//! Running the cycle command on a line steps its marker to the next one
//! in the sequence:
//!
//! ```text
//! - [ ] Task  ->  - [/] Task  ->  - [x] Task  ->  ...
//! ```
//!
//! Lines without a checkbox gain an unchecked one, and markers that are not
//! part of the sequence are reset to unchecked.
//!
//! ## Modules
//!
//! - [`cycle`]: Marker line parsing and the cycle step
//! - [`sequence`]: The ordered, editable marker list
//! - [`config`]: Settings persistence
//! - [`editor`]: Document interface and a rope-backed buffer
//! - [`command`]: Named actions for host key bindings
//! - [`error`]: Error types

pub mod command;
pub mod config;
pub mod cycle;
pub mod editor;
pub mod error;
pub mod sequence;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::config::{JsonFileStore, Settings, SettingsManager, SettingsStore};
    pub use crate::cycle::{CycleOutcome, LineState, cycle};
    pub use crate::editor::{CursorPosition, EditorBuffer, TextDocument};
    pub use crate::sequence::{MarkerSequence, Preset};
}
