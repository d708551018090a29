//! Error types shared by the sequence model and the settings layer.

use std::path::PathBuf;

use thiserror::Error;

/// A rejected edit to a [`MarkerSequence`](crate::sequence::MarkerSequence).
///
/// The sequence is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("index {index} is out of range for a sequence of {len} markers")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid marker {value:?}: {reason}")]
    InvalidValue { value: String, reason: &'static str },
}

/// Failure while loading, saving or editing persisted settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}
