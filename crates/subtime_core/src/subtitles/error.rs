//! Subtitle error types.

use std::path::PathBuf;

/// Errors that can occur during subtitle operations.
///
/// Malformed individual blocks are not errors: parsers skip them and report
/// the count in [`ParsedSubtitles::skipped`](super::ParsedSubtitles).
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to read subtitle file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write subtitle file.
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown or unsupported subtitle format.
    #[error("Unknown subtitle format: '{0}'")]
    UnknownFormat(String),
}

impl SubtitleError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }
}
