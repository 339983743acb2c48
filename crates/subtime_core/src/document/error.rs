//! Edit error types.

use thiserror::Error;

use crate::subtitles::{EntryId, Millis, SubtitleError};

/// A rejected document operation. The store is left untouched.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("No document is open")]
    NotOpen,

    #[error("Entry {0} not found")]
    UnknownEntry(EntryId),

    #[error("Invalid time range {start_ms}..{end_ms}")]
    InvalidRange { start_ms: Millis, end_ms: Millis },

    #[error("Split point {at_ms} is outside {start_ms}..{end_ms}")]
    SplitOutOfBounds {
        at_ms: Millis,
        start_ms: Millis,
        end_ms: Millis,
    },

    #[error("Merge needs at least two distinct entries, got {0}")]
    MergeTooFew(usize),

    #[error("Nothing selected")]
    EmptySelection,

    #[error("Search text is empty")]
    EmptyPattern,

    #[error(transparent)]
    Subtitle(#[from] SubtitleError),
}

pub type EditResult<T> = Result<T, EditError>;
