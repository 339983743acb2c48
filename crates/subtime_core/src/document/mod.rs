//! Document and history store.
//!
//! [`DocumentStore`] owns at most one open [`SubtitleDocument`] together with
//! its snapshot undo/redo [`History`], the [`Selection`] and the optional
//! translator-mode source snapshot. Every edit is all-or-nothing.
//!
//! [`ListWindow`] computes which rows of a long entry list need rendering.

mod error;
mod history;
mod selection;
mod store;
mod window;

pub use error::{EditError, EditResult};
pub use history::{History, HistoryState, HISTORY_LIMIT};
pub use selection::Selection;
pub use store::{DocumentStore, EntryPatch, SubtitleDocument, DEFAULT_ENTRY_MS};
pub use window::ListWindow;
