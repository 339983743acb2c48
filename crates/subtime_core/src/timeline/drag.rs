//! Drag state machine for moving and resizing one entry.
//!
//! Pointer motion only updates the session's preview. The document is touched
//! once, on release, through a [`DragCommit`].

use thiserror::Error;

use crate::document::{DocumentStore, EditResult};
use crate::subtitles::{EntryId, Millis};

/// What a drag changes, chosen from where the pointer grabbed the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

impl DragMode {
    fn label(&self) -> &'static str {
        match self {
            Self::Move => "Move entry",
            Self::ResizeStart => "Resize entry start",
            Self::ResizeEnd => "Resize entry end",
        }
    }
}

/// Limits captured when the drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragBounds {
    /// End of the previous entry.
    pub prev_end: Option<Millis>,
    /// Start of the next entry.
    pub next_start: Option<Millis>,
    /// Timeline length; `None` means unbounded.
    pub duration_ms: Option<Millis>,
    pub min_duration_ms: Millis,
}

/// A time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_ms: Millis,
    pub end_ms: Millis,
}

/// A live drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub entry_id: EntryId,
    pub mode: DragMode,
    /// Pointer position when the drag began.
    pub origin_px: f64,
    /// Committed range of the entry.
    pub original: Span,
    /// Range the timeline should draw.
    pub preview: Span,
    pub bounds: DragBounds,
}

impl DragSession {
    /// Recompute the preview for a pointer displacement of `delta_ms`.
    pub(crate) fn update(&mut self, delta_ms: Millis) {
        self.preview = clamp_span(self.mode, self.original, &self.bounds, delta_ms);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Error, Debug, PartialEq)]
pub enum DragError {
    #[error("A drag is already in progress for entry {0}")]
    AlreadyDragging(EntryId),

    #[error("Entry {0} has an invalid time range")]
    InvalidEntry(EntryId),
}

/// The single mutation a finished drag produces.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub entry_id: EntryId,
    pub mode: DragMode,
    pub start_ms: Millis,
    pub end_ms: Millis,
}

impl DragCommit {
    /// Write the new range to the store as one undo step.
    pub fn apply(&self, store: &mut DocumentStore) -> EditResult<()> {
        store.set_entry_times(self.entry_id, self.start_ms, self.end_ms, self.mode.label())
    }
}

/// Pick the drag mode from the pointer position relative to the entry's span.
///
/// The nearer edge wins when both are within `edge_px`.
pub fn pick_mode(start_px: f64, end_px: f64, pointer_px: f64, edge_px: f64) -> DragMode {
    let from_start = (pointer_px - start_px).abs();
    let from_end = (end_px - pointer_px).abs();
    if from_start <= edge_px && from_start <= from_end {
        DragMode::ResizeStart
    } else if from_end <= edge_px {
        DragMode::ResizeEnd
    } else {
        DragMode::Move
    }
}

/// Preview range for a drag of `delta_ms`.
///
/// A resized edge stops `min_duration_ms` short of the neighbouring entry. A
/// neighbour already closer than that only stops further movement towards it;
/// it never pushes the edge away from where it started.
fn clamp_span(mode: DragMode, original: Span, bounds: &DragBounds, delta_ms: Millis) -> Span {
    let Span { start_ms, end_ms } = original;
    let min = bounds.min_duration_ms;

    match mode {
        DragMode::Move => {
            let length = end_ms - start_ms;
            let mut start = (start_ms + delta_ms).max(0);
            if let Some(duration) = bounds.duration_ms {
                start = start.min((duration - length).max(0));
            }
            Span {
                start_ms: start,
                end_ms: start + length,
            }
        }
        DragMode::ResizeStart => {
            let lo = bounds.prev_end.map_or(0, |p| (p + min).min(start_ms)).max(0);
            let hi = (end_ms - min).max(start_ms);
            Span {
                start_ms: (start_ms + delta_ms).clamp(lo, hi.max(lo)),
                end_ms,
            }
        }
        DragMode::ResizeEnd => {
            let lo = (start_ms + min).min(end_ms);
            let mut hi = bounds.next_start.map_or(Millis::MAX, |n| (n - min).max(end_ms));
            if let Some(duration) = bounds.duration_ms {
                hi = hi.min(duration.max(end_ms));
            }
            Span {
                start_ms,
                end_ms: (end_ms + delta_ms).clamp(lo, hi.max(lo)),
            }
        }
    }
}
