//! Timeline interaction.
//!
//! Maps between time and pixels, turns pointer drags into single-step document
//! edits, and forwards click-to-seek to the media player.

mod drag;
mod interaction;
mod scale;
mod seek;

pub use drag::{pick_mode, DragBounds, DragCommit, DragError, DragMode, DragSession, DragState, Span};
pub use interaction::{
    neighbour_bounds, TimelineInteraction, DEFAULT_EDGE_HANDLE_PX, DEFAULT_MIN_ENTRY_DURATION_MS,
};
pub use scale::{TimeScale, MAX_ZOOM, MIN_ZOOM};
pub use seek::{MediaClock, MediaPlayer};
