//! Pointer handling for the timeline: drags and click-to-seek.

use crate::config::TimelineSettings;
use crate::subtitles::{EntryId, Millis, SubtitleEntry};
use crate::timeline::drag::{
    pick_mode, DragBounds, DragCommit, DragError, DragMode, DragSession, DragState, Span,
};
use crate::timeline::scale::TimeScale;
use crate::timeline::seek::MediaPlayer;

/// Default shortest length a drag may leave an entry.
pub const DEFAULT_MIN_ENTRY_DURATION_MS: Millis = 100;
/// Default grab width of an entry's edges.
pub const DEFAULT_EDGE_HANDLE_PX: f64 = 6.0;

/// Timeline pointer state. At most one drag is live at a time.
#[derive(Debug, Clone)]
pub struct TimelineInteraction {
    scale: TimeScale,
    min_entry_duration_ms: Millis,
    edge_handle_px: f64,
    duration_ms: Option<Millis>,
    state: DragState,
}

impl Default for TimelineInteraction {
    fn default() -> Self {
        Self::new(
            TimeScale::default(),
            DEFAULT_MIN_ENTRY_DURATION_MS,
            DEFAULT_EDGE_HANDLE_PX,
        )
    }
}

impl TimelineInteraction {
    pub fn new(scale: TimeScale, min_entry_duration_ms: Millis, edge_handle_px: f64) -> Self {
        Self {
            scale,
            min_entry_duration_ms: min_entry_duration_ms.max(1),
            edge_handle_px,
            duration_ms: None,
            state: DragState::Idle,
        }
    }

    pub fn from_settings(settings: &TimelineSettings) -> Self {
        Self::new(
            settings.scale(),
            settings.min_entry_duration_ms,
            settings.edge_handle_px,
        )
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn scale_mut(&mut self) -> &mut TimeScale {
        &mut self.scale
    }

    /// Timeline length, usually the media duration. `None` leaves drags unbounded on the right.
    pub fn set_duration(&mut self, duration_ms: Option<Millis>) {
        self.duration_ms = duration_ms.filter(|d| *d > 0);
    }

    pub fn duration_ms(&self) -> Option<Millis> {
        self.duration_ms
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Entry being dragged and the range to draw for it.
    pub fn preview(&self) -> Option<(EntryId, Span)> {
        match &self.state {
            DragState::Dragging(session) => Some((session.entry_id, session.preview)),
            DragState::Idle => None,
        }
    }

    /// Start dragging `entry`. `prev_end` and `next_start` come from its neighbours.
    pub fn begin_drag(
        &mut self,
        entry: &SubtitleEntry,
        prev_end: Option<Millis>,
        next_start: Option<Millis>,
        pointer_px: f64,
    ) -> Result<DragMode, DragError> {
        if let DragState::Dragging(session) = &self.state {
            return Err(DragError::AlreadyDragging(session.entry_id));
        }
        if !entry.has_valid_range() {
            return Err(DragError::InvalidEntry(entry.id));
        }

        let mode = pick_mode(
            self.scale.time_to_px(entry.start_ms),
            self.scale.time_to_px(entry.end_ms),
            pointer_px,
            self.edge_handle_px,
        );
        let original = Span {
            start_ms: entry.start_ms,
            end_ms: entry.end_ms,
        };

        tracing::debug!("Begin {:?} drag of entry {}", mode, entry.index);
        self.state = DragState::Dragging(DragSession {
            entry_id: entry.id,
            mode,
            origin_px: pointer_px,
            original,
            preview: original,
            bounds: DragBounds {
                prev_end,
                next_start,
                duration_ms: self.duration_ms,
                min_duration_ms: self.min_entry_duration_ms,
            },
        });
        Ok(mode)
    }

    /// Start dragging the entry at `index`, taking bounds from its neighbours in `entries`.
    pub fn begin_drag_at(
        &mut self,
        entries: &[SubtitleEntry],
        index: usize,
        pointer_px: f64,
    ) -> Option<Result<DragMode, DragError>> {
        let entry = entries.get(index)?;
        let (prev_end, next_start) = neighbour_bounds(entries, index);
        Some(self.begin_drag(entry, prev_end, next_start, pointer_px))
    }

    /// Follow the pointer. Returns the new preview, or `None` when idle.
    pub fn drag_to(&mut self, pointer_px: f64) -> Option<Span> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let delta_ms = self.scale.px_delta_to_ms(pointer_px - session.origin_px);
        session.update(delta_ms);
        Some(session.preview)
    }

    /// Finish the drag. Yields a commit only if the range changed.
    pub fn release(&mut self) -> Option<DragCommit> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        if session.preview == session.original {
            return None;
        }
        Some(DragCommit {
            entry_id: session.entry_id,
            mode: session.mode,
            start_ms: session.preview.start_ms,
            end_ms: session.preview.end_ms,
        })
    }

    /// Drop a live drag without committing. Returns whether one was live.
    pub fn abandon(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            tracing::debug!("Drag abandoned");
        }
        self.state = DragState::Idle;
        was_dragging
    }

    /// Index of the topmost entry under `px`.
    pub fn entry_at(&self, entries: &[SubtitleEntry], px: f64) -> Option<usize> {
        let time = self.scale.px_to_time(px);
        entries
            .iter()
            .rposition(|e| e.start_ms <= time && time < e.end_ms)
    }

    /// Seek the player to the time under `px`. Never touches the document.
    pub fn click_to_seek(&self, px: f64, player: &mut impl MediaPlayer) -> Millis {
        let mut time = self.scale.px_to_time(px);
        if let Some(duration) = self.duration_ms {
            time = time.min(duration);
        }
        player.seek_to(time);
        time
    }
}

/// End of the previous entry and start of the next one.
pub fn neighbour_bounds(entries: &[SubtitleEntry], index: usize) -> (Option<Millis>, Option<Millis>) {
    let prev_end = index
        .checked_sub(1)
        .and_then(|i| entries.get(i))
        .map(|e| e.end_ms);
    let next_start = entries.get(index + 1).map(|e| e.start_ms);
    (prev_end, next_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;
    use crate::subtitles::SubtitleFormat;

    #[derive(Default)]
    struct RecordingPlayer {
        seeks: Vec<Millis>,
    }

    impl MediaPlayer for RecordingPlayer {
        fn seek_to(&mut self, time_ms: Millis) {
            self.seeks.push(time_ms);
        }
    }

    fn store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.load_entries(
            vec![
                SubtitleEntry::new(0, 1000, "a"),
                SubtitleEntry::new(2000, 4000, "b"),
                SubtitleEntry::new(5000, 6000, "c"),
            ],
            SubtitleFormat::Srt,
            None,
            None,
        );
        store
    }

    fn interaction() -> TimelineInteraction {
        // 0.1 px per ms
        let mut timeline = TimelineInteraction::new(TimeScale::new(100.0, 1.0), 100, 6.0);
        timeline.set_duration(Some(10_000));
        timeline
    }

    #[test]
    fn test_resize_commits_once() {
        let mut store = store();
        let mut timeline = interaction();

        let mode = timeline.begin_drag_at(store.entries(), 1, 398.0).unwrap().unwrap();
        assert_eq!(mode, DragMode::ResizeEnd);

        timeline.drag_to(450.0);
        let preview = timeline.drag_to(600.0).unwrap();
        // stops the minimum duration short of the next entry
        assert_eq!((preview.start_ms, preview.end_ms), (2000, 4900));
        // previews never touch the document
        assert_eq!(store.entries()[1].end_ms, 4000);
        assert!(!store.can_undo());

        let commit = timeline.release().unwrap();
        commit.apply(&mut store).unwrap();
        assert_eq!(store.entries()[1].end_ms, 4900);
        assert_eq!(store.undo_label(), Some("Resize entry end"));
        assert!(!timeline.is_dragging());

        store.undo().unwrap();
        assert_eq!(store.entries()[1].end_ms, 4000);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_move_drag() {
        let mut store = store();
        let mut timeline = interaction();
        let entry = store.entries()[1].clone();

        assert_eq!(
            timeline.begin_drag(&entry, Some(1000), Some(5000), 300.0),
            Ok(DragMode::Move)
        );
        timeline.drag_to(1300.0);
        let commit = timeline.release().unwrap();
        assert_eq!((commit.start_ms, commit.end_ms), (8000, 10_000));

        commit.apply(&mut store).unwrap();
        assert_eq!(store.undo_label(), Some("Move entry"));
    }

    #[test]
    fn test_one_live_drag() {
        let store = store();
        let mut timeline = interaction();
        timeline.begin_drag_at(store.entries(), 0, 50.0).unwrap().unwrap();

        let second = timeline.begin_drag_at(store.entries(), 2, 550.0).unwrap();
        assert_eq!(second, Err(DragError::AlreadyDragging(store.entries()[0].id)));
        assert_eq!(timeline.preview().map(|(id, _)| id), Some(store.entries()[0].id));
    }

    #[test]
    fn test_release_without_change() {
        let store = store();
        let mut timeline = interaction();
        timeline.begin_drag_at(store.entries(), 1, 300.0).unwrap().unwrap();
        timeline.drag_to(300.04);
        assert_eq!(timeline.release(), None);
        assert!(!timeline.is_dragging());
        assert_eq!(timeline.release(), None);
    }

    #[test]
    fn test_abandon_leaves_no_commit() {
        let mut store = store();
        let mut timeline = interaction();
        timeline.begin_drag_at(store.entries(), 1, 300.0).unwrap().unwrap();
        timeline.drag_to(900.0);

        store.close();
        assert!(timeline.abandon());
        assert_eq!(timeline.release(), None);
        assert!(!timeline.abandon());
        assert_eq!(timeline.drag_to(100.0), None);
    }

    #[test]
    fn test_invalid_entry_cannot_be_dragged() {
        let mut timeline = interaction();
        let entry = SubtitleEntry::new(1000, 1000, "x");
        assert_eq!(
            timeline.begin_drag(&entry, None, None, 100.0),
            Err(DragError::InvalidEntry(entry.id))
        );
        assert!(!timeline.is_dragging());
    }

    #[test]
    fn test_click_to_seek() {
        let store = store();
        let mut timeline = interaction();
        let mut player = RecordingPlayer::default();

        assert_eq!(timeline.click_to_seek(150.0, &mut player), 1500);
        assert_eq!(timeline.click_to_seek(-10.0, &mut player), 0);
        assert_eq!(timeline.click_to_seek(5000.0, &mut player), 10_000);
        assert_eq!(player.seeks, vec![1500, 0, 10_000]);

        timeline.set_duration(None);
        assert_eq!(timeline.click_to_seek(5000.0, &mut player), 50_000);
        assert_eq!(store.entries()[0].start_ms, 0);
    }

    #[test]
    fn test_from_settings() {
        let settings = TimelineSettings {
            min_entry_duration_ms: 500,
            ..TimelineSettings::default()
        };
        let mut timeline = TimelineInteraction::from_settings(&settings);
        let entry = SubtitleEntry::new(2000, 4000, "b");
        timeline.begin_drag(&entry, None, None, 399.0).unwrap();
        let preview = timeline.drag_to(0.0).unwrap();
        assert_eq!((preview.start_ms, preview.end_ms), (2000, 2500));
    }

    #[test]
    fn test_entry_at_and_neighbours() {
        let store = store();
        let timeline = interaction();
        assert_eq!(timeline.entry_at(store.entries(), 250.0), Some(1));
        assert_eq!(timeline.entry_at(store.entries(), 150.0), None);

        assert_eq!(neighbour_bounds(store.entries(), 0), (None, Some(2000)));
        assert_eq!(neighbour_bounds(store.entries(), 1), (Some(1000), Some(5000)));
        assert_eq!(neighbour_bounds(store.entries(), 2), (Some(4000), None));
    }
}
