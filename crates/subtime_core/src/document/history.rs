//! Snapshot undo/redo stacks.

use std::collections::VecDeque;

use crate::subtitles::SubtitleEntry;

/// Number of snapshots each stack retains.
pub const HISTORY_LIMIT: usize = 50;

/// A full copy of the entry sequence plus the label of the operation that
/// replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub entries: Vec<SubtitleEntry>,
    pub label: String,
}

/// Two bounded stacks of [`HistoryState`]. The oldest snapshot is dropped when
/// a stack is full.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<HistoryState>,
    redo: VecDeque<HistoryState>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(limit.min(HISTORY_LIMIT)),
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the sequence as it was before a new mutation. Clears redo.
    pub fn record(&mut self, entries: Vec<SubtitleEntry>, label: impl Into<String>) {
        push_bounded(
            &mut self.undo,
            HistoryState {
                entries,
                label: label.into(),
            },
            self.limit,
        );
        self.redo.clear();
    }

    /// Swap `current` for the latest undo snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Vec<SubtitleEntry>) -> Option<HistoryState> {
        let state = self.undo.pop_back()?;
        push_bounded(
            &mut self.redo,
            HistoryState {
                entries: current,
                label: state.label.clone(),
            },
            self.limit,
        );
        Some(state)
    }

    /// Swap `current` for the latest redo snapshot. `None` when there is nothing to redo.
    pub fn redo(&mut self, current: Vec<SubtitleEntry>) -> Option<HistoryState> {
        let state = self.redo.pop_back()?;
        push_bounded(
            &mut self.undo,
            HistoryState {
                entries: current,
                label: state.label.clone(),
            },
            self.limit,
        );
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the operation the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|s| s.label.as_str())
    }

    /// Label of the operation the next redo reapplies.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.back().map(|s| s.label.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryState>, state: HistoryState, limit: usize) {
    while stack.len() >= limit {
        stack.pop_front();
    }
    stack.push_back(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(text: &str) -> Vec<SubtitleEntry> {
        vec![SubtitleEntry::new(0, 1000, text)]
    }

    #[test]
    fn test_undo_redo_swaps_snapshots() {
        let mut history = History::default();
        history.record(snapshot("a"), "Edit");

        let restored = history.undo(snapshot("b")).unwrap();
        assert_eq!(restored.entries[0].text, "a");
        assert_eq!(history.redo_label(), Some("Edit"));

        let reapplied = history.redo(snapshot("a")).unwrap();
        assert_eq!(reapplied.entries[0].text, "b");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(snapshot("a"), "First");
        history.undo(snapshot("b"));
        assert!(history.can_redo());

        history.record(snapshot("a"), "Second");
        assert!(!history.can_redo());
        assert_eq!(history.undo_label(), Some("Second"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::default();
        for i in 0..(HISTORY_LIMIT + 10) {
            history.record(snapshot(&i.to_string()), format!("Edit {}", i));
        }
        assert_eq!(history.undo_len(), HISTORY_LIMIT);

        let mut oldest = None;
        while let Some(state) = history.undo(snapshot("x")) {
            oldest = Some(state);
        }
        // the first ten snapshots were dropped
        assert_eq!(oldest.unwrap().entries[0].text, "10");
        assert_eq!(history.redo_len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert!(history.undo(snapshot("a")).is_none());
        assert!(history.redo(snapshot("a")).is_none());
        assert_eq!(history.undo_label(), None);
    }
}
