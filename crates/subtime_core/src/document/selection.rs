//! Selected entries and the navigation cursor. Not part of undo history.

use std::collections::{BTreeSet, HashSet};

use crate::subtitles::{EntryId, SubtitleEntry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<EntryId>,
    active: Option<EntryId>,
}

impl Selection {
    /// Replace the selection with a single entry and make it active.
    pub fn select(&mut self, id: EntryId) {
        self.ids.clear();
        self.ids.insert(id);
        self.active = Some(id);
    }

    /// Flip membership of one entry; it becomes the active entry either way.
    pub fn toggle(&mut self, id: EntryId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
        self.active = Some(id);
    }

    /// Replace the selection with `ids`, keeping `active` as the cursor.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = EntryId>, active: Option<EntryId>) {
        self.ids = ids.into_iter().collect();
        self.active = active;
    }

    pub fn set_active(&mut self, id: Option<EntryId>) {
        self.active = id;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.active = None;
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntryId> {
        self.ids.iter()
    }

    pub fn active(&self) -> Option<EntryId> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget ids that are no longer in `entries`.
    pub fn prune(&mut self, entries: &[SubtitleEntry]) {
        let live: HashSet<EntryId> = entries.iter().map(|e| e.id).collect();
        self.ids.retain(|id| live.contains(id));
        if self.active.is_some_and(|id| !live.contains(&id)) {
            self.active = None;
        }
    }
}
