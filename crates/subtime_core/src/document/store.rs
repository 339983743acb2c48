//! The live document and every operation that mutates it.
//!
//! All mutations go through [`DocumentStore::commit`]: the new sequence is
//! fully built and validated first, then the previous sequence is recorded in
//! history, indices are renumbered and the document is marked dirty. A rejected
//! request never reaches `commit`, so it leaves no trace.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::fixes::{fix_all_errors, FixReport, Fixer};
use crate::qc::{detect_all_errors, evaluate_all, DetectedError, QcResult, QcThresholds};
use crate::subtitles::{
    self, reindex, EntryId, Millis, SubtitleEntry, SubtitleFormat,
};

use super::error::{EditError, EditResult};
use super::history::History;
use super::selection::Selection;

/// Duration of entries created by insertion and by a blank document.
pub const DEFAULT_ENTRY_MS: Millis = 2000;

/// An open subtitle document.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleDocument {
    pub entries: Vec<SubtitleEntry>,
    pub format: SubtitleFormat,
    /// Format-specific preamble, kept verbatim.
    pub header: Option<String>,
    pub file_path: Option<PathBuf>,
    dirty: bool,
}

impl SubtitleDocument {
    fn new(
        mut entries: Vec<SubtitleEntry>,
        format: SubtitleFormat,
        header: Option<String>,
        file_path: Option<PathBuf>,
    ) -> Self {
        reindex(&mut entries);
        Self {
            entries,
            format,
            header,
            file_path,
            dirty: false,
        }
    }

    /// File name component of the path, if the document has one.
    pub fn file_name(&self) -> Option<String> {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Whether there are changes since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn entry(&self, id: EntryId) -> Option<&SubtitleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Partial update of one entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub start_ms: Option<Millis>,
    pub end_ms: Option<Millis>,
    pub text: Option<String>,
}

impl EntryPatch {
    pub fn times(start_ms: Millis, end_ms: Millis) -> Self {
        Self {
            start_ms: Some(start_ms),
            end_ms: Some(end_ms),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    fn apply_to(&self, entry: &SubtitleEntry) -> SubtitleEntry {
        SubtitleEntry {
            id: entry.id,
            index: entry.index,
            start_ms: self.start_ms.unwrap_or(entry.start_ms),
            end_ms: self.end_ms.unwrap_or(entry.end_ms),
            text: self.text.clone().unwrap_or_else(|| entry.text.clone()),
        }
    }
}

/// Owner of the open document, its history, selection and translator snapshot.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: Option<SubtitleDocument>,
    history: History,
    selection: Selection,
    translation_source: Option<HashMap<EntryId, String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- lifecycle -------------------------------------------------------

    /// Parse `content` and open it. Returns the number of skipped blocks.
    pub fn open_content(
        &mut self,
        content: &str,
        format_hint: Option<SubtitleFormat>,
        path: Option<PathBuf>,
    ) -> EditResult<usize> {
        let parsed = subtitles::parse(content, format_hint)?;
        let skipped = parsed.skipped;
        self.install(SubtitleDocument::new(
            parsed.entries,
            parsed.format,
            parsed.header,
            path,
        ));
        Ok(skipped)
    }

    /// Read and open a subtitle file. Returns the number of skipped blocks.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> EditResult<usize> {
        let path = path.as_ref();
        let parsed = subtitles::parse_file(path)?;
        let skipped = parsed.skipped;
        self.install(SubtitleDocument::new(
            parsed.entries,
            parsed.format,
            parsed.header,
            Some(path.to_path_buf()),
        ));
        Ok(skipped)
    }

    /// Open already-parsed entries.
    pub fn load_entries(
        &mut self,
        entries: Vec<SubtitleEntry>,
        format: SubtitleFormat,
        header: Option<String>,
        path: Option<PathBuf>,
    ) {
        self.install(SubtitleDocument::new(entries, format, header, path));
    }

    /// Open an unsaved document holding one empty entry.
    pub fn new_blank(&mut self, format: SubtitleFormat) {
        let entries = vec![SubtitleEntry::new(0, DEFAULT_ENTRY_MS, "")];
        self.install(SubtitleDocument::new(entries, format, None, None));
    }

    pub fn close(&mut self) {
        if let Some(doc) = self.document.take() {
            tracing::info!(
                "Closed document {}",
                doc.file_name().unwrap_or_else(|| "(untitled)".to_string())
            );
        }
        self.history.clear();
        self.selection.clear();
        self.translation_source = None;
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&SubtitleDocument> {
        self.document.as_ref()
    }

    /// Entries of the open document; empty when closed.
    pub fn entries(&self) -> &[SubtitleEntry] {
        self.document
            .as_ref()
            .map(|doc| doc.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_dirty(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.dirty)
    }

    fn install(&mut self, document: SubtitleDocument) {
        tracing::info!(
            "Opened {} document {} with {} entries",
            document.format,
            document.file_name().unwrap_or_else(|| "(untitled)".to_string()),
            document.entries.len()
        );
        self.document = Some(document);
        self.history.clear();
        self.selection.clear();
        self.translation_source = None;
    }

    fn doc(&self) -> EditResult<&SubtitleDocument> {
        self.document.as_ref().ok_or(EditError::NotOpen)
    }

    fn position_of(&self, id: EntryId) -> EditResult<usize> {
        self.doc()?.position(id).ok_or(EditError::UnknownEntry(id))
    }

    /// Swap in a fully validated sequence.
    fn commit(&mut self, label: &str, entries: Vec<SubtitleEntry>) -> EditResult<()> {
        let doc = self.document.as_mut().ok_or(EditError::NotOpen)?;
        let previous = std::mem::replace(&mut doc.entries, entries);
        reindex(&mut doc.entries);
        doc.dirty = true;
        self.history.record(previous, label);
        self.selection.prune(&doc.entries);
        tracing::debug!("{} ({} entries)", label, doc.entries.len());
        Ok(())
    }

    // ---- mutations -------------------------------------------------------

    pub fn update_entry(&mut self, id: EntryId, patch: EntryPatch) -> EditResult<()> {
        self.update_entries(vec![(id, patch)])
    }

    /// Apply several patches as one undo step.
    pub fn update_entries(&mut self, updates: Vec<(EntryId, EntryPatch)>) -> EditResult<()> {
        let mut entries = self.doc()?.entries.clone();
        let mut changed = false;

        for (id, patch) in &updates {
            let pos = entries
                .iter()
                .position(|e| e.id == *id)
                .ok_or(EditError::UnknownEntry(*id))?;
            let updated = patch.apply_to(&entries[pos]);
            check_range(updated.start_ms, updated.end_ms)?;
            if updated != entries[pos] {
                entries[pos] = updated;
                changed = true;
            }
        }

        if !changed {
            return Ok(());
        }
        let label = if updates.len() == 1 {
            "Edit entry"
        } else {
            "Edit entries"
        };
        self.commit(label, entries)
    }

    /// Retime one entry. Used by timeline drag commits.
    pub fn set_entry_times(
        &mut self,
        id: EntryId,
        start_ms: Millis,
        end_ms: Millis,
        label: &str,
    ) -> EditResult<()> {
        check_range(start_ms, end_ms)?;
        let pos = self.position_of(id)?;
        let mut entries = self.doc()?.entries.clone();
        if entries[pos].start_ms == start_ms && entries[pos].end_ms == end_ms {
            return Ok(());
        }
        entries[pos].start_ms = start_ms;
        entries[pos].end_ms = end_ms;
        self.commit(label, entries)
    }

    /// Insert an empty entry after `after` (or at the end) starting where it ends.
    pub fn insert_entry(&mut self, after: Option<EntryId>) -> EditResult<EntryId> {
        let doc = self.doc()?;
        let (pos, start_ms) = match after {
            Some(id) => {
                let pos = self.position_of(id)?;
                (pos + 1, doc.entries[pos].end_ms)
            }
            None => (
                doc.entries.len(),
                doc.entries.last().map_or(0, |e| e.end_ms),
            ),
        };

        let entry = SubtitleEntry::new(start_ms, start_ms + DEFAULT_ENTRY_MS, "");
        let id = entry.id;
        let mut entries = doc.entries.clone();
        entries.insert(pos, entry);
        self.commit("Insert entry", entries)?;
        self.selection.select(id);
        Ok(id)
    }

    /// Insert an empty entry ending where `before` starts.
    pub fn insert_entry_before(&mut self, before: EntryId) -> EditResult<EntryId> {
        let pos = self.position_of(before)?;
        let mut entries = self.doc()?.entries.clone();

        let end_ms = entries[pos].start_ms.max(DEFAULT_ENTRY_MS);
        let entry = SubtitleEntry::new(end_ms - DEFAULT_ENTRY_MS, end_ms, "");
        let id = entry.id;
        entries.insert(pos, entry);
        self.commit("Insert entry", entries)?;
        self.selection.select(id);
        Ok(id)
    }

    /// Delete entries. Every id must exist. Returns the number removed.
    pub fn delete_entries(&mut self, ids: &[EntryId]) -> EditResult<usize> {
        if ids.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let doc = self.doc()?;
        let targets = existing_ids(doc, ids)?;

        let entries: Vec<SubtitleEntry> = doc
            .entries
            .iter()
            .filter(|e| !targets.contains(&e.id))
            .cloned()
            .collect();
        let removed = doc.entries.len() - entries.len();
        let label = if removed == 1 {
            "Delete entry"
        } else {
            "Delete entries"
        };
        self.commit(label, entries)?;
        Ok(removed)
    }

    /// Replace the whole sequence. Every entry must have a valid range.
    pub fn replace_all_entries(&mut self, entries: Vec<SubtitleEntry>, label: &str) -> EditResult<()> {
        self.doc()?;
        for entry in &entries {
            check_range(entry.start_ms, entry.end_ms)?;
        }
        self.commit(label, entries)
    }

    /// Stable sort by start, then end. No-op when already in order.
    pub fn sort_by_time(&mut self) -> EditResult<()> {
        let doc = self.doc()?;
        let mut entries = doc.entries.clone();
        entries.sort_by_key(|e| (e.start_ms, e.end_ms));

        let unchanged = entries.iter().zip(&doc.entries).all(|(a, b)| a.id == b.id);
        if unchanged {
            return Ok(());
        }
        self.commit("Sort by time", entries)
    }

    /// Merge entries into the one with the lowest index.
    ///
    /// The result spans the earliest start to the latest end; texts are joined
    /// with line breaks in time order.
    pub fn merge_entries(&mut self, ids: &[EntryId]) -> EditResult<EntryId> {
        let doc = self.doc()?;
        let targets = existing_ids(doc, ids)?;
        if targets.len() < 2 {
            return Err(EditError::MergeTooFew(targets.len()));
        }

        let mut members: Vec<(usize, &SubtitleEntry)> = doc
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| targets.contains(&e.id))
            .collect();
        let keep_pos = members[0].0;
        let keep_id = members[0].1.id;

        let start_ms = members.iter().map(|(_, e)| e.start_ms).min().unwrap_or(0);
        let end_ms = members.iter().map(|(_, e)| e.end_ms).max().unwrap_or(start_ms);
        members.sort_by_key(|(pos, e)| (e.start_ms, *pos));
        let text = members
            .iter()
            .map(|(_, e)| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut entries = Vec::with_capacity(doc.entries.len() + 1 - targets.len());
        for (pos, entry) in doc.entries.iter().enumerate() {
            if pos == keep_pos {
                entries.push(SubtitleEntry {
                    start_ms,
                    end_ms,
                    text: text.clone(),
                    ..entry.clone()
                });
            } else if !targets.contains(&entry.id) {
                entries.push(entry.clone());
            }
        }

        self.commit("Merge entries", entries)?;
        self.selection.select(keep_id);
        Ok(keep_id)
    }

    /// Split an entry at `at_ms`. Both halves carry the original text; the
    /// second half gets a fresh id, which is returned.
    pub fn split_entry(&mut self, id: EntryId, at_ms: Millis) -> EditResult<EntryId> {
        let pos = self.position_of(id)?;
        let mut entries = self.doc()?.entries.clone();
        let original = &entries[pos];
        if !(original.start_ms < at_ms && at_ms < original.end_ms) {
            return Err(EditError::SplitOutOfBounds {
                at_ms,
                start_ms: original.start_ms,
                end_ms: original.end_ms,
            });
        }

        let second = SubtitleEntry::new(at_ms, original.end_ms, original.text.clone());
        let second_id = second.id;
        entries[pos].end_ms = at_ms;
        entries.insert(pos + 1, second);

        self.commit("Split entry", entries)?;
        Ok(second_id)
    }

    /// Move entries by `offset_ms`, clamping at zero while keeping durations.
    pub fn shift_entries(&mut self, ids: &[EntryId], offset_ms: Millis) -> EditResult<()> {
        if ids.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let doc = self.doc()?;
        let targets = existing_ids(doc, ids)?;
        if offset_ms == 0 {
            return Ok(());
        }

        let mut entries = doc.entries.clone();
        for entry in entries.iter_mut().filter(|e| targets.contains(&e.id)) {
            entry.shift(offset_ms);
        }
        self.commit("Shift entries", entries)
    }

    /// Move every entry by `offset_ms`.
    pub fn shift_all(&mut self, offset_ms: Millis) -> EditResult<()> {
        let doc = self.doc()?;
        if offset_ms == 0 || doc.entries.is_empty() {
            return Ok(());
        }

        let mut entries = doc.entries.clone();
        for entry in &mut entries {
            entry.shift(offset_ms);
        }
        self.commit("Shift all", entries)
    }

    /// Replace every occurrence of `find` in entry text. Returns the count.
    pub fn replace_text(&mut self, find: &str, replace: &str, case_sensitive: bool) -> EditResult<usize> {
        if find.is_empty() {
            return Err(EditError::EmptyPattern);
        }
        let mut entries = self.doc()?.entries.clone();
        let mut total = 0;
        for entry in &mut entries {
            let (text, count) = replace_occurrences(&entry.text, find, replace, case_sensitive);
            if count > 0 {
                entry.text = text;
                total += count;
            }
        }

        if total > 0 {
            self.commit("Replace text", entries)?;
        }
        Ok(total)
    }

    /// Run one fixer. Returns whether anything changed.
    pub fn apply_fix(&mut self, fixer: Fixer, thresholds: &QcThresholds) -> EditResult<bool> {
        let doc = self.doc()?;
        let fixed = fixer.apply(&doc.entries, thresholds);
        if fixed == doc.entries {
            return Ok(false);
        }
        self.replace_all_entries(fixed, fixer.label())?;
        Ok(true)
    }

    /// Run every fixer as one undo step.
    pub fn fix_all_errors(&mut self, thresholds: &QcThresholds) -> EditResult<FixReport> {
        let doc = self.doc()?;
        let fixed = fix_all_errors(&doc.entries, thresholds);
        let report = FixReport::between(&doc.entries, &fixed);
        if fixed == doc.entries {
            return Ok(report);
        }
        self.replace_all_entries(fixed, "Fix all errors")?;
        tracing::info!(
            "Fixed all errors: {} removed, {} modified",
            report.removed,
            report.modified
        );
        Ok(report)
    }

    // ---- history ---------------------------------------------------------

    /// Restore the previous snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        let doc = self.document.as_mut().ok_or(EditError::NotOpen)?;
        let current = doc.entries.clone();
        let Some(state) = self.history.undo(current) else {
            return Ok(false);
        };
        tracing::debug!("Undo: {}", state.label);
        doc.entries = state.entries;
        doc.dirty = true;
        self.selection.prune(&doc.entries);
        Ok(true)
    }

    /// Reapply the last undone snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        let doc = self.document.as_mut().ok_or(EditError::NotOpen)?;
        let current = doc.entries.clone();
        let Some(state) = self.history.redo(current) else {
            return Ok(false);
        };
        tracing::debug!("Redo: {}", state.label);
        doc.entries = state.entries;
        doc.dirty = true;
        self.selection.prune(&doc.entries);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.is_open() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.is_open() && self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    // ---- saving ----------------------------------------------------------

    /// Serialize in the document's format, with its header.
    pub fn serialized_content(&self) -> EditResult<String> {
        let doc = self.doc()?;
        Ok(subtitles::serialize(
            &doc.entries,
            doc.format,
            doc.header.as_deref(),
        ))
    }

    /// Clear the dirty flag after a successful write.
    pub fn mark_saved(&mut self) -> EditResult<()> {
        let doc = self.document.as_mut().ok_or(EditError::NotOpen)?;
        doc.dirty = false;
        Ok(())
    }

    /// Clear the dirty flag after writing to a new path, possibly in a new format.
    pub fn mark_saved_as(&mut self, path: PathBuf, format: SubtitleFormat) -> EditResult<()> {
        let doc = self.document.as_mut().ok_or(EditError::NotOpen)?;
        if doc.format != format {
            tracing::info!("Document format changed from {} to {}", doc.format, format);
            doc.format = format;
        }
        doc.file_path = Some(path);
        doc.dirty = false;
        Ok(())
    }

    // ---- selection -------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected ids in display order.
    pub fn selected_ids(&self) -> Vec<EntryId> {
        self.entries()
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    pub fn select(&mut self, id: EntryId) -> EditResult<()> {
        self.position_of(id)?;
        self.selection.select(id);
        Ok(())
    }

    pub fn toggle_select(&mut self, id: EntryId) -> EditResult<()> {
        self.position_of(id)?;
        self.selection.toggle(id);
        Ok(())
    }

    /// Select every entry between `from` and `to` inclusive, in display order.
    pub fn select_range(&mut self, from: EntryId, to: EntryId) -> EditResult<()> {
        let a = self.position_of(from)?;
        let b = self.position_of(to)?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let ids: Vec<EntryId> = self.entries()[lo..=hi].iter().map(|e| e.id).collect();
        self.selection.select_many(ids, Some(to));
        Ok(())
    }

    pub fn select_all(&mut self) -> EditResult<()> {
        let doc = self.doc()?;
        let ids: Vec<EntryId> = doc.entries.iter().map(|e| e.id).collect();
        let active = self.selection.active().or_else(|| ids.first().copied());
        self.selection.select_many(ids, active);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Move the cursor without changing the selected set.
    pub fn set_active(&mut self, id: EntryId) -> EditResult<()> {
        self.position_of(id)?;
        self.selection.set_active(Some(id));
        Ok(())
    }

    /// Select the entry after the active one (the first when nothing is active).
    pub fn select_next(&mut self) -> Option<EntryId> {
        let entries = self.entries();
        let next = match self.selection.active().and_then(|id| entries.iter().position(|e| e.id == id)) {
            Some(pos) => entries.get(pos + 1).or_else(|| entries.get(pos)),
            None => entries.first(),
        }
        .map(|e| e.id)?;
        self.selection.select(next);
        Some(next)
    }

    /// Select the entry before the active one (the last when nothing is active).
    pub fn select_previous(&mut self) -> Option<EntryId> {
        let entries = self.entries();
        let previous = match self.selection.active().and_then(|id| entries.iter().position(|e| e.id == id)) {
            Some(pos) => entries.get(pos.saturating_sub(1)),
            None => entries.last(),
        }
        .map(|e| e.id)?;
        self.selection.select(previous);
        Some(previous)
    }

    // ---- translator mode -------------------------------------------------

    /// Snapshot current texts as the translation source.
    pub fn capture_translation_source(&mut self) -> EditResult<()> {
        let doc = self.doc()?;
        let source: HashMap<EntryId, String> =
            doc.entries.iter().map(|e| (e.id, e.text.clone())).collect();
        tracing::debug!("Captured translation source for {} entries", source.len());
        self.translation_source = Some(source);
        Ok(())
    }

    pub fn clear_translation_source(&mut self) {
        self.translation_source = None;
    }

    pub fn is_translator_mode(&self) -> bool {
        self.translation_source.is_some()
    }

    /// Captured source text of an entry. Entries created after capture have none.
    pub fn source_text(&self, id: EntryId) -> Option<&str> {
        self.translation_source
            .as_ref()
            .and_then(|source| source.get(&id))
            .map(String::as_str)
    }

    // ---- QC --------------------------------------------------------------

    pub fn evaluate_all(&self, thresholds: &QcThresholds) -> Vec<QcResult> {
        evaluate_all(self.entries(), thresholds)
    }

    pub fn detect_errors(&self, thresholds: &QcThresholds) -> Vec<DetectedError> {
        detect_all_errors(self.entries(), thresholds)
    }
}

fn check_range(start_ms: Millis, end_ms: Millis) -> EditResult<()> {
    if start_ms < 0 || start_ms >= end_ms {
        return Err(EditError::InvalidRange { start_ms, end_ms });
    }
    Ok(())
}

/// Distinct ids, each of which must be present in the document.
fn existing_ids(doc: &SubtitleDocument, ids: &[EntryId]) -> EditResult<BTreeSet<EntryId>> {
    let live: HashSet<EntryId> = doc.entries.iter().map(|e| e.id).collect();
    ids.iter()
        .map(|id| {
            if live.contains(id) {
                Ok(*id)
            } else {
                Err(EditError::UnknownEntry(*id))
            }
        })
        .collect()
}

fn replace_occurrences(text: &str, find: &str, replace: &str, case_sensitive: bool) -> (String, usize) {
    if case_sensitive {
        let count = text.matches(find).count();
        if count == 0 {
            return (text.to_string(), 0);
        }
        return (text.replace(find, replace), count);
    }

    let needle: Vec<char> = find.chars().flat_map(char::to_lowercase).collect();
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some(len) = match_len_ignore_case(rest, &needle) {
            out.push_str(replace);
            rest = &rest[len..];
            count += 1;
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    (out, count)
}

/// Byte length of the prefix of `haystack` matching the lowercased `needle`.
fn match_len_ignore_case(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (pos, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(pos + ch.len_utf8());
        }
    }
    None
}
