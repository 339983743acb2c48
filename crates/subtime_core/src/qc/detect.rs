//! Whole-document error detection.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::fixes::text::{has_formatting_tags, has_hearing_impaired};
use crate::qc::{evaluate, Issue, QcThresholds};
use crate::subtitles::{EntryId, SubtitleEntry};

/// One issue on one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedError {
    pub entry_id: EntryId,
    /// Display index of the entry at detection time.
    pub index: usize,
    pub kind: Issue,
}

/// Run QC over the whole sequence and flatten it.
///
/// Sorted by issue kind, then by entry index.
pub fn detect_all_errors(entries: &[SubtitleEntry], thresholds: &QcThresholds) -> Vec<DetectedError> {
    let mut errors = Vec::new();
    let mut seen_texts: HashSet<&str> = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        let mut push = |kind: Issue| {
            errors.push(DetectedError {
                entry_id: entry.id,
                index: entry.index,
                kind,
            })
        };

        let trimmed = entry.text.trim();
        if trimmed.is_empty() {
            push(Issue::Empty);
        } else if !seen_texts.insert(trimmed) {
            push(Issue::Duplicate);
        }
        if has_hearing_impaired(&entry.text) {
            push(Issue::HearingImpaired);
        }
        if has_formatting_tags(&entry.text) {
            push(Issue::FormattingTags);
        }

        for issue in evaluate(entry, entries.get(i + 1), thresholds).issues {
            push(issue);
        }
    }

    errors.sort_by_key(|e| (e.kind, e.index));
    errors
}

/// Count errors per issue kind.
pub fn summarize(errors: &[DetectedError]) -> BTreeMap<Issue, usize> {
    let mut counts = BTreeMap::new();
    for error in errors {
        *counts.entry(error.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qc::test_thresholds;
    use crate::subtitles::reindex;

    #[test]
    fn test_detect_all_errors_sorted_by_kind() {
        let mut entries = vec![
            SubtitleEntry::new(0, 2000, "Hello"),
            SubtitleEntry::new(1500, 3500, "[door slams]"),
            SubtitleEntry::new(4000, 6000, "Hello"),
            SubtitleEntry::new(6000, 6500, "  "),
        ];
        reindex(&mut entries);

        let errors = detect_all_errors(&entries, &test_thresholds());
        let kinds: Vec<(Issue, usize)> = errors.iter().map(|e| (e.kind, e.index)).collect();

        assert_eq!(
            kinds,
            vec![
                (Issue::Empty, 4),
                (Issue::Duplicate, 3),
                (Issue::Overlap, 1),
                (Issue::HearingImpaired, 2),
                (Issue::DurationShort, 4),
            ]
        );
        assert_eq!(errors[1].entry_id, entries[2].id);
    }

    #[test]
    fn test_summarize() {
        let mut entries = vec![
            SubtitleEntry::new(0, 500, "a"),
            SubtitleEntry::new(600, 900, "b"),
        ];
        reindex(&mut entries);
        let counts = summarize(&detect_all_errors(&entries, &test_thresholds()));
        assert_eq!(counts.get(&Issue::DurationShort), Some(&2));
        assert_eq!(counts.get(&Issue::Overlap), None);
    }
}
