//! Automatic repairs.
//!
//! Each fixer is a pure `&[SubtitleEntry] -> Vec<SubtitleEntry>` transform that
//! is idempotent and renumbers display indices on return. [`fix_all_errors`]
//! chains them in the order of [`Fixer::ALL`] and finishes with an empty-entry
//! pass and an overlap pass, so the result never contains blank or
//! overlapping entries.

pub(crate) mod text;
mod timing;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::qc::{Issue, QcThresholds};
use crate::subtitles::{EntryId, SubtitleEntry};

pub use text::{
    fix_duplicates, fix_empty_entries, fix_formatting_tags, fix_hearing_impaired,
    fix_line_breaking,
};
pub use timing::{fix_gaps, fix_long_duration, fix_overlapping_timestamps, fix_short_duration};

/// One automatic repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fixer {
    EmptyEntries,
    Duplicates,
    OverlappingTimestamps,
    HearingImpaired,
    LineBreaking,
    FormattingTags,
    ShortDuration,
    LongDuration,
    Gaps,
}

impl Fixer {
    /// Fixers in the order [`fix_all_errors`] applies them.
    pub const ALL: [Fixer; 9] = [
        Fixer::EmptyEntries,
        Fixer::Duplicates,
        Fixer::OverlappingTimestamps,
        Fixer::HearingImpaired,
        Fixer::LineBreaking,
        Fixer::FormattingTags,
        Fixer::ShortDuration,
        Fixer::LongDuration,
        Fixer::Gaps,
    ];

    /// Run this fixer.
    pub fn apply(&self, entries: &[SubtitleEntry], thresholds: &QcThresholds) -> Vec<SubtitleEntry> {
        match self {
            Self::EmptyEntries => fix_empty_entries(entries),
            Self::Duplicates => fix_duplicates(entries),
            Self::OverlappingTimestamps => fix_overlapping_timestamps(entries),
            Self::HearingImpaired => fix_hearing_impaired(entries),
            Self::LineBreaking => fix_line_breaking(entries, thresholds.max_cpl),
            Self::FormattingTags => fix_formatting_tags(entries),
            Self::ShortDuration => fix_short_duration(entries, thresholds.min_duration_ms),
            Self::LongDuration => fix_long_duration(entries, thresholds.max_duration_ms),
            Self::Gaps => fix_gaps(entries, thresholds.min_gap_ms, thresholds.min_duration_ms),
        }
    }

    /// The issue this fixer repairs.
    pub fn issue(&self) -> Issue {
        match self {
            Self::EmptyEntries => Issue::Empty,
            Self::Duplicates => Issue::Duplicate,
            Self::OverlappingTimestamps => Issue::Overlap,
            Self::HearingImpaired => Issue::HearingImpaired,
            Self::LineBreaking => Issue::Cpl,
            Self::FormattingTags => Issue::FormattingTags,
            Self::ShortDuration => Issue::DurationShort,
            Self::LongDuration => Issue::DurationLong,
            Self::Gaps => Issue::GapShort,
        }
    }

    /// Fixer for an issue, if the issue is automatically repairable.
    ///
    /// Reading speed has no automatic repair.
    pub fn for_issue(issue: Issue) -> Option<Fixer> {
        Self::ALL.into_iter().find(|f| f.issue() == issue)
    }

    /// Human-readable name for menus and history labels.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmptyEntries => "Remove empty entries",
            Self::Duplicates => "Remove duplicates",
            Self::OverlappingTimestamps => "Fix overlaps",
            Self::HearingImpaired => "Remove hearing-impaired text",
            Self::LineBreaking => "Fix line breaking",
            Self::FormattingTags => "Clean formatting tags",
            Self::ShortDuration => "Extend short entries",
            Self::LongDuration => "Shorten long entries",
            Self::Gaps => "Fix short gaps",
        }
    }
}

impl std::fmt::Display for Fixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Run every fixer, then final empty-entry and overlap passes.
///
/// Tag stripping runs after the first empty pass and can blank an entry.
pub fn fix_all_errors(entries: &[SubtitleEntry], thresholds: &QcThresholds) -> Vec<SubtitleEntry> {
    let fixed = Fixer::ALL
        .iter()
        .fold(entries.to_vec(), |acc, fixer| fixer.apply(&acc, thresholds));
    fix_overlapping_timestamps(&fix_empty_entries(&fixed))
}

/// What a fix pass changed, by entry identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FixReport {
    pub removed: usize,
    pub modified: usize,
}

impl FixReport {
    /// Compare two sequences by entry id.
    pub fn between(before: &[SubtitleEntry], after: &[SubtitleEntry]) -> Self {
        let previous: HashMap<EntryId, &SubtitleEntry> = before.iter().map(|e| (e.id, e)).collect();

        let modified = after
            .iter()
            .filter(|e| previous.get(&e.id).is_some_and(|old| !old.same_content(e)))
            .count();
        let kept = after.iter().filter(|e| previous.contains_key(&e.id)).count();

        Self {
            removed: before.len().saturating_sub(kept),
            modified,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.modified == 0
    }
}

/// [`fix_all_errors`] plus a summary of what changed.
pub fn fix_all_with_report(
    entries: &[SubtitleEntry],
    thresholds: &QcThresholds,
) -> (Vec<SubtitleEntry>, FixReport) {
    let fixed = fix_all_errors(entries, thresholds);
    let report = FixReport::between(entries, &fixed);
    tracing::debug!(
        "Fix all: {} removed, {} modified, {} remaining",
        report.removed,
        report.modified,
        fixed.len()
    );
    (fixed, report)
}
