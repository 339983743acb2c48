//! Quality-control evaluation of subtitle entries.
//!
//! [`evaluate`] is a pure function of one entry, its successor and the
//! thresholds. It never looks backwards, so a whole document can be scored in
//! one forward pass ([`evaluate_all`]).
//!
//! [`detect_all_errors`] flattens the evaluator output (plus the text defects
//! the auto-fixers repair) into a sorted list for grouping in a UI.

mod detect;

pub use detect::{detect_all_errors, summarize, DetectedError};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::subtitles::{Millis, SubtitleEntry};

/// Readability and timing limits supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QcThresholds {
    /// Maximum characters per second.
    pub max_cps: f64,
    /// Maximum words per minute.
    pub max_wpm: f64,
    /// Maximum characters per line.
    pub max_cpl: usize,
    /// Minimum entry duration.
    pub min_duration_ms: Millis,
    /// Maximum entry duration.
    pub max_duration_ms: Millis,
    /// Minimum gap between consecutive entries.
    pub min_gap_ms: Millis,
}

/// Issue codes, in the order the auto-fixers address them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    /// Text is empty or whitespace only.
    Empty,
    /// Text repeats an earlier entry's text.
    Duplicate,
    /// Entry ends after the next one starts.
    Overlap,
    /// Text contains bracketed sound descriptions.
    HearingImpaired,
    /// A line exceeds `max_cpl`.
    Cpl,
    /// Text contains inline styling markup.
    FormattingTags,
    /// Duration below `min_duration_ms`.
    DurationShort,
    /// Duration above `max_duration_ms`.
    DurationLong,
    /// Positive gap to the next entry below `min_gap_ms`.
    GapShort,
    /// Reading speed above `max_cps`.
    Cps,
    /// Reading speed above `max_wpm`.
    Wpm,
}

impl Issue {
    /// Stable code used in reports and UI grouping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Duplicate => "duplicate",
            Self::Overlap => "overlap",
            Self::HearingImpaired => "hearing_impaired",
            Self::Cpl => "cpl",
            Self::FormattingTags => "formatting_tags",
            Self::DurationShort => "duration_short",
            Self::DurationLong => "duration_long",
            Self::GapShort => "gap_short",
            Self::Cps => "cps",
            Self::Wpm => "wpm",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Readability metrics of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QcMetrics {
    /// Characters per second.
    pub cps: f64,
    /// Words per minute.
    pub wpm: f64,
    /// Character count of the longest line.
    pub max_line_chars: usize,
}

/// Metrics and issues of one entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QcResult {
    pub metrics: QcMetrics,
    pub issues: BTreeSet<Issue>,
}

impl QcResult {
    /// Whether the entry passed every check.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Count of visible characters, excluding line breaks.
pub fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| *c != '\n' && *c != '\r').count()
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Character count of the longest line.
pub fn max_line_chars(text: &str) -> usize {
    text.lines().map(|line| line.chars().count()).max().unwrap_or(0)
}

/// Score one entry against the thresholds, looking only at its successor.
pub fn evaluate(
    entry: &SubtitleEntry,
    next: Option<&SubtitleEntry>,
    thresholds: &QcThresholds,
) -> QcResult {
    let duration_ms = entry.duration_ms();
    let mut issues = BTreeSet::new();

    let (cps, wpm) = if duration_ms > 0 {
        let secs = duration_ms as f64 / 1000.0;
        (
            visible_chars(&entry.text) as f64 / secs,
            word_count(&entry.text) as f64 / (secs / 60.0),
        )
    } else {
        (0.0, 0.0)
    };
    let longest = max_line_chars(&entry.text);

    if cps > thresholds.max_cps {
        issues.insert(Issue::Cps);
    }
    if wpm > thresholds.max_wpm {
        issues.insert(Issue::Wpm);
    }
    if longest > thresholds.max_cpl {
        issues.insert(Issue::Cpl);
    }
    if duration_ms < thresholds.min_duration_ms {
        issues.insert(Issue::DurationShort);
    }
    if duration_ms > thresholds.max_duration_ms {
        issues.insert(Issue::DurationLong);
    }

    if let Some(next) = next {
        if entry.end_ms > next.start_ms {
            issues.insert(Issue::Overlap);
        }
        let gap = next.start_ms - entry.end_ms;
        if gap > 0 && gap < thresholds.min_gap_ms {
            issues.insert(Issue::GapShort);
        }
    }

    QcResult {
        metrics: QcMetrics {
            cps,
            wpm,
            max_line_chars: longest,
        },
        issues,
    }
}

/// Score every entry in one forward pass.
pub fn evaluate_all(entries: &[SubtitleEntry], thresholds: &QcThresholds) -> Vec<QcResult> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| evaluate(entry, entries.get(i + 1), thresholds))
        .collect()
}

#[cfg(test)]
pub(crate) fn test_thresholds() -> QcThresholds {
    QcThresholds {
        max_cps: 17.0,
        max_wpm: 180.0,
        max_cpl: 42,
        min_duration_ms: 1000,
        max_duration_ms: 7000,
        min_gap_ms: 80,
    }
}
