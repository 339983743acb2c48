//! Core subtitle types.
//!
//! All timing values are stored as integer milliseconds. Format-specific
//! precision (centiseconds for ASS) only matters at parse/write time.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::subtitles::error::SubtitleError;

/// Time value in milliseconds.
pub type Millis = i64;

/// Supported subtitle formats.
///
/// The set is closed: unknown tags are rejected rather than mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip (.srt)
    #[default]
    Srt,
    /// WebVTT (.vtt)
    Vtt,
    /// Advanced SubStation Alpha (.ass, .ssa)
    Ass,
}

impl SubtitleFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Result<Self, SubtitleError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| SubtitleError::UnknownFormat(path.display().to_string()))?;
        ext.parse()
    }

    /// Get the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ass" | "ssa" => Ok(Self::Ass),
            _ => Err(SubtitleError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Opaque, stable identifier of a subtitle entry.
///
/// Survives reordering, reindexing and undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single timed caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    /// Stable identifier.
    pub id: EntryId,
    /// 1-based display order, recomputed by [`reindex`].
    pub index: usize,
    /// Start time in milliseconds.
    pub start_ms: Millis,
    /// End time in milliseconds.
    pub end_ms: Millis,
    /// Text content, lines separated by `'\n'`.
    pub text: String,
}

impl SubtitleEntry {
    /// Create a new entry with a fresh id. The index is assigned by the next reindex.
    pub fn new(start_ms: Millis, end_ms: Millis, text: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            index: 0,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Duration in milliseconds (may be non-positive for uncommitted data).
    pub fn duration_ms(&self) -> Millis {
        self.end_ms - self.start_ms
    }

    /// Whether the committed-entry invariant holds.
    pub fn has_valid_range(&self) -> bool {
        self.start_ms >= 0 && self.start_ms < self.end_ms
    }

    /// Shift this entry by an offset, clamping at zero.
    pub fn shift(&mut self, offset_ms: Millis) {
        let duration = self.duration_ms();
        self.start_ms = (self.start_ms + offset_ms).max(0);
        self.end_ms = self.start_ms + duration;
    }

    /// Same timing and text, ignoring id and index.
    pub fn same_content(&self, other: &SubtitleEntry) -> bool {
        self.start_ms == other.start_ms && self.end_ms == other.end_ms && self.text == other.text
    }
}

/// Recompute 1-based indices from sequence order.
pub fn reindex(entries: &mut [SubtitleEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.index = i + 1;
    }
}

/// Result of parsing subtitle content.
#[derive(Debug, Clone, Default)]
pub struct ParsedSubtitles {
    /// Entries in file order, already indexed.
    pub entries: Vec<SubtitleEntry>,
    /// Format the content was parsed as.
    pub format: SubtitleFormat,
    /// Format-specific preamble (ASS script info and styles, VTT header blocks).
    pub header: Option<String>,
    /// Number of malformed blocks that were skipped.
    pub skipped: usize,
}

/// Rounding mode for time values when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round down (floor).
    Floor,
    /// Round to nearest.
    #[default]
    Round,
    /// Round up (ceil).
    Ceil,
}

impl RoundingMode {
    /// Convert milliseconds to whole centiseconds for ASS output.
    pub fn to_centiseconds(&self, ms: Millis) -> Millis {
        let ms = ms.max(0);
        match self {
            Self::Floor => ms / 10,
            Self::Round => (ms + 5) / 10,
            Self::Ceil => (ms + 9) / 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_format_detection() {
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("test.ass")).unwrap(),
            SubtitleFormat::Ass
        );
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("test.SRT")).unwrap(),
            SubtitleFormat::Srt
        );
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("test.vtt")).unwrap(),
            SubtitleFormat::Vtt
        );
        assert!(matches!(
            SubtitleFormat::from_extension(Path::new("test.txt")),
            Err(SubtitleError::UnknownFormat(_))
        ));
        assert!(SubtitleFormat::from_extension(Path::new("noext")).is_err());
    }

    #[test]
    fn test_format_tag_parsing() {
        assert_eq!("srt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
        assert_eq!("SSA".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Ass);
        assert_eq!("webvtt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Vtt);
        assert!("sub".parse::<SubtitleFormat>().is_err());
    }

    #[test]
    fn test_entry_shift_clamps_at_zero() {
        let mut entry = SubtitleEntry::new(1000, 2000, "Test");
        entry.shift(500);
        assert_eq!((entry.start_ms, entry.end_ms), (1500, 2500));

        entry.shift(-2000);
        assert_eq!((entry.start_ms, entry.end_ms), (0, 1000));
    }

    #[test]
    fn test_reindex() {
        let mut entries = vec![
            SubtitleEntry::new(0, 1, "a"),
            SubtitleEntry::new(1, 2, "b"),
        ];
        reindex(&mut entries);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[1].index, 2);
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(RoundingMode::Floor.to_centiseconds(1234), 123);
        assert_eq!(RoundingMode::Round.to_centiseconds(1234), 123);
        assert_eq!(RoundingMode::Round.to_centiseconds(1235), 124);
        assert_eq!(RoundingMode::Ceil.to_centiseconds(1231), 124);
    }
}
