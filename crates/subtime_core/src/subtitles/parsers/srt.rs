//! SRT subtitle parser.
//!
//! Parses SubRip (.srt) subtitle files.
//!
//! # Format Overview
//!
//! SRT files consist of sequential entries:
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//!
//! 2
//! 00:00:05,000 --> 00:00:08,000
//! This is a test.
//! ```
//!
//! Each entry has:
//! - Index number (ignored during parsing, regenerated on write)
//! - Timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`
//! - Zero or more lines of text
//! - Blank line separator

use crate::subtitles::parsers::parse_clock;
use crate::subtitles::types::{Millis, ParsedSubtitles, SubtitleEntry, SubtitleFormat};

/// Parse SRT content.
///
/// Blocks without a valid timing line, or with `end <= start`, are skipped.
pub fn parse_srt(content: &str) -> ParsedSubtitles {
    let mut parsed = ParsedSubtitles {
        format: SubtitleFormat::Srt,
        ..Default::default()
    };

    for block in split_blocks(content) {
        let Some(timing_idx) = block.iter().position(|line| line.contains("-->")) else {
            parsed.skipped += 1;
            continue;
        };

        let Some((start_ms, end_ms)) = parse_timing_line(block[timing_idx], false) else {
            tracing::debug!("Invalid SRT timing line: '{}'", block[timing_idx]);
            parsed.skipped += 1;
            continue;
        };

        if end_ms <= start_ms {
            tracing::debug!("SRT cue ends before it starts: '{}'", block[timing_idx]);
            parsed.skipped += 1;
            continue;
        }

        // Text is everything after the timing line
        let text = block[timing_idx + 1..].join("\n");
        parsed.entries.push(SubtitleEntry::new(start_ms, end_ms, text));
    }

    parsed
}

/// Split content into blocks of non-blank lines.
pub(crate) fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse a timing line `START --> END [settings]`.
///
/// Anything after the end timestamp (SRT coordinates, VTT cue settings) is ignored.
pub(crate) fn parse_timing_line(line: &str, allow_short: bool) -> Option<(Millis, Millis)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;

    let start = parse_clock(start, allow_short)?;
    let end = parse_clock(end, allow_short)?;

    Some((start, end))
}

/// Parse SRT timestamp: `HH:MM:SS,mmm` or `HH:MM:SS.mmm`
///
/// Returns time in milliseconds.
pub fn parse_srt_time(s: &str) -> Option<Millis> {
    parse_clock(s, false)
}
