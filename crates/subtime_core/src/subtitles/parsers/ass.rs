//! ASS/SSA subtitle parser.
//!
//! Parses Advanced SubStation Alpha (.ass) and SubStation Alpha (.ssa) files.
//!
//! # Format Overview
//!
//! ASS files have three main sections:
//! - `[Script Info]`: Metadata (title, resolution, etc.)
//! - `[V4+ Styles]` or `[V4 Styles]`: Style definitions
//! - `[Events]`: Dialogue and comment lines
//!
//! Everything except the event lines is kept verbatim as the document header,
//! in file order. The `[Events]` section contributes only its header and
//! `Format:` line; the writer puts dialogue at the end of that section, ahead
//! of any sections that followed it (`[Fonts]`, `[Graphics]`).
//!
//! All timing is in the format `H:MM:SS.cc` (centiseconds).

use crate::subtitles::parsers::parse_clock;
use crate::subtitles::types::{Millis, ParsedSubtitles, SubtitleEntry, SubtitleFormat};

/// Parse ASS/SSA content.
pub fn parse_ass(content: &str) -> ParsedSubtitles {
    let mut parsed = ParsedSubtitles {
        format: SubtitleFormat::Ass,
        ..Default::default()
    };
    let mut leading_lines: Vec<&str> = Vec::new();
    let mut events_preamble: Vec<&str> = Vec::new();
    let mut trailing_lines: Vec<&str> = Vec::new();
    let mut event_format: Vec<String> = Vec::new();
    let mut in_events = false;

    for (line_num, raw) in content.lines().enumerate() {
        let line = raw.trim();

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
            if in_events {
                events_preamble.push(line);
            } else if events_preamble.is_empty() {
                leading_lines.push(raw);
            } else {
                trailing_lines.push(raw);
            }
            continue;
        }

        if !in_events {
            if events_preamble.is_empty() {
                leading_lines.push(raw);
            } else {
                trailing_lines.push(raw);
            }
            continue;
        }

        if line.starts_with("Format:") {
            event_format = parse_format_line(line);
            events_preamble.push(line);
        } else if let Some(body) = line.strip_prefix("Dialogue:") {
            match parse_dialogue(body, &event_format) {
                Some(entry) => parsed.entries.push(entry),
                None => {
                    tracing::debug!("Invalid ASS dialogue at line {}: '{}'", line_num + 1, line);
                    parsed.skipped += 1;
                }
            }
        }
        // Comment: lines and blank lines inside [Events] are dropped
    }

    let header = [
        leading_lines.join("\n"),
        events_preamble.join("\n"),
        trailing_lines.join("\n"),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");
    if !header.is_empty() {
        parsed.header = Some(header);
    }

    parsed
}

/// Parse a Format: line to get field names.
pub(crate) fn parse_format_line(line: &str) -> Vec<String> {
    line.trim_start_matches("Format:")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .collect()
}

/// Parse the body of a Dialogue: line.
fn parse_dialogue(body: &str, format: &[String]) -> Option<SubtitleEntry> {
    let default_format;
    let format = if format.is_empty() {
        default_format = default_event_format();
        &default_format
    } else {
        format
    };

    // Find the text field index (last field, may contain commas)
    let text_index = format.iter().position(|f| f == "text")?;
    let parts: Vec<&str> = body.trim_start().splitn(text_index + 1, ',').collect();
    if parts.len() != text_index + 1 {
        return None;
    }

    let mut start_ms = None;
    let mut end_ms = None;
    for (field, value) in format.iter().zip(parts.iter()) {
        match field.as_str() {
            "start" => start_ms = parse_ass_time(value),
            "end" => end_ms = parse_ass_time(value),
            _ => {}
        }
    }

    let (start_ms, end_ms) = (start_ms?, end_ms?);
    if end_ms <= start_ms {
        return None;
    }

    let text = parts[text_index].replace("\\N", "\n").replace("\\n", "\n");
    Some(SubtitleEntry::new(start_ms, end_ms, text))
}

/// Parse ASS timestamp format: H:MM:SS.cc
///
/// Returns time in milliseconds.
pub fn parse_ass_time(s: &str) -> Option<Millis> {
    parse_clock(s, false)
}

/// Default event format for Events section.
pub(crate) fn default_event_format() -> Vec<String> {
    vec![
        "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
