//! ASS subtitle writer.
//!
//! # Timing Precision
//!
//! ASS uses centisecond timing (H:MM:SS.cc). Millisecond entry times are
//! rounded according to the given RoundingMode at write time.
//!
//! Dialogue lines follow the `Format:` line of the preserved header's
//! `[Events]` section; every non-timing field gets a neutral value and the
//! style is the first style the header defines. Header sections that follow
//! `[Events]` are written after the dialogue.

use crate::subtitles::parsers::ass::{default_event_format, parse_format_line};
use crate::subtitles::types::{Millis, RoundingMode, SubtitleEntry};

const DEFAULT_HEADER: &str = "[Script Info]
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayResX: 1920
PlayResY: 1080

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Write entries to ASS format string.
pub fn write_ass(entries: &[SubtitleEntry], header: Option<&str>, rounding: RoundingMode) -> String {
    let header = match header.map(str::trim) {
        Some(h) if h.to_lowercase().contains("[events]") => h,
        _ => DEFAULT_HEADER,
    };

    let (leading, trailing) = split_trailing_sections(header);
    let mut output = leading;
    let mut format = events_format(header);
    if format.is_empty() {
        // Header ends at [Events] without a Format line
        output.push_str(
            "\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text",
        );
        format = default_event_format();
    }
    output.push('\n');

    let style = first_style_name(header).unwrap_or("Default");

    for entry in entries {
        let fields: Vec<String> = format
            .iter()
            .map(|field| match field.as_str() {
                "start" => format_ass_time(entry.start_ms, rounding),
                "end" => format_ass_time(entry.end_ms, rounding),
                "style" => style.to_string(),
                "text" => entry.text.replace('\n', "\\N"),
                "layer" | "marginl" | "marginr" | "marginv" => "0".to_string(),
                "marked" => "Marked=0".to_string(),
                _ => String::new(),
            })
            .collect();
        output.push_str("Dialogue: ");
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    if let Some(trailing) = trailing {
        output.push('\n');
        output.push_str(&trailing);
        output.push('\n');
    }

    output
}

/// Split the header before the first section that follows `[Events]`.
fn split_trailing_sections(header: &str) -> (String, Option<String>) {
    let lines: Vec<&str> = header.lines().collect();
    let mut seen_events = false;
    let split = lines.iter().position(|line| {
        let line = line.trim();
        if !(line.starts_with('[') && line.ends_with(']')) {
            return false;
        }
        if seen_events {
            return true;
        }
        seen_events = line.eq_ignore_ascii_case("[events]");
        false
    });

    match split {
        Some(at) => (
            lines[..at].join("\n").trim_end().to_string(),
            Some(lines[at..].join("\n").trim().to_string()),
        ),
        None => (header.to_string(), None),
    }
}

/// Field names of the `[Events]` Format line, empty if absent.
fn events_format(header: &str) -> Vec<String> {
    let mut in_events = false;
    for line in header.lines().map(str::trim) {
        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
        } else if in_events && line.starts_with("Format:") {
            return parse_format_line(line);
        }
    }
    Vec::new()
}

/// Name of the first `Style:` line in the header.
fn first_style_name(header: &str) -> Option<&str> {
    header
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("Style:"))
        .and_then(|rest| rest.split(',').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Format milliseconds as ASS timestamp (H:MM:SS.cc).
pub fn format_ass_time(ms: Millis, rounding: RoundingMode) -> String {
    let cs = rounding.to_centiseconds(ms);
    let centis = cs % 100;
    let total_secs = cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
}
