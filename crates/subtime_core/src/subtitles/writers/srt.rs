//! SRT subtitle writer.
//!
//! SRT uses millisecond timing (HH:MM:SS,mmm), so entry times are written as-is.

use crate::subtitles::types::{Millis, SubtitleEntry};

/// Write entries to SRT format string.
///
/// Indices are regenerated from sequence order.
pub fn write_srt(entries: &[SubtitleEntry]) -> String {
    let mut output = String::new();

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        // Index (1-based)
        output.push_str(&format!("{}\n", i + 1));

        // Timing line
        let start = format_srt_time(entry.start_ms);
        let end = format_srt_time(entry.end_ms);
        output.push_str(&format!("{} --> {}\n", start, end));

        for line in cue_text_lines(&entry.text) {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

/// Text lines of a cue, without blank lines (a blank line terminates a cue).
pub(crate) fn cue_text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Split milliseconds into (hours, minutes, seconds, millis).
pub(crate) fn split_clock(ms: Millis) -> (Millis, Millis, Millis, Millis) {
    let ms = ms.max(0);
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    (hours, mins, secs, millis)
}

/// Format milliseconds as SRT timestamp (HH:MM:SS,mmm).
pub fn format_srt_time(ms: Millis) -> String {
    let (hours, mins, secs, millis) = split_clock(ms);
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
