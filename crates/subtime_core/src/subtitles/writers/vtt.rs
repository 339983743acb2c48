//! WebVTT subtitle writer.

use crate::subtitles::types::{Millis, SubtitleEntry};
use crate::subtitles::writers::srt::{cue_text_lines, split_clock};

/// Write entries to WebVTT, reusing the header when it is a WebVTT preamble.
pub fn write_vtt(entries: &[SubtitleEntry], header: Option<&str>) -> String {
    let mut output = match header.map(str::trim) {
        Some(h) if h.starts_with("WEBVTT") => h.to_string(),
        _ => "WEBVTT".to_string(),
    };
    output.push('\n');

    for entry in entries {
        output.push('\n');
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_time(entry.start_ms),
            format_vtt_time(entry.end_ms)
        ));
        for line in cue_text_lines(&entry.text) {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

/// Format milliseconds as WebVTT timestamp (HH:MM:SS.mmm).
pub fn format_vtt_time(ms: Millis) -> String {
    let (hours, mins, secs, millis) = split_clock(ms);
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vtt_time() {
        assert_eq!(format_vtt_time(1500), "00:00:01.500");
        assert_eq!(format_vtt_time(3_723_004), "01:02:03.004");
    }

    #[test]
    fn test_write_vtt_default_header() {
        let entries = vec![SubtitleEntry::new(1000, 2000, "Hi")];
        assert_eq!(
            write_vtt(&entries, None),
            "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n"
        );
    }

    #[test]
    fn test_write_vtt_ignores_foreign_header() {
        let output = write_vtt(&[], Some("[Script Info]\nTitle: x"));
        assert_eq!(output, "WEBVTT\n");
    }

    #[test]
    fn test_write_vtt_keeps_header_blocks() {
        let header = "WEBVTT - Title\n\nSTYLE\n::cue { color: red; }";
        let output = write_vtt(&[SubtitleEntry::new(0, 10, "x")], Some(header));
        assert!(output.starts_with("WEBVTT - Title\n\nSTYLE\n::cue { color: red; }\n\n00:00:00.000"));
    }
}
