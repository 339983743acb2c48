//! WebVTT subtitle parser.
//!
//! Header blocks (the `WEBVTT` line plus any STYLE, REGION or NOTE blocks that
//! precede the first cue) are kept verbatim as the document header. Cue
//! identifiers and cue settings are not retained.

use crate::subtitles::parsers::srt::{parse_timing_line, split_blocks};
use crate::subtitles::parsers::parse_clock;
use crate::subtitles::types::{Millis, ParsedSubtitles, SubtitleEntry, SubtitleFormat};

/// Parse WebVTT content.
pub fn parse_vtt(content: &str) -> ParsedSubtitles {
    let mut parsed = ParsedSubtitles {
        format: SubtitleFormat::Vtt,
        ..Default::default()
    };
    let mut header_blocks: Vec<String> = Vec::new();
    let mut seen_cue = false;

    for block in split_blocks(content) {
        let first = block[0].trim_start();
        let is_header_block = first.starts_with("WEBVTT")
            || first.starts_with("STYLE")
            || first.starts_with("REGION");

        if first.starts_with("NOTE") || (is_header_block && !seen_cue) {
            if !seen_cue {
                header_blocks.push(block.join("\n"));
            }
            continue;
        }

        let Some(timing_idx) = block.iter().position(|line| line.contains("-->")) else {
            parsed.skipped += 1;
            continue;
        };

        let Some((start_ms, end_ms)) = parse_timing_line(block[timing_idx], true) else {
            tracing::debug!("Invalid VTT timing line: '{}'", block[timing_idx]);
            parsed.skipped += 1;
            continue;
        };

        if end_ms <= start_ms {
            parsed.skipped += 1;
            continue;
        }

        seen_cue = true;
        let text = block[timing_idx + 1..].join("\n");
        parsed.entries.push(SubtitleEntry::new(start_ms, end_ms, text));
    }

    if !header_blocks.is_empty() {
        parsed.header = Some(header_blocks.join("\n\n"));
    }

    parsed
}

/// Parse WebVTT timestamp: `HH:MM:SS.mmm` or `MM:SS.mmm`
pub fn parse_vtt_time(s: &str) -> Option<Millis> {
    parse_clock(s, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vtt_time() {
        assert_eq!(parse_vtt_time("00:00:01.000"), Some(1000));
        assert_eq!(parse_vtt_time("00:01.250"), Some(1250));
        assert_eq!(parse_vtt_time("1:00:00.000"), Some(3_600_000));
    }

    #[test]
    fn test_parse_basic_vtt() {
        let content = r#"WEBVTT - Test file

STYLE
::cue { color: yellow; }

NOTE this is a comment

intro
00:00:01.000 --> 00:00:04.000 align:start position:10%
Hello, world!

00:05.000 --> 00:08.000
Two
lines
"#;

        let data = parse_vtt(content);
        assert_eq!(data.format, SubtitleFormat::Vtt);
        assert_eq!(data.entries.len(), 2);
        assert_eq!(data.skipped, 0);

        assert_eq!(data.entries[0].start_ms, 1000);
        assert_eq!(data.entries[0].end_ms, 4000);
        assert_eq!(data.entries[0].text, "Hello, world!");
        assert_eq!(data.entries[1].start_ms, 5000);
        assert_eq!(data.entries[1].text, "Two\nlines");

        let header = data.header.unwrap();
        assert!(header.starts_with("WEBVTT - Test file"));
        assert!(header.contains("::cue { color: yellow; }"));
        assert!(header.contains("NOTE this is a comment"));
    }

    #[test]
    fn test_parse_vtt_skips_bad_cues_and_late_notes() {
        let content = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nOne\n\nNOTE late comment\n\nbroken --> cue\nText\n\n00:00:03.000 --> 00:00:04.000\nTwo\n";
        let data = parse_vtt(content);
        assert_eq!(data.entries.len(), 2);
        assert_eq!(data.skipped, 1);
        assert_eq!(data.header.as_deref(), Some("WEBVTT"));
    }
}
