//! Subtitle codec.
//!
//! Provides parsing and writing of subtitle content.
//!
//! # Components
//!
//! - **types**: Core data structures (SubtitleEntry, EntryId, SubtitleFormat)
//! - **parsers**: Format-specific parsers (SRT, WebVTT, ASS)
//! - **writers**: Format-specific writers (SRT, WebVTT, ASS)
//!
//! # Usage
//!
//! ```no_run
//! use subtime_core::subtitles::{parse, serialize, SubtitleFormat};
//!
//! let parsed = parse("1\n00:00:01,000 --> 00:00:02,000\nHello\n", None)?;
//! let vtt = serialize(&parsed.entries, SubtitleFormat::Vtt, None);
//! # Ok::<(), subtime_core::subtitles::SubtitleError>(())
//! ```

mod error;
pub mod parsers;
mod types;
pub mod writers;

use std::fs;
use std::path::Path;

pub use types::{
    reindex, EntryId, Millis, ParsedSubtitles, RoundingMode, SubtitleEntry, SubtitleFormat,
};

pub use error::SubtitleError;

pub use parsers::{
    detect_format, parse_ass_time, parse_content, parse_srt_time, parse_vtt_time,
};

pub use writers::{format_ass_time, format_srt_time, format_vtt_time, write_content};

/// Parse subtitle content into entries, format and header.
///
/// Malformed blocks are skipped; only an undetectable format is an error.
pub fn parse(
    content: &str,
    format_hint: Option<SubtitleFormat>,
) -> Result<ParsedSubtitles, SubtitleError> {
    parse_content(content, format_hint)
}

/// Serialize entries back into subtitle content.
pub fn serialize(entries: &[SubtitleEntry], format: SubtitleFormat, header: Option<&str>) -> String {
    write_content(entries, format, header)
}

/// Parse a subtitle file from disk.
///
/// The format comes from the file extension; unknown extensions are an error.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedSubtitles, SubtitleError> {
    let path = path.as_ref();
    let format = SubtitleFormat::from_extension(path)?;

    let content =
        fs::read_to_string(path).map_err(|e| SubtitleError::read(path.to_path_buf(), e))?;

    parse_content(&content, Some(format))
}

/// Write entries to a file in the given format.
pub fn write_file(
    entries: &[SubtitleEntry],
    format: SubtitleFormat,
    header: Option<&str>,
    path: impl AsRef<Path>,
) -> Result<(), SubtitleError> {
    let path = path.as_ref();
    let content = write_content(entries, format, header);

    fs::write(path, content).map_err(|e| SubtitleError::write(path.to_path_buf(), e))?;
    tracing::debug!("Wrote {} entries to {}", entries.len(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn timing_and_text(entries: &[SubtitleEntry]) -> Vec<(Millis, Millis, String)> {
        entries
            .iter()
            .map(|e| (e.start_ms, e.end_ms, e.text.clone()))
            .collect()
    }

    fn sample_entries() -> Vec<SubtitleEntry> {
        vec![
            SubtitleEntry::new(0, 1500, "First line"),
            SubtitleEntry::new(1500, 4020, "Two\nlines"),
            SubtitleEntry::new(3_600_000, 3_601_230, "<i>Late</i>, with comma"),
        ]
    }

    #[test]
    fn test_round_trip_every_format() {
        for format in [SubtitleFormat::Srt, SubtitleFormat::Vtt, SubtitleFormat::Ass] {
            let entries = sample_entries();
            let content = serialize(&entries, format, None);
            let parsed = parse(&content, None).unwrap();

            assert_eq!(parsed.format, format);
            assert_eq!(parsed.skipped, 0);
            assert_eq!(
                timing_and_text(&parsed.entries),
                timing_and_text(&entries),
                "round trip failed for {}",
                format
            );
        }
    }

    #[test]
    fn test_parse_serialize_parse_is_stable() {
        let ass = "[Script Info]\nTitle: x\n\n[V4+ Styles]\nStyle: Main,Arial,20\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:02.50,Main,,0,0,0,,Hi\\Nthere\n";
        let vtt = "WEBVTT\n\nNOTE hi\n\n00:01.000 --> 00:02.000\nHello\n";
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n";
        let ass_with_fonts = "[Script Info]\nTitle: x\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hi\n\n[Fonts]\nfontname: a.ttf\n";

        for content in [ass, vtt, srt, ass_with_fonts] {
            let first = parse(content, None).unwrap();
            let second = parse(
                &serialize(&first.entries, first.format, first.header.as_deref()),
                None,
            )
            .unwrap();
            assert_eq!(timing_and_text(&first.entries), timing_and_text(&second.entries));
            assert_eq!(first.header, second.header);
        }

        let parsed = parse(ass_with_fonts, None).unwrap();
        let written = serialize(&parsed.entries, parsed.format, parsed.header.as_deref());
        assert!(written.find("Dialogue:").unwrap() < written.find("[Fonts]").unwrap());
    }

    #[test]
    fn test_out_of_range_clock_skips_only_that_block() {
        let srt = "1\n9999999999999999:00:00,000 --> 9999999999999999:00:01,000\nx\n\n2\n00:00:01,000 --> 00:00:02,000\ny\n";
        let parsed = parse(srt, None).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert_eq!(timing_and_text(&parsed.entries), vec![(1000, 2000, "y".to_string())]);

        let ass = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,99999999999999:00:00.00,99999999999999:00:01.00,Default,,0,0,0,,x\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,y\n";
        let parsed = parse(ass, None).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].text, "y");
    }

    #[test]
    fn test_parse_and_write_file() {
        let mut temp_file = NamedTempFile::with_suffix(".srt").unwrap();
        temp_file
            .write_all(b"1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n")
            .unwrap();

        let data = parse_file(temp_file.path()).unwrap();
        assert_eq!(data.entries.len(), 1);

        let output_file = NamedTempFile::with_suffix(".vtt").unwrap();
        write_file(&data.entries, SubtitleFormat::Vtt, None, output_file.path()).unwrap();

        let reparsed = parse_file(output_file.path()).unwrap();
        assert_eq!(reparsed.format, SubtitleFormat::Vtt);
        assert_eq!(reparsed.entries[0].text, "Hello, world!");
    }

    #[test]
    fn test_parse_file_unknown_extension() {
        let temp_file = NamedTempFile::with_suffix(".sub").unwrap();
        assert!(matches!(
            parse_file(temp_file.path()),
            Err(SubtitleError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("/nonexistent/dir/file.srt"),
            Err(SubtitleError::ReadError { .. })
        ));
    }
}
