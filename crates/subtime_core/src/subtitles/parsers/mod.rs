//! Subtitle parsers for various formats.
//!
//! Each parser is a pure function that takes content and returns `ParsedSubtitles`.
//! Parsers never fail on a malformed block; they skip it and count it.

pub(crate) mod ass;
mod srt;
mod vtt;

pub use ass::{parse_ass, parse_ass_time};
pub use srt::{parse_srt, parse_srt_time};
pub use vtt::{parse_vtt, parse_vtt_time};

use crate::subtitles::error::SubtitleError;
use crate::subtitles::types::{reindex, Millis, ParsedSubtitles, SubtitleFormat};

/// Parse subtitle content, honoring the format hint or detecting it from content.
pub fn parse_content(
    content: &str,
    format: Option<SubtitleFormat>,
) -> Result<ParsedSubtitles, SubtitleError> {
    let content = normalize(content);
    let format = match format {
        Some(format) => format,
        None => detect_format(&content)?,
    };

    let mut parsed = match format {
        SubtitleFormat::Srt => parse_srt(&content),
        SubtitleFormat::Vtt => parse_vtt(&content),
        SubtitleFormat::Ass => parse_ass(&content),
    };
    reindex(&mut parsed.entries);

    if parsed.skipped > 0 {
        tracing::warn!(
            "Skipped {} malformed {} block(s), kept {} entries",
            parsed.skipped,
            format,
            parsed.entries.len()
        );
    } else {
        tracing::debug!("Parsed {} {} entries", parsed.entries.len(), format);
    }

    Ok(parsed)
}

/// Detect subtitle format from content.
///
/// ASS is recognised by a section header on its own line ahead of any cue
/// timing line, so dialogue text mentioning `[Events]` does not count.
/// There is no default: content with no recognizable signature is an error.
pub fn detect_format(content: &str) -> Result<SubtitleFormat, SubtitleError> {
    let content = content.trim_start_matches('\u{feff}');

    let has_ass_section = content
        .lines()
        .take_while(|line| !line.contains("-->"))
        .map(|line| line.trim().to_lowercase())
        .any(|line| ASS_SECTIONS.contains(&line.as_str()));
    if has_ass_section {
        return Ok(SubtitleFormat::Ass);
    }

    if content.trim_start().starts_with("WEBVTT") {
        return Ok(SubtitleFormat::Vtt);
    }

    if content.lines().any(|line| line.contains("-->")) {
        return Ok(SubtitleFormat::Srt);
    }

    Err(SubtitleError::UnknownFormat(
        "content has no recognizable subtitle signature".to_string(),
    ))
}

/// Section headers that mark ASS/SSA content.
const ASS_SECTIONS: [&str; 4] = ["[script info]", "[v4+ styles]", "[v4 styles]", "[events]"];

/// Strip BOM and normalize line endings.
fn normalize(content: &str) -> String {
    content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Largest hour field a clock value may carry.
///
/// Keeps every parsed time far enough below `Millis::MAX` that shifting and
/// duration arithmetic cannot overflow.
const MAX_CLOCK_HOURS: Millis = 1_000_000;

/// Parse a clock value `[H:]MM:SS[.,]fff` into milliseconds.
///
/// The fraction may have any number of digits and is rounded to the nearest
/// millisecond. `allow_short` permits the `MM:SS.fff` form (WebVTT). Hours
/// above [`MAX_CLOCK_HOURS`] are rejected.
pub(crate) fn parse_clock(s: &str, allow_short: bool) -> Option<Millis> {
    let s = s.trim();
    let parts: Vec<&str> = s.split(':').collect();

    let (hours, minutes, rest) = match parts.as_slice() {
        [h, m, rest] => (parse_digits(h)?, parse_digits(m)?, *rest),
        [m, rest] if allow_short => (0, parse_digits(m)?, *rest),
        _ => return None,
    };

    let (secs, frac) = match rest.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    let seconds = parse_digits(secs)?;
    if hours > MAX_CLOCK_HOURS || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let fraction_ms = if frac.is_empty() {
        0
    } else {
        round_fraction_to_ms(frac)?
    };

    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + fraction_ms)
}

fn parse_digits(s: &str) -> Option<Millis> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Convert fractional-second digits to milliseconds, rounding half up.
fn round_fraction_to_ms(digits: &str) -> Option<Millis> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digits past nanoseconds cannot change the rounded millisecond.
    let digits = &digits[..digits.len().min(9)];
    let value: Millis = digits.parse().ok()?;
    let len = digits.len() as u32;

    if len <= 3 {
        Some(value * 10_i64.pow(3 - len))
    } else {
        let divisor = 10_i64.pow(len - 3);
        Some((value + divisor / 2) / divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format_ass() {
        let content = "[Script Info]\nTitle: Test\n";
        assert_eq!(detect_format(content).unwrap(), SubtitleFormat::Ass);
    }

    #[test]
    fn test_detect_format_srt() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nHello\n";
        assert_eq!(detect_format(content).unwrap(), SubtitleFormat::Srt);
    }

    #[test]
    fn test_detect_format_ignores_section_names_in_cue_text() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\n[Events]\n\n2\n00:00:03,000 --> 00:00:04,000\nsee [Script Info] here\n";
        assert_eq!(detect_format(srt).unwrap(), SubtitleFormat::Srt);
        let parsed = parse_content(srt, None).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].text, "[Events]");

        let vtt = "WEBVTT\n\n00:01.000 --> 00:02.000\n[Events]\n";
        assert_eq!(detect_format(vtt).unwrap(), SubtitleFormat::Vtt);

        // not a header unless it is the whole line
        assert!(detect_format("notes on [Events] handling\n").is_err());
    }

    #[test]
    fn test_detect_format_webvtt() {
        let content = "\u{feff}WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nHello\n";
        assert_eq!(detect_format(content).unwrap(), SubtitleFormat::Vtt);
    }

    #[test]
    fn test_detect_format_unknown_is_error() {
        assert!(matches!(
            detect_format("just some prose\nwith no timing"),
            Err(SubtitleError::UnknownFormat(_))
        ));
        assert!(parse_content("plain text", None).is_err());
    }

    #[test]
    fn test_parse_clock_rounds_fractions() {
        assert_eq!(parse_clock("00:00:01,5", false), Some(1500));
        assert_eq!(parse_clock("00:00:01.25", false), Some(1250));
        assert_eq!(parse_clock("00:00:01,2345", false), Some(1235));
        assert_eq!(parse_clock("00:00:01,2344", false), Some(1234));
        assert_eq!(parse_clock("00:00:00.9996", false), Some(1000));
        assert_eq!(parse_clock("01:02:03", false), Some(3_723_000));
    }

    #[test]
    fn test_parse_clock_short_form() {
        assert_eq!(parse_clock("01:02.500", true), Some(62_500));
        assert_eq!(parse_clock("01:02.500", false), None);
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert_eq!(parse_clock("aa:bb:cc", false), None);
        assert_eq!(parse_clock("00:61:00,000", false), None);
        assert_eq!(parse_clock("-1:00:00,000", false), None);
        assert_eq!(parse_clock("", false), None);
    }

    #[test]
    fn test_parse_clock_rejects_huge_hours() {
        assert_eq!(parse_clock("9999999999999999:00:00,000", false), None);
        assert_eq!(parse_clock("99999999999999999999:00:00,000", false), None);
        assert_eq!(parse_clock("1000001:00:00,000", false), None);
        assert_eq!(
            parse_clock("1000000:00:00,000", false),
            Some(1_000_000 * 3_600_000)
        );
    }

    #[test]
    fn test_hint_overrides_detection() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nHi\n";
        let parsed = parse_content(content, Some(SubtitleFormat::Srt)).unwrap();
        assert_eq!(parsed.format, SubtitleFormat::Srt);
        assert_eq!(parsed.entries[0].index, 1);
    }
}
