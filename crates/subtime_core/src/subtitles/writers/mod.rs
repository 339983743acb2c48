//! Subtitle writers for various formats.
//!
//! Each writer is a pure function that takes entries and returns a formatted string.

mod ass;
mod srt;
mod vtt;

pub use ass::{format_ass_time, write_ass};
pub use srt::{format_srt_time, write_srt};
pub use vtt::{format_vtt_time, write_vtt};

use crate::subtitles::types::{RoundingMode, SubtitleEntry, SubtitleFormat};

/// Write entries to string in the specified format.
///
/// The header is only used by formats that carry one (ASS, WebVTT).
pub fn write_content(entries: &[SubtitleEntry], format: SubtitleFormat, header: Option<&str>) -> String {
    match format {
        SubtitleFormat::Srt => write_srt(entries),
        SubtitleFormat::Vtt => write_vtt(entries, header),
        SubtitleFormat::Ass => write_ass(entries, header, RoundingMode::Round),
    }
}
