//! Timing repair transforms.
//!
//! The overlap fix sorts by start and merges entries sharing one. The others
//! only ever move an entry's end time, so sorted input stays sorted.

use crate::subtitles::{reindex, Millis, SubtitleEntry};

/// Sort by start, merge entries sharing a start, then clamp each end to the next start.
///
/// Merged entries keep the first entry's id, the latest end and both texts
/// (once when they match). Output starts are strictly increasing, so no entry
/// is left empty.
pub fn fix_overlapping_timestamps(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| (e.start_ms, e.end_ms));

    let mut out: Vec<SubtitleEntry> = Vec::with_capacity(sorted.len());
    for entry in sorted {
        match out.last_mut() {
            Some(last) if last.start_ms == entry.start_ms => {
                last.end_ms = last.end_ms.max(entry.end_ms);
                if last.text.trim() != entry.text.trim() {
                    last.text.push('\n');
                    last.text.push_str(&entry.text);
                }
            }
            Some(last) => {
                if last.end_ms > entry.start_ms {
                    last.end_ms = entry.start_ms;
                }
                out.push(entry);
            }
            None => out.push(entry),
        }
    }
    reindex(&mut out);
    out
}

/// Extend entries shorter than `min_duration_ms`, never past the next start.
pub fn fix_short_duration(entries: &[SubtitleEntry], min_duration_ms: Millis) -> Vec<SubtitleEntry> {
    let mut out = entries.to_vec();
    for i in 0..out.len() {
        if out[i].duration_ms() >= min_duration_ms {
            continue;
        }
        let mut new_end = out[i].start_ms + min_duration_ms;
        if let Some(next) = out.get(i + 1) {
            new_end = new_end.min(next.start_ms);
        }
        if new_end > out[i].end_ms {
            out[i].end_ms = new_end;
        }
    }
    reindex(&mut out);
    out
}

/// Truncate entries longer than `max_duration_ms`.
pub fn fix_long_duration(entries: &[SubtitleEntry], max_duration_ms: Millis) -> Vec<SubtitleEntry> {
    let mut out = entries.to_vec();
    for entry in &mut out {
        if entry.duration_ms() > max_duration_ms {
            entry.end_ms = entry.start_ms + max_duration_ms;
        }
    }
    reindex(&mut out);
    out
}

/// Widen gaps below `min_gap_ms` by pulling the earlier entry's end back.
///
/// The earlier entry never shrinks below `min_duration_ms`; when that bound
/// wins, the gap stays short.
pub fn fix_gaps(
    entries: &[SubtitleEntry],
    min_gap_ms: Millis,
    min_duration_ms: Millis,
) -> Vec<SubtitleEntry> {
    let mut out = entries.to_vec();
    for i in 1..out.len() {
        let next_start = out[i].start_ms;
        let current = &mut out[i - 1];
        let gap = next_start - current.end_ms;
        if gap > 0 && gap < min_gap_ms {
            let new_end = (next_start - min_gap_ms).max(current.start_ms + min_duration_ms);
            if new_end < current.end_ms {
                current.end_ms = new_end;
            }
        }
    }
    reindex(&mut out);
    out
}
