//! Text repair transforms.
//!
//! Every transform returns a new sequence and leaves untouched entries
//! byte-identical, which keeps them idempotent.

use std::collections::HashSet;

use crate::subtitles::{reindex, SubtitleEntry};

/// Inline tags that survive [`fix_formatting_tags`] when properly nested.
const SUPPORTED_TAGS: [&str; 3] = ["i", "b", "u"];

/// Drop entries whose text is empty or whitespace only.
pub fn fix_empty_entries(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut out: Vec<SubtitleEntry> = entries
        .iter()
        .filter(|e| !e.text.trim().is_empty())
        .cloned()
        .collect();
    reindex(&mut out);
    out
}

/// Drop entries repeating an earlier entry's text, keeping the earliest.
///
/// Texts are compared after trimming; empty texts are left to [`fix_empty_entries`].
pub fn fix_duplicates(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out: Vec<SubtitleEntry> = entries
        .iter()
        .filter(|e| {
            let text = e.text.trim();
            text.is_empty() || seen.insert(text)
        })
        .cloned()
        .collect();
    reindex(&mut out);
    out
}

/// Strip `[...]` and `(...)` sound descriptions, dropping entries left empty.
pub fn fix_hearing_impaired(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let (stripped, removed) = strip_bracketed(&entry.text);
        if !removed {
            out.push(entry.clone());
            continue;
        }

        let text = tidy_lines(&stripped, |line| line == "-");
        if !text.is_empty() {
            out.push(SubtitleEntry {
                text,
                ..entry.clone()
            });
        }
    }
    reindex(&mut out);
    out
}

/// Rewrap lines longer than `max_chars_per_line` at word boundaries.
///
/// Lines already within the limit keep their explicit breaks.
pub fn fix_line_breaking(entries: &[SubtitleEntry], max_chars_per_line: usize) -> Vec<SubtitleEntry> {
    let mut out: Vec<SubtitleEntry> = entries
        .iter()
        .map(|entry| match wrap_text(&entry.text, max_chars_per_line) {
            Some(text) => SubtitleEntry {
                text,
                ..entry.clone()
            },
            None => entry.clone(),
        })
        .collect();
    reindex(&mut out);
    out
}

/// Strip unsupported or unbalanced styling markup.
///
/// Properly nested `<i>`, `<b>` and `<u>` pairs are kept; every other HTML-like
/// tag and every ASS override block (`{\...}`) is removed.
pub fn fix_formatting_tags(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut out: Vec<SubtitleEntry> = entries
        .iter()
        .map(|entry| match strip_formatting_fully(&entry.text) {
            Some(stripped) => SubtitleEntry {
                text: tidy_lines(&stripped, |_| false),
                ..entry.clone()
            },
            None => entry.clone(),
        })
        .collect();
    reindex(&mut out);
    out
}

/// Whether the text contains a bracketed sound description.
pub(crate) fn has_hearing_impaired(text: &str) -> bool {
    strip_bracketed(text).1
}

/// Whether [`fix_formatting_tags`] would change the text.
pub(crate) fn has_formatting_tags(text: &str) -> bool {
    strip_formatting(text).is_some()
}

/// Strip until no removable tag is left.
///
/// Removing a tag can join its neighbours into a new one (`<<b>b>` becomes
/// `<b>`). Every round removes at least one tag, so the loop ends.
fn strip_formatting_fully(text: &str) -> Option<String> {
    let mut current = strip_formatting(text)?;
    while let Some(next) = strip_formatting(&current) {
        current = next;
    }
    Some(current)
}

/// Remove balanced `[...]` / `(...)` spans. Returns the text and whether anything was removed.
///
/// An opener with no matching closer after it is kept as text.
fn strip_bracketed(text: &str) -> (String, bool) {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut removed = false;
    let mut i = 0;

    while i < chars.len() {
        let closer = match chars[i] {
            '[' => Some(']'),
            '(' => Some(')'),
            _ => None,
        };
        if let Some(closer) = closer {
            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == closer) {
                i += offset + 2;
                removed = true;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    (out, removed)
}

/// Collapse whitespace in each line and drop empty lines (and lines matching `drop`).
fn tidy_lines(text: &str, drop: impl Fn(&str) -> bool) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty() && !drop(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedy word wrap of over-long lines. `None` when every line fits.
fn wrap_text(text: &str, max: usize) -> Option<String> {
    if text.lines().all(|line| line.chars().count() <= max) {
        return None;
    }

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= max {
            lines.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    Some(lines.join("\n"))
}

/// A markup span found in text.
struct Tag {
    start: usize,
    end: usize,
    kind: TagKind,
}

enum TagKind {
    Open(String),
    Close(String),
    Other,
}

/// Find HTML-like tags and ASS override blocks (byte ranges).
fn scan_tags(text: &str) -> Vec<Tag> {
    let bytes = text.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => {
                let body_start = i + 1;
                let closing = bytes.get(body_start) == Some(&b'/');
                let name_start = if closing { body_start + 1 } else { body_start };
                let starts_with_letter = bytes
                    .get(name_start)
                    .is_some_and(|b| b.is_ascii_alphabetic());
                let end = text[body_start..]
                    .find(|c: char| c == '>' || c == '<' || c == '\n')
                    .map(|off| body_start + off)
                    .filter(|&pos| bytes[pos] == b'>');

                if let (true, Some(end)) = (starts_with_letter, end) {
                    let name: String = text[name_start..end]
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric())
                        .collect::<String>()
                        .to_lowercase();
                    let self_closing = text[..end].ends_with('/');
                    let kind = if self_closing {
                        TagKind::Other
                    } else if closing {
                        TagKind::Close(name)
                    } else {
                        TagKind::Open(name)
                    };
                    tags.push(Tag {
                        start: i,
                        end: end + 1,
                        kind,
                    });
                    i = end + 1;
                    continue;
                }
            }
            b'{' if bytes.get(i + 1) == Some(&b'\\') => {
                if let Some(off) = text[i..].find('}') {
                    tags.push(Tag {
                        start: i,
                        end: i + off + 1,
                        kind: TagKind::Other,
                    });
                    i += off + 1;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    tags
}

/// Remove unsupported and unbalanced tags. `None` when nothing would be removed.
fn strip_formatting(text: &str) -> Option<String> {
    let tags = scan_tags(text);
    let mut keep = vec![false; tags.len()];
    let mut stack: Vec<(usize, &str)> = Vec::new();

    for (idx, tag) in tags.iter().enumerate() {
        match &tag.kind {
            TagKind::Open(name) if SUPPORTED_TAGS.contains(&name.as_str()) => {
                stack.push((idx, name.as_str()));
            }
            TagKind::Close(name) => {
                if let Some(&(open_idx, open_name)) = stack.last() {
                    if open_name == name {
                        stack.pop();
                        keep[open_idx] = true;
                        keep[idx] = true;
                    }
                }
            }
            _ => {}
        }
    }

    if keep.iter().all(|&k| k) {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (tag, kept) in tags.iter().zip(keep) {
        if !kept {
            out.push_str(&text[cursor..tag.start]);
            cursor = tag.end;
        }
    }
    out.push_str(&text[cursor..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(entries: &[SubtitleEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.text.as_str()).collect()
    }

    fn entries(texts: &[&str]) -> Vec<SubtitleEntry> {
        let mut out: Vec<SubtitleEntry> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| SubtitleEntry::new(i as i64 * 2000, i as i64 * 2000 + 1500, *t))
            .collect();
        reindex(&mut out);
        out
    }

    #[test]
    fn test_fix_empty_entries() {
        let fixed = fix_empty_entries(&entries(&["a", "", " \n ", "b"]));
        assert_eq!(texts(&fixed), vec!["a", "b"]);
        assert_eq!(fixed[1].index, 2);
    }

    #[test]
    fn test_fix_duplicates_keeps_earliest() {
        let input = entries(&["Hello", "World", "Hello ", "World"]);
        let fixed = fix_duplicates(&input);
        assert_eq!(texts(&fixed), vec!["Hello", "World"]);
        assert_eq!(fixed[0].id, input[0].id);
        assert_eq!(fixed[1].id, input[1].id);
    }

    #[test]
    fn test_fix_hearing_impaired() {
        let input = entries(&[
            "[music]",
            "(sighs) I know.",
            "- [laughs]\n- Really?",
            "Keep [this",
            "Plain text",
        ]);
        let fixed = fix_hearing_impaired(&input);
        assert_eq!(
            texts(&fixed),
            vec!["I know.", "- Really?", "Keep [this", "Plain text"]
        );
        assert_eq!(fixed[0].id, input[1].id);
    }

    #[test]
    fn test_fix_line_breaking() {
        let input = entries(&[
            "short\nlines stay",
            "this line is far too long to fit the limit",
            "fits\nbut this second line does not fit at all",
            "supercalifragilistic word",
        ]);
        let fixed = fix_line_breaking(&input, 16);
        assert_eq!(fixed[0].text, "short\nlines stay");
        assert_eq!(fixed[1].text, "this line is far\ntoo long to fit\nthe limit");
        assert_eq!(fixed[2].text, "fits\nbut this second\nline does not\nfit at all");
        assert_eq!(fixed[3].text, "supercalifragilistic\nword");
    }

    #[test]
    fn test_fix_formatting_tags() {
        let input = entries(&[
            "<i>kept</i>",
            "<font color=\"red\">red</font>",
            "{\\an8}top",
            "<i>unclosed",
            "<b><i>crossed</b></i>",
            "1 < 2 > 0",
            "<br/>",
        ]);
        let fixed = fix_formatting_tags(&input);
        assert_eq!(
            texts(&fixed),
            vec!["<i>kept</i>", "red", "top", "unclosed", "<i>crossed</i>", "1 < 2 > 0", ""]
        );
    }

    #[test]
    fn test_detect_helpers() {
        assert!(has_hearing_impaired("[music]"));
        assert!(!has_hearing_impaired("no brackets"));
        assert!(has_formatting_tags("<font>x</font>"));
        assert!(!has_formatting_tags("<i>x</i>"));
    }

    #[test]
    fn test_text_fixers_are_idempotent() {
        let input = entries(&[
            "",
            "dup",
            "dup",
            "[a(b]c) (x [y) z]",
            "((nested)) text",
            "<i><b>x</i></b> {\\b1}y <u>z",
            "a very long line with many words in it that keeps going",
            "unbreakablewordthatistoolong and more",
        ]);

        let once = fix_empty_entries(&input);
        assert_eq!(fix_empty_entries(&once), once);
        let once = fix_duplicates(&input);
        assert_eq!(fix_duplicates(&once), once);
        let once = fix_hearing_impaired(&input);
        assert_eq!(fix_hearing_impaired(&once), once);
        let once = fix_line_breaking(&input, 12);
        assert_eq!(fix_line_breaking(&once, 12), once);
        let once = fix_formatting_tags(&input);
        assert_eq!(fix_formatting_tags(&once), once);
    }

    #[test]
    fn test_formatting_tags_rejoined_by_stripping() {
        let input = entries(&["<<b>b>", "<<i>i>x", "<<<u>u>u>y", "<i<b>>z"]);
        let once = fix_formatting_tags(&input);
        assert_eq!(texts(&once), vec!["", "x", "y", "z"]);
        assert_eq!(fix_formatting_tags(&once), once);
        assert!(once.iter().all(|e| !has_formatting_tags(&e.text)));
    }
}
