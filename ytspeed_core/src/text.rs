// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-form diagnostics text parsing.
//!
//! The player's debug dumps are multi-line `label: value` text whose exact
//! layout changes between releases and locales. [`parse_kbps_from_text`]
//! looks for the bandwidth label and recovers the number next to it.
//!
//! Numbers are captured loosely (`\d[\d,.]*`) and then handed to
//! [`parse_number`], so `1,234.5` and `1.234` both survive the capture.

use crate::number::parse_number;

/// The English bandwidth label (matched ASCII case-insensitively, with any
/// whitespace run between the two words).
pub const LABEL_EN: &str = "Connection Speed";

/// The simplified-Chinese bandwidth label.
pub const LABEL_ZH: &str = "连接速度";

/// Rate-unit marker that must follow the number in the unit-qualified forms.
const UNIT: &[u8] = b"kbps";

/// Extracts a kbps figure from an unstructured diagnostics dump.
///
/// For each line carrying a bandwidth label, a number directly followed by
/// `Kbps` wins; otherwise the first number on that line is used. If no
/// labelled line yields a number, the whole text is scanned once for
/// `label [:：] number Kbps` (the separator and whitespace are optional, and
/// the match may span lines).
#[must_use]
pub fn parse_kbps_from_text(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if find_label(line, 0).is_none() {
            continue;
        }
        if let Some(n) = number_before_unit(line) {
            return Some(n);
        }
        if let Some(n) = first_number(line) {
            return Some(n);
        }
    }

    labelled_number_with_unit(text)
}

/// Returns `true` if `text` contains either label spelled exactly.
///
/// Used to decide whether a stray string field is worth a full text parse.
#[must_use]
pub(crate) fn has_exact_label(text: &str) -> bool {
    text.contains(LABEL_EN) || text.contains(LABEL_ZH)
}

/// Finds the first label at or after byte offset `from`.
///
/// Returns the byte offset just past the label.
fn find_label(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if text.is_char_boundary(i)
            && let Some(end) = match_label_at(text, i)
        {
            return Some(end);
        }
        i += 1;
    }
    None
}

/// Matches a label starting exactly at byte offset `at`.
fn match_label_at(text: &str, at: usize) -> Option<usize> {
    let rest = &text.as_bytes()[at..];
    if rest.starts_with(LABEL_ZH.as_bytes()) {
        return Some(at + LABEL_ZH.len());
    }

    const FIRST: &[u8] = b"connection";
    const SECOND: &[u8] = b"speed";
    if rest.len() < FIRST.len() || !rest[..FIRST.len()].eq_ignore_ascii_case(FIRST) {
        return None;
    }
    let gap_start = at + FIRST.len();
    let after_gap = skip_whitespace(text, gap_start);
    if after_gap == gap_start {
        return None;
    }
    let tail = &text.as_bytes()[after_gap..];
    if tail.len() >= SECOND.len() && tail[..SECOND.len()].eq_ignore_ascii_case(SECOND) {
        Some(after_gap + SECOND.len())
    } else {
        None
    }
}

/// Skips Unicode whitespace starting at `at`, returning the new offset.
fn skip_whitespace(text: &str, at: usize) -> usize {
    let rest = &text[at..];
    let trimmed = rest.trim_start_matches(char::is_whitespace);
    at + (rest.len() - trimmed.len())
}

/// Returns the end of the `[\d,.]*` run that starts at `at`.
fn numeric_run_end(bytes: &[u8], at: usize) -> usize {
    let run = bytes[at..]
        .iter()
        .take_while(|&&b| b.is_ascii_digit() || b == b',' || b == b'.')
        .count();
    at + run
}

/// Returns `true` if `Kbps` (any case) starts at `at` once whitespace is
/// skipped.
fn unit_follows(text: &str, at: usize) -> bool {
    let after = skip_whitespace(text, at);
    let rest = &text.as_bytes()[after..];
    rest.len() >= UNIT.len() && rest[..UNIT.len()].eq_ignore_ascii_case(UNIT)
}

/// First number in `line` that is followed by the unit marker.
fn number_before_unit(line: &str) -> Option<f64> {
    let bytes = line.as_bytes();
    for start in 0..bytes.len() {
        if !bytes[start].is_ascii_digit() {
            continue;
        }
        let end = numeric_run_end(bytes, start);
        if unit_follows(line, end) {
            return parse_number(&line[start..end]);
        }
    }
    None
}

/// First numeric token in `line`, regardless of unit.
fn first_number(line: &str) -> Option<f64> {
    let bytes = line.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let end = numeric_run_end(bytes, start);
    parse_number(&line[start..end])
}

/// Whole-text scan for `label \s* [:：]? \s* number \s* Kbps`.
fn labelled_number_with_unit(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(label_end) = find_label(text, from) {
        let mut at = skip_whitespace(text, label_end);
        if let Some(rest) = text[at..].strip_prefix([':', '：']) {
            at = text.len() - rest.len();
        }
        at = skip_whitespace(text, at);

        if at < bytes.len() && bytes[at].is_ascii_digit() {
            let end = numeric_run_end(bytes, at);
            if unit_follows(text, end) {
                return parse_number(&text[at..end]);
            }
        }
        from = label_end;
    }
    None
}
