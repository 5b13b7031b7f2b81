// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping-tolerant decimal token parser.
//!
//! Diagnostics strings carry numbers such as `12,345.6` or `4096`. Commas
//! are always treated as grouping separators and dropped; the dot is the only
//! decimal marker.

use alloc::string::String;

/// Parses the first decimal number found in `text`.
///
/// The token is the first run of ASCII digits (commas allowed after the first
/// digit), optionally followed by `.` and at least one digit. Returns `None`
/// when no digit is present or the result is not finite.
///
/// ```
/// use ytspeed_core::number::parse_number;
///
/// assert_eq!(parse_number("12,345.6"), Some(12345.6));
/// assert_eq!(parse_number("speed: 4096 Kbps"), Some(4096.0));
/// assert_eq!(parse_number("n/a"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start + 1;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b',') {
        end += 1;
    }

    let mut cleaned = String::with_capacity(end - start + 8);
    cleaned.extend(text[start..end].chars().filter(|&c| c != ','));

    // Fraction only counts when at least one digit follows the dot.
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        cleaned.push_str(&text[end..frac_end]);
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
