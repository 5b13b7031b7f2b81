// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed diagnostics values and the bandwidth field scanner.
//!
//! The player's structured diagnostics object has no stable schema: fields
//! are added, renamed, and dropped between releases. Backends flatten it into
//! a [`StatsMap`] (insertion-ordered, one level deep) and [`scan_fields`]
//! looks for anything that plausibly carries a kbps figure.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use crate::number::parse_number;
use crate::text::{has_exact_label, parse_kbps_from_text};

/// Field names checked first, in priority order.
pub const DIRECT_FIELDS: [&str; 7] = [
    "bandwidth_kbps",
    "bandwidthKbps",
    "connection_speed_kbps",
    "connectionSpeedKbps",
    "connection_speed",
    "connectionSpeed",
    "bandwidth",
];

/// A single value read from the host's diagnostics object.
#[derive(Clone, Debug, PartialEq)]
pub enum StatsValue {
    /// `null` or `undefined`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number (possibly NaN or infinite).
    Number(f64),
    /// A string.
    Text(String),
    /// Anything else (objects, arrays, functions). Never carries a number.
    Nested,
}

impl StatsValue {
    /// Interprets the value as a decimal number, the way its text form would
    /// read.
    ///
    /// Numbers are formatted and re-parsed so that they follow the same
    /// token rules as strings (a leading sign is dropped, non-finite values
    /// yield `None`).
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => parse_number(&n.to_string()),
            Self::Text(s) => parse_number(s),
            Self::Number(_) | Self::Null | Self::Bool(_) | Self::Nested => None,
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for StatsValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for StatsValue {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for StatsValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for StatsValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// An insertion-ordered set of diagnostics fields.
///
/// Duplicate keys are allowed (the first one wins on lookup), matching the
/// "earliest defined field wins" scan order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsMap {
    entries: Vec<(String, StatsValue)>,
}

impl StatsMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StatsValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StatsValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatsValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<StatsValue>> FromIterator<(K, V)> for StatsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Scans a diagnostics object for a kbps figure.
///
/// First the [`DIRECT_FIELDS`] are tried in order. Then every field is
/// visited in insertion order, matching keys that mention bandwidth in
/// kilobits or a connection speed, and string values that embed a bandwidth
/// label (parsed with [`parse_kbps_from_text`]). Fields of any other shape
/// are skipped.
#[must_use]
pub fn scan_fields(stats: &StatsMap) -> Option<f64> {
    let direct = DIRECT_FIELDS
        .iter()
        .filter_map(|name| stats.get(name))
        .find_map(StatsValue::as_number);
    if direct.is_some() {
        return direct;
    }

    for (key, value) in stats.iter() {
        let key = key.to_ascii_lowercase();

        let bandwidth_key = key.contains("bandwidth") && key.contains("kb");
        let speed_key = key.contains("conn") && key.contains("speed");
        if (bandwidth_key || speed_key)
            && let Some(n) = value.as_number()
        {
            return Some(n);
        }

        if let Some(text) = value.as_text()
            && has_exact_label(text)
            && let Some(n) = parse_kbps_from_text(text)
        {
            return Some(n);
        }
    }

    None
}
