// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit conversion and the holdover window.
//!
//! [`derive_display`] turns one acquisition result into the text shown on
//! the indicator. A valid reading is formatted and remembered; a gap shorter
//! than the holdover window keeps the remembered text; anything longer
//! shows `N/A`.

use alloc::format;
use alloc::string::String;

use crate::backend::PreferenceStore;
use crate::tier::TierState;
use crate::time::{Duration, HostTime};

/// The unit the indicator text is rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayUnit {
    /// Megabytes per second (`kbps / 8 / 1024`).
    #[default]
    MegabytesPerSecond,
    /// Megabits per second (`kbps / 1000`).
    MegabitsPerSecond,
}

impl DisplayUnit {
    /// Returns the unit suffix shown after the number.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::MegabytesPerSecond => "MB/s",
            Self::MegabitsPerSecond => "Mbps",
        }
    }

    /// Converts a kbps figure into this unit.
    #[must_use]
    pub fn convert(self, kbps: f64) -> f64 {
        match self {
            Self::MegabytesPerSecond => kbps / 8.0 / 1024.0,
            Self::MegabitsPerSecond => kbps / 1000.0,
        }
    }

    /// Returns the value stored in the preference store.
    #[must_use]
    pub const fn preference_value(self) -> &'static str {
        match self {
            Self::MegabytesPerSecond => "mbs",
            Self::MegabitsPerSecond => "mbps",
        }
    }

    /// Parses a stored preference value.
    #[must_use]
    pub fn from_preference(value: &str) -> Option<Self> {
        match value {
            "mbs" => Some(Self::MegabytesPerSecond),
            "mbps" => Some(Self::MegabitsPerSecond),
            _ => None,
        }
    }

    /// Reads the unit stored under `key`, falling back to the default for
    /// missing or unknown values.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S, key: &str) -> Self {
        store
            .get(key)
            .and_then(|value| Self::from_preference(&value))
            .unwrap_or_default()
    }

    /// Stores this unit under `key`.
    pub fn store<S: PreferenceStore + ?Sized>(self, store: &mut S, key: &str) {
        store.set(key, self.preference_value());
    }

    /// Returns the other unit.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::MegabytesPerSecond => Self::MegabitsPerSecond,
            Self::MegabitsPerSecond => Self::MegabytesPerSecond,
        }
    }

    /// Text shown before the first reading (`0.00 MB/s`).
    #[must_use]
    pub fn initial_text(self) -> String {
        format!("0.00 {}", self.suffix())
    }

    /// Text shown when no reading is available (`N/A MB/s`).
    #[must_use]
    pub fn unavailable_text(self) -> String {
        format!("N/A {}", self.suffix())
    }

    /// Formats a kbps figure with two decimals and the suffix.
    #[must_use]
    pub fn format_kbps(self, kbps: f64) -> String {
        format!("{:.2} {}", self.convert(kbps), self.suffix())
    }
}

/// Everything remembered between sample ticks.
///
/// Reset in full on every route change.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    /// The most recent text derived from a valid reading.
    pub last_good_text: String,
    /// When that reading was taken. `None` until the first valid reading.
    pub last_good_at: Option<HostTime>,
    /// Debounced tier state.
    pub tier: TierState,
}

impl DisplayState {
    /// Fresh state for the given unit.
    #[must_use]
    pub fn new(unit: DisplayUnit) -> Self {
        Self {
            last_good_text: unit.initial_text(),
            last_good_at: None,
            tier: TierState::default(),
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(DisplayUnit::default())
    }
}

/// Where the displayed text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplaySource {
    /// A valid reading from this tick.
    Live,
    /// The last valid reading, still inside the holdover window.
    Holdover,
    /// No recent valid reading.
    Unavailable,
}

impl DisplaySource {
    /// Returns the value used for the `data-state` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Holdover => "holdover",
            Self::Unavailable => "unavailable",
        }
    }
}

/// What to show for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    /// Indicator text.
    pub text: String,
    /// Where the text came from.
    pub source: DisplaySource,
    /// The reading in MB/s, only for [`DisplaySource::Live`].
    pub mb_per_s: Option<f64>,
}

/// Parameters for [`derive_display`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayParams {
    /// Unit for the text.
    pub unit: DisplayUnit,
    /// How long the last good text survives a gap.
    pub holdover: Duration,
}

/// Derives the readout for this tick and the next display state.
///
/// Only positive, finite `kbps` values count as valid. The returned MB/s
/// figure is independent of the display unit.
#[must_use]
pub fn derive_display(
    kbps: Option<f64>,
    prev: &DisplayState,
    now: HostTime,
    params: &DisplayParams,
) -> (Readout, DisplayState) {
    if let Some(kbps) = kbps.filter(|k| k.is_finite() && *k > 0.0) {
        let text = params.unit.format_kbps(kbps);
        let next = DisplayState {
            last_good_text: text.clone(),
            last_good_at: Some(now),
            tier: prev.tier,
        };
        let readout = Readout {
            text,
            source: DisplaySource::Live,
            mb_per_s: Some(DisplayUnit::MegabytesPerSecond.convert(kbps)),
        };
        return (readout, next);
    }

    let in_holdover = prev
        .last_good_at
        .is_some_and(|at| now.saturating_duration_since(at) < params.holdover);
    let readout = if in_holdover {
        Readout {
            text: prev.last_good_text.clone(),
            source: DisplaySource::Holdover,
            mb_per_s: None,
        }
    } else {
        Readout {
            text: params.unit.unavailable_text(),
            source: DisplaySource::Unavailable,
            mb_per_s: None,
        }
    };
    (readout, prev.clone())
}
