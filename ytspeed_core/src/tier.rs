// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced five-tier classification.
//!
//! Every live reading maps to an instantaneous [`Tier`]. The presented tier
//! only follows it once the same candidate has been observed continuously
//! for the debounce window, so a reading that hovers around a boundary does
//! not make the indicator flicker.

use crate::time::{Duration, HostTime};

/// A presentation class for throughput, ordered `Warning < ... < Cyber`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Catch-all for slow or unclassified readings.
    #[default]
    Warning,
    /// Above the fair bound.
    Fair,
    /// Above the good bound.
    Good,
    /// Above the excellent bound.
    Excellent,
    /// Above the cyber bound.
    Cyber,
}

impl Tier {
    /// Returns the stable lowercase name used for the `data-tier` attribute.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
            Self::Cyber => "cyber",
        }
    }
}

/// Lower bounds (exclusive, in MB/s) for each tier above [`Tier::Warning`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierBounds {
    /// Lower bound of [`Tier::Cyber`].
    pub cyber: f64,
    /// Lower bound of [`Tier::Excellent`].
    pub excellent: f64,
    /// Lower bound of [`Tier::Good`].
    pub good: f64,
    /// Lower bound of [`Tier::Fair`].
    pub fair: f64,
}

impl TierBounds {
    /// 100, 50, 20 and 8 Mbit/s, expressed in MB/s.
    pub const DEFAULT: Self = Self {
        cyber: 12.5,
        excellent: 6.25,
        good: 2.5,
        fair: 1.0,
    };

    /// Returns the highest tier whose bound `value` strictly exceeds.
    ///
    /// NaN and anything at or below the fair bound are [`Tier::Warning`].
    #[must_use]
    pub fn instant(&self, value: f64) -> Tier {
        [
            (Tier::Cyber, self.cyber),
            (Tier::Excellent, self.excellent),
            (Tier::Good, self.good),
            (Tier::Fair, self.fair),
        ]
        .into_iter()
        .find_map(|(tier, bound)| (value > bound).then_some(tier))
        .unwrap_or(Tier::Warning)
    }
}

impl Default for TierBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A tier candidate waiting out the debounce window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTier {
    /// The candidate.
    pub tier: Tier,
    /// When the candidate was first observed.
    pub since: HostTime,
}

/// Committed tier plus the candidate under observation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierState {
    /// The tier currently presented.
    pub current: Tier,
    /// The candidate waiting to replace it, if any.
    pub pending: Option<PendingTier>,
}

/// A committed tier transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierChange {
    /// The tier before the change.
    pub from: Tier,
    /// The tier after the change.
    pub to: Tier,
    /// When the change was committed.
    pub at: HostTime,
}

/// Classification parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierParams {
    /// Tier bounds.
    pub bounds: TierBounds,
    /// Minimum time a candidate must persist.
    pub debounce: Duration,
}

/// Classifies a live reading and advances the debounce state.
///
/// - If the instantaneous tier equals the committed one, any pending
///   candidate is dropped.
/// - A new candidate (different from the pending one) restarts the window.
/// - The same candidate held for at least `debounce` is committed.
#[must_use]
pub fn classify(
    value_mb_s: f64,
    prev: &TierState,
    now: HostTime,
    params: &TierParams,
) -> (TierState, Option<TierChange>) {
    let instant = params.bounds.instant(value_mb_s);

    if instant == prev.current {
        let state = TierState {
            current: prev.current,
            pending: None,
        };
        return (state, None);
    }

    match prev.pending {
        Some(pending)
            if pending.tier == instant
                && now.saturating_duration_since(pending.since) >= params.debounce =>
        {
            let change = TierChange {
                from: prev.current,
                to: instant,
                at: now,
            };
            let state = TierState {
                current: instant,
                pending: None,
            };
            (state, Some(change))
        }
        Some(pending) if pending.tier == instant => (*prev, None),
        _ => {
            let state = TierState {
                current: prev.current,
                pending: Some(PendingTier {
                    tier: instant,
                    since: now,
                }),
            };
            (state, None)
        }
    }
}
