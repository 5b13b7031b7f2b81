// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.
//!
//! Everything host-specific (selectors, ids, timings, thresholds) lives in a
//! [`SessionConfig`]. The [`youtube`](SessionConfig::youtube) preset carries
//! the values the indicator ships with; tests build variants with struct
//! update syntax.

use crate::acquire::PANEL_SELECTORS;
use crate::tier::TierBounds;
use crate::time::Duration;

/// Selector sets used to find the indicator's mount point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountSelectors {
    /// The preferred container (the player's right-side controls).
    pub primary: &'static str,
    /// Fallback control containers, tried in order.
    pub fallbacks: &'static [&'static str],
    /// Element id of the player root, looked up first.
    pub player_root_id: &'static str,
    /// Selectors for the player root, tried in order after the id lookup.
    pub player_roots: &'static [&'static str],
}

/// Tunable parameters for a [`Session`](crate::session::Session).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Element id of the indicator node.
    pub indicator_id: &'static str,
    /// Accessible label set on the indicator.
    pub aria_label: &'static str,
    /// Mount-point selectors.
    pub mount: MountSelectors,
    /// Diagnostics panel selectors for the last acquisition strategy.
    pub panel_selectors: &'static [&'static str],
    /// How long the last good reading stays on screen after samples stop.
    pub holdover: Duration,
    /// How long a new tier candidate must persist before it is committed.
    pub tier_debounce: Duration,
    /// Lower bounds of each tier, in MB/s.
    pub tier_bounds: TierBounds,
    /// Interval between route checks.
    pub route_poll: Duration,
    /// Interval between samples.
    pub sample_interval: Duration,
    /// Preference key for the display unit.
    pub unit_key: &'static str,
    /// Query parameter that enables the debug channel when set to `1`.
    pub debug_flag: &'static str,
}

impl SessionConfig {
    /// Configuration for the YouTube watch and shorts pages.
    #[must_use]
    pub const fn youtube() -> Self {
        Self {
            indicator_id: "yt-speed-mbs-widget",
            aria_label: "Connection speed (MB/s)",
            mount: MountSelectors {
                primary: ".ytp-right-controls",
                fallbacks: &[".ytp-chrome-controls", ".ytp-chrome-bottom"],
                player_root_id: "movie_player",
                player_roots: &["ytd-player #movie_player", "#movie_player"],
            },
            panel_selectors: &PANEL_SELECTORS,
            holdover: Duration::from_secs(10),
            tier_debounce: Duration::from_secs(2),
            tier_bounds: TierBounds::DEFAULT,
            route_poll: Duration::from_millis(400),
            sample_interval: Duration::from_millis(1000),
            unit_key: "yt_speed_unit",
            debug_flag: "yt_speed_debug",
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::youtube()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_preset_timings() {
        let config = SessionConfig::youtube();
        assert_eq!(config.holdover.millis(), 10_000);
        assert_eq!(config.tier_debounce.millis(), 2_000);
        assert_eq!(config.route_poll.millis(), 400);
        assert_eq!(config.sample_interval.millis(), 1_000);
    }

    #[test]
    fn default_is_youtube() {
        assert_eq!(SessionConfig::default(), SessionConfig::youtube());
    }
}
