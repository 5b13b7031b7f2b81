// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline styling for the indicator.
//!
//! The host page's stylesheets are not ours to edit, so every rule is set
//! inline on the node. Layout depends on the [`MountMode`]; the text color
//! follows the committed [`Tier`].

use web_sys::HtmlElement;
use ytspeed_core::mount::MountMode;
use ytspeed_core::tier::Tier;

/// Base rules shared by every mount mode.
pub const BASE_CSS: &str = "display: inline-flex; align-items: center; justify-content: center; \
     font-size: 12px; line-height: 1; color: #fff; user-select: none; cursor: pointer; \
     font-variant-numeric: tabular-nums; white-space: nowrap; box-sizing: border-box; \
     text-shadow: none;";

/// Returns the per-mode property overrides.
#[must_use]
pub fn mount_properties(mode: MountMode) -> &'static [(&'static str, &'static str)] {
    if mode.is_inline() {
        &[
            ("height", "100%"),
            ("margin-right", "8px"),
            ("padding", "0 4px"),
        ]
    } else {
        &[
            ("position", "absolute"),
            ("right", "12px"),
            ("bottom", "54px"),
            ("z-index", "999999"),
            ("padding", "0"),
            ("text-shadow", "0 1px 2px rgba(0,0,0,0.6)"),
        ]
    }
}

/// Returns the text color for a tier.
#[must_use]
pub const fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Warning => "#ff6b6b",
        Tier::Fair => "#ffd166",
        Tier::Good => "#ffffff",
        Tier::Excellent => "#7bed9f",
        Tier::Cyber => "#4dd0ff",
    }
}

/// Applies the base rules and the overrides for `mode`.
pub fn apply_mount_style(el: &HtmlElement, mode: MountMode) {
    let _ = el.set_attribute("style", BASE_CSS);
    let s = el.style();
    for (name, value) in mount_properties(mode) {
        let _ = s.set_property(name, value);
    }
}

/// Colors the indicator for `tier`.
pub fn apply_tier_style(el: &HtmlElement, tier: Tier) {
    let _ = el.style().set_property("color", tier_color(tier));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_modes_share_layout() {
        assert_eq!(
            mount_properties(MountMode::Primary),
            mount_properties(MountMode::Fallback)
        );
        assert!(
            mount_properties(MountMode::Overlay)
                .iter()
                .any(|&(k, v)| k == "position" && v == "absolute")
        );
    }

    #[test]
    fn every_tier_has_a_distinct_color() {
        let tiers = [
            Tier::Warning,
            Tier::Fair,
            Tier::Good,
            Tier::Excellent,
            Tier::Cyber,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(tier_color(*a), tier_color(*b));
            }
        }
    }
}
