// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bandwidth acquisition from the host player.
//!
//! The [`Acquirer`] tries a fixed sequence of strategies and stops at the
//! first one that produces a number:
//!
//! 1. `getStatsForNerds(0)`, read as text or as a keyed structure.
//! 2. `getStatsForNerds()`, same handling.
//! 3. `getDebugText()`, free text.
//! 4. The on-page diagnostics panel, if the user has it open.
//!
//! Missing capabilities and host exceptions are routine here. Each strategy
//! reports them as a [`CapabilityError`], which only means "try the next one".

use alloc::string::String;

use thiserror::Error;

use crate::backend::HostDocument;
use crate::stats::{StatsMap, scan_fields};
use crate::text::parse_kbps_from_text;

/// Selectors for the diagnostics panel, tried in order.
pub const PANEL_SELECTORS: [&str; 3] = [
    ".html5-video-info-panel",
    ".html5-video-info-panel-content",
    "[class*='video-info-panel']",
];

/// What a structured-diagnostics call returned.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostics {
    /// A free-form text dump.
    Text(String),
    /// A keyed structure.
    Fields(StatsMap),
    /// Anything else (`null`, a number, ...). Never carries a bandwidth.
    Empty,
}

/// Why a single capability lookup produced nothing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The player does not expose this capability.
    #[error("capability not available")]
    Unsupported,
    /// The host call threw.
    #[error("host call threw: {0}")]
    Threw(String),
    /// The host returned a value of an unusable shape.
    #[error("malformed host value")]
    Malformed,
}

/// The embedded player's diagnostics surface.
///
/// Implementations look up each capability at call time; a player may gain or
/// lose methods between calls.
pub trait PlayerHandle {
    /// Calls the structured-diagnostics function, with `arg` if given.
    fn stats_for_nerds(&self, arg: Option<u32>) -> Result<Diagnostics, CapabilityError>;

    /// Calls the free-text debug function.
    fn debug_text(&self) -> Result<String, CapabilityError>;
}

impl<P: PlayerHandle + ?Sized> PlayerHandle for &P {
    fn stats_for_nerds(&self, arg: Option<u32>) -> Result<Diagnostics, CapabilityError> {
        (**self).stats_for_nerds(arg)
    }

    fn debug_text(&self) -> Result<String, CapabilityError> {
        (**self).debug_text()
    }
}

/// Which strategy produced a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireMethod {
    /// `getStatsForNerds(0)` returned text.
    StatsTextArg0,
    /// `getStatsForNerds(0)` returned a keyed structure.
    StatsFieldsArg0,
    /// `getStatsForNerds()` returned text.
    StatsText,
    /// `getStatsForNerds()` returned a keyed structure.
    StatsFields,
    /// `getDebugText()`.
    DebugText,
    /// The on-page diagnostics panel.
    DomPanel,
}

impl AcquireMethod {
    /// Returns the diagnostic tag for this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatsTextArg0 => "stats:string(0)",
            Self::StatsFieldsArg0 => "stats:object(0)",
            Self::StatsText => "stats:string",
            Self::StatsFields => "stats:object",
            Self::DebugText => "getDebugText",
            Self::DomPanel => "dom:panel",
        }
    }
}

/// Why no sample was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireFailure {
    /// No player object was found on the page.
    NoPlayerHandle,
    /// Every strategy came back empty.
    NoBandwidthField,
}

impl AcquireFailure {
    /// Returns the diagnostic reason string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPlayerHandle => "no player handle",
            Self::NoBandwidthField => "no bandwidth field found",
        }
    }
}

/// The result of one acquisition attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BandwidthSample {
    /// A bandwidth figure in kilobits per second.
    Measured {
        /// Raw value as reported by the host (not validated for sign).
        kbps: f64,
        /// Strategy that produced it.
        method: AcquireMethod,
    },
    /// Nothing usable this tick.
    Missing(AcquireFailure),
}

impl BandwidthSample {
    /// Returns the kbps figure, if any.
    #[must_use]
    pub const fn kbps(&self) -> Option<f64> {
        match self {
            Self::Measured { kbps, .. } => Some(*kbps),
            Self::Missing(_) => None,
        }
    }

    /// Returns the tag of the strategy that succeeded.
    #[must_use]
    pub const fn method_tag(&self) -> Option<&'static str> {
        match self {
            Self::Measured { method, .. } => Some(method.as_str()),
            Self::Missing(_) => None,
        }
    }

    /// Returns the failure reason, if no figure was found.
    #[must_use]
    pub const fn failure_reason(&self) -> Option<&'static str> {
        match self {
            Self::Measured { .. } => None,
            Self::Missing(reason) => Some(reason.as_str()),
        }
    }
}

/// Runs the acquisition strategies in priority order.
#[derive(Clone, Copy, Debug)]
pub struct Acquirer<'a> {
    panel_selectors: &'a [&'a str],
}

impl Default for Acquirer<'static> {
    fn default() -> Self {
        Self::new(&PANEL_SELECTORS)
    }
}

impl<'a> Acquirer<'a> {
    /// Creates an acquirer that falls back to the given panel selectors.
    #[must_use]
    pub const fn new(panel_selectors: &'a [&'a str]) -> Self {
        Self { panel_selectors }
    }

    /// Attempts to read the current bandwidth.
    ///
    /// `player` is `None` when the page has no player object yet; that is
    /// reported without consulting the document.
    pub fn acquire<P, D>(&self, player: Option<&P>, document: &D) -> BandwidthSample
    where
        P: PlayerHandle + ?Sized,
        D: HostDocument + ?Sized,
    {
        let Some(player) = player else {
            return BandwidthSample::Missing(AcquireFailure::NoPlayerHandle);
        };

        read_stats(player, Some(0))
            .or_else(|| read_stats(player, None))
            .or_else(|| read_debug_text(player))
            .or_else(|| {
                self.read_panel(document).map(|kbps| BandwidthSample::Measured {
                    kbps,
                    method: AcquireMethod::DomPanel,
                })
            })
            .unwrap_or(BandwidthSample::Missing(AcquireFailure::NoBandwidthField))
    }

    fn read_panel<D: HostDocument + ?Sized>(&self, document: &D) -> Option<f64> {
        let panel = document.query_first(self.panel_selectors)?;
        parse_kbps_from_text(&document.text_content(&panel))
    }
}

fn read_stats<P: PlayerHandle + ?Sized>(player: &P, arg: Option<u32>) -> Option<BandwidthSample> {
    let (kbps, method) = match player.stats_for_nerds(arg).ok()? {
        Diagnostics::Text(text) => {
            let method = if arg.is_some() {
                AcquireMethod::StatsTextArg0
            } else {
                AcquireMethod::StatsText
            };
            (parse_kbps_from_text(&text)?, method)
        }
        Diagnostics::Fields(fields) => {
            let method = if arg.is_some() {
                AcquireMethod::StatsFieldsArg0
            } else {
                AcquireMethod::StatsFields
            };
            (scan_fields(&fields)?, method)
        }
        Diagnostics::Empty => return None,
    };
    Some(BandwidthSample::Measured { kbps, method })
}

fn read_debug_text<P: PlayerHandle + ?Sized>(player: &P) -> Option<BandwidthSample> {
    let text = player.debug_text().ok()?;
    let kbps = parse_kbps_from_text(&text)?;
    Some(BandwidthSample::Measured {
        kbps,
        method: AcquireMethod::DebugText,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDocument, FakePlayer};

    #[test]
    fn no_player_handle() {
        let doc = FakeDocument::new();
        let sample = Acquirer::default().acquire(None::<&FakePlayer>, &doc);
        assert_eq!(sample, BandwidthSample::Missing(AcquireFailure::NoPlayerHandle));
        assert_eq!(sample.failure_reason(), Some("no player handle"));
        assert_eq!(sample.kbps(), None);
    }

    #[test]
    fn stats_arg0_text_wins() {
        let player = FakePlayer::new()
            .with_stats_arg0(Ok(Diagnostics::Text("Connection Speed: 4096 Kbps".into())))
            .with_debug_text(Ok("Connection Speed: 1 Kbps".into()));
        let sample = Acquirer::default().acquire(Some(&player), &FakeDocument::new());
        assert_eq!(sample.kbps(), Some(4096.0));
        assert_eq!(sample.method_tag(), Some("stats:string(0)"));
        assert_eq!(player.calls(), 1);
    }

    #[test]
    fn stats_object_without_argument() {
        let fields: StatsMap = [("bandwidth_kbps", "8000")].into_iter().collect();
        let player = FakePlayer::new()
            .with_stats_arg0(Ok(Diagnostics::Empty))
            .with_stats(Ok(Diagnostics::Fields(fields)));
        let sample = Acquirer::default().acquire(Some(&player), &FakeDocument::new());
        assert_eq!(
            sample,
            BandwidthSample::Measured {
                kbps: 8000.0,
                method: AcquireMethod::StatsFields
            }
        );
    }

    #[test]
    fn throwing_strategy_does_not_block_the_next() {
        let player = FakePlayer::new()
            .with_stats_arg0(Err(CapabilityError::Threw("TypeError".into())))
            .with_stats(Err(CapabilityError::Threw("TypeError".into())))
            .with_debug_text(Ok("Connection Speed: 640 Kbps".into()));
        let sample = Acquirer::default().acquire(Some(&player), &FakeDocument::new());
        assert_eq!(sample.method_tag(), Some("getDebugText"));
        assert_eq!(sample.kbps(), Some(640.0));
        assert_eq!(player.calls(), 3);
    }

    #[test]
    fn panel_fallback_uses_first_matching_selector() {
        let mut doc = FakeDocument::new();
        let root = doc.root();
        let content = doc.append(root, &["html5-video-info-panel-content"]);
        doc.set_text_raw(content, "Connection Speed: 300 Kbps");
        let loose = doc.append(root, &["my-video-info-panel-x"]);
        doc.set_text_raw(loose, "Connection Speed: 999 Kbps");

        let player = FakePlayer::new();
        let sample = Acquirer::default().acquire(Some(&player), &doc);
        assert_eq!(sample.method_tag(), Some("dom:panel"));
        assert_eq!(sample.kbps(), Some(300.0));
    }

    #[test]
    fn everything_empty() {
        let player = FakePlayer::new()
            .with_stats_arg0(Ok(Diagnostics::Text("Buffer Health: 3 s".into())))
            .with_stats(Err(CapabilityError::Malformed))
            .with_debug_text(Err(CapabilityError::Unsupported));
        let sample = Acquirer::default().acquire(Some(&player), &FakeDocument::new());
        assert_eq!(sample, BandwidthSample::Missing(AcquireFailure::NoBandwidthField));
        assert_eq!(sample.failure_reason(), Some("no bandwidth field found"));
    }

    #[test]
    fn strategy_error_messages() {
        use alloc::string::ToString as _;
        assert_eq!(CapabilityError::Unsupported.to_string(), "capability not available");
        assert_eq!(CapabilityError::Threw("boom".into()).to_string(), "host call threw: boom");
    }
}
