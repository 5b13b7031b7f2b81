// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session: all mutable state, threaded through both ticks.
//!
//! A [`Session`] is driven by two independent periodic triggers:
//!
//! - [`route_tick`](Session::route_tick) polls page identity. A changed
//!   route key resets every piece of derived state and mounts or removes
//!   the indicator.
//! - [`sample_tick`](Session::sample_tick) reconciles the indicator,
//!   acquires a reading, derives the readout, advances the tier state, and
//!   writes the result to the page. It does nothing while inactive.
//!
//! Both take the host document by `&mut` and return a report of what
//! happened, so the caller owns all scheduling and logging decisions.

use alloc::string::String;

use crate::acquire::{Acquirer, BandwidthSample, PlayerHandle};
use crate::backend::HostDocument;
use crate::config::SessionConfig;
use crate::display::{
    DisplayParams, DisplaySource, DisplayState, DisplayUnit, Readout, derive_display,
};
use crate::mount::{MountOutcome, Reconciler};
use crate::route::{Lifecycle, Location};
use crate::tier::{Tier, TierChange, TierParams, classify};
use crate::time::HostTime;
use crate::trace::{
    AcquireEvent, DisplayEvent, LifecycleEvent, MountEvent, TierChangeEvent, Tracer,
};

/// Attribute carrying the committed tier slug.
pub const TIER_ATTRIBUTE: &str = "data-tier";

/// Attribute carrying the readout source.
pub const STATE_ATTRIBUTE: &str = "data-state";

/// A route change, as reported by [`Session::route_tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Lifecycle before the change.
    pub from: Lifecycle,
    /// Lifecycle after the change.
    pub to: Lifecycle,
    /// The new route key.
    pub route_key: String,
    /// Result of mounting (when becoming active) or `None` when inactive.
    pub mount: Option<MountOutcome>,
}

/// What one sample tick did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Sample tick counter, starting at 1 after each reset.
    pub tick: u64,
    /// Reconciliation result.
    pub mount: MountOutcome,
    /// Acquisition result.
    pub sample: BandwidthSample,
    /// Text and source shown.
    pub readout: Readout,
    /// Committed tier after this tick.
    pub tier: Tier,
    /// Tier change committed this tick, if any.
    pub tier_change: Option<TierChange>,
}

/// State for one page-script lifetime.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    reconciler: Reconciler,
    acquirer: Acquirer<'static>,
    lifecycle: Lifecycle,
    route_key: Option<String>,
    unit: DisplayUnit,
    display: DisplayState,
    last_text: String,
    last_kbps: Option<f64>,
    tick: u64,
    transitions: u64,
}

impl Session {
    /// Creates an inactive session. The first [`route_tick`](Self::route_tick)
    /// always reports a transition.
    #[must_use]
    pub fn new(config: SessionConfig, unit: DisplayUnit) -> Self {
        Self {
            reconciler: Reconciler::new(config.indicator_id, config.mount),
            acquirer: Acquirer::new(config.panel_selectors),
            config,
            lifecycle: Lifecycle::Inactive,
            route_key: None,
            unit,
            display: DisplayState::new(unit),
            last_text: unit.initial_text(),
            last_kbps: None,
            tick: 0,
            transitions: 0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns the last seen route key.
    #[must_use]
    pub fn route_key(&self) -> Option<&str> {
        self.route_key.as_deref()
    }

    /// Returns the display state.
    #[must_use]
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Returns the display unit.
    #[must_use]
    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Returns the text most recently written to the indicator.
    #[must_use]
    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    /// Checks page identity and performs a transition if it changed.
    pub fn route_tick<D: HostDocument + ?Sized>(
        &mut self,
        location: &Location,
        document: &mut D,
        tracer: &mut Tracer<'_>,
    ) -> Option<Transition> {
        let key = location.route_key();
        if self.route_key.as_deref() == Some(key.as_str()) {
            return None;
        }

        let from = self.lifecycle;
        let to = Lifecycle::for_location(location);
        self.route_key = Some(key.clone());
        self.lifecycle = to;
        self.transitions += 1;
        self.reset();

        tracer.lifecycle(&LifecycleEvent {
            transition: self.transitions,
            from,
            to,
        });

        let mount = match to {
            Lifecycle::Active => {
                let (node, outcome) = self.reconciler.reconcile(document, &self.last_text);
                // A surviving node still shows the previous page's reading.
                if let Some(node) = node {
                    write_text(document, &node, &self.last_text);
                    write_attribute(
                        document,
                        &node,
                        TIER_ATTRIBUTE,
                        self.display.tier.current.slug(),
                    );
                    write_attribute(
                        document,
                        &node,
                        STATE_ATTRIBUTE,
                        DisplaySource::Unavailable.as_str(),
                    );
                }
                tracer.mount(&MountEvent {
                    tick: 0,
                    at: None,
                    outcome,
                });
                Some(outcome)
            }
            Lifecycle::Inactive => {
                self.reconciler.remove(document);
                None
            }
        };

        Some(Transition {
            from,
            to,
            route_key: key,
            mount,
        })
    }

    /// Runs one sample tick. Returns `None` while inactive.
    pub fn sample_tick<P, D>(
        &mut self,
        player: Option<&P>,
        document: &mut D,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Option<TickReport>
    where
        P: PlayerHandle + ?Sized,
        D: HostDocument + ?Sized,
    {
        if self.lifecycle != Lifecycle::Active {
            return None;
        }
        self.tick += 1;
        let tick = self.tick;

        let (node, mount) = self.reconciler.reconcile(document, &self.last_text);
        tracer.mount(&MountEvent {
            tick,
            at: Some(now),
            outcome: mount,
        });

        let sample = self.acquirer.acquire(player, &*document);
        tracer.acquire(&AcquireEvent {
            tick,
            at: now,
            sample,
        });

        let params = DisplayParams {
            unit: self.unit,
            holdover: self.config.holdover,
        };
        let (readout, next) = derive_display(sample.kbps(), &self.display, now, &params);
        self.display = next;

        let mut tier_change = None;
        if let Some(mb_per_s) = readout.mb_per_s {
            self.last_kbps = sample.kbps();
            let tier_params = TierParams {
                bounds: self.config.tier_bounds,
                debounce: self.config.tier_debounce,
            };
            let (tier, change) = classify(mb_per_s, &self.display.tier, now, &tier_params);
            self.display.tier = tier;
            if let Some(change) = change {
                tracer.tier_change(&TierChangeEvent { tick, change });
            }
            tier_change = change;
        }
        let tier = self.display.tier.current;

        tracer.display(&DisplayEvent {
            tick,
            at: now,
            source: readout.source,
            unit: self.unit,
            value: readout
                .mb_per_s
                .and(sample.kbps())
                .map(|kbps| self.unit.convert(kbps)),
            tier,
        });

        if let Some(node) = node {
            write_text(document, &node, &readout.text);
            write_attribute(document, &node, TIER_ATTRIBUTE, tier.slug());
            write_attribute(document, &node, STATE_ATTRIBUTE, readout.source.as_str());
        }
        self.last_text.clone_from(&readout.text);

        Some(TickReport {
            tick,
            mount,
            sample,
            readout,
            tier,
            tier_change,
        })
    }

    /// Switches the display unit. Returns `true` if it changed.
    ///
    /// The remembered text is reformatted in the new unit; the page is
    /// updated on the next sample tick.
    pub fn set_unit(&mut self, unit: DisplayUnit) -> bool {
        if unit == self.unit {
            return false;
        }
        self.unit = unit;
        self.display.last_good_text = match self.last_kbps {
            Some(kbps) => unit.format_kbps(kbps),
            None => unit.initial_text(),
        };
        true
    }

    /// Switches to the other display unit and returns it.
    pub fn toggle_unit(&mut self) -> DisplayUnit {
        let unit = self.unit.toggled();
        self.set_unit(unit);
        unit
    }

    /// Drops every piece of derived state.
    pub fn reset(&mut self) {
        self.display = DisplayState::new(self.unit);
        self.last_text = self.unit.initial_text();
        self.last_kbps = None;
        self.tick = 0;
    }
}

fn write_text<D: HostDocument + ?Sized>(document: &mut D, node: &D::Node, text: &str) {
    if document.text_content(node) != text {
        document.set_text(node, text);
    }
}

fn write_attribute<D: HostDocument + ?Sized>(
    document: &mut D,
    node: &D::Node,
    name: &str,
    value: &str,
) {
    if document.attribute(node, name).as_deref() != Some(value) {
        document.set_attribute(node, name, value);
    }
}
