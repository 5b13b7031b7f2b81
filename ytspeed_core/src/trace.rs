// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick events for the debug channel.
//!
//! The [`Session`](crate::session::Session) reports what each route and
//! sample tick did through a [`TraceSink`]. Sinks override only the events
//! they want; the rest are no-ops.
//!
//! Sessions never hold a sink directly. They take a [`Tracer`] per call,
//! which with the `trace` feature disabled is an empty struct whose methods
//! inline away. With the feature enabled every call is one `Option` check.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies.

use crate::acquire::BandwidthSample;
use crate::display::{DisplaySource, DisplayUnit};
use crate::mount::MountOutcome;
use crate::route::Lifecycle;
use crate::tier::{Tier, TierChange};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after every acquisition attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcquireEvent {
    /// Sample tick counter.
    pub tick: u64,
    /// Host time of the tick.
    pub at: HostTime,
    /// What the acquirer returned.
    pub sample: BandwidthSample,
}

/// Emitted after the readout for a tick has been derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayEvent {
    /// Sample tick counter.
    pub tick: u64,
    /// Host time of the tick.
    pub at: HostTime,
    /// Where the text came from.
    pub source: DisplaySource,
    /// Unit the text is rendered in.
    pub unit: DisplayUnit,
    /// The shown value in `unit`, for live readings.
    pub value: Option<f64>,
    /// The committed tier after this tick.
    pub tier: Tier,
}

/// Emitted when a tier candidate is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierChangeEvent {
    /// Sample tick counter.
    pub tick: u64,
    /// The committed change.
    pub change: TierChange,
}

/// Emitted on every route change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Route change counter, starting at 1.
    pub transition: u64,
    /// Lifecycle before the change.
    pub from: Lifecycle,
    /// Lifecycle after the change.
    pub to: Lifecycle,
}

/// Emitted after each reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountEvent {
    /// Sample tick counter (0 for passes made on a route change).
    pub tick: u64,
    /// Host time of the pass, if known.
    pub at: Option<HostTime>,
    /// What the pass did.
    pub outcome: MountOutcome,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the session. Every method defaults to a no-op.
pub trait TraceSink {
    /// Called after every acquisition attempt.
    fn on_acquire(&mut self, e: &AcquireEvent) {
        _ = e;
    }

    /// Called after the readout for a tick is derived.
    fn on_display(&mut self, e: &DisplayEvent) {
        _ = e;
    }

    /// Called when a tier change is committed.
    fn on_tier_change(&mut self, e: &TierChangeEvent) {
        _ = e;
    }

    /// Called on every route change.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called after each reconciliation pass.
    fn on_mount(&mut self, e: &MountEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Per-call handle to an optional [`TraceSink`].
///
/// Compiles to nothing without the `trace` feature.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Forwards events to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Drops every event.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`AcquireEvent`].
    #[inline]
    pub fn acquire(&mut self, e: &AcquireEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_acquire(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DisplayEvent`].
    #[inline]
    pub fn display(&mut self, e: &DisplayEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_display(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TierChangeEvent`].
    #[inline]
    pub fn tier_change(&mut self, e: &TierChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tier_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MountEvent`].
    #[inline]
    pub fn mount(&mut self, e: &MountEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mount(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
