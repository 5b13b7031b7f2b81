// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug channel on the browser console.

use alloc::format;
use alloc::string::String;

use wasm_bindgen::JsValue;
use ytspeed_core::acquire::BandwidthSample;
use ytspeed_core::mount::MountOutcome;
use ytspeed_core::route::Lifecycle;
use ytspeed_core::trace::{AcquireEvent, LifecycleEvent, MountEvent, TierChangeEvent, TraceSink};

/// Prefix of every console line.
pub const LOG_PREFIX: &str = "[YT Speed MB/s]";

/// A [`TraceSink`] that writes one `console.log` line per interesting event.
///
/// Unchanged reconciliation passes and display events are not logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Logs an arbitrary message with the channel prefix.
    pub fn log(message: &str) {
        web_sys::console::log_2(&JsValue::from_str(LOG_PREFIX), &JsValue::from_str(message));
    }
}

impl TraceSink for ConsoleSink {
    fn on_acquire(&mut self, e: &AcquireEvent) {
        Self::log(&describe_acquire(e));
    }

    fn on_tier_change(&mut self, e: &TierChangeEvent) {
        Self::log(&format!(
            "tier: {} -> {}",
            e.change.from.slug(),
            e.change.to.slug()
        ));
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        Self::log(describe_lifecycle(e));
    }

    fn on_mount(&mut self, e: &MountEvent) {
        if let Some(message) = describe_mount(e) {
            Self::log(&message);
        }
    }
}

fn describe_acquire(e: &AcquireEvent) -> String {
    match e.sample {
        BandwidthSample::Measured { kbps, method } => {
            format!("kbps: {kbps} meta: {}", method.as_str())
        }
        BandwidthSample::Missing(reason) => format!("no kbps: {}", reason.as_str()),
    }
}

fn describe_lifecycle(e: &LifecycleEvent) -> &'static str {
    match e.to {
        Lifecycle::Active => "route target, init",
        Lifecycle::Inactive => "route not target, widget removed",
    }
}

fn describe_mount(e: &MountEvent) -> Option<String> {
    match e.outcome {
        MountOutcome::Created(mode) => Some(format!("widget mounted in mode: {}", mode.as_str())),
        MountOutcome::Moved => Some("widget positioned as leftmost in right-controls".into()),
        MountOutcome::Unchanged | MountOutcome::Unresolved => None,
    }
}
