// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for ytspeed.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebDocument`]: [`HostDocument`] over the live DOM
//! - [`JsPlayer`]: [`PlayerHandle`] over the embedded player object
//! - [`IntervalLoop`]: `setInterval` tick source
//! - [`ConsoleSink`]: debug channel on `console.log`
//! - [`LocalPreferences`]: `localStorage` preference store
//! - [`style`]: inline styling per mount mode and tier
//!
//! [`HostDocument`]: ytspeed_core::backend::HostDocument
//! [`PlayerHandle`]: ytspeed_core::acquire::PlayerHandle

#![no_std]

extern crate alloc;

mod console;
mod dom;
mod interval;
mod player;
mod storage;
pub mod style;

pub use console::{ConsoleSink, LOG_PREFIX};
pub use dom::WebDocument;
pub use interval::IntervalLoop;
pub use player::JsPlayer;
pub use storage::LocalPreferences;

use ytspeed_core::route::Location;
use ytspeed_core::time::HostTime;

/// Returns the current host time from `performance.now()`, in whole
/// milliseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = interval::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns a small positive f64; ms fits in u64"
    )]
    let ms = ms as u64;
    HostTime(ms)
}

/// Reads the path and query string of the current page.
///
/// Returns `None` outside a window context.
#[must_use]
pub fn location() -> Option<Location> {
    let location = web_sys::window()?.location();
    let path = location.pathname().unwrap_or_default();
    let query = location.search().unwrap_or_default();
    Some(Location::new(path, query))
}
