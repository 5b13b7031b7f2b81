// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bandwidth acquisition and indicator reconciliation for an embedded video
//! player.
//!
//! `ytspeed_core` holds everything that does not touch a real browser. It is
//! `no_std` compatible (with `alloc`) and talks to the host page only
//! through the [`PlayerHandle`](acquire::PlayerHandle) and
//! [`HostDocument`](backend::HostDocument) traits, so every piece can be
//! driven by test doubles.
//!
//! # Architecture
//!
//! Two periodic triggers drive a single [`Session`](session::Session):
//!
//! ```text
//!   route loop ──► Session::route_tick() ──► Transition (reset + mount/unmount)
//!
//!   sample loop ─► Session::sample_tick()
//!                      │
//!                      ├─► Reconciler::reconcile()      (mount, keep leftmost)
//!                      ├─► Acquirer::acquire()          ──► BandwidthSample
//!                      ├─► derive_display()             ──► Readout
//!                      ├─► classify()                   ──► TierChange
//!                      └─► HostDocument::set_text()/set_attribute()
//! ```
//!
//! **[`number`]**: Grouping-tolerant decimal token parser.
//!
//! **[`text`]**: Recovers a kbps figure from a free-form diagnostics dump.
//!
//! **[`stats`]**: Keyed diagnostics values and the field scanner.
//!
//! **[`acquire`]**: Ordered, isolated acquisition strategies.
//!
//! **[`display`]**: Unit conversion and the holdover window.
//!
//! **[`tier`]**: Debounced five-tier classification.
//!
//! **[`route`]**: Location identity and target-route matching.
//!
//! **[`mount`]**: Mount-point resolution and the idempotent reconciler.
//!
//! **[`session`]**: Explicit session state threaded through both ticks.
//!
//! **[`backend`]**: The host document and preference contracts.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod acquire;
pub mod backend;
pub mod config;
pub mod display;
pub mod mount;
pub mod number;
pub mod route;
pub mod session;
pub mod stats;
pub mod text;
pub mod tier;
pub mod time;
pub mod trace;

#[cfg(test)]
pub(crate) mod testing;
