// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording and Chrome trace export for ytspeed diagnostics.
//!
//! This crate provides [`TraceSink`](ytspeed_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.

pub mod chrome;
pub mod recorder;
