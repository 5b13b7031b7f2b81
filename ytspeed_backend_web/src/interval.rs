// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setInterval` tick source.
//!
//! [`IntervalLoop`] calls a Rust callback at a fixed period using the
//! browser's `setInterval` API. Each callback receives the current
//! [`HostTime`] read from `performance.now()`.
//!
//! Timers in background tabs are throttled by the browser; callers must not
//! assume ticks arrive on schedule.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use ytspeed_core::time::{Duration, HostTime};

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object has to be fetched (and unwrapped) on every tick.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setInterval")]
    fn set_interval(callback: &JsValue, timeout_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    fn clear_interval(handle: i32);
}

/// A periodic timer that invokes a callback with the current host time.
///
/// Create with [`IntervalLoop::new`], then call [`start`](Self::start) to begin
/// receiving callbacks. The timer keeps firing until [`stop`](Self::stop) is
/// called or the `IntervalLoop` is dropped.
pub struct IntervalLoop {
    inner: Rc<IntervalInner>,
}

type IntervalClosure = Closure<dyn FnMut()>;

struct IntervalInner {
    /// The JS closure registered with `setInterval`.
    closure: RefCell<Option<IntervalClosure>>,

    /// The user-supplied callback.
    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    /// Time between callbacks.
    period: Duration,

    /// Number of callbacks delivered so far.
    ticks: Cell<u64>,

    /// Whether the timer is currently running.
    running: Cell<bool>,

    /// The handle returned by `setInterval`, used by [`clear_interval`].
    handle: Cell<i32>,
}

impl IntervalLoop {
    /// Creates a new `IntervalLoop` that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) + 'static, period: Duration) -> Self {
        Self {
            inner: Rc::new(IntervalInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                period,
                ticks: Cell::new(0),
                running: Cell::new(false),
                handle: Cell::new(0),
            }),
        }
    }

    /// Starts the timer.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move || {
            if !inner.running.get() {
                return;
            }
            inner.ticks.set(inner.ticks.get() + 1);
            // A callback that is still running (re-entered through a nested
            // event loop) is skipped rather than double-borrowed.
            if let Ok(mut callback) = inner.callback.try_borrow_mut() {
                callback(crate::now());
            }
        }) as Box<dyn FnMut()>);

        let handle = set_interval(closure.as_ref().unchecked_ref(), timeout_ms(self.inner.period));
        self.inner.handle.set(handle);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Stops the timer. Can be restarted by calling [`start`](Self::start)
    /// again.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        clear_interval(self.inner.handle.get());
    }

    /// Returns `true` if the timer is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns the configured period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.inner.period
    }
}

impl Drop for IntervalLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for IntervalLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntervalLoop")
            .field("running", &self.inner.running.get())
            .field("ticks", &self.inner.ticks.get())
            .field("period", &self.inner.period)
            .finish()
    }
}

/// Converts a period to the `setInterval` timeout argument, saturating.
fn timeout_ms(period: Duration) -> i32 {
    i32::try_from(period.millis()).unwrap_or(i32::MAX)
}
