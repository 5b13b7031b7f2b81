// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bandwidth indicator for the embedded video player.
//!
//! On load this crate polls the page route every 400 ms and, while a watch or
//! shorts page is open, samples the player's bandwidth once a second into a
//! small indicator in the player's right-side controls. Clicking the
//! indicator switches between MB/s and Mbps; the choice is remembered in
//! `localStorage`.
//!
//! Loading the page with `?yt_speed_debug=1` logs to the console and records
//! every trace event; `ytspeedDumpTrace()` returns the recording as Chrome
//! Trace Event Format JSON.
//!
//! Build with: `wasm-pack build --target no-modules ytspeed_widget`
//! Then inject the generated script from a userscript manager.

#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement};
use ytspeed_backend_web::{ConsoleSink, IntervalLoop, JsPlayer, LocalPreferences, WebDocument, style};
use ytspeed_core::backend::HostDocument as _;
use ytspeed_core::config::SessionConfig;
use ytspeed_core::display::DisplayUnit;
use ytspeed_core::mount::MountOutcome;
use ytspeed_core::session::{Session, TickReport};
use ytspeed_core::tier::Tier;
use ytspeed_core::time::HostTime;
use ytspeed_core::trace::{
    AcquireEvent, DisplayEvent, LifecycleEvent, MountEvent, TierChangeEvent, TraceSink, Tracer,
};
use ytspeed_debug::chrome;
use ytspeed_debug::recorder::RecorderSink;

/// The recording is dropped once it grows past this many bytes.
const RECORDING_CAP: usize = 1 << 20;

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

/// Console lines plus binary recording.
struct DebugSink<'a> {
    recorder: &'a mut RecorderSink,
}

impl TraceSink for DebugSink<'_> {
    fn on_acquire(&mut self, e: &AcquireEvent) {
        ConsoleSink.on_acquire(e);
        self.recorder.on_acquire(e);
    }

    fn on_display(&mut self, e: &DisplayEvent) {
        self.recorder.on_display(e);
    }

    fn on_tier_change(&mut self, e: &TierChangeEvent) {
        ConsoleSink.on_tier_change(e);
        self.recorder.on_tier_change(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        ConsoleSink.on_lifecycle(e);
        self.recorder.on_lifecycle(e);
    }

    fn on_mount(&mut self, e: &MountEvent) {
        ConsoleSink.on_mount(e);
        self.recorder.on_mount(e);
    }
}

/// Runs `f` with a tracer that records when debugging and discards otherwise.
fn traced<R>(recorder: &mut Option<RecorderSink>, f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
    match recorder {
        Some(recorder) => {
            if recorder.as_bytes().len() > RECORDING_CAP {
                recorder.clear();
            }
            let mut sink = DebugSink { recorder };
            let mut tracer = Tracer::new(&mut sink);
            f(&mut tracer)
        }
        None => f(&mut Tracer::none()),
    }
}

/// The tier the indicator was last colored for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PaintedTier(Option<Tier>);

impl PaintedTier {
    /// Marks the indicator's color as unknown.
    fn forget(&mut self) {
        self.0 = None;
    }

    /// Returns the tier to paint after a tick, or `None` if the color is
    /// already current.
    fn after_tick(&mut self, report: &TickReport) -> Option<Tier> {
        let fresh_node = matches!(report.mount, MountOutcome::Created(_));
        if fresh_node || self.0 != Some(report.tier) {
            self.0 = Some(report.tier);
            Some(report.tier)
        } else {
            None
        }
    }
}

struct App {
    session: Session,
    document: WebDocument,
    preferences: LocalPreferences,
    /// `Some` when the debug flag was set at load.
    recorder: Option<RecorderSink>,
    painted: PaintedTier,
}

impl App {
    fn debug(&self) -> bool {
        self.recorder.is_some()
    }

    fn route(&mut self) {
        let Some(location) = ytspeed_backend_web::location() else {
            return;
        };
        let transition = traced(&mut self.recorder, |tracer| {
            self.session.route_tick(&location, &mut self.document, tracer)
        });
        let Some(transition) = transition else {
            return;
        };
        // Every transition resets the tier, whether or not the node survived.
        self.painted.forget();
        if transition.mount.is_some() {
            let tier = self.session.display().tier.current;
            self.painted.0 = Some(tier);
            self.paint(tier);
        }
    }

    fn sample(&mut self, now: HostTime) {
        let player = JsPlayer::find(&self.document, &self.session.config().mount);
        let report = traced(&mut self.recorder, |tracer| {
            self.session
                .sample_tick(player.as_ref(), &mut self.document, now, tracer)
        });
        if let Some(tier) = report.and_then(|r| self.painted.after_tick(&r)) {
            self.paint(tier);
        }
    }

    fn toggle_unit(&mut self) {
        let unit = self.session.toggle_unit();
        unit.store(&mut self.preferences, self.session.config().unit_key);
        if self.debug() {
            ConsoleSink::log(&format!("unit: {}", unit.suffix()));
        }
        self.sample(ytspeed_backend_web::now());
    }

    /// Colors the indicator for `tier`.
    fn paint(&self, tier: Tier) {
        let indicator = self
            .document
            .element_by_id(self.session.config().indicator_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = indicator {
            style::apply_tier_style(&el, tier);
        }
    }
}

/// Toggles the unit on clicks that land on the indicator.
///
/// Listens on the document in the capture phase so the player never sees
/// the click, and so the listener survives the indicator being recreated.
fn install_click_handler(app: &Rc<RefCell<App>>, indicator_id: &str) -> Result<(), JsValue> {
    let selector = format!("#{indicator_id}");
    let click_app = Rc::clone(app);
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        let hit = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .is_some();
        if !hit {
            return;
        }
        event.stop_propagation();
        if let Ok(mut app) = click_app.try_borrow_mut() {
            app.toggle_unit();
        }
    }) as Box<dyn FnMut(_)>);

    let document = app.borrow().document.document().clone();
    document.add_event_listener_with_callback_and_bool(
        "click",
        on_click.as_ref().unchecked_ref(),
        true,
    )?;
    on_click.forget();
    Ok(())
}

/// Entry point: wires the route and sample timers to a fresh session.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let config = SessionConfig::youtube();
    let document = WebDocument::from_window(config.aria_label)
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let preferences = LocalPreferences::open();
    let unit = DisplayUnit::load(&preferences, config.unit_key);
    let debug = ytspeed_backend_web::location()
        .is_some_and(|location| location.query_flag(config.debug_flag) == Some("1"));

    let app = Rc::new(RefCell::new(App {
        session: Session::new(config, unit),
        document,
        preferences,
        recorder: debug.then(RecorderSink::new),
        painted: PaintedTier::default(),
    }));

    install_click_handler(&app, config.indicator_id)?;

    let route_app = Rc::clone(&app);
    let route_loop = IntervalLoop::new(
        move |_now| {
            if let Ok(mut app) = route_app.try_borrow_mut() {
                app.route();
            }
        },
        config.route_poll,
    );
    route_loop.start();
    // Keep the timer alive for the lifetime of the page.
    core::mem::forget(route_loop);

    let sample_app = Rc::clone(&app);
    let sample_loop = IntervalLoop::new(
        move |now| {
            if let Ok(mut app) = sample_app.try_borrow_mut() {
                app.sample(now);
            }
        },
        config.sample_interval,
    );
    sample_loop.start();
    core::mem::forget(sample_loop);

    app.borrow_mut().route();
    APP.with(|slot| *slot.borrow_mut() = Some(app));

    if debug {
        ConsoleSink::log("YouTube Speed MB/s userscript loaded");
    }
    Ok(())
}

/// Returns the debug recording as Chrome Trace Event Format JSON.
///
/// The array is empty unless the page was loaded with the debug flag.
#[wasm_bindgen(js_name = "ytspeedDumpTrace")]
#[must_use]
pub fn dump_trace() -> String {
    APP.with(|slot| {
        let slot = slot.borrow();
        let app = slot.as_ref()?.try_borrow().ok()?;
        let recorder = app.recorder.as_ref()?;
        Some(chrome::export_to_string(recorder.as_bytes()))
    })
    .unwrap_or_else(|| chrome::export_to_string(&[]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ytspeed_core::acquire::{AcquireFailure, BandwidthSample};
    use ytspeed_core::display::{DisplaySource, Readout};
    use ytspeed_core::mount::MountMode;
    use ytspeed_core::tier::TierChange;

    fn report(mount: MountOutcome, tier: Tier, tier_change: Option<TierChange>) -> TickReport {
        TickReport {
            tick: 1,
            mount,
            sample: BandwidthSample::Missing(AcquireFailure::NoPlayerHandle),
            readout: Readout {
                text: "N/A MB/s".into(),
                source: DisplaySource::Unavailable,
                mb_per_s: None,
            },
            tier,
            tier_change,
        }
    }

    #[test]
    fn paint_on_creation_or_tier_change() {
        let mut painted = PaintedTier(Some(Tier::Warning));
        assert_eq!(painted.after_tick(&report(MountOutcome::Unchanged, Tier::Warning, None)), None);
        assert_eq!(painted.after_tick(&report(MountOutcome::Moved, Tier::Warning, None)), None);
        assert_eq!(
            painted.after_tick(&report(
                MountOutcome::Created(MountMode::Primary),
                Tier::Warning,
                None
            )),
            Some(Tier::Warning)
        );
        let change = TierChange {
            from: Tier::Warning,
            to: Tier::Good,
            at: HostTime(2_000),
        };
        assert_eq!(
            painted.after_tick(&report(MountOutcome::Unchanged, Tier::Good, Some(change))),
            Some(Tier::Good)
        );
        assert_eq!(painted, PaintedTier(Some(Tier::Good)));
    }

    #[test]
    fn repaint_after_reset_on_surviving_node() {
        // Cyber was painted on the previous video; the node survives the
        // route change and the first tick reports the reset tier with no
        // tier change of its own.
        let mut painted = PaintedTier(Some(Tier::Cyber));
        let first = report(MountOutcome::Unchanged, Tier::Warning, None);
        assert_eq!(painted.after_tick(&first), Some(Tier::Warning));
        assert_eq!(painted.after_tick(&first), None);

        painted.forget();
        assert_eq!(painted.after_tick(&first), Some(Tier::Warning));
    }

    #[test]
    fn recording_is_capped() {
        let mut recorder = RecorderSink::new();
        let event = AcquireEvent {
            tick: 1,
            at: HostTime(0),
            sample: BandwidthSample::Missing(AcquireFailure::NoPlayerHandle),
        };
        while recorder.as_bytes().len() <= RECORDING_CAP {
            recorder.on_acquire(&event);
        }
        let mut recorder = Some(recorder);
        let ran = traced(&mut recorder, |_| true);
        assert!(ran);
        assert_eq!(recorder.map(|r| r.as_bytes().len()), Some(0));
    }

    #[test]
    fn untraced_runs_without_recorder() {
        let mut recorder = None;
        assert_eq!(traced(&mut recorder, |_| 7), 7);
    }
}
