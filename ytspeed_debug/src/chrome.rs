// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Map, Value, json};

use ytspeed_core::acquire::BandwidthSample;
use ytspeed_core::mount::MountOutcome;
use ytspeed_core::time::HostTime;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Live readings also feed a `bandwidth` counter track in the display unit.
/// Route changes carry no timestamp of their own and are placed at the most
/// recent time seen before them.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &events(bytes))?;
    Ok(())
}

/// Like [`export`], but returns the JSON as a string.
#[must_use]
pub fn export_to_string(bytes: &[u8]) -> String {
    Value::Array(events(bytes)).to_string()
}

fn events(bytes: &[u8]) -> Vec<Value> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Acquire(e) => {
                last_ts = ms_to_us(e.at);
                let args = match e.sample {
                    BandwidthSample::Measured { kbps, method } => json!({
                        "tick": e.tick,
                        "kbps": kbps,
                        "method": method.as_str(),
                    }),
                    BandwidthSample::Missing(reason) => json!({
                        "tick": e.tick,
                        "reason": reason.as_str(),
                    }),
                };
                events.push(json!({
                    "ph": "i",
                    "name": "Acquire",
                    "cat": "Sample",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": args,
                }));
            }
            RecordedEvent::Display(e) => {
                last_ts = ms_to_us(e.at);
                events.push(json!({
                    "ph": "i",
                    "name": "Display",
                    "cat": "Sample",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "tick": e.tick,
                        "source": e.source.as_str(),
                        "tier": e.tier.slug(),
                    }
                }));
                if let Some(value) = e.value {
                    let mut counter = Map::new();
                    counter.insert(e.unit.suffix().to_owned(), json!(value));
                    events.push(json!({
                        "ph": "C",
                        "name": "bandwidth",
                        "cat": "Sample",
                        "ts": last_ts,
                        "pid": 0,
                        "args": counter,
                    }));
                }
            }
            RecordedEvent::TierChange(e) => {
                last_ts = ms_to_us(e.change.at);
                events.push(json!({
                    "ph": "i",
                    "name": "TierChange",
                    "cat": "Tier",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "tick": e.tick,
                        "from": e.change.from.slug(),
                        "to": e.change.to.slug(),
                    }
                }));
            }
            RecordedEvent::Lifecycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Route",
                    "cat": "Lifecycle",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "g",
                    "args": {
                        "transition": e.transition,
                        "from": e.from.as_str(),
                        "to": e.to.as_str(),
                    }
                }));
            }
            RecordedEvent::Mount(e) => {
                if let Some(at) = e.at {
                    last_ts = ms_to_us(at);
                }
                let outcome = match e.outcome {
                    MountOutcome::Created(mode) => mode.as_str(),
                    MountOutcome::Moved => "moved",
                    MountOutcome::Unchanged => "unchanged",
                    MountOutcome::Unresolved => "unresolved",
                };
                events.push(json!({
                    "ph": "i",
                    "name": "Mount",
                    "cat": "Lifecycle",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "tick": e.tick,
                        "outcome": outcome,
                    }
                }));
            }
        }
    }

    events
}

#[expect(
    clippy::cast_precision_loss,
    reason = "host times stay far below 2^53 ms"
)]
fn ms_to_us(t: HostTime) -> f64 {
    t.millis() as f64 * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use ytspeed_core::acquire::AcquireMethod;
    use ytspeed_core::display::{DisplaySource, DisplayUnit};
    use ytspeed_core::route::Lifecycle;
    use ytspeed_core::tier::Tier;
    use ytspeed_core::trace::{AcquireEvent, DisplayEvent, LifecycleEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_acquire(&AcquireEvent {
            tick: 1,
            at: HostTime(1_000),
            sample: BandwidthSample::Measured {
                kbps: 8192.0,
                method: AcquireMethod::StatsTextArg0,
            },
        });
        rec.on_display(&DisplayEvent {
            tick: 1,
            at: HostTime(1_000),
            source: DisplaySource::Live,
            unit: DisplayUnit::MegabytesPerSecond,
            value: Some(1.0),
            tier: Tier::Warning,
        });
        rec.on_lifecycle(&LifecycleEvent {
            transition: 2,
            from: Lifecycle::Active,
            to: Lifecycle::Inactive,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "Acquire");
        assert_eq!(parsed[0]["ts"], 1_000_000.0);
        assert_eq!(parsed[0]["args"]["method"], "stats:string(0)");

        assert_eq!(parsed[1]["name"], "Display");
        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[2]["args"]["MB/s"], 1.0);

        // Route change inherits the preceding timestamp.
        assert_eq!(parsed[3]["name"], "Route");
        assert_eq!(parsed[3]["ts"], 1_000_000.0);
        assert_eq!(parsed[3]["args"]["to"], "inactive");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(export_to_string(&[]), "[]");
    }
}
