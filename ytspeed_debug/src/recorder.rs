// Copyright 2026 the ytspeed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Enum fields are stored as one-byte codes. Decoding stops at the first
//! unknown tag or code, or at a truncated record.

use ytspeed_core::acquire::{AcquireFailure, AcquireMethod, BandwidthSample};
use ytspeed_core::display::{DisplaySource, DisplayUnit};
use ytspeed_core::mount::{MountMode, MountOutcome};
use ytspeed_core::route::Lifecycle;
use ytspeed_core::tier::{Tier, TierChange};
use ytspeed_core::time::HostTime;
use ytspeed_core::trace::{
    AcquireEvent, DisplayEvent, LifecycleEvent, MountEvent, TierChangeEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_ACQUIRE: u8 = 1;
const TAG_DISPLAY: u8 = 2;
const TAG_TIER_CHANGE: u8 = 3;
const TAG_LIFECYCLE: u8 = 4;
const TAG_MOUNT: u8 = 5;

// ---------------------------------------------------------------------------
// Enum codes
// ---------------------------------------------------------------------------

const METHODS: [AcquireMethod; 6] = [
    AcquireMethod::StatsTextArg0,
    AcquireMethod::StatsFieldsArg0,
    AcquireMethod::StatsText,
    AcquireMethod::StatsFields,
    AcquireMethod::DebugText,
    AcquireMethod::DomPanel,
];

const FAILURES: [AcquireFailure; 2] = [
    AcquireFailure::NoPlayerHandle,
    AcquireFailure::NoBandwidthField,
];

const SOURCES: [DisplaySource; 3] = [
    DisplaySource::Live,
    DisplaySource::Holdover,
    DisplaySource::Unavailable,
];

const UNITS: [DisplayUnit; 2] = [DisplayUnit::MegabytesPerSecond, DisplayUnit::MegabitsPerSecond];

const TIERS: [Tier; 5] = [
    Tier::Warning,
    Tier::Fair,
    Tier::Good,
    Tier::Excellent,
    Tier::Cyber,
];

const LIFECYCLES: [Lifecycle; 2] = [Lifecycle::Inactive, Lifecycle::Active];

const MODES: [MountMode; 3] = [MountMode::Primary, MountMode::Fallback, MountMode::Overlay];

/// Position of `value` in `table`, as a one-byte code.
fn code_of<T: PartialEq>(table: &[T], value: &T) -> u8 {
    let index = table.iter().position(|t| t == value).unwrap_or(0);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "code tables hold fewer than 256 entries"
    )]
    let code = index as u8;
    code
}

fn from_code<T: Copy>(table: &[T], code: u8) -> Option<T> {
    table.get(usize::from(code)).copied()
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_option_f64(&mut self, v: Option<f64>) {
        self.write_option_u64(v.map(f64::to_bits));
    }

    fn write_sample(&mut self, sample: BandwidthSample) {
        match sample {
            BandwidthSample::Measured { kbps, method } => {
                self.write_u8(0);
                self.write_u8(code_of(&METHODS, &method));
                self.write_f64(kbps);
            }
            BandwidthSample::Missing(reason) => {
                self.write_u8(1);
                self.write_u8(code_of(&FAILURES, &reason));
                self.write_f64(0.0);
            }
        }
    }

    fn write_outcome(&mut self, outcome: MountOutcome) {
        let (kind, mode) = match outcome {
            MountOutcome::Created(mode) => (0, code_of(&MODES, &mode)),
            MountOutcome::Moved => (1, 0),
            MountOutcome::Unchanged => (2, 0),
            MountOutcome::Unresolved => (3, 0),
        };
        self.write_u8(kind);
        self.write_u8(mode);
    }
}

impl TraceSink for RecorderSink {
    fn on_acquire(&mut self, e: &AcquireEvent) {
        self.write_u8(TAG_ACQUIRE);
        self.write_u64(e.tick);
        self.write_u64(e.at.millis());
        self.write_sample(e.sample);
    }

    fn on_display(&mut self, e: &DisplayEvent) {
        self.write_u8(TAG_DISPLAY);
        self.write_u64(e.tick);
        self.write_u64(e.at.millis());
        self.write_u8(code_of(&SOURCES, &e.source));
        self.write_u8(code_of(&UNITS, &e.unit));
        self.write_option_f64(e.value);
        self.write_u8(code_of(&TIERS, &e.tier));
    }

    fn on_tier_change(&mut self, e: &TierChangeEvent) {
        self.write_u8(TAG_TIER_CHANGE);
        self.write_u64(e.tick);
        self.write_u8(code_of(&TIERS, &e.change.from));
        self.write_u8(code_of(&TIERS, &e.change.to));
        self.write_u64(e.change.at.millis());
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_u64(e.transition);
        self.write_u8(code_of(&LIFECYCLES, &e.from));
        self.write_u8(code_of(&LIFECYCLES, &e.to));
    }

    fn on_mount(&mut self, e: &MountEvent) {
        self.write_u8(TAG_MOUNT);
        self.write_u64(e.tick);
        self.write_option_u64(e.at.map(HostTime::millis));
        self.write_outcome(e.outcome);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// An [`AcquireEvent`].
    Acquire(AcquireEvent),
    /// A [`DisplayEvent`].
    Display(DisplayEvent),
    /// A [`TierChangeEvent`].
    TierChange(TierChangeEvent),
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`MountEvent`].
    Mount(MountEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_code<T: Copy>(&mut self, table: &[T]) -> Option<T> {
        from_code(table, self.read_u8()?)
    }

    fn read_sample(&mut self) -> Option<BandwidthSample> {
        let kind = self.read_u8()?;
        let code = self.read_u8()?;
        let kbps = self.read_f64()?;
        match kind {
            0 => Some(BandwidthSample::Measured {
                kbps,
                method: from_code(&METHODS, code)?,
            }),
            1 => Some(BandwidthSample::Missing(from_code(&FAILURES, code)?)),
            _ => None,
        }
    }

    fn read_outcome(&mut self) -> Option<MountOutcome> {
        let kind = self.read_u8()?;
        let mode = self.read_u8()?;
        match kind {
            0 => Some(MountOutcome::Created(from_code(&MODES, mode)?)),
            1 => Some(MountOutcome::Moved),
            2 => Some(MountOutcome::Unchanged),
            3 => Some(MountOutcome::Unresolved),
            _ => None,
        }
    }

    fn decode_acquire(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Acquire(AcquireEvent {
            tick: self.read_u64()?,
            at: HostTime(self.read_u64()?),
            sample: self.read_sample()?,
        }))
    }

    fn decode_display(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Display(DisplayEvent {
            tick: self.read_u64()?,
            at: HostTime(self.read_u64()?),
            source: self.read_code(&SOURCES)?,
            unit: self.read_code(&UNITS)?,
            value: self.read_option_u64()?.map(f64::from_bits),
            tier: self.read_code(&TIERS)?,
        }))
    }

    fn decode_tier_change(&mut self) -> Option<RecordedEvent> {
        let tick = self.read_u64()?;
        let from = self.read_code(&TIERS)?;
        let to = self.read_code(&TIERS)?;
        let at = HostTime(self.read_u64()?);
        Some(RecordedEvent::TierChange(TierChangeEvent {
            tick,
            change: TierChange { from, to, at },
        }))
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            transition: self.read_u64()?,
            from: self.read_code(&LIFECYCLES)?,
            to: self.read_code(&LIFECYCLES)?,
        }))
    }

    fn decode_mount(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Mount(MountEvent {
            tick: self.read_u64()?,
            at: self.read_option_u64()?.map(HostTime),
            outcome: self.read_outcome()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_ACQUIRE => self.decode_acquire(),
            TAG_DISPLAY => self.decode_display(),
            TAG_TIER_CHANGE => self.decode_tier_change(),
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_MOUNT => self.decode_mount(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn measured() -> AcquireEvent {
        AcquireEvent {
            tick: 7,
            at: HostTime(7_000),
            sample: BandwidthSample::Measured {
                kbps: 12_345.5,
                method: AcquireMethod::StatsFields,
            },
        }
    }

    fn display() -> DisplayEvent {
        DisplayEvent {
            tick: 7,
            at: HostTime(7_000),
            source: DisplaySource::Live,
            unit: DisplayUnit::MegabitsPerSecond,
            value: Some(12.64),
            tier: Tier::Excellent,
        }
    }

    #[test]
    fn one_session_in_order() {
        let mut rec = RecorderSink::new();
        let lifecycle = LifecycleEvent {
            transition: 1,
            from: Lifecycle::Inactive,
            to: Lifecycle::Active,
        };
        let mount = MountEvent {
            tick: 0,
            at: None,
            outcome: MountOutcome::Created(MountMode::Fallback),
        };
        let tier = TierChangeEvent {
            tick: 7,
            change: TierChange {
                from: Tier::Warning,
                to: Tier::Excellent,
                at: HostTime(7_000),
            },
        };
        rec.on_lifecycle(&lifecycle);
        rec.on_mount(&mount);
        rec.on_acquire(&measured());
        rec.on_tier_change(&tier);
        rec.on_display(&display());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            vec![
                RecordedEvent::Lifecycle(lifecycle),
                RecordedEvent::Mount(mount),
                RecordedEvent::Acquire(measured()),
                RecordedEvent::TierChange(tier),
                RecordedEvent::Display(display()),
            ]
        );
    }

    #[test]
    fn missing_samples_keep_their_reason() {
        let mut rec = RecorderSink::new();
        let event = AcquireEvent {
            sample: BandwidthSample::Missing(AcquireFailure::NoBandwidthField),
            ..measured()
        };
        rec.on_acquire(&event);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, vec![RecordedEvent::Acquire(event)]);
    }

    #[test]
    fn truncated_record_stops() {
        let mut rec = RecorderSink::new();
        rec.on_acquire(&measured());
        rec.on_display(&display());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        let events: Vec<_> = decode(cut).collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_tag_stops() {
        let events: Vec<_> = decode(&[0xFF, 1, 2, 3]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut rec = RecorderSink::new();
        rec.on_acquire(&measured());
        assert!(!rec.as_bytes().is_empty());
        rec.clear();
        assert_eq!(decode(rec.as_bytes()).count(), 0);
    }
}
