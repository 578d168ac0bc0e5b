//! Uniform input-event representation.
//!
//! Every raw input sample (mouse, keyboard, joystick, wheel, aggregated
//! multi-touch) becomes one [`Event`]: a modifier bitmask, a monotonic
//! timestamp, a kind-specific payload and an optionally attached action.
//! Motion events chained to a predecessor of the same shape compute their
//! per-axis deltas, elapsed delay, travelled distance and speed at
//! construction time; everything afterwards treats the event as immutable.
//!
//! Chaining against a predecessor of a different shape does not fail; it
//! degrades gracefully by zeroing the derived fields.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::warn;

use crate::{
    action::Action,
    shortcut::{Modifiers, Shortcut, Trigger},
};

/// Near-zero threshold for null-event detection.
///
/// Derived from the machine epsilon of the payload type rather than a fixed
/// magnitude, so raw-device noise around zero never spuriously registers as
/// a non-null event while real sub-pixel motion still does.
pub const NULL_EPSILON: f32 = f32::EPSILON * 4.0;

/// Runtime discriminator used to select the applicable profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Multi-axis motion (pointer, touch centroid, joystick).
    Motion,
    /// Wheel motion, kept as its own kind so it can bind its own profile.
    Wheel,
    /// A button press with a click count.
    Click,
    /// A virtual-key event.
    Key,
}

/// Per-degree-of-freedom motion payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionData {
    /// Absolute axis values (positions for pointer streams, axis readings
    /// for absolute devices).
    pub values: SmallVec<[f32; 6]>,
    /// Per-axis deltas against the chained predecessor; all zero for an
    /// unchained event.
    pub deltas: SmallVec<[f32; 6]>,
    /// Relative events carry meaning in their deltas; absolute events in
    /// their values. Governs null detection and modulation.
    pub relative: bool,
    /// Button held during the motion, if any.
    pub button: Option<u32>,
    /// Milliseconds elapsed since the chained predecessor.
    pub delay_ms: f32,
    /// Euclidean length of the delta vector.
    pub distance: f32,
    /// Distance per millisecond; equals `distance` when `delay_ms` is zero.
    pub speed: f32,
}

/// Kind-specific payload of an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Multi-axis motion.
    Motion(MotionData),
    /// Wheel motion (one axis, always relative).
    Wheel(MotionData),
    /// Button press.
    Click {
        /// The pointer-device button id.
        button: u32,
        /// Number of rapid repeated activations.
        count: u8,
    },
    /// Virtual-key press.
    Key {
        /// The virtual key code.
        key: u32,
    },
}

/// An immutable input event, constructed once per raw sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<A: Action> {
    modifiers: Modifiers,
    timestamp: Instant,
    payload: EventPayload,
    action: Option<A>,
}

impl<A: Action> Event<A> {
    /// Creates a motion event. Deltas start at zero; chain the event with
    /// [`chained`](Self::chained) to derive them from a predecessor.
    pub fn motion(
        modifiers: Modifiers,
        timestamp: Instant,
        button: Option<u32>,
        values: &[f32],
        relative: bool,
    ) -> Self {
        let data = MotionData {
            values: SmallVec::from_slice(values),
            deltas: SmallVec::from_elem(0.0, values.len()),
            relative,
            button,
            ..MotionData::default()
        };
        Self {
            modifiers,
            timestamp,
            payload: EventPayload::Motion(data),
            action: None,
        }
    }

    /// Creates a wheel event from a standalone delta sample.
    ///
    /// Wheel devices report deltas directly, so the single axis carries the
    /// delta as both value and delta and the event is relative.
    pub fn wheel(modifiers: Modifiers, timestamp: Instant, delta: f32) -> Self {
        let data = MotionData {
            values: SmallVec::from_slice(&[delta]),
            deltas: SmallVec::from_slice(&[delta]),
            relative: true,
            distance: delta.abs(),
            speed: delta.abs(),
            ..MotionData::default()
        };
        Self {
            modifiers,
            timestamp,
            payload: EventPayload::Wheel(data),
            action: None,
        }
    }

    /// Creates a click event.
    pub fn click(modifiers: Modifiers, timestamp: Instant, button: u32, count: u8) -> Self {
        Self {
            modifiers,
            timestamp,
            payload: EventPayload::Click { button, count },
            action: None,
        }
    }

    /// Creates a virtual-key event.
    pub fn key(modifiers: Modifiers, timestamp: Instant, key: u32) -> Self {
        Self {
            modifiers,
            timestamp,
            payload: EventPayload::Key { key },
            action: None,
        }
    }

    /// Chains this event to a predecessor, deriving deltas, delay, distance
    /// and speed.
    ///
    /// The predecessor must be of the same kind with the same axis count;
    /// any other predecessor zeroes the derived fields instead of failing.
    /// Non-motion events are returned unchanged.
    pub fn chained(mut self, previous: &Event<A>) -> Self {
        match (&mut self.payload, &previous.payload) {
            (EventPayload::Motion(data), EventPayload::Motion(prev))
                if data.values.len() == prev.values.len() =>
            {
                for (i, delta) in data.deltas.iter_mut().enumerate() {
                    *delta = data.values[i] - prev.values[i];
                }
                data.delay_ms = elapsed_ms(previous.timestamp, self.timestamp);
                data.distance = euclidean(&data.deltas);
                data.speed = if data.delay_ms == 0.0 {
                    data.distance
                } else {
                    data.distance / data.delay_ms
                };
            }
            (EventPayload::Wheel(data), EventPayload::Wheel(_)) => {
                // Wheel deltas are already direct samples; chaining only
                // contributes the timing bookkeeping.
                data.delay_ms = elapsed_ms(previous.timestamp, self.timestamp);
                data.distance = euclidean(&data.deltas);
                data.speed = if data.delay_ms == 0.0 {
                    data.distance
                } else {
                    data.distance / data.delay_ms
                };
            }
            (EventPayload::Motion(data) | EventPayload::Wheel(data), _) => {
                // Mismatched predecessor: degrade gracefully.
                data.deltas.iter_mut().for_each(|d| *d = 0.0);
                data.delay_ms = 0.0;
                data.distance = 0.0;
                data.speed = 0.0;
            }
            _ => {}
        }
        self
    }

    /// Scales the axis values of an absolute motion event by per-axis
    /// sensitivities. Relative events are never modulated here; their
    /// deltas belong to whoever consumes them.
    pub fn modulate(&mut self, sensitivities: &[f32]) {
        if let EventPayload::Motion(data) | EventPayload::Wheel(data) = &mut self.payload
            && !data.relative
        {
            for (value, sensitivity) in data.values.iter_mut().zip(sensitivities) {
                *value *= sensitivity;
            }
        }
    }

    /// True iff the event carries no effective input: all deltas (relative
    /// mode) or all values (absolute mode) within epsilon of zero. Click and
    /// key events are never null.
    pub fn is_null(&self) -> bool {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => {
                let axes = if data.relative {
                    &data.deltas
                } else {
                    &data.values
                };
                axes.iter().all(|v| v.abs() <= NULL_EPSILON)
            }
            _ => false,
        }
    }

    /// Derives the shortcut this event resolves against.
    pub fn shortcut(&self) -> Shortcut {
        match &self.payload {
            EventPayload::Motion(data) => Shortcut {
                modifiers: self.modifiers,
                trigger: data.button.map(Trigger::Button),
            },
            EventPayload::Wheel(_) => Shortcut::bare(self.modifiers),
            EventPayload::Click { button, count } => {
                Shortcut::click(self.modifiers, *button, *count)
            }
            EventPayload::Key { key } => Shortcut::key(self.modifiers, *key),
        }
    }

    /// Attaches a resolved action.
    ///
    /// A motion-consuming action cannot ride on an axis-less event kind
    /// (click, key); it is dropped with a diagnostic and the event keeps
    /// propagating plain. A motion event with fewer axes than the action
    /// nominally consumes still carries it: the receiver reads the axes
    /// that exist and treats the rest as zero. Returns whether the
    /// attachment took effect.
    pub fn attach(&mut self, action: A) -> bool {
        if action.degrees_of_freedom() > 0 && self.degrees_of_freedom() == 0 {
            warn!(
                action = action.description(),
                kind = ?self.kind(),
                "action dropped: event kind cannot carry it"
            );
            return false;
        }
        self.action = Some(action);
        true
    }

    /// Copy of this event with the action attached (subject to the same
    /// admission rule as [`attach`](Self::attach)).
    pub fn with_action(&self, action: A) -> Self {
        let mut event = self.clone();
        event.attach(action);
        event
    }

    /// The attached action, if any.
    pub fn action(&self) -> Option<A> {
        self.action
    }

    /// The modifier bitmask sampled with the event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The monotonic timestamp of the raw sample.
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// The runtime kind, used for per-kind profile selection.
    pub fn kind(&self) -> EventKind {
        match &self.payload {
            EventPayload::Motion(_) => EventKind::Motion,
            EventPayload::Wheel(_) => EventKind::Wheel,
            EventPayload::Click { .. } => EventKind::Click,
            EventPayload::Key { .. } => EventKind::Key,
        }
    }

    /// The kind-specific payload.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Number of axes the event carries.
    pub fn degrees_of_freedom(&self) -> usize {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => data.values.len(),
            _ => 0,
        }
    }

    /// Axis value, or zero when out of range or not a motion event.
    pub fn value(&self, axis: usize) -> f32 {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => {
                data.values.get(axis).copied().unwrap_or(0.0)
            }
            _ => 0.0,
        }
    }

    /// Axis delta, or zero when out of range or not a motion event.
    pub fn delta(&self, axis: usize) -> f32 {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => {
                data.deltas.get(axis).copied().unwrap_or(0.0)
            }
            _ => 0.0,
        }
    }

    /// Milliseconds elapsed since the chained predecessor.
    pub fn delay_ms(&self) -> f32 {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => data.delay_ms,
            _ => 0.0,
        }
    }

    /// Euclidean length of the delta vector.
    pub fn distance(&self) -> f32 {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => data.distance,
            _ => 0.0,
        }
    }

    /// Distance per millisecond.
    pub fn speed(&self) -> f32 {
        match &self.payload {
            EventPayload::Motion(data) | EventPayload::Wheel(data) => data.speed,
            _ => 0.0,
        }
    }
}

fn elapsed_ms(from: Instant, to: Instant) -> f32 {
    // duration_since saturates to zero for out-of-order timestamps.
    to.duration_since(from).as_secs_f32() * 1_000.0
}

fn euclidean(deltas: &[f32]) -> f32 {
    deltas.iter().map(|d| d * d).sum::<f32>().sqrt()
}
