//! Multi-touch centroid tracking.
//!
//! [`TouchTracker`] aggregates per-point begin/move/end samples into 2-DOF
//! absolute motion events positioned at the centroid of all active points.
//! When a point joins or leaves, the centroid jumps; the tracker re-anchors
//! instead of emitting, so the jump never registers as movement and the next
//! move event chains against the new anchor with an honest delta.
//!
//! A rolling ~100 ms window of velocity samples backs the averaged release
//! velocity, which callers feed into inertial continuation.

use std::{collections::VecDeque, time::Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{action::Action, event::Event, shortcut::Modifiers};

/// Age limit for velocity samples, in milliseconds.
const VELOCITY_WINDOW_MS: u128 = 100;

/// Aggregates active touch points into centroid motion events.
pub struct TouchTracker<A: Action> {
    points: FxHashMap<u64, (f32, f32)>,
    anchor: Option<Event<A>>,
    velocity_history: VecDeque<(Instant, f32, f32)>,
}

impl<A: Action> Default for TouchTracker<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> TouchTracker<A> {
    /// Creates a tracker with no active points.
    pub fn new() -> Self {
        Self {
            points: FxHashMap::default(),
            anchor: None,
            velocity_history: VecDeque::new(),
        }
    }

    /// Number of currently active touch points.
    pub fn active_points(&self) -> usize {
        self.points.len()
    }

    /// Centroid of the active points, if any.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.points.is_empty() {
            return None;
        }
        let count = self.points.len() as f32;
        let (sum_x, sum_y) = self
            .points
            .values()
            .fold((0.0f32, 0.0f32), |(sx, sy), (x, y)| (sx + x, sy + y));
        Some((sum_x / count, sum_y / count))
    }

    /// Registers a new touch point.
    ///
    /// Never emits an event: the centroid moved because the point set
    /// changed, not because anything travelled, so the tracker re-anchors at
    /// the new centroid instead.
    pub fn touch_began(&mut self, id: u64, x: f32, y: f32, modifiers: Modifiers, now: Instant) {
        self.points.insert(id, (x, y));
        trace!(id, active = self.points.len(), "touch began");
        self.reanchor(modifiers, now);
    }

    /// Updates a point's position and emits the chained centroid event.
    ///
    /// Returns `None` for an unknown point id or when no anchor exists yet.
    /// The returned event is absolute 2-DOF motion chained against the
    /// previous centroid, so its deltas, delay and speed reflect actual
    /// centroid travel.
    pub fn touch_moved(
        &mut self,
        id: u64,
        x: f32,
        y: f32,
        modifiers: Modifiers,
        now: Instant,
    ) -> Option<Event<A>> {
        if !self.points.contains_key(&id) {
            return None;
        }
        self.points.insert(id, (x, y));
        let (cx, cy) = self.centroid()?;
        let anchor = self.anchor.take()?;
        let event = Event::motion(modifiers, now, None, &[cx, cy], false).chained(&anchor);
        if event.delay_ms() > 0.0 {
            // Samples are per-second so a release flick reads naturally.
            let vx = event.delta(0) / event.delay_ms() * 1_000.0;
            let vy = event.delta(1) / event.delay_ms() * 1_000.0;
            self.record_velocity_sample(now, vx, vy);
        }
        self.anchor = Some(event.clone());
        Some(event)
    }

    /// Removes a touch point.
    ///
    /// Re-anchors at the surviving centroid (the leave-jump must not read as
    /// movement). When the last point leaves, returns the averaged velocity
    /// over the recent sample window, for the caller to seed inertial
    /// continuation with; earlier removals return `None`.
    pub fn touch_ended(
        &mut self,
        id: u64,
        modifiers: Modifiers,
        now: Instant,
    ) -> Option<(f32, f32)> {
        if self.points.remove(&id).is_none() {
            return None;
        }
        trace!(id, active = self.points.len(), "touch ended");
        if self.points.is_empty() {
            let velocity = self.average_velocity();
            self.anchor = None;
            self.velocity_history.clear();
            return velocity;
        }
        self.reanchor(modifiers, now);
        None
    }

    /// Drops all points, the anchor and the velocity window.
    pub fn clear(&mut self) {
        self.points.clear();
        self.anchor = None;
        self.velocity_history.clear();
    }

    /// Average velocity over the recent sample window, if any samples exist.
    pub fn average_velocity(&self) -> Option<(f32, f32)> {
        if self.velocity_history.is_empty() {
            return None;
        }
        let count = self.velocity_history.len() as f32;
        let (sum_x, sum_y) = self
            .velocity_history
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), &(_, vx, vy)| {
                (sx + vx, sy + vy)
            });
        Some((sum_x / count, sum_y / count))
    }

    fn reanchor(&mut self, modifiers: Modifiers, now: Instant) {
        self.anchor = self
            .centroid()
            .map(|(cx, cy)| Event::motion(modifiers, now, None, &[cx, cy], false));
    }

    fn record_velocity_sample(&mut self, now: Instant, vx: f32, vy: f32) {
        self.velocity_history.push_back((now, vx, vy));
        while let Some(&(sample_time, _, _)) = self.velocity_history.front() {
            if now.duration_since(sample_time).as_millis() > VELOCITY_WINDOW_MS {
                self.velocity_history.pop_front();
            } else {
                break;
            }
        }
    }
}
