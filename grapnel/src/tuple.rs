//! Deferred execution units and the shared FIFO queue.
//!
//! Agents never execute actions inline. Each dispatch produces an
//! [`EventGrabberTuple`] that is appended to the dispatcher's single shared
//! queue and consumed exactly once by the drain phase, strictly in arrival
//! order, after every agent has been polled for the tick. Sampling all
//! inputs before applying any effects prevents an action executed early in
//! a tick from altering a grabber's claim predicate for an event sampled
//! later in the same tick.

use std::{collections::VecDeque, sync::Arc};

use tracing::{error, trace};

use crate::{
    action::Action,
    event::Event,
    grabber::{GrabberResult, SharedGrabber},
};

/// A deferred `[event, resolved action, grabber]` execution unit.
#[derive(Clone)]
pub struct EventGrabberTuple<A: Action> {
    event: Event<A>,
    action: Option<A>,
    grabber: SharedGrabber<A>,
}

impl<A: Action> EventGrabberTuple<A> {
    /// Creates a tuple from a profile-resolved action.
    ///
    /// A resolvable tuple with no bound action is silently dropped rather
    /// than executed, so `None` yields no tuple.
    pub fn resolved(event: Event<A>, action: Option<A>, grabber: SharedGrabber<A>) -> Option<Self> {
        let action = action?;
        Some(Self {
            event,
            action: Some(action),
            grabber,
        })
    }

    /// Creates an action-less tuple forwarding a raw event to a foreign
    /// grabber, bypassing action resolution entirely.
    pub fn forwarded(event: Event<A>, grabber: SharedGrabber<A>) -> Self {
        Self {
            event,
            action: None,
            grabber,
        }
    }

    /// The queued event.
    pub fn event(&self) -> &Event<A> {
        &self.event
    }

    /// The resolved action, if this is an action-carrying tuple.
    pub fn action(&self) -> Option<A> {
        self.action
    }

    /// Executes the tuple once: attaches the action to a copy of the event
    /// and hands it to the grabber.
    pub fn perform(&self) -> GrabberResult {
        let mut grabber = self.grabber.lock();
        match self.action {
            Some(action) => grabber.execute(&self.event.with_action(action)),
            None => grabber.execute(&self.event),
        }
    }
}

impl<A: Action> PartialEq for EventGrabberTuple<A> {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event
            && self.action == other.action
            && Arc::ptr_eq(&self.grabber, &other.grabber)
    }
}

impl<A: Action> std::fmt::Debug for EventGrabberTuple<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventGrabberTuple")
            .field("event", &self.event)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// The FIFO queue of deferred tuples, owned by the dispatcher and shared by
/// all agents.
#[derive(Debug)]
pub struct TupleQueue<A: Action> {
    queue: VecDeque<EventGrabberTuple<A>>,
}

impl<A: Action> Default for TupleQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> TupleQueue<A> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends a tuple unless its event is null or an equal tuple is
    /// already queued. Returns whether the tuple was admitted.
    pub fn enqueue(&mut self, tuple: EventGrabberTuple<A>) -> bool {
        if tuple.event.is_null() {
            trace!("null event suppressed");
            return false;
        }
        self.enqueue_forced(tuple)
    }

    /// Appends a tuple without the null-event admission check. Continuous
    /// gestures use this path so a held key keeps producing effect even when
    /// the device reports zero delta. Duplicate suppression still applies.
    pub fn enqueue_forced(&mut self, tuple: EventGrabberTuple<A>) -> bool {
        if self.queue.iter().any(|queued| queued == &tuple) {
            trace!("duplicate tuple suppressed");
            return false;
        }
        self.queue.push_back(tuple);
        true
    }

    /// Pops and executes every queued tuple strictly in arrival order.
    ///
    /// A failure inside one tuple is logged and never aborts the drain of
    /// subsequent tuples.
    pub fn drain_all(&mut self) {
        while let Some(tuple) = self.queue.pop_front() {
            if let Err(err) = tuple.perform() {
                error!(action = ?tuple.action(), %err, "tuple execution failed");
            }
        }
    }

    /// Number of queued tuples.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Discards all queued tuples without executing them.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
