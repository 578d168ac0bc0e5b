//! Agent registration and the frame-driven dispatch loop.
//!
//! The dispatcher owns the single FIFO tuple queue shared by all agents and
//! the name-keyed registration list. Once per application tick it polls
//! every registered agent in registration order, running staged raw events
//! through focus tracking and handling, and only then drains the queue, so
//! all inputs are sampled before any effects execute.
//!
//! The whole loop is single-threaded and cooperative: one tick runs to
//! completion before the next external event is accepted. The frame counter
//! lives here, on the dispatcher, rather than in process-wide state.

use tracing::{trace, warn};

use crate::{
    action::Action,
    agent::TickAgent,
    tuple::{EventGrabberTuple, TupleQueue},
};

/// The frame-loop owner: agent registry, shared tuple queue and frame
/// counter.
#[derive(Debug)]
pub struct Dispatcher<A: Action> {
    registered: Vec<String>,
    queue: TupleQueue<A>,
    frame: u64,
}

impl<A: Action> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> Dispatcher<A> {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
            queue: TupleQueue::new(),
            frame: 0,
        }
    }

    /// Registers an agent name. Duplicate names are rejected with a
    /// diagnostic, not a panic. Returns whether registration took effect.
    pub fn register_agent(&mut self, name: &str) -> bool {
        if self.is_agent_registered(name) {
            warn!(agent = name, "agent already registered");
            return false;
        }
        self.registered.push(name.to_owned());
        true
    }

    /// Unregisters an agent name. Already-enqueued tuples stay queued: an
    /// in-flight action still executes once queued. Returns whether the
    /// agent was registered.
    pub fn unregister_agent(&mut self, name: &str) -> bool {
        let before = self.registered.len();
        self.registered.retain(|registered| registered != name);
        before != self.registered.len()
    }

    /// Whether the agent name is currently registered.
    pub fn is_agent_registered(&self, name: &str) -> bool {
        self.registered.iter().any(|registered| registered == name)
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The shared tuple queue.
    pub fn queue(&self) -> &TupleQueue<A> {
        &self.queue
    }

    /// The shared tuple queue, mutably.
    pub(crate) fn queue_mut(&mut self) -> &mut TupleQueue<A> {
        &mut self.queue
    }

    /// Appends a tuple through the ordinary admission rules.
    pub fn enqueue(&mut self, tuple: EventGrabberTuple<A>) -> bool {
        self.queue.enqueue(tuple)
    }

    /// Appends a tuple bypassing the null-event admission rule. Used by
    /// continuous gestures that must keep firing on zero-delta input.
    pub fn enqueue_forced(&mut self, tuple: EventGrabberTuple<A>) -> bool {
        self.queue.enqueue_forced(tuple)
    }

    /// Runs one tick: polls every registered agent in registration order,
    /// feeding staged raw events through focus tracking and handling, then
    /// drains the tuple queue strictly FIFO.
    ///
    /// Agents absent from the slice (or not registered) are skipped.
    pub fn tick(&mut self, agents: &mut [&mut dyn TickAgent<A>]) {
        let Self {
            registered,
            queue,
            frame,
        } = self;
        *frame += 1;
        trace!(frame = *frame, "tick");

        for name in registered.iter() {
            let Some(entry) = agents
                .iter_mut()
                .find(|candidate| candidate.agent().name() == name)
            else {
                continue;
            };
            let agent = entry.agent_mut();
            while let Some(event) = agent.feed() {
                agent.update_focus(&event);
                agent.handle_into(&event, queue);
            }
        }

        queue.drain_all();
    }
}
