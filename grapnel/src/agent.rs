//! Focus-tracking agents and the event-to-action pipeline.
//!
//! An [`Agent`] owns a pool of grabbers, a currently tracked grabber, a
//! default fallback grabber and one binding profile per event kind. Each raw
//! event goes through [`update_focus`](Agent::update_focus) (predicate-based,
//! first-match pool scan with a stability bias toward the already tracked
//! grabber) and then [`handle`](Agent::handle), which resolves an action
//! through the applicable profile and appends a deferred tuple to the
//! dispatcher's shared queue.
//!
//! Focus resolution is deliberately simple: no z-order or bounding-box
//! arbitration is layered on top. Callers needing priority must order their
//! pool accordingly.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    action::Action,
    dispatcher::Dispatcher,
    event::{Event, EventKind},
    grabber::SharedGrabber,
    profile::Profile,
    tuple::{EventGrabberTuple, TupleQueue},
};

/// Maximum number of staged raw events kept per agent, to prevent unbounded
/// growth when ticks stall.
const KEEP_EVENTS_COUNT: usize = 10;

/// An input agent: grabber pool, focus state, per-kind profiles and a
/// bounded staging buffer of raw events awaiting the next tick.
pub struct Agent<A: Action> {
    name: String,
    pool: Vec<SharedGrabber<A>>,
    tracked: Option<SharedGrabber<A>>,
    default: Option<SharedGrabber<A>>,
    tracking_enabled: bool,
    profiles: FxHashMap<EventKind, Profile<A>>,
    staged: VecDeque<Event<A>>,
}

impl<A: Action> Agent<A> {
    /// Creates an agent with the given unique name. Tracking starts
    /// enabled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pool: Vec::new(),
            tracked: None,
            default: None,
            tracking_enabled: true,
            profiles: FxHashMap::default(),
            staged: VecDeque::new(),
        }
    }

    /// The agent's unique registration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a grabber to the pool. Membership is by pointer identity, so
    /// adding an already pooled grabber is a no-op.
    pub fn add_grabber(&mut self, grabber: SharedGrabber<A>) {
        if !self.has_grabber(&grabber) {
            self.pool.push(grabber);
        }
    }

    /// Removes a grabber from the pool, clearing tracked and default
    /// references to it.
    pub fn remove_grabber(&mut self, grabber: &SharedGrabber<A>) {
        self.pool
            .retain(|pooled| !std::sync::Arc::ptr_eq(pooled, grabber));
        if let Some(tracked) = &self.tracked
            && std::sync::Arc::ptr_eq(tracked, grabber)
        {
            self.tracked = None;
        }
        if let Some(default) = &self.default
            && std::sync::Arc::ptr_eq(default, grabber)
        {
            self.default = None;
        }
    }

    /// Whether the grabber is a pool member.
    pub fn has_grabber(&self, grabber: &SharedGrabber<A>) -> bool {
        self.pool
            .iter()
            .any(|pooled| std::sync::Arc::ptr_eq(pooled, grabber))
    }

    /// Sets the fallback grabber used when nothing claims focus.
    pub fn set_default_grabber(&mut self, grabber: Option<SharedGrabber<A>>) {
        self.default = grabber;
    }

    /// The currently tracked grabber, if any.
    pub fn tracked_grabber(&self) -> Option<SharedGrabber<A>> {
        self.tracked.clone()
    }

    /// The effective receiver: the tracked grabber, or the default when
    /// nothing is tracked.
    pub fn grabber(&self) -> Option<SharedGrabber<A>> {
        self.tracked.clone().or_else(|| self.default.clone())
    }

    /// Whether focus tracking is enabled.
    pub fn is_tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    /// Enables or disables focus tracking. Disabling immediately forgets
    /// the tracked grabber so no stale focus survives a tracking pause.
    pub fn set_tracking(&mut self, enabled: bool) {
        self.tracking_enabled = enabled;
        if !enabled {
            self.tracked = None;
        }
    }

    /// Mutable access to the profile for an event kind, creating an empty
    /// one on first use.
    pub fn profile_mut(&mut self, kind: EventKind) -> &mut Profile<A> {
        self.profiles.entry(kind).or_default()
    }

    /// The profile for an event kind, if one exists.
    pub fn profile(&self, kind: EventKind) -> Option<&Profile<A>> {
        self.profiles.get(&kind)
    }

    /// Replaces the profile for an event kind.
    pub fn set_profile(&mut self, kind: EventKind, profile: Profile<A>) {
        self.profiles.insert(kind, profile);
    }

    /// Resolves an event to an action through the profile matching its
    /// kind.
    pub fn resolve(&self, event: &Event<A>) -> Option<A> {
        self.profiles
            .get(&event.kind())
            .and_then(|profile| profile.resolve(event))
    }

    /// Recomputes the tracked grabber for a raw event.
    ///
    /// If the tracked grabber still claims the event it stays tracked even
    /// when other pool members would also claim it (stability bias against
    /// focus flicker). Otherwise the pool is scanned in insertion order and
    /// the first claiming grabber is adopted; if none claims, focus falls
    /// back to the default.
    pub fn update_focus(&mut self, event: &Event<A>) -> Option<SharedGrabber<A>> {
        if !self.tracking_enabled {
            return None;
        }
        if let Some(tracked) = &self.tracked
            && tracked.lock().claims(event)
        {
            return Some(tracked.clone());
        }
        self.tracked = None;
        for grabber in &self.pool {
            if grabber.lock().claims(event) {
                self.tracked = Some(grabber.clone());
                break;
            }
        }
        self.tracked.clone()
    }

    /// Stages a raw event for the next dispatcher tick. The buffer is
    /// bounded; the oldest staged event is discarded on overflow.
    pub fn push_event(&mut self, event: Event<A>) {
        self.staged.push_back(event);
        if self.staged.len() > KEEP_EVENTS_COUNT {
            self.staged.pop_front();
        }
    }

    /// Pulls the next staged raw event, if any. Called by the dispatcher
    /// when polling self-feeding agents.
    pub fn feed(&mut self) -> Option<Event<A>> {
        self.staged.pop_front()
    }

    /// Resolves the event to an action and enqueues a deferred tuple.
    ///
    /// No-op when the event is null, the agent is not registered with the
    /// dispatcher, or no grabber is focused; three independent guards. A
    /// focused grabber outside the agent's action vocabulary receives the
    /// raw event without action resolution.
    pub fn handle(&mut self, event: &Event<A>, dispatcher: &mut Dispatcher<A>) {
        if !dispatcher.is_agent_registered(&self.name) {
            trace!(agent = %self.name, "handle ignored: agent not registered");
            return;
        }
        self.handle_into(event, dispatcher.queue_mut());
    }

    /// The registration-checked body of [`handle`](Self::handle), operating
    /// directly on the shared queue. Used by the dispatcher during a tick,
    /// where registration is already established.
    pub(crate) fn handle_into(&mut self, event: &Event<A>, queue: &mut TupleQueue<A>) {
        if event.is_null() {
            return;
        }
        let Some(grabber) = self.grabber() else {
            return;
        };
        let foreign = !grabber.lock().accepts_actions();
        if foreign {
            queue.enqueue(EventGrabberTuple::forwarded(event.clone(), grabber));
            return;
        }
        let action = self.resolve(event);
        if let Some(tuple) = EventGrabberTuple::resolved(event.clone(), action, grabber) {
            queue.enqueue(tuple);
        }
    }
}

/// An agent pollable by the dispatcher tick. Implemented by [`Agent`]
/// itself and by wrappers that build richer behavior on top of one, such as
/// [`PointerAgent`](crate::PointerAgent).
pub trait TickAgent<A: Action> {
    /// The underlying agent.
    fn agent(&self) -> &Agent<A>;

    /// The underlying agent, mutably.
    fn agent_mut(&mut self) -> &mut Agent<A>;
}

impl<A: Action> TickAgent<A> for Agent<A> {
    fn agent(&self) -> &Agent<A> {
        self
    }

    fn agent_mut(&mut self) -> &mut Agent<A> {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        shortcut::{Modifiers, Shortcut},
        test_support::{RecordingGrabber, TestAction},
    };

    fn motion_event(dx: f32) -> Event<TestAction> {
        let t0 = Instant::now();
        let previous = Event::motion(Modifiers::empty(), t0, Some(1), &[0.0], true);
        Event::motion(Modifiers::empty(), t0, Some(1), &[dx], true).chained(&previous)
    }

    #[test]
    fn test_focus_first_match_in_pool_order() {
        let mut agent = Agent::new("pointer");
        let first = RecordingGrabber::shared();
        let second = RecordingGrabber::shared();
        agent.add_grabber(first.clone());
        agent.add_grabber(second.clone());

        let first: SharedGrabber<TestAction> = first;
        let focused = agent.update_focus(&motion_event(1.0)).unwrap();
        assert!(std::sync::Arc::ptr_eq(&focused, &first));
    }

    #[test]
    fn test_focus_stability_bias() {
        let mut agent = Agent::new("pointer");
        let first = RecordingGrabber::shared();
        let second = RecordingGrabber::shared();
        // Insertion order would prefer `first`, but `second` is already
        // tracked and still claims, so it must stay tracked.
        agent.add_grabber(second.clone());
        agent.update_focus(&motion_event(1.0));
        agent.add_grabber(first);
        // A fresh scan would now find a different winner; stability wins.
        let second: SharedGrabber<TestAction> = second;
        let tracked = agent.update_focus(&motion_event(2.0)).unwrap();
        assert!(std::sync::Arc::ptr_eq(&tracked, &second));
    }

    #[test]
    fn test_focus_falls_back_to_default() {
        let mut agent = Agent::new("pointer");
        let aloof = RecordingGrabber::shared_claiming(false);
        let fallback = RecordingGrabber::shared();
        agent.add_grabber(aloof);
        agent.set_default_grabber(Some(fallback.clone()));

        assert!(agent.update_focus(&motion_event(1.0)).is_none());
        let fallback: SharedGrabber<TestAction> = fallback;
        let effective = agent.grabber().unwrap();
        assert!(std::sync::Arc::ptr_eq(&effective, &fallback));
    }

    #[test]
    fn test_disabling_tracking_clears_focus() {
        let mut agent = Agent::new("pointer");
        let grabber = RecordingGrabber::shared();
        agent.add_grabber(grabber);
        agent.update_focus(&motion_event(1.0));
        assert!(agent.tracked_grabber().is_some());

        agent.set_tracking(false);
        assert!(agent.tracked_grabber().is_none());
        // While disabled, update_focus never tracks.
        assert!(agent.update_focus(&motion_event(1.0)).is_none());
    }

    #[test]
    fn test_handle_guards() {
        let mut dispatcher = Dispatcher::new();
        let mut agent = Agent::new("pointer");
        let grabber = RecordingGrabber::shared();
        agent.add_grabber(grabber.clone());
        agent
            .profile_mut(EventKind::Motion)
            .bind(Shortcut::button(Modifiers::empty(), 1), TestAction::Rotate);

        // Guard: not registered.
        agent.update_focus(&motion_event(1.0));
        agent.handle(&motion_event(1.0), &mut dispatcher);
        assert!(dispatcher.queue().is_empty());

        dispatcher.register_agent("pointer");

        // Guard: null event.
        agent.handle(&motion_event(0.0), &mut dispatcher);
        assert!(dispatcher.queue().is_empty());

        // Guard: no focused grabber.
        let mut orphan: Agent<TestAction> = Agent::new("orphan");
        dispatcher.register_agent("orphan");
        orphan.handle(&motion_event(1.0), &mut dispatcher);
        assert!(dispatcher.queue().is_empty());

        // All guards pass.
        agent.handle(&motion_event(1.0), &mut dispatcher);
        assert_eq!(dispatcher.queue().len(), 1);
    }

    #[test]
    fn test_unresolved_action_enqueues_nothing() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_agent("pointer");
        let mut agent = Agent::new("pointer");
        agent.add_grabber(RecordingGrabber::shared());
        agent.update_focus(&motion_event(1.0));

        // No profile bound at all.
        agent.handle(&motion_event(1.0), &mut dispatcher);
        assert!(dispatcher.queue().is_empty());
    }

    #[test]
    fn test_foreign_grabber_gets_raw_forward() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_agent("pointer");
        let mut agent = Agent::new("pointer");
        let foreign = RecordingGrabber::shared_foreign();
        agent.add_grabber(foreign.clone());
        agent.update_focus(&motion_event(1.0));

        // No binding exists, yet the event is forwarded action-less.
        agent.handle(&motion_event(1.0), &mut dispatcher);
        assert_eq!(dispatcher.queue().len(), 1);

        dispatcher.queue_mut().drain_all();
        assert_eq!(foreign.lock().executed(), vec![None]);
    }

    #[test]
    fn test_staging_buffer_is_bounded() {
        let mut agent: Agent<TestAction> = Agent::new("pointer");
        for i in 0..(KEEP_EVENTS_COUNT + 5) {
            agent.push_event(motion_event(i as f32 + 1.0));
        }
        let mut drained = 0;
        while agent.feed().is_some() {
            drained += 1;
        }
        assert_eq!(drained, KEEP_EVENTS_COUNT);
    }

    #[test]
    fn test_remove_grabber_clears_references() {
        let mut agent = Agent::new("pointer");
        let grabber = RecordingGrabber::shared();
        agent.add_grabber(grabber.clone());
        agent.set_default_grabber(Some(grabber.clone()));
        agent.update_focus(&motion_event(1.0));

        let shared: SharedGrabber<TestAction> = grabber;
        agent.remove_grabber(&shared);
        assert!(!agent.has_grabber(&shared));
        assert!(agent.tracked_grabber().is_none());
        assert!(agent.grabber().is_none());
    }
}
