//! Press/drag/release gesture handling with inertial spin.
//!
//! [`PointerAgent`] builds the two-phase drag interaction on top of an
//! ordinary [`Agent`]: a press snapshots the gesture and classifies the
//! action that would apply, drags stream through the regular pipeline (or a
//! forced path for continuous actions that must survive zero-delta input),
//! and release settles everything: inertial spin when the terminal speed
//! clears the receiver's threshold, the one-shot zoom-region application,
//! hint clearing, damping restoration and drive-speed reset.
//!
//! The machine is a transparent passthrough for ordinary actions: for a
//! classification with no spin, drive or hint involvement, `press`, `drag`
//! and `release` have exactly the same observable effect as plain `handle`
//! calls.
//!
//! All transitions guard on dispatcher registration before touching shared
//! state; an unregistered agent's gesture calls still update the local
//! snapshots so a re-registration mid-gesture does not corrupt state, but
//! they never enqueue and never mutate a receiver.

use tracing::trace;

use crate::{
    action::{Action, DragMode},
    agent::{Agent, TickAgent},
    dispatcher::Dispatcher,
    event::Event,
    grabber::{RESTING_DRIVE_SPEED, SharedGrabber},
    tuple::EventGrabberTuple,
};

/// Drive speed contributed per vertical pixel of offset from the press
/// position.
const DRIVE_SPEED_PER_PX: f32 = 0.01;

/// Life cycle of the drag interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A press has been recorded; no motion yet.
    Pressed,
    /// Motion following a press.
    Dragging,
}

/// An agent with the press/drag/release gesture state machine layered on
/// top.
pub struct PointerAgent<A: Action> {
    agent: Agent<A>,
    phase: GesturePhase,
    press_event: Option<Event<A>>,
    last_event: Option<Event<A>>,
    press_action: Option<A>,
    drag_mode: DragMode,
    needs_spin: bool,
    bypass_null_event: bool,
    saved_damping: Option<f32>,
    zoom_hint_active: bool,
    rotate_hint_active: bool,
}

impl<A: Action> PointerAgent<A> {
    /// Creates a pointer agent with the given unique name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            agent: Agent::new(name),
            phase: GesturePhase::Idle,
            press_event: None,
            last_event: None,
            press_action: None,
            drag_mode: DragMode::None,
            needs_spin: false,
            bypass_null_event: false,
            saved_damping: None,
            zoom_hint_active: false,
            rotate_hint_active: false,
        }
    }

    /// The underlying agent.
    pub fn agent(&self) -> &Agent<A> {
        &self.agent
    }

    /// The underlying agent, mutably.
    pub fn agent_mut(&mut self) -> &mut Agent<A> {
        &mut self.agent
    }

    /// Current phase of the gesture life cycle.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Drag mode classified at press time.
    pub fn drag_mode(&self) -> DragMode {
        self.drag_mode
    }

    /// Begins a gesture.
    ///
    /// Snapshots the press event, stops an in-progress spin (manual drag
    /// always pre-empts inertia), classifies the action that would apply and
    /// derives the gesture booleans. Continuous and hinted gestures save and
    /// zero the receiver's damping and enqueue the resolved tuple directly;
    /// everything else falls through to ordinary handling. If no action
    /// resolves the transition aborts and the event passes through idle.
    pub fn press(&mut self, event: &Event<A>, dispatcher: &mut Dispatcher<A>) {
        self.press_event = Some(event.clone());
        self.last_event = Some(event.clone());
        self.phase = GesturePhase::Pressed;
        self.reset_classification();
        if !dispatcher.is_agent_registered(self.agent.name()) {
            return;
        }

        let grabber = self.agent.grabber();

        if let Some(grabber) = &grabber {
            let mut receiver = grabber.lock();
            if let Some(spin) = receiver.spin() {
                // An interrupted gesture can leave the damping override in
                // place with its save still pending. Undo it before this
                // gesture saves anew, so the pre-override value survives.
                if let Some(saved) = self.saved_damping.take() {
                    spin.set_damping(saved);
                }
                if spin.is_spinning() {
                    spin.stop_spin();
                }
            }
        }

        let Some(action) = self.agent.resolve(event) else {
            // Nothing bound for this press: idle pass-through.
            self.phase = GesturePhase::Idle;
            self.agent.handle(event, dispatcher);
            return;
        };
        self.press_action = Some(action);
        let mode = action.drag_mode();
        self.drag_mode = mode;
        self.bypass_null_event = mode.is_continuous();
        trace!(action = action.description(), ?mode, "gesture press");

        if let Some(grabber) = &grabber {
            let mut receiver = grabber.lock();
            if mode.is_rotational()
                && let Some(spin) = receiver.spin()
            {
                // Spin is only meaningful for undamped rotation.
                self.needs_spin = spin.damping() == 0.0;
            }
            // Hints are gated on the receiver exposing a hint surface,
            // which only eye/camera targets do.
            if let Some(hints) = receiver.hints() {
                if mode == DragMode::ZoomRegion {
                    hints.set_zoom_region_hint(true);
                    self.zoom_hint_active = true;
                }
                if mode == DragMode::ScreenRotate {
                    hints.set_screen_rotate_hint(true);
                    self.rotate_hint_active = true;
                }
            }
        }

        if self.bypass_null_event || self.zoom_hint_active || self.rotate_hint_active {
            if let Some(grabber) = grabber {
                {
                    let mut receiver = grabber.lock();
                    if let Some(spin) = receiver.spin() {
                        self.saved_damping = Some(spin.damping());
                        spin.set_damping(0.0);
                    }
                }
                Self::enqueue_forced(dispatcher, event.clone(), Some(action), grabber);
            }
        } else {
            self.agent.handle(event, dispatcher);
        }
    }

    /// Continues a gesture.
    ///
    /// Suppressed entirely while the zoom-region hint is active, since that
    /// gesture is applied atomically at release. The action class is
    /// re-resolved on every call, since a modifier toggled mid-drag can
    /// change the effective action; a zoom-region action is refused on this
    /// continuous path. Drive mode derives its speed from the vertical
    /// offset to the press snapshot.
    pub fn drag(&mut self, event: &Event<A>, dispatcher: &mut Dispatcher<A>) {
        self.phase = GesturePhase::Dragging;
        self.last_event = Some(event.clone());
        if !dispatcher.is_agent_registered(self.agent.name()) {
            return;
        }
        if self.zoom_hint_active {
            return;
        }

        let action = self.agent.resolve(event);
        if action.map(|a| a.drag_mode()) == Some(DragMode::ZoomRegion) {
            return;
        }

        if self.drag_mode == DragMode::Drive
            && let (Some(press), Some(grabber)) = (&self.press_event, self.agent.grabber())
        {
            let offset = event.value(1) - press.value(1);
            let mut receiver = grabber.lock();
            if let Some(spin) = receiver.spin() {
                spin.set_drive_speed(DRIVE_SPEED_PER_PX * offset);
            }
        }

        if self.bypass_null_event {
            if let (Some(action), Some(grabber)) = (action, self.agent.grabber()) {
                Self::enqueue_forced(dispatcher, event.clone(), Some(action), grabber);
            }
        } else {
            self.agent.handle(event, dispatcher);
        }
    }

    /// Ends a gesture and returns to idle.
    ///
    /// Starts inertial spin when the terminal drag speed meets the
    /// receiver's threshold, applies the zoom region exactly once through a
    /// synthetic event chained from the press snapshot, clears hints,
    /// re-runs focus tracking on the release event, restores overridden
    /// damping and resets the drive speed.
    pub fn release(&mut self, event: &Event<A>, dispatcher: &mut Dispatcher<A>) {
        let terminal = self.last_event.take();
        self.last_event = Some(event.clone());
        self.phase = GesturePhase::Idle;
        if !dispatcher.is_agent_registered(self.agent.name()) {
            return;
        }

        // Capture the receiver of the gesture before focus is recomputed.
        let grabber = self.agent.grabber();

        if self.needs_spin
            && let (Some(seed), Some(grabber)) = (&terminal, &grabber)
        {
            let mut receiver = grabber.lock();
            if let Some(spin) = receiver.spin()
                && seed.speed() >= spin.spin_sensitivity()
            {
                spin.start_spin(seed);
            }
        }

        if self.zoom_hint_active
            && let (Some(press), Some(grabber)) = (&self.press_event, &grabber)
        {
            // Synthesized from the press snapshot so the action fires
            // exactly once, independent of release order.
            let synthetic = event.clone().chained(press);
            Self::enqueue_forced(dispatcher, synthetic, self.press_action, grabber.clone());
        }

        if let Some(grabber) = &grabber {
            let mut receiver = grabber.lock();
            if let Some(hints) = receiver.hints() {
                hints.set_zoom_region_hint(false);
                hints.set_screen_rotate_hint(false);
            }
        }

        self.agent.update_focus(event);

        if let Some(grabber) = &grabber {
            let mut receiver = grabber.lock();
            if let Some(spin) = receiver.spin() {
                if let Some(saved) = self.saved_damping.take() {
                    spin.set_damping(saved);
                }
                if self.drag_mode == DragMode::Drive {
                    spin.set_drive_speed(RESTING_DRIVE_SPEED);
                }
            }
        }

        if self.drag_mode == DragMode::None {
            self.agent.handle(event, dispatcher);
        }

        self.reset_classification();
    }

    /// Forced enqueue honoring the foreign-grabber escape hatch: receivers
    /// outside the action vocabulary get the raw event, never a resolved
    /// tuple.
    fn enqueue_forced(
        dispatcher: &mut Dispatcher<A>,
        event: Event<A>,
        action: Option<A>,
        grabber: SharedGrabber<A>,
    ) {
        let foreign = !grabber.lock().accepts_actions();
        if foreign {
            dispatcher.enqueue_forced(EventGrabberTuple::forwarded(event, grabber));
        } else if let Some(tuple) = EventGrabberTuple::resolved(event, action, grabber) {
            dispatcher.enqueue_forced(tuple);
        }
    }

    fn reset_classification(&mut self) {
        self.press_action = None;
        self.drag_mode = DragMode::None;
        self.needs_spin = false;
        self.bypass_null_event = false;
        self.zoom_hint_active = false;
        self.rotate_hint_active = false;
    }

    /// Convenience passthrough to the wrapped agent's receiver accessor.
    pub fn grabber(&self) -> Option<SharedGrabber<A>> {
        self.agent.grabber()
    }
}

impl<A: Action> TickAgent<A> for PointerAgent<A> {
    fn agent(&self) -> &Agent<A> {
        &self.agent
    }

    fn agent_mut(&mut self) -> &mut Agent<A> {
        &mut self.agent
    }
}
