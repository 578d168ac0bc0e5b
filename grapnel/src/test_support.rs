//! Shared fixtures for the unit tests: a small action vocabulary and two
//! instrumented grabbers.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    action::{Action, DragMode},
    event::Event,
    grabber::{Grabber, GrabberResult, HintSurface, SpinReceiver},
};

/// A minimal camera-style action vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestAction {
    Rotate,
    Translate,
    Zoom,
    Drive,
    ZoomRegion,
    ScreenRotate,
}

impl Action for TestAction {
    fn degrees_of_freedom(&self) -> u8 {
        match self {
            Self::Zoom => 1,
            _ => 2,
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::Rotate => "rotate the scene",
            Self::Translate => "translate the scene",
            Self::Zoom => "zoom the eye",
            Self::Drive => "drive the eye",
            Self::ZoomRegion => "zoom on a region",
            Self::ScreenRotate => "rotate in the screen plane",
        }
    }

    fn drag_mode(&self) -> DragMode {
        match self {
            Self::Rotate => DragMode::Rotate,
            Self::Drive => DragMode::Drive,
            Self::ZoomRegion => DragMode::ZoomRegion,
            Self::ScreenRotate => DragMode::ScreenRotate,
            Self::Translate | Self::Zoom => DragMode::None,
        }
    }
}

/// A grabber that records every action it executes, with knobs for the
/// claim predicate, action vocabulary membership and injected failure.
///
/// The execution log is behind a shared handle so several agents can funnel
/// into one arrival-ordered record.
pub struct RecordingGrabber {
    claiming: bool,
    foreign: bool,
    failing: bool,
    executed: Arc<Mutex<Vec<Option<TestAction>>>>,
}

impl RecordingGrabber {
    fn build(claiming: bool, foreign: bool, failing: bool) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            claiming,
            foreign,
            failing,
            executed: Arc::new(Mutex::new(Vec::new())),
        }))
    }

    /// An always-claiming, action-speaking, infallible grabber.
    pub fn shared() -> Arc<Mutex<Self>> {
        Self::build(true, false, false)
    }

    /// A grabber with an explicit claim predicate outcome.
    pub fn shared_claiming(claiming: bool) -> Arc<Mutex<Self>> {
        Self::build(claiming, false, false)
    }

    /// A grabber outside the agent's action vocabulary.
    pub fn shared_foreign() -> Arc<Mutex<Self>> {
        Self::build(true, true, false)
    }

    /// A grabber whose execution always fails.
    pub fn shared_failing() -> Arc<Mutex<Self>> {
        Self::build(true, false, true)
    }

    /// Snapshot of the actions executed so far, in execution order. `None`
    /// entries are raw forwards.
    pub fn executed(&self) -> Vec<Option<TestAction>> {
        self.executed.lock().clone()
    }

    /// Shared handle to the execution log, for asserting arrival order
    /// across grabber instances sharing it.
    pub fn order_handle(&self) -> Arc<Mutex<Vec<Option<TestAction>>>> {
        self.executed.clone()
    }
}

impl Grabber<TestAction> for RecordingGrabber {
    fn claims(&self, _event: &Event<TestAction>) -> bool {
        self.claiming
    }

    fn execute(&mut self, event: &Event<TestAction>) -> GrabberResult {
        self.executed.lock().push(event.action());
        if self.failing {
            return Err("injected failure".into());
        }
        Ok(())
    }

    fn accepts_actions(&self) -> bool {
        !self.foreign
    }
}

/// An eye/camera-style grabber exposing the full spin and hint surface.
pub struct EyeGrabber {
    spinning: bool,
    damping: f32,
    sensitivity: f32,
    drive_speed: f32,
    seed_speeds: Vec<f32>,
    stops: usize,
    zoom_hint: bool,
    rotate_hint: bool,
    executed: Vec<Option<TestAction>>,
}

impl EyeGrabber {
    pub fn shared(damping: f32, sensitivity: f32) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            spinning: false,
            damping,
            sensitivity,
            drive_speed: 0.0,
            seed_speeds: Vec::new(),
            stops: 0,
            zoom_hint: false,
            rotate_hint: false,
            executed: Vec::new(),
        }))
    }

    /// Marks a spin as already in progress, as if seeded by an earlier
    /// gesture.
    pub fn force_spinning(&mut self) {
        self.spinning = true;
    }

    pub fn is_spinning_now(&self) -> bool {
        self.spinning
    }

    /// Terminal speeds of every spin started so far.
    pub fn spin_seed_speeds(&self) -> &[f32] {
        &self.seed_speeds
    }

    /// Number of explicit spin stops.
    pub fn stop_count(&self) -> usize {
        self.stops
    }

    pub fn drive_speed(&self) -> f32 {
        self.drive_speed
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn zoom_region_hint(&self) -> bool {
        self.zoom_hint
    }

    pub fn screen_rotate_hint(&self) -> bool {
        self.rotate_hint
    }

    pub fn executed(&self) -> Vec<Option<TestAction>> {
        self.executed.clone()
    }
}

impl Grabber<TestAction> for EyeGrabber {
    fn claims(&self, _event: &Event<TestAction>) -> bool {
        true
    }

    fn execute(&mut self, event: &Event<TestAction>) -> GrabberResult {
        self.executed.push(event.action());
        Ok(())
    }

    fn spin(&mut self) -> Option<&mut dyn SpinReceiver<TestAction>> {
        Some(self)
    }

    fn hints(&mut self) -> Option<&mut dyn HintSurface> {
        Some(self)
    }
}

impl SpinReceiver<TestAction> for EyeGrabber {
    fn start_spin(&mut self, seed: &Event<TestAction>) {
        self.spinning = true;
        self.seed_speeds.push(seed.speed());
    }

    fn stop_spin(&mut self) {
        self.spinning = false;
        self.stops += 1;
    }

    fn is_spinning(&self) -> bool {
        self.spinning
    }

    fn damping(&self) -> f32 {
        self.damping
    }

    fn set_damping(&mut self, friction: f32) {
        self.damping = friction;
    }

    fn spin_sensitivity(&self) -> f32 {
        self.sensitivity
    }

    fn set_drive_speed(&mut self, speed: f32) {
        self.drive_speed = speed;
    }
}

impl HintSurface for EyeGrabber {
    fn set_zoom_region_hint(&mut self, active: bool) {
        self.zoom_hint = active;
    }

    fn set_screen_rotate_hint(&mut self, active: bool) {
        self.rotate_hint = active;
    }

    fn zoom_region_hint(&self) -> bool {
        self.zoom_hint
    }

    fn screen_rotate_hint(&self) -> bool {
        self.rotate_hint
    }
}
