//! Receiver capabilities consumed by the dispatch core.
//!
//! ## Usage
//!
//! Implement [`Grabber`] on any receiver that should participate in an
//! agent's pool; implement [`SpinReceiver`] and [`HintSurface`] on receivers
//! that take part in the inertial drag gesture.

use std::{error::Error, sync::Arc};

use parking_lot::Mutex;

use crate::{action::Action, event::Event};

/// The result type returned by grabber execution.
///
/// Failures are isolated per tuple by the drain phase: they are logged and
/// never abort the execution of subsequent tuples.
pub type GrabberResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Resting value restored to a receiver's continuous drive speed when a
/// drive gesture ends.
pub const RESTING_DRIVE_SPEED: f32 = 0.0;

/// A receiver capable of claiming focus for an event and executing an
/// attached action.
pub trait Grabber<A: Action>: Send {
    /// Whether this receiver currently claims ownership of the event.
    fn claims(&self, event: &Event<A>) -> bool;

    /// Performs the event's attached action (or reacts to the plain event
    /// for foreign grabbers).
    fn execute(&mut self, event: &Event<A>) -> GrabberResult;

    /// Whether this receiver speaks the agent's action vocabulary.
    ///
    /// Returning `false` marks a foreign grabber: the agent forwards raw
    /// events to it without action resolution, bypassing the profile.
    fn accepts_actions(&self) -> bool {
        true
    }

    /// Spin/damping capability, for receivers that support inertial
    /// continuation of rotation gestures.
    fn spin(&mut self) -> Option<&mut dyn SpinReceiver<A>> {
        None
    }

    /// Visual-hint capability. Only eye/camera targets expose one; the
    /// gesture machine uses its presence to gate zoom-region and
    /// screen-rotate hints.
    fn hints(&mut self) -> Option<&mut dyn HintSurface> {
        None
    }
}

/// Spin and damping surface of a receiver, consumed by the gesture state
/// machine only. The decay model itself lives with the receiver.
pub trait SpinReceiver<A: Action> {
    /// Starts inertial spin seeded with the last pre-release event.
    fn start_spin(&mut self, seed: &Event<A>);

    /// Stops an in-progress spin. Manual drag always pre-empts inertia.
    fn stop_spin(&mut self);

    /// Whether a spin is currently in progress.
    fn is_spinning(&self) -> bool;

    /// Current damping friction. Zero means undamped rotation.
    fn damping(&self) -> f32;

    /// Overrides the damping friction.
    fn set_damping(&mut self, friction: f32);

    /// Minimum terminal gesture speed required to start a spin.
    fn spin_sensitivity(&self) -> f32;

    /// Sets the continuous drive speed derived from a drive gesture.
    fn set_drive_speed(&mut self, speed: f32);
}

/// Visual hints owned by the scene and toggled during an in-progress drag.
pub trait HintSurface {
    /// Toggles the zoom-region rubber-band hint.
    fn set_zoom_region_hint(&mut self, active: bool);

    /// Toggles the screen-rotate hint.
    fn set_screen_rotate_hint(&mut self, active: bool);

    /// Whether the zoom-region hint is currently shown.
    fn zoom_region_hint(&self) -> bool;

    /// Whether the screen-rotate hint is currently shown.
    fn screen_rotate_hint(&self) -> bool;
}

/// A pool-sharable grabber. Identity is pointer identity, which keeps the
/// pool set-like and gives queued tuples a stable reference until the drain
/// phase executes them.
pub type SharedGrabber<A> = Arc<Mutex<dyn Grabber<A>>>;

/// Wraps a receiver for pool membership.
pub fn share<A: Action>(grabber: impl Grabber<A> + 'static) -> SharedGrabber<A> {
    Arc::new(Mutex::new(grabber))
}
