//! Input-event abstraction and dispatch for interactive graphical
//! applications.
//!
//! grapnel converts heterogeneous raw input (mouse, keyboard, wheel,
//! aggregated multi-touch) into a uniform [`Event`] representation, maps
//! events to user-defined actions through [`Shortcut`] bindings held in
//! [`Profile`]s, routes each resolved action to exactly one focused
//! receiver ([`Grabber`]) per frame, and defers execution to a single
//! ordered drain phase owned by the [`Dispatcher`]. [`PointerAgent`] layers
//! the stateful press/drag/release gesture machine, with inertial spin
//! continuation and temporary damping override, on top of an ordinary
//! [`Agent`].
//!
//! The caller defines the action vocabulary as a closed enum implementing
//! [`Action`]; the dispatch core never interprets the tag beyond its
//! declared degrees of freedom and drag mode.
//!
//! ## Overview
//!
//! ```rust,ignore
//! use grapnel::{Agent, Dispatcher, EventKind, Modifiers, Shortcut};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_agent("pointer");
//!
//! let mut agent = Agent::new("pointer");
//! agent.add_grabber(scene_object);
//! agent
//!     .profile_mut(EventKind::Motion)
//!     .bind(Shortcut::button(Modifiers::empty(), LEFT_BUTTON), MyAction::Rotate);
//!
//! // Per frame: stage raw events on the agent, then run one tick.
//! agent.push_event(event);
//! dispatcher.tick(&mut [&mut agent]);
//! ```

pub mod action;
pub mod agent;
pub mod dispatcher;
pub mod event;
pub mod gesture;
pub mod grabber;
pub mod profile;
pub mod shortcut;
pub mod touch;
pub mod tuple;

#[cfg(test)]
pub(crate) mod test_support;

pub use action::{Action, DragMode};
pub use agent::{Agent, TickAgent};
pub use dispatcher::Dispatcher;
pub use event::{Event, EventKind, EventPayload, MotionData, NULL_EPSILON};
pub use gesture::{GesturePhase, PointerAgent};
pub use grabber::{
    Grabber, GrabberResult, HintSurface, RESTING_DRIVE_SPEED, SharedGrabber, SpinReceiver, share,
};
pub use profile::Profile;
pub use shortcut::{Modifiers, Shortcut, Trigger};
pub use touch::TouchTracker;
pub use tuple::{EventGrabberTuple, TupleQueue};

/// Initializes the diagnostic subscriber for binaries embedding the crate.
///
/// Respects `RUST_LOG` when set; otherwise defaults to errors everywhere
/// with informational output from this crate. Safe to call more than once;
/// later calls are no-ops.
pub fn init_diagnostics() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,grapnel=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
