//! Action tags and their drag-gesture classification.
//!
//! ## Usage
//!
//! Implement [`Action`] on a closed application enum; the engine routes the
//! tag without ever interpreting it, except for the [`DragMode`]
//! classification consumed by the press/drag/release machine.

use std::{fmt::Debug, hash::Hash};

/// A user-defined action tag routed by the engine.
///
/// Actions are opaque to the dispatch core: it resolves them from shortcut
/// bindings, carries them through the deferred queue and hands them to the
/// focused grabber. Only the gesture state machine looks at the
/// [`drag_mode`](Action::drag_mode) classification.
pub trait Action: Copy + Eq + Hash + Debug + 'static {
    /// Degrees of freedom the action consumes when executed.
    fn degrees_of_freedom(&self) -> u8;

    /// Human-readable description used in diagnostics.
    fn description(&self) -> &str;

    /// Classification used by the press/drag/release state machine.
    ///
    /// The default marks the action as ordinary: the gesture machine is a
    /// transparent passthrough for it.
    fn drag_mode(&self) -> DragMode {
        DragMode::None
    }
}

/// Closed classification of drag behaviors an action can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragMode {
    /// Ordinary action with no gesture-machine involvement.
    #[default]
    None,
    /// Rotation of the focused receiver.
    Rotate,
    /// Rotation about the screen normal.
    ScreenRotate,
    /// Translation in the screen plane.
    ScreenTranslate,
    /// Continuous driving, with speed derived from the drag offset.
    Drive,
    /// Continuous forward motion.
    MoveForward,
    /// Continuous backward motion.
    MoveBackward,
    /// Rubber-band zoom applied atomically at release.
    ZoomRegion,
}

impl DragMode {
    /// Rotate-family modes, the only ones eligible for inertial spin.
    pub fn is_rotational(self) -> bool {
        matches!(self, DragMode::Rotate | DragMode::ScreenRotate)
    }

    /// Continuous modes that must keep producing effect even when the
    /// device reports zero delta (e.g. a held key).
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            DragMode::Drive | DragMode::MoveForward | DragMode::MoveBackward
        )
    }

    /// Modes that show a visual hint while the gesture is in progress.
    pub fn is_hinted(self) -> bool {
        matches!(self, DragMode::ZoomRegion | DragMode::ScreenRotate)
    }
}
