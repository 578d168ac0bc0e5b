//! Shortcut keys used to bind input events to actions.
//!
//! A [`Shortcut`] is the minimal lookup key a [`Profile`](crate::Profile)
//! uses to map an incoming event to a bound action: a modifier bitmask plus
//! an optional device trigger (a button, a virtual key, or a button together
//! with a click count). Equality and hashing are structural, and the absence
//! of a trigger is itself significant: a bare shortcut binds
//! move-without-a-button-held.

use bitflags::bitflags;

bitflags! {
    /// Modifier-key bitmask carried by both events and shortcuts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Device discriminator half of a [`Shortcut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A pointer-device button id.
    Button(u32),
    /// A virtual key code.
    Key(u32),
    /// A button together with the number of rapid repeated activations
    /// forming one logical click (single, double, ...).
    Click {
        /// The pointer-device button id.
        button: u32,
        /// The click count.
        count: u8,
    },
}

/// A binding key: a modifier bitmask plus an optional [`Trigger`].
///
/// Created at binding time or derived from an event; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// The modifier-key bitmask.
    pub modifiers: Modifiers,
    /// The device discriminator, if any. `None` is a distinct, bindable
    /// shortcut of its own (motion without a button held).
    pub trigger: Option<Trigger>,
}

impl Shortcut {
    /// Creates a shortcut with an explicit trigger.
    pub const fn new(modifiers: Modifiers, trigger: Trigger) -> Self {
        Self {
            modifiers,
            trigger: Some(trigger),
        }
    }

    /// Creates a trigger-less shortcut, the key for motion performed with no
    /// button held.
    pub const fn bare(modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            trigger: None,
        }
    }

    /// Creates a button shortcut.
    pub const fn button(modifiers: Modifiers, button: u32) -> Self {
        Self::new(modifiers, Trigger::Button(button))
    }

    /// Creates a virtual-key shortcut.
    pub const fn key(modifiers: Modifiers, key: u32) -> Self {
        Self::new(modifiers, Trigger::Key(key))
    }

    /// Creates a button + click-count shortcut.
    pub const fn click(modifiers: Modifiers, button: u32, count: u8) -> Self {
        Self::new(modifiers, Trigger::Click { button, count })
    }
}
