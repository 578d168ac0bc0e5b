//! Shortcut-to-action binding tables.
//!
//! A [`Profile`] resolves an event to a bound action by exact-match lookup
//! of the event's shortcut. Rebinding an in-use shortcut is last-write-wins
//! with a non-fatal warning; unbinding an absent shortcut is a no-op.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::{
    action::Action,
    event::Event,
    shortcut::{Modifiers, Shortcut},
};

/// A mapping from [`Shortcut`] to a user-defined action.
///
/// Cloning a profile yields an independent binding table.
#[derive(Debug, Clone)]
pub struct Profile<A: Action> {
    bindings: FxHashMap<Shortcut, A>,
}

impl<A: Action> Default for Profile<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> Profile<A> {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    /// Binds an action to a shortcut.
    ///
    /// If the shortcut is already bound the previous binding is overwritten
    /// with a warning and returned; data loss is accepted and logged, not
    /// prevented.
    pub fn bind(&mut self, shortcut: Shortcut, action: A) -> Option<A> {
        let previous = self.bindings.insert(shortcut, action);
        if let Some(previous) = previous {
            warn!(
                ?shortcut,
                previous = previous.description(),
                replacement = action.description(),
                "shortcut rebound"
            );
        }
        previous
    }

    /// Binds an action to trigger-less motion with the given modifiers
    /// (motion performed without a button held).
    pub fn bind_motion(&mut self, modifiers: Modifiers, action: A) -> Option<A> {
        self.bind(Shortcut::bare(modifiers), action)
    }

    /// Removes a binding. No-op if the shortcut is not bound.
    pub fn unbind(&mut self, shortcut: Shortcut) -> Option<A> {
        self.bindings.remove(&shortcut)
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Resolves an event to its bound action by exact shortcut lookup.
    pub fn resolve(&self, event: &Event<A>) -> Option<A> {
        self.action_of(event.shortcut())
    }

    /// The action bound to a shortcut, if any.
    pub fn action_of(&self, shortcut: Shortcut) -> Option<A> {
        self.bindings.get(&shortcut).copied()
    }

    /// Whether the shortcut is bound.
    pub fn is_bound(&self, shortcut: Shortcut) -> bool {
        self.bindings.contains_key(&shortcut)
    }

    /// Whether any binding resolves to the action (linear scan).
    pub fn is_action_bound(&self, action: A) -> bool {
        self.bindings.values().any(|bound| *bound == action)
    }

    /// The first shortcut found bound to the action, if any (linear scan,
    /// arbitrary order when the action is bound more than once).
    pub fn binding_of(&self, action: A) -> Option<Shortcut> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == action)
            .map(|(shortcut, _)| *shortcut)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the profile has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
