//! A set of control locks held together in the global lock order.

use std::sync::MutexGuard;
use std::time::Duration;

use cc_controls::{ControlCell, ControlError, ControlName, ControlResult, ControlState, ControlValue};

/// Controls locked by [`ControlRegistry::with_ordered_locks`].
///
/// Guards are stored (and were acquired) in ascending name order; lookups
/// binary-search on that order. Dropping the set releases the locks in
/// reverse acquisition order.
///
/// [`ControlRegistry::with_ordered_locks`]: crate::ControlRegistry::with_ordered_locks
pub struct LockedControls<'a> {
    guards: Vec<(ControlName, MutexGuard<'a, ControlCell>)>,
}

impl<'a> LockedControls<'a> {
    pub(crate) fn new(guards: Vec<(ControlName, MutexGuard<'a, ControlCell>)>) -> Self {
        debug_assert!(guards.windows(2).all(|w| w[0].0 < w[1].0));
        Self { guards }
    }

    /// Names in acquisition order.
    pub fn names(&self) -> impl Iterator<Item = &ControlName> + '_ {
        self.guards.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ControlState> {
        self.position(name).map(|i| self.guards[i].1.state())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ControlState> {
        self.position(name)
            .map(move |i| self.guards[i].1.state_mut())
    }

    /// Like [`LockedControls::get_mut`] but reports a missing name as an error.
    pub fn state_mut(&mut self, name: &str) -> ControlResult<&mut ControlState> {
        self.get_mut(name).ok_or_else(|| ControlError::UnknownControl {
            name: name.to_string(),
            context: "locked control set".to_string(),
        })
    }

    /// Tick one locked control.
    pub fn tick(&mut self, name: &str, dt: Duration) -> ControlResult<ControlValue> {
        let i = self.position(name).ok_or_else(|| ControlError::UnknownControl {
            name: name.to_string(),
            context: "locked control set".to_string(),
        })?;
        Ok(self.guards[i].1.tick(dt))
    }

    /// Tick every locked control, in lock order.
    pub fn tick_all(&mut self, dt: Duration) -> Vec<(ControlName, ControlValue)> {
        self.guards
            .iter_mut()
            .map(|(name, cell)| (name.clone(), cell.tick(dt)))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.guards
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
    }
}

impl Drop for LockedControls<'_> {
    fn drop(&mut self) {
        while self.guards.pop().is_some() {}
    }
}
