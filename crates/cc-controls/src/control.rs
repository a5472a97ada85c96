//! Lock-protected control.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cc_core::ControlName;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::behavior::TickBehavior;
use crate::error::ControlResult;
use crate::state::ControlState;
use crate::value::ControlValue;

/// Everything a control guards with its lock.
#[derive(Debug)]
pub struct ControlCell {
    state: ControlState,
    behavior: TickBehavior,
    rng: StdRng,
}

impl ControlCell {
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    /// Run one tick of the configured behavior.
    pub fn tick(&mut self, dt: Duration) -> ControlValue {
        self.behavior
            .apply(&mut self.state, &mut self.rng, dt.as_secs_f64())
    }
}

/// One control state behind its own exclusive lock.
///
/// The name lives outside the lock: it is immutable and is what lock ordering
/// sorts on. All state access goes through [`Control::read`],
/// [`Control::write`], [`Control::tick`] or a guard from [`Control::lock`],
/// none of which let a reference outlive the lock.
#[derive(Debug)]
pub struct Control {
    name: ControlName,
    cell: Mutex<ControlCell>,
}

impl Control {
    /// Wrap a state with a tick behavior. The random source is seeded from
    /// the OS; use [`Control::with_seed`] for reproducible runs.
    pub fn new(state: ControlState, behavior: TickBehavior) -> ControlResult<Self> {
        behavior.validate()?;
        Ok(Self {
            name: state.name().clone(),
            cell: Mutex::new(ControlCell {
                state,
                behavior,
                rng: StdRng::from_entropy(),
            }),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.cell_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &ControlName {
        &self.name
    }

    /// Apply `f` to the state under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&ControlState) -> R) -> R {
        f(self.lock().state())
    }

    /// Apply `f` to the mutable state under the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut ControlState) -> R) -> R {
        f(self.lock().state_mut())
    }

    /// One scheduled update step under the lock.
    pub fn tick(&self, dt: Duration) -> ControlValue {
        self.lock().tick(dt)
    }

    pub fn current_value(&self) -> ControlValue {
        self.read(ControlState::current_value)
    }

    /// Acquire the lock directly.
    ///
    /// Holding more than one control guard at a time is only sound when the
    /// guards are taken in name order; the registry's ordered-lock helper is
    /// the one place that does this.
    ///
    /// A poisoned lock is recovered: every write leaves the state valid, so a
    /// panic in some caller's closure cannot leave it half-updated.
    pub fn lock(&self) -> MutexGuard<'_, ControlCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cell_mut(&mut self) -> &mut ControlCell {
        self.cell.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}
