//! Registry of named controls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cc_controls::{Control, ControlError, ControlName, ControlResult};
use chrono::Utc;
use indexmap::IndexMap;
use tracing::debug;

use crate::locked::LockedControls;
use crate::snapshot::{Snapshot, SnapshotEntry};

/// Name → control map in registration order.
///
/// Two kinds of lock are involved and they never nest:
/// - the structural lock guarding the map, held only while adding,
///   removing or copying out the list of controls
/// - one lock per control, taken after the structural lock is released
///
/// Whenever more than one control lock is held, they are acquired in
/// ascending [`ControlName`] order. [`ControlRegistry::snapshot`] and
/// [`ControlRegistry::with_ordered_locks`] are the only places that walk
/// multiple controls, and both follow that order.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: Mutex<IndexMap<ControlName, Arc<Control>>>,
    snapshots_taken: AtomicU64,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control. Fails if the name is already taken.
    pub fn add(&self, control: Control) -> ControlResult<Arc<Control>> {
        let mut controls = self.structure();
        if controls.contains_key(control.name()) {
            return Err(ControlError::DuplicateName {
                name: control.name().to_string(),
            });
        }
        let control = Arc::new(control);
        controls.insert(control.name().clone(), Arc::clone(&control));
        debug!(control = %control.name(), "control added");
        Ok(control)
    }

    /// Remove a control by name. Absent names are a no-op.
    ///
    /// Returns whether a control was removed. Tasks already holding the
    /// control keep their reference until their current tick ends.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.structure().shift_remove(name).is_some();
        if removed {
            debug!(control = name, "control removed");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<Arc<Control>> {
        self.structure().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structure().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structure().len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure().is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<ControlName> {
        self.structure().keys().cloned().collect()
    }

    /// Take a relaxed-consistency snapshot.
    ///
    /// Copies the control list, releases the structural lock, then visits the
    /// controls in lock order, holding each control's lock only long enough
    /// to copy its values. No registry-wide lock is held while reading, so
    /// producers are blocked for at most one copy each.
    pub fn snapshot(&self) -> Snapshot {
        let controls = self.controls();

        let mut order: Vec<usize> = (0..controls.len()).collect();
        order.sort_by(|&a, &b| controls[a].name().cmp(controls[b].name()));

        let mut entries: Vec<Option<SnapshotEntry>> = vec![None; controls.len()];
        for i in order {
            entries[i] = Some(controls[i].read(SnapshotEntry::capture));
        }

        Snapshot {
            sequence: self.snapshots_taken.fetch_add(1, Ordering::Relaxed) + 1,
            taken_at: Utc::now(),
            entries: entries.into_iter().flatten().collect(),
        }
    }

    /// Lock the named controls in the global order and run `f` over them.
    ///
    /// Duplicate names are locked once. Unknown names fail with
    /// [`ControlError::UnknownControl`] before any control lock is taken.
    /// Locks are released when `f` returns.
    pub fn with_ordered_locks<S, R>(
        &self,
        names: &[S],
        f: impl FnOnce(&mut LockedControls<'_>) -> R,
    ) -> ControlResult<R>
    where
        S: AsRef<str>,
    {
        let mut targets = {
            let controls = self.structure();
            names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    controls
                        .get(name)
                        .cloned()
                        .ok_or_else(|| ControlError::UnknownControl {
                            name: name.to_string(),
                            context: "ordered lock request".to_string(),
                        })
                })
                .collect::<ControlResult<Vec<_>>>()?
        };

        sort_into_lock_order(&mut targets);

        let guards = targets
            .iter()
            .map(|control| (control.name().clone(), control.lock()))
            .collect();
        let mut locked = LockedControls::new(guards);
        Ok(f(&mut locked))
    }

    fn controls(&self) -> Vec<Arc<Control>> {
        self.structure().values().cloned().collect()
    }

    fn structure(&self) -> MutexGuard<'_, IndexMap<ControlName, Arc<Control>>> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sort controls into the global lock order and drop duplicates.
fn sort_into_lock_order(controls: &mut Vec<Arc<Control>>) {
    controls.sort_by(|a, b| a.name().cmp(b.name()));
    controls.dedup_by(|a, b| a.name() == b.name());
}
