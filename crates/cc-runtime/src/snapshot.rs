//! Point-in-time copies of all control values.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cc_controls::{ControlState, ControlValue};

/// One control's values as captured by a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub value: ControlValue,
    /// Value formatted with its range and unit (e.g. `24.0 °C`, `Level 2`, `AC`).
    pub display: String,
    pub history_len: usize,
}

impl SnapshotEntry {
    pub fn capture(state: &ControlState) -> Self {
        Self {
            name: state.name().to_string(),
            value: state.current_value(),
            display: state.render_value(),
            history_len: state.history_len(),
        }
    }
}

/// Relaxed-consistency snapshot of a registry.
///
/// Each entry is internally consistent (read under its control's lock), but
/// entries were read one after another, so the set as a whole is not an
/// atomic cut across controls. Entries are in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub sequence: u64,
    pub taken_at: DateTime<Utc>,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
