//! Single named unit of mutable state with bounded history.

use std::collections::VecDeque;

use cc_core::ControlName;

use crate::error::{ControlError, ControlResult};
use crate::value::{ControlValue, ValueRange};

/// History capacity used when none is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Current value of a control plus its most recent past values.
///
/// Invariants:
/// - `value` is always inside `range` (writes are clamped, never rejected)
/// - `history.len() <= capacity`, oldest entries evicted first
/// - the newest history entry equals `value`
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    name: ControlName,
    range: ValueRange,
    unit: Option<String>,
    value: ControlValue,
    history: VecDeque<ControlValue>,
    capacity: usize,
}

impl ControlState {
    /// Create a state. The sanitized initial value becomes the first history
    /// entry.
    pub fn new(
        name: ControlName,
        range: ValueRange,
        initial: ControlValue,
        capacity: usize,
    ) -> ControlResult<Self> {
        range.validate()?;
        if capacity == 0 {
            return Err(ControlError::InvalidArg {
                what: "history capacity must be at least 1",
            });
        }
        let value = range.sanitize(initial);
        let mut history = VecDeque::with_capacity(capacity);
        history.push_back(value);
        Ok(Self {
            name,
            range,
            unit: None,
            value,
            history,
            capacity,
        })
    }

    /// Attach a display unit (e.g. `°C`).
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn name(&self) -> &ControlName {
        &self.name
    }

    pub fn range(&self) -> &ValueRange {
        &self.range
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clamp `value` into range, store it and append it to the history.
    ///
    /// Returns the value actually stored.
    pub fn set_value(&mut self, value: impl Into<ControlValue>) -> ControlValue {
        let value = self.range.sanitize(value.into());
        self.value = value;
        self.history.push_back(value);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        value
    }

    pub fn current_value(&self) -> ControlValue {
        self.value
    }

    /// Past values, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &ControlValue> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Current value formatted for display, with unit when set.
    pub fn render_value(&self) -> String {
        let formatted = self.range.format(&self.value);
        match &self.unit {
            Some(unit) => format!("{formatted} {unit}"),
            None => formatted,
        }
    }
}
