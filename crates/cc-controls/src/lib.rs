//! Control primitives for the climate control runtime.
//!
//! A control is an independently lockable unit that owns one piece of
//! mutable state (a temperature, a fan level, an operating mode). This crate
//! defines the state itself, the tick behaviors that mutate it on a schedule,
//! and the locked wrapper through which all access goes.
//!
//! # Architecture
//!
//! - [`ControlValue`] / [`ValueRange`]: tagged value and the range it is
//!   clamped into (continuous, discrete levels, or enumerated modes)
//! - [`ControlState`]: current value plus a bounded FIFO history
//! - [`TickBehavior`]: what one scheduled update step does
//! - [`Control`]: a state, its behavior and its random source behind one lock
//! - [`TickPeriod`] / [`SampleClock`]: drift-free periodic cadence
//!
//! Out-of-range writes are clamped, never rejected.

pub mod behavior;
pub mod control;
pub mod error;
pub mod sampled;
pub mod state;
pub mod value;

pub use behavior::TickBehavior;
pub use control::{Control, ControlCell};
pub use error::{ControlError, ControlResult};
pub use sampled::{SampleClock, TickPeriod};
pub use state::{ControlState, DEFAULT_HISTORY_CAPACITY};
pub use value::{ControlValue, ValueRange};

pub use cc_core::ControlName;
