//! cc-core: stable foundation for the climate control runtime.
//!
//! Contains:
//! - name (validated control names; their ordering is the global lock order)
//! - numeric (finite checks and saturating clamps)
//! - timing (critical-section duration accumulators)
//! - error (shared error types)

pub mod error;
pub mod name;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use name::ControlName;
pub use numeric::*;
pub use timing::{AccumulatingTimer, TimingSummary};
