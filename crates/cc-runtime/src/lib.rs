//! Concurrent runtime for climate controls.
//!
//! Provides:
//! - a registry of named controls with relaxed-consistency snapshots
//! - a single, centrally enforced lock order for multi-control updates
//! - a scheduler running one thread per periodic update task
//! - a renderer writing snapshots to a pluggable output sink
//! - cooperative shutdown with bounded waits and joined threads

pub mod error;
pub mod locked;
pub mod registry;
pub mod renderer;
pub mod runtime;
pub mod scheduler;
pub mod signal;
pub mod sink;
pub mod snapshot;

// Re-exports for public API
pub use error::{RuntimeError, RuntimeResult};
pub use locked::LockedControls;
pub use registry::ControlRegistry;
pub use renderer::{RenderFormat, RenderTrigger, Renderer};
pub use runtime::{RunReport, Runtime, RuntimeHandle};
pub use scheduler::{SchedulerHandle, TaskAction, TaskReport, TaskSpec, UpdateScheduler};
pub use signal::{RenderNotifier, ShutdownSignal};
pub use sink::{ConsoleSink, LogSink, MemorySink, OutputSink, WriterSink};
pub use snapshot::{Snapshot, SnapshotEntry};
