//! Session execution service.

use std::time::Duration;

use cc_project::schema::{ClimateConfig, FormatDef};
use cc_runtime::{OutputSink, RunReport, RuntimeHandle};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::runtime_compile;

/// How often a session without a fixed duration re-checks for shutdown.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Options for running a session.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this long. `None` runs until the session's shutdown signal
    /// is triggered.
    pub duration: Option<Duration>,
    /// Overrides the config's render format.
    pub format: Option<FormatDef>,
}

/// Compile `config` and start its threads.
pub fn start_session(
    config: &ClimateConfig,
    options: &RunOptions,
    sink: Box<dyn OutputSink>,
) -> AppResult<RuntimeHandle> {
    let mut config = config.clone();
    if let Some(format) = options.format {
        config.renderer.format = format;
    }

    let runtime = runtime_compile::compile_runtime(&config, sink)?;
    info!(
        config = %config.name,
        controls = config.controls.len(),
        tasks = config.tasks.len(),
        "session starting"
    );
    Ok(runtime.start()?)
}

/// Run a session to completion: for `options.duration` if set, otherwise
/// until the session's shutdown signal is triggered. `on_started` sees the
/// handle once the threads are up, e.g. to hand its shutdown signal to an
/// input thread.
pub fn run_session(
    config: &ClimateConfig,
    options: &RunOptions,
    sink: Box<dyn OutputSink>,
    on_started: impl FnOnce(&RuntimeHandle),
) -> AppResult<RunReport> {
    let handle = start_session(config, options, sink)?;
    on_started(&handle);

    let report = match options.duration {
        Some(duration) => handle.run_for(duration)?,
        None => run_until_shutdown(handle)?,
    };
    Ok(report)
}

/// Block until the handle's shutdown signal is triggered, then stop.
pub fn run_until_shutdown(handle: RuntimeHandle) -> AppResult<RunReport> {
    let shutdown = handle.shutdown_signal();
    while shutdown.sleep(SHUTDOWN_POLL) {}
    handle.stop().map_err(AppError::from)
}
