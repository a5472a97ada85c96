//! Shared application service layer for the climate control runtime.
//!
//! Turns configuration files into running sessions for the CLI: loading and
//! validating configs, compiling them into a registry, scheduler and
//! renderer, and running the result for a duration or until shutdown.

pub mod demo;
pub mod error;
pub mod project_service;
pub mod run_service;
pub mod runtime_compile;

pub use demo::demo_config;
pub use error::{AppError, AppResult};
pub use project_service::{
    ConfigSummary, ControlSummary, load_config, save_config, summarize, validate_config,
};
pub use run_service::{RunOptions, run_session, run_until_shutdown, start_session};
pub use runtime_compile::{
    compile_behavior, compile_control, compile_range, compile_registry, compile_renderer,
    compile_runtime, compile_scheduler, compile_task, render_format,
};
