//! Runtime start/stop and run reporting.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::{RuntimeError, RuntimeResult};
use crate::registry::ControlRegistry;
use crate::renderer::Renderer;
use crate::scheduler::{SchedulerHandle, TaskReport, UpdateScheduler};
use crate::signal::{RenderNotifier, ShutdownSignal};

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Wall time from start to the end of the final render.
    pub elapsed: Duration,
    /// Frames written, including the initial and final ones.
    pub frames_rendered: u64,
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn total_ticks(&self) -> u64 {
        self.tasks.iter().map(|t| t.ticks).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.tasks.iter().map(|t| t.failures + t.panics).sum()
    }
}

/// A configured scheduler and renderer, ready to start.
#[derive(Debug)]
pub struct Runtime {
    scheduler: UpdateScheduler,
    renderer: Renderer,
}

impl Runtime {
    pub fn new(scheduler: UpdateScheduler, renderer: Renderer) -> Self {
        Self {
            scheduler,
            renderer,
        }
    }

    pub fn registry(&self) -> &Arc<ControlRegistry> {
        self.scheduler.registry()
    }

    /// Spawn the task threads and the renderer thread.
    pub fn start(self) -> RuntimeResult<RuntimeHandle> {
        let started = Instant::now();
        let registry = Arc::clone(self.scheduler.registry());
        let shutdown = Arc::new(ShutdownSignal::new());
        let notifier = Arc::new(RenderNotifier::new());

        info!(
            controls = registry.len(),
            tasks = self.scheduler.task_names().len(),
            "runtime starting"
        );

        let mut scheduler = self
            .scheduler
            .spawn(Arc::clone(&shutdown), Arc::clone(&notifier))?;

        let renderer = {
            let registry = Arc::clone(&registry);
            let shutdown = Arc::clone(&shutdown);
            let notifier = Arc::clone(&notifier);
            let renderer = self.renderer;
            thread::Builder::new()
                .name("cc-renderer".to_string())
                .spawn(move || renderer.run(&registry, &shutdown, &notifier))
        };
        let renderer = match renderer {
            Ok(join) => join,
            Err(source) => {
                shutdown.trigger();
                scheduler.join();
                return Err(RuntimeError::Spawn {
                    name: "cc-renderer".to_string(),
                    source,
                });
            }
        };

        Ok(RuntimeHandle {
            registry,
            shutdown,
            notifier,
            scheduler,
            renderer: Some(renderer),
            started,
        })
    }
}

/// A started runtime. Dropping it without [`RuntimeHandle::stop`] still
/// shuts the threads down and joins them.
pub struct RuntimeHandle {
    registry: Arc<ControlRegistry>,
    shutdown: Arc<ShutdownSignal>,
    notifier: Arc<RenderNotifier>,
    scheduler: SchedulerHandle,
    renderer: Option<JoinHandle<Renderer>>,
    started: Instant,
}

impl RuntimeHandle {
    pub fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    /// Shared shutdown flag, e.g. for a signal handler or input thread.
    pub fn shutdown_signal(&self) -> Arc<ShutdownSignal> {
        Arc::clone(&self.shutdown)
    }

    pub fn task_reports(&self) -> Vec<TaskReport> {
        self.scheduler.reports()
    }

    /// Run until `duration` elapses or shutdown is requested elsewhere, then
    /// stop.
    pub fn run_for(self, duration: Duration) -> RuntimeResult<RunReport> {
        self.shutdown.sleep(duration);
        self.stop()
    }

    /// Stop every thread, join them, and render one final frame.
    pub fn stop(mut self) -> RuntimeResult<RunReport> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> RuntimeResult<RunReport> {
        self.shutdown.trigger();
        self.notifier.wake_all();

        let tasks = self.scheduler.join();
        let frames_rendered = match self.renderer.take() {
            Some(join) => {
                let mut renderer = join.join().map_err(|_| RuntimeError::Join {
                    name: "cc-renderer".to_string(),
                })?;
                renderer.render_logged(&self.registry);
                renderer.frames_rendered()
            }
            None => 0,
        };

        let report = RunReport {
            elapsed: self.started.elapsed(),
            frames_rendered,
            tasks,
        };
        info!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            ticks = report.total_ticks(),
            failures = report.total_failures(),
            frames = report.frames_rendered,
            "runtime stopped"
        );
        Ok(report)
    }
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        if self.renderer.is_some() {
            if let Err(e) = self.shutdown_and_join() {
                error!(error = %e, "runtime shutdown on drop failed");
            }
        }
    }
}
