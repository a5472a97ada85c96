//! Periodic update tasks.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use cc_controls::{ControlError, ControlName, ControlResult, SampleClock, TickPeriod};
use cc_core::{AccumulatingTimer, TimingSummary};
use tracing::{debug, error, info, warn};

use crate::error::{RuntimeError, RuntimeResult};
use crate::locked::LockedControls;
use crate::registry::ControlRegistry;
use crate::signal::{RenderNotifier, ShutdownSignal};

/// Custom action over a locked set of controls.
pub type ActionFn = dyn Fn(&mut LockedControls<'_>) -> ControlResult<()> + Send + Sync;

/// What a task does each tick.
#[derive(Clone)]
pub enum TaskAction {
    /// Tick every target control with its own behavior, in lock order.
    TickTargets,
    /// Run a caller-supplied action with all targets locked.
    Custom(Arc<ActionFn>),
}

impl fmt::Debug for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickTargets => f.write_str("TickTargets"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Descriptor of one periodic task.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    /// Controls the action may touch. All of them are locked for each tick.
    pub targets: Vec<ControlName>,
    pub period: TickPeriod,
    pub action: TaskAction,
    /// Stop after this many tick attempts. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl TaskSpec {
    /// A task that ticks its targets' behaviors.
    pub fn ticking<I, S>(name: impl Into<String>, targets: I, period: TickPeriod) -> ControlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            name: name.into(),
            targets: parse_targets(targets)?,
            period,
            action: TaskAction::TickTargets,
            max_ticks: None,
        })
    }

    /// A task running `action` over its locked targets.
    pub fn custom<I, S, F>(
        name: impl Into<String>,
        targets: I,
        period: TickPeriod,
        action: F,
    ) -> ControlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&mut LockedControls<'_>) -> ControlResult<()> + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            targets: parse_targets(targets)?,
            period,
            action: TaskAction::Custom(Arc::new(action)),
            max_ticks: None,
        })
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}

fn parse_targets<I, S>(targets: I) -> ControlResult<Vec<ControlName>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for target in targets {
        let name = ControlName::new(target)?;
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Counters for one task. Shared between the task thread and its handle.
#[derive(Debug, Default)]
struct TaskStats {
    attempts: AtomicU64,
    ticks: AtomicU64,
    failures: AtomicU64,
    panics: AtomicU64,
    lock_hold: AccumulatingTimer,
}

/// Final statistics of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub name: String,
    pub ticks: u64,
    pub failures: u64,
    pub panics: u64,
    /// Time spent holding the task's control locks.
    pub lock_hold: TimingSummary,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    spec: TaskSpec,
    stats: Arc<TaskStats>,
}

impl ScheduledTask {
    fn report(&self) -> TaskReport {
        TaskReport {
            name: self.spec.name.clone(),
            ticks: self.stats.ticks.load(Ordering::Relaxed),
            failures: self.stats.failures.load(Ordering::Relaxed),
            panics: self.stats.panics.load(Ordering::Relaxed),
            lock_hold: self.stats.lock_hold.summary(),
        }
    }

    fn budget_spent(&self) -> bool {
        self.spec
            .max_ticks
            .is_some_and(|max| self.stats.attempts.load(Ordering::Relaxed) >= max)
    }

    /// Run one tick. Errors and panics are contained here and reported as
    /// the tick's result; they never propagate out of the task.
    fn run_tick(&self, registry: &ControlRegistry) -> ControlResult<()> {
        self.stats.attempts.fetch_add(1, Ordering::Relaxed);
        let dt = self.spec.period.duration();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            registry
                .with_ordered_locks(&self.spec.targets, |locked| {
                    let held = Instant::now();
                    let result = match &self.spec.action {
                        TaskAction::TickTargets => {
                            for (name, value) in locked.tick_all(dt) {
                                debug!(task = %self.spec.name, control = %name, ?value, "ticked");
                            }
                            Ok(())
                        }
                        TaskAction::Custom(action) => action(locked),
                    };
                    self.stats.lock_hold.record(held.elapsed());
                    result
                })
                .and_then(|result| result)
        }));

        match outcome {
            Ok(Ok(())) => {
                self.stats.ticks.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(Err(e)) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
            Err(payload) => {
                self.stats.panics.fetch_add(1, Ordering::Relaxed);
                Err(ControlError::ActionFailed {
                    what: format!("task '{}' panicked: {}", self.spec.name, panic_message(payload.as_ref())),
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs periodic update tasks against a registry.
///
/// Tasks are validated when added: every target must already be registered,
/// so a misconfigured task fails before anything starts.
#[derive(Debug)]
pub struct UpdateScheduler {
    registry: Arc<ControlRegistry>,
    tasks: Vec<ScheduledTask>,
}

impl UpdateScheduler {
    pub fn new(registry: Arc<ControlRegistry>) -> Self {
        Self {
            registry,
            tasks: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    /// Register a task.
    ///
    /// Fails with [`ControlError::UnknownControl`] if a target is not in the
    /// registry, [`ControlError::DuplicateName`] if the task name is taken,
    /// or [`ControlError::InvalidArg`] for a task without targets.
    pub fn add_task(&mut self, spec: TaskSpec) -> ControlResult<()> {
        if spec.targets.is_empty() {
            return Err(ControlError::InvalidArg {
                what: "task needs at least one target control",
            });
        }
        if self.tasks.iter().any(|t| t.spec.name == spec.name) {
            return Err(ControlError::DuplicateName { name: spec.name });
        }
        if let Some(missing) = spec
            .targets
            .iter()
            .find(|target| !self.registry.contains(target.as_str()))
        {
            return Err(ControlError::UnknownControl {
                name: missing.to_string(),
                context: format!("task '{}'", spec.name),
            });
        }

        self.tasks.push(ScheduledTask {
            spec,
            stats: Arc::default(),
        });
        Ok(())
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.spec.name.as_str()).collect()
    }

    /// Run one tick of `task` on the calling thread.
    pub fn tick_once(&self, task: &str) -> ControlResult<()> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.spec.name == task)
            .ok_or_else(|| ControlError::InvalidArg {
                what: "no task with that name",
            })?;
        task.run_tick(&self.registry)
    }

    pub fn reports(&self) -> Vec<TaskReport> {
        self.tasks.iter().map(ScheduledTask::report).collect()
    }

    /// Start one thread per task.
    ///
    /// If a thread cannot be spawned, the already started ones are stopped
    /// and joined before the error is returned.
    pub fn spawn(
        self,
        shutdown: Arc<ShutdownSignal>,
        notifier: Arc<RenderNotifier>,
    ) -> RuntimeResult<SchedulerHandle> {
        let mut handle = SchedulerHandle {
            threads: Vec::with_capacity(self.tasks.len()),
            tasks: self.tasks.clone(),
        };

        for task in self.tasks {
            let thread_name = format!("cc-task-{}", task.spec.name);
            let registry = Arc::clone(&self.registry);
            let shutdown_for_task = Arc::clone(&shutdown);
            let notifier = Arc::clone(&notifier);
            let name = task.spec.name.clone();

            let spawned = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || run_task_loop(&task, &registry, &shutdown_for_task, &notifier));

            match spawned {
                Ok(join) => handle.threads.push((name, join)),
                Err(source) => {
                    shutdown.trigger();
                    handle.join();
                    return Err(RuntimeError::Spawn {
                        name: thread_name,
                        source,
                    });
                }
            }
        }
        Ok(handle)
    }
}

fn run_task_loop(
    task: &ScheduledTask,
    registry: &ControlRegistry,
    shutdown: &ShutdownSignal,
    notifier: &RenderNotifier,
) {
    let name = &task.spec.name;
    info!(task = %name, period_ms = task.spec.period.duration().as_millis() as u64, "task started");

    let mut clock = SampleClock::new(task.spec.period, Instant::now());
    while !shutdown.is_triggered() && !task.budget_spent() {
        if !shutdown.sleep_until(clock.next_sample()) {
            break;
        }
        match task.run_tick(registry) {
            Ok(()) => notifier.notify(),
            Err(e) => warn!(task = %name, error = %e, "tick failed; skipping"),
        }
        clock.advance(Instant::now());
    }

    info!(task = %name, ticks = task.stats.ticks.load(Ordering::Relaxed), "task stopped");
}

/// Running tasks.
#[derive(Debug)]
pub struct SchedulerHandle {
    threads: Vec<(String, JoinHandle<()>)>,
    tasks: Vec<ScheduledTask>,
}

impl SchedulerHandle {
    /// Statistics so far, without stopping anything.
    pub fn reports(&self) -> Vec<TaskReport> {
        self.tasks.iter().map(ScheduledTask::report).collect()
    }

    /// Join every task thread. Callers trigger shutdown first unless every
    /// task has a tick budget.
    pub fn join(&mut self) -> Vec<TaskReport> {
        for (name, join) in self.threads.drain(..) {
            if join.join().is_err() {
                error!(task = %name, "task thread panicked outside a tick");
            }
        }
        self.reports()
    }
}
