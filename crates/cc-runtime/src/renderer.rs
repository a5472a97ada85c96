//! Snapshot rendering.

use std::fmt::{self, Write as _};
use std::time::{Duration, Instant};

use cc_controls::{SampleClock, TickPeriod};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RuntimeResult;
use crate::registry::ControlRegistry;
use crate::signal::{RenderNotifier, ShutdownSignal};
use crate::sink::OutputSink;
use crate::snapshot::Snapshot;

pub const DEFAULT_TITLE: &str = "Climate Control Status";

/// How a snapshot is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderFormat {
    /// Banner plus one `[name] value` line per control.
    #[default]
    Text,
    /// One JSON object per frame.
    Json,
}

/// When the render loop produces a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderTrigger {
    /// Fixed cadence regardless of updates.
    Periodic(TickPeriod),
    /// After an update task signals a change; waits are capped at `max_wait`
    /// so shutdown is noticed even when nothing changes.
    OnNotify { max_wait: Duration },
}

impl Default for RenderTrigger {
    fn default() -> Self {
        Self::OnNotify {
            max_wait: Duration::from_secs(1),
        }
    }
}

/// Renders registry snapshots to an output sink.
pub struct Renderer {
    sink: Box<dyn OutputSink>,
    format: RenderFormat,
    trigger: RenderTrigger,
    title: String,
    frames: u64,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("format", &self.format)
            .field("trigger", &self.trigger)
            .field("title", &self.title)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(sink: impl OutputSink + 'static) -> Self {
        Self::boxed(Box::new(sink))
    }

    pub fn boxed(sink: Box<dyn OutputSink>) -> Self {
        Self {
            sink,
            format: RenderFormat::default(),
            trigger: RenderTrigger::default(),
            title: DEFAULT_TITLE.to_string(),
            frames: 0,
        }
    }

    pub fn with_format(mut self, format: RenderFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_trigger(mut self, trigger: RenderTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn trigger(&self) -> RenderTrigger {
        self.trigger
    }

    /// Frames successfully written so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Snapshot the registry and write one frame.
    ///
    /// The snapshot is fully materialized (and every control lock released)
    /// before the sink is touched.
    pub fn render_once(&mut self, registry: &ControlRegistry) -> RuntimeResult<Snapshot> {
        let snapshot = registry.snapshot();
        let frame = self.format_snapshot(&snapshot)?;
        self.sink.write(&frame)?;
        self.frames += 1;
        Ok(snapshot)
    }

    pub fn format_snapshot(&self, snapshot: &Snapshot) -> RuntimeResult<String> {
        match self.format {
            RenderFormat::Text => Ok(self.format_text(snapshot)),
            RenderFormat::Json => Ok(serde_json::to_string(snapshot)?),
        }
    }

    fn format_text(&self, snapshot: &Snapshot) -> String {
        let header = format!("--- {} ---", self.title);
        let mut out = String::new();
        let _ = writeln!(out, "{header}");
        for entry in &snapshot.entries {
            let _ = writeln!(out, "[{}] {}", entry.name, entry.display);
        }
        out.push_str(&"-".repeat(header.chars().count()));
        out
    }

    /// Render loop run on the renderer thread. Returns the renderer so the
    /// caller can emit a final frame after the update tasks are joined.
    pub(crate) fn run(
        mut self,
        registry: &ControlRegistry,
        shutdown: &ShutdownSignal,
        notifier: &RenderNotifier,
    ) -> Self {
        debug!(trigger = ?self.trigger, "renderer started");
        // Read before the first frame so a tick landing during it still redraws.
        let mut seen = notifier.generation();
        self.render_logged(registry);

        match self.trigger {
            RenderTrigger::Periodic(period) => {
                let mut clock = SampleClock::new(period, Instant::now());
                while !shutdown.is_triggered() {
                    if !shutdown.sleep_until(clock.next_sample()) {
                        break;
                    }
                    self.render_logged(registry);
                    clock.advance(Instant::now());
                }
            }
            RenderTrigger::OnNotify { max_wait } => {
                while !shutdown.is_triggered() {
                    let current = notifier.wait_for_change(seen, max_wait, shutdown);
                    if shutdown.is_triggered() {
                        break;
                    }
                    if current != seen {
                        seen = current;
                        self.render_logged(registry);
                    }
                }
            }
        }

        debug!(frames = self.frames, "renderer stopped");
        self
    }

    pub(crate) fn render_logged(&mut self, registry: &ControlRegistry) {
        if let Err(e) = self.render_once(registry) {
            warn!(error = %e, "render failed; frame skipped");
        }
    }
}
