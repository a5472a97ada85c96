//! Output sinks for rendered snapshots.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

/// Consumer of formatted snapshots.
pub trait OutputSink: Send {
    /// Write one rendered frame.
    fn write(&mut self, frame: &str) -> io::Result<()>;
}

/// Writes frames to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write(&mut self, frame: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{frame}")?;
        out.flush()
    }
}

/// Emits frames as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn write(&mut self, frame: &str) -> io::Result<()> {
        info!(target: "cc_runtime::render", "{frame}");
        Ok(())
    }
}

/// Collects frames in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    frames: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn last(&self) -> Option<String> {
        self.buffer().last().cloned()
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, frame: &str) -> io::Result<()> {
        self.buffer().push(frame.to_string());
        Ok(())
    }
}

/// Adapts any [`Write`] (a file, a socket, a `Vec<u8>`).
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn write(&mut self, frame: &str) -> io::Result<()> {
        writeln!(self.writer, "{frame}")?;
        self.writer.flush()
    }
}
