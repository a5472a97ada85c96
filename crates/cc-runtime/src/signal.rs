//! Shutdown and render-notification signals shared between threads.
//!
//! Every wait in here is bounded and re-checks the shutdown flag, so a
//! stopping runtime never waits on a thread that is asleep indefinitely.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cooperative shutdown flag that also wakes sleeping tasks.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    triggered: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every sleeper.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        // Taking the lock orders this notify after any sleeper's flag check.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.wake.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Sleep until `deadline` unless shutdown is requested first.
    ///
    /// Returns `true` if the caller should keep running.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.is_triggered() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            guard = self
                .wake
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Sleep for `duration` unless shutdown is requested first.
    pub fn sleep(&self, duration: Duration) -> bool {
        self.sleep_until(Instant::now() + duration)
    }
}

/// Condition signal from update tasks to the renderer.
///
/// Each successful tick bumps a generation counter; the renderer waits for
/// the counter to move past the value it last rendered.
#[derive(Debug, Default)]
pub struct RenderNotifier {
    generation: Mutex<u64>,
    changed: Condvar,
}

impl RenderNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation = generation.wrapping_add(1);
        self.changed.notify_all();
    }

    pub fn generation(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until the generation differs from `seen`, shutdown is requested,
    /// or `timeout` elapses. Returns the generation observed on wake.
    pub fn wait_for_change(&self, seen: u64, timeout: Duration, shutdown: &ShutdownSignal) -> u64 {
        let guard = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |generation| {
                *generation == seen && !shutdown.is_triggered()
            })
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    /// Wake any waiter so it re-checks shutdown.
    pub fn wake_all(&self) {
        let _guard = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        self.changed.notify_all();
    }
}
