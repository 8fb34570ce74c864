// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Single-write, single-read result slot.
//!
//! Carries one computed value from the target context back to the
//! blocked poster. The write happens-before the read; the slot's own
//! mutex/condvar pair is the only synchronization involved.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Outcome of a deferred computation: the value, or the message of the
/// panic that killed it.
pub type TaskOutcome<T> = Result<T, String>;

/// One-shot slot shared between the poster (reader) and the target
/// context (writer).
///
/// Written at most once; [`ResultSlot::wait`] blocks until the write
/// lands. A write after the reader has given up is a harmless leak: the
/// value is stored and never taken.
pub struct ResultSlot<T> {
    inner: Mutex<Option<TaskOutcome<T>>>,
    filled: Condvar,
}

impl<T> ResultSlot<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(None),
            filled: Condvar::new(),
        })
    }

    /// Write the outcome and wake the reader.
    ///
    /// Panics if the slot was already written — a work item runs at
    /// most once, so a second write means the single-delivery invariant
    /// was violated upstream.
    pub fn set(&self, outcome: TaskOutcome<T>) {
        let mut guard = self.inner.lock().unwrap();
        assert!(guard.is_none(), "result slot written twice");
        *guard = Some(outcome);
        self.filled.notify_all();
    }

    /// Block until the slot is written, then take the outcome.
    pub fn wait(&self) -> TaskOutcome<T> {
        let mut guard = self.inner.lock().unwrap();
        while guard.is_none() {
            guard = self.filled.wait(guard).unwrap();
        }
        guard.take().expect("slot filled but empty")
    }

    /// Block until the slot is written or `timeout` elapses.
    ///
    /// `None` on expiry. The target context may still run the task and
    /// write the slot later; abandoning the wait is always safe.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<TaskOutcome<T>> {
        let deadline = std::time::Instant::now() + timeout;
        let mut guard = self.inner.lock().unwrap();
        while guard.is_none() {
            let now = std::time::Instant::now();
            if now >= deadline {
                return None;
            }
            let (g, res) = self.filled.wait_timeout(guard, deadline - now).unwrap();
            guard = g;
            if res.timed_out() && guard.is_none() {
                return None;
            }
        }
        guard.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_wait() {
        let slot = ResultSlot::new();
        slot.set(Ok(42));
        assert_eq!(slot.wait().unwrap(), 42);
    }

    #[test]
    fn wait_blocks_until_set() {
        let slot = ResultSlot::new();
        let writer = slot.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            writer.set(Ok("done"));
        });
        assert_eq!(slot.wait().unwrap(), "done");
    }

    #[test]
    fn wait_timeout_expires() {
        let slot: Arc<ResultSlot<i32>> = ResultSlot::new();
        assert!(slot.wait_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn late_write_after_abandoned_wait_is_harmless() {
        let slot = ResultSlot::new();
        assert!(slot.wait_timeout(Duration::from_millis(5)).is_none());
        // The target context completes anyway; nobody reads the value.
        slot.set(Ok(7));
    }

    #[test]
    #[should_panic(expected = "result slot written twice")]
    fn double_write_panics() {
        let slot = ResultSlot::new();
        slot.set(Ok(1));
        slot.set(Ok(2));
    }
}
