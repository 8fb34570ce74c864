// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One-shot work items.
//!
//! A work item owns a deferred computation for its trip through the
//! engine's queue. The typed variant carries a result slot back to the
//! poster; the void variant is consumed by execution and discarded.

use std::sync::Arc;

use ferry_engine::EngineTask;

use crate::slot::ResultSlot;

/// Deferred computation plus the slot its result lands in.
///
/// Created by the poster, converted into an [`EngineTask`] and moved
/// into the target context's queue. Must not be posted to more than one
/// context — conversion consumes the item, so the type system enforces
/// that.
pub struct WorkItem<T> {
    task: Box<dyn FnOnce() -> T + Send + 'static>,
    slot: Arc<ResultSlot<T>>,
}

impl<T: Send + 'static> WorkItem<T> {
    /// Wrap `task`, returning the item and the poster's handle on the
    /// result slot.
    pub fn new<F>(task: F) -> (Self, Arc<ResultSlot<T>>)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let slot = ResultSlot::new();
        let item = Self {
            task: Box::new(task),
            slot: slot.clone(),
        };
        (item, slot)
    }

    /// Run the computation and write the slot. Panics are caught and
    /// written as the error outcome so the waiting poster unblocks.
    pub fn run(self) {
        let outcome = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(self.task)) {
            Ok(val) => Ok(val),
            Err(e) => Err(panic_message(&e)),
        };
        self.slot.set(outcome);
    }

    /// Convert into the boxed closure the engine's queue accepts.
    pub fn into_task(self) -> EngineTask {
        Box::new(move || self.run())
    }
}

/// Fire-and-forget work item. No slot; owned by the queue until it
/// runs, then dropped.
pub struct VoidWorkItem {
    task: Box<dyn FnOnce() + Send + 'static>,
}

impl VoidWorkItem {
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            task: Box::new(task),
        }
    }

    pub fn run(self) {
        (self.task)();
    }

    pub fn into_task(self) -> EngineTask {
        Box::new(move || self.run())
    }
}

/// Extract a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
