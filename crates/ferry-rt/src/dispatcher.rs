// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Blocking bridge and fire-and-forget posting.
//!
//! `run_blocking` is the synchronous bridge: hand a closure to another
//! context, block until its result comes back through the slot. `post`
//! and `post_delayed` are one-way.

use std::sync::Arc;
use std::time::Duration;

use ferry_engine::{ContextId, DispatchError, Engine};

use crate::gate::ContextGate;
use crate::work::{VoidWorkItem, WorkItem};

/// Posts work items at a target context through the engine.
///
/// Cheap to clone; clones share the same engine handle.
#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<dyn Engine>,
    gate: ContextGate,
}

impl Dispatcher {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        let gate = ContextGate::new(engine.clone());
        Self { engine, gate }
    }

    /// The engine this dispatcher posts through.
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Run `task` on `target` and block until it completes, returning
    /// its value.
    ///
    /// If the caller is already on `target` the task runs inline on the
    /// caller's stack — no work item, no queue traffic. Otherwise the
    /// task is enqueued and the calling thread blocks on the result
    /// slot until the target context has executed it.
    ///
    /// Returns [`DispatchError::UnsupportedTargetContext`] without
    /// blocking if the engine rejects the enqueue, and
    /// [`DispatchError::TaskPanicked`] if the task panicked over there.
    pub fn run_blocking<T, F>(&self, target: ContextId, task: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self.gate.on(target) {
            // Blocking on our own queue would never be serviced.
            return Ok(task());
        }

        let (item, slot) = WorkItem::new(task);
        if !self.engine.enqueue(target, item.into_task(), Duration::ZERO) {
            return Err(DispatchError::UnsupportedTargetContext(target));
        }
        slot.wait().map_err(DispatchError::TaskPanicked)
    }

    /// Enqueue `task` on `target` without waiting for it.
    ///
    /// Unlike [`Dispatcher::run_blocking`] there is no inline fast
    /// path: even a caller already on `target` goes through the queue,
    /// so the task never runs before this returns.
    pub fn post<F>(&self, target: ContextId, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_delayed(target, task, Duration::ZERO)
    }

    /// Enqueue `task` on `target` to run once `delay` has elapsed.
    ///
    /// Delayed tasks are ordered by absolute deadline on the target's
    /// queue; two independent posts have no cross-context ordering.
    pub fn post_delayed<F>(
        &self,
        target: ContextId,
        task: F,
        delay: Duration,
    ) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let item = VoidWorkItem::new(task);
        if self.engine.enqueue(target, item.into_task(), delay) {
            Ok(())
        } else {
            Err(DispatchError::UnsupportedTargetContext(target))
        }
    }
}
