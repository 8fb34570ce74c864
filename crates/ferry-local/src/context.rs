// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One pinned context thread: queue discipline and worker loop.
//!
//! Immediate work is FIFO through a `VecDeque`; delayed work sits in a
//! min-heap keyed by `(deadline, seq)` so equal deadlines keep
//! submission order. The worker parks on a condvar until new work
//! arrives or the next deadline falls due.

use std::cell::Cell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use ferry_engine::{ContextId, EngineTask};

thread_local! {
    /// Which context the current thread is pinned to, if any.
    static CURRENT_CONTEXT: Cell<Option<ContextId>> = const { Cell::new(None) };
}

/// Is the calling thread pinned to `ctx`?
pub(crate) fn thread_is_on(ctx: ContextId) -> bool {
    CURRENT_CONTEXT.with(|c| c.get() == Some(ctx))
}

/// A delayed task waiting for its deadline.
struct TimedTask {
    deadline: Instant,
    seq: u64,
    task: EngineTask,
}

// Heap order is (deadline, seq) only; the closure does not compare.
impl PartialEq for TimedTask {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for TimedTask {}

impl PartialOrd for TimedTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimedTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

struct QueueState {
    immediate: VecDeque<EngineTask>,
    delayed: BinaryHeap<Reverse<TimedTask>>,
    accepting: bool,
    next_seq: u64,
}

/// A context pinned to one worker thread for its lifetime.
pub(crate) struct ContextThread {
    id: ContextId,
    state: Mutex<QueueState>,
    work_available: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ContextThread {
    /// Spawn the worker thread and return the shared handle.
    pub fn start(id: ContextId) -> Arc<Self> {
        let ctx = Arc::new(Self {
            id,
            state: Mutex::new(QueueState {
                immediate: VecDeque::new(),
                delayed: BinaryHeap::new(),
                accepting: true,
                next_seq: 0,
            }),
            work_available: Condvar::new(),
            worker: Mutex::new(None),
        });

        let worker_ctx = ctx.clone();
        let handle = thread::Builder::new()
            .name(format!("ferry-{}", id))
            .spawn(move || {
                CURRENT_CONTEXT.with(|c| c.set(Some(worker_ctx.id)));
                log::debug!("context `{}` started", worker_ctx.id);
                worker_ctx.worker_loop();
                log::debug!("context `{}` drained", worker_ctx.id);
            })
            .expect("failed to spawn context thread");

        *ctx.worker.lock().unwrap() = Some(handle);
        ctx
    }

    /// Accept a task for this context. Returns `false` once the context
    /// has begun shutting down.
    pub fn submit(&self, task: EngineTask, delay: Duration) -> bool {
        let mut st = self.state.lock().unwrap();
        if !st.accepting {
            return false;
        }
        if delay.is_zero() {
            st.immediate.push_back(task);
        } else {
            let seq = st.next_seq;
            st.next_seq += 1;
            st.delayed.push(Reverse(TimedTask {
                deadline: Instant::now() + delay,
                seq,
                task,
            }));
        }
        self.work_available.notify_one();
        true
    }

    /// Stop accepting work, let the worker drain what is already due,
    /// and join it. Delayed tasks whose deadline has not arrived are
    /// dropped. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut st = self.state.lock().unwrap();
            st.accepting = false;
            self.work_available.notify_all();
        }
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    fn worker_loop(&self) {
        loop {
            let task = {
                let mut st = self.state.lock().unwrap();
                loop {
                    if let Some(task) = st.immediate.pop_front() {
                        break Some(task);
                    }
                    let now = Instant::now();
                    if let Some(Reverse(head)) = st.delayed.peek() {
                        if head.deadline <= now {
                            let Reverse(timed) = st.delayed.pop().expect("peeked head vanished");
                            break Some(timed.task);
                        }
                    }
                    if !st.accepting {
                        let dropped = st.delayed.len();
                        if dropped > 0 {
                            log::debug!(
                                "context `{}` dropping {} pending delayed task(s) on shutdown",
                                self.id,
                                dropped
                            );
                        }
                        break None;
                    }
                    // Park until new work arrives or the next deadline.
                    let until_due = st
                        .delayed
                        .peek()
                        .map(|t| t.0.deadline.saturating_duration_since(now));
                    match until_due {
                        Some(d) => {
                            let (guard, _) =
                                self.work_available.wait_timeout(st, d).unwrap();
                            st = guard;
                        }
                        None => {
                            st = self.work_available.wait(st).unwrap();
                        }
                    }
                }
            };

            let Some(task) = task else {
                break;
            };

            // A panicking task must not take the whole context down.
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
                let msg = if let Some(s) = e.downcast_ref::<&str>() {
                    *s
                } else if let Some(s) = e.downcast_ref::<String>() {
                    s.as_str()
                } else {
                    "unknown panic"
                };
                log::error!("task panicked on context `{}`: {}", self.id, msg);
            }
        }
    }
}
