// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fire-and-forget detached execution.
//!
//! For work that needs no particular context and must not block the
//! launching code. The spawned thread owns the closure for its full
//! lifetime; nothing synchronizes back to the spawner.

use std::thread;

/// Run `task` to completion on a fresh OS thread and discard it.
///
/// The caller holds no handle: no join, no cancellation, no result. A
/// task that needs to report back loops through its own callback or
/// through [`crate::Dispatcher::run_blocking`].
pub fn run_detached<F>(task: F)
where
    F: FnOnce() + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("ferry-detached".to_string())
        .spawn(task)
        .expect("failed to spawn detached thread");
    drop(handle);
}
