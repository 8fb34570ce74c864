// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Context membership check.

use std::sync::Arc;

use ferry_engine::{ContextId, Engine};

/// Answers whether the caller is already running on a target context.
///
/// Folding this check into the dispatcher is what prevents the classic
/// deadlock: a caller already pinned to `target` block-waiting on work
/// queued behind itself would never be serviced.
#[derive(Clone)]
pub struct ContextGate {
    engine: Arc<dyn Engine>,
}

impl ContextGate {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Is the calling thread pinned to `ctx`?
    pub fn on(&self, ctx: ContextId) -> bool {
        self.engine.currently_on(ctx)
    }
}
