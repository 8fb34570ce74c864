// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Cross-context dispatch core.
//!
//! The pieces a caller composes to run work on a specific engine
//! context:
//! - slot — single-write result slot with a blocking read
//! - work — one-shot work items (typed and void)
//! - gate — "am I already on that context?" check
//! - dispatcher — blocking bridge and fire-and-forget posting
//! - detached — fire-and-forget OS-thread execution, no target context

pub mod detached;
pub mod dispatcher;
pub mod gate;
pub mod slot;
pub mod work;

pub use detached::run_detached;
pub use dispatcher::Dispatcher;
pub use gate::ContextGate;
pub use slot::ResultSlot;
pub use work::{VoidWorkItem, WorkItem};
