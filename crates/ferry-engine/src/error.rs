// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Dispatch-boundary errors.

use thiserror::Error;

use crate::ContextId;

/// Why a dispatch against a target context failed.
///
/// These are surfaced synchronously to the caller; nothing here is
/// retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The engine rejected the enqueue — the context is unknown, gone,
    /// or shutting down.
    #[error("target context `{0}` cannot accept work")]
    UnsupportedTargetContext(ContextId),

    /// The task panicked on the target context. The payload is the
    /// panic message; the caller decides whether to re-raise.
    #[error("task panicked on target context: {0}")]
    TaskPanicked(String),
}
