// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Seam types for the external multi-context engine.
//!
//! This crate defines the identifiers and traits shared between the
//! dispatch core, the IPC layer, and whatever engine the application
//! embeds. The engine itself (browser, test loopback, ...) lives behind
//! the [`Engine`] trait; everything else in the workspace only talks to
//! that trait.

pub mod error;

pub use error::DispatchError;

use std::time::Duration;

/// Identifier for a logical execution context within one process.
///
/// A context is a place work can run (a UI-affinity thread, an I/O
/// thread), pinned to exactly one thread for its lifetime. Ids are only
/// meaningful relative to the process that owns them; cross-process
/// routing goes through [`ProcessId`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(&'static str);

impl ContextId {
    /// The UI-affinity context.
    pub const UI: ContextId = ContextId("ui");
    /// The I/O context (network, storage access).
    pub const IO: ContextId = ContextId("io");
    /// The renderer's main context.
    pub const RENDERER: ContextId = ContextId("renderer");

    /// Mint a context id. Embedders with extra contexts name them here.
    pub const fn new(name: &'static str) -> Self {
        ContextId(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifier for a logical process in the embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessId {
    /// The main (browser) process.
    Browser,
    /// A sandboxed renderer process.
    Renderer,
}

impl ProcessId {
    pub const fn name(&self) -> &'static str {
        match self {
            ProcessId::Browser => "browser",
            ProcessId::Renderer => "renderer",
        }
    }

    /// Parse the wire form produced by [`ProcessId::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "browser" => Some(ProcessId::Browser),
            "renderer" => Some(ProcessId::Renderer),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Routing handle for one engine instance (one browser surface) within a
/// process. Opaque to this workspace; the engine mints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstanceId(pub u64);

/// A unit of work handed to the engine for execution on some context.
pub type EngineTask = Box<dyn FnOnce() + Send + 'static>;

/// The external engine, reduced to the three primitives the dispatch
/// core consumes.
///
/// Implementations must execute each enqueued task exactly once, on the
/// named context's thread, in FIFO order for zero-delay tasks and in
/// deadline order for delayed ones.
pub trait Engine: Send + Sync {
    /// Is the calling thread the one pinned to `ctx`?
    fn currently_on(&self, ctx: ContextId) -> bool;

    /// Enqueue `task` for execution on `ctx`, after `delay` if nonzero.
    ///
    /// Returns `false` if the context cannot accept work (unknown id,
    /// shutting down). A rejected task is dropped without running.
    fn enqueue(&self, ctx: ContextId, task: EngineTask, delay: Duration) -> bool;

    /// Send a named message to `target`/`instance`. The envelope (name
    /// plus argument string) is serialized by the engine; delivery is
    /// best-effort and one-way.
    fn send_named(&self, target: ProcessId, instance: InstanceId, name: &str, args: &str);
}

/// Receiver for named messages arriving from other processes.
///
/// The engine invokes this on the receiving process's message context.
pub trait MessageSink: Send + Sync {
    fn on_named(&self, instance: InstanceId, name: &str, args: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_compare_by_name() {
        assert_eq!(ContextId::UI, ContextId::new("ui"));
        assert_ne!(ContextId::UI, ContextId::IO);
        assert_eq!(ContextId::new("net").name(), "net");
    }

    #[test]
    fn process_id_wire_name_round_trips() {
        for pid in [ProcessId::Browser, ProcessId::Renderer] {
            assert_eq!(ProcessId::from_name(pid.name()), Some(pid));
        }
        assert_eq!(ProcessId::from_name("gpu"), None);
    }
}
