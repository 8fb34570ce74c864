// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The command capability.

use ferry_engine::{InstanceId, ProcessId};

use crate::channel::ResultChannel;

/// Where an invocation came from.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    /// The engine instance the invoker named.
    pub instance: InstanceId,
    /// The process the invocation (and therefore the reply) belongs to.
    pub source: ProcessId,
}

/// A named asynchronous command.
///
/// One implementing type per command. `execute` must arrange for
/// `reply.dispatch(..)` to be called exactly once, from whatever
/// context eventually produces the result; it may return long before
/// that happens. Handlers must not assume the result will ever be
/// observed — the invoker may have stopped listening.
pub trait AsyncCommand: Send + Sync {
    fn execute(&self, ctx: CommandContext, args: &str, reply: ResultChannel);
}
