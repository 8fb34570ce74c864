// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One-shot reply capability handed to command handlers.

use std::sync::Arc;

use ferry_engine::{Engine, InstanceId, ProcessId};

use crate::envelope;
use crate::error::CommandError;

/// Delivers a command's single result back to its invoker.
///
/// Ownership moves into the handler at invocation time and is consumed
/// by [`ResultChannel::dispatch`] — a second dispatch is a type error,
/// not a runtime condition. The channel is `Send`, so a handler can
/// carry it to another context and dispatch from there.
pub struct ResultChannel {
    engine: Arc<dyn Engine>,
    reply_to: ProcessId,
    instance: InstanceId,
    request: u64,
    dispatched: bool,
}

impl ResultChannel {
    pub(crate) fn new(
        engine: Arc<dyn Engine>,
        reply_to: ProcessId,
        instance: InstanceId,
        request: u64,
    ) -> Self {
        Self {
            engine,
            reply_to,
            instance,
            request,
            dispatched: false,
        }
    }

    /// Send `result` back to the invoker, consuming the channel.
    pub fn dispatch(mut self, result: String) {
        self.dispatched = true;
        let args = envelope::encode_reply(self.request, &Ok(result));
        self.engine
            .send_named(self.reply_to, self.instance, envelope::REPLY_NAME, &args);
    }

    /// Answer with an error instead of a result. Registry-internal: the
    /// only producer is the unknown-command edge.
    pub(crate) fn reject(mut self, error: CommandError) {
        self.dispatched = true;
        let args = envelope::encode_reply(self.request, &Err(error));
        self.engine
            .send_named(self.reply_to, self.instance, envelope::REPLY_NAME, &args);
    }
}

impl Drop for ResultChannel {
    fn drop(&mut self) {
        if !self.dispatched {
            // The invoker will never hear back; its own deadline racing
            // is the only bound it has.
            log::warn!(
                "result channel for request {} to `{}` dropped without dispatching",
                self.request,
                self.reply_to
            );
        }
    }
}
