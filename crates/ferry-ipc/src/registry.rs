// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-process command table and invocation plumbing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use ferry_engine::{Engine, InstanceId, MessageSink, ProcessId};

use crate::channel::ResultChannel;
use crate::command::{AsyncCommand, CommandContext};
use crate::envelope::{self, REPLY_NAME};
use crate::error::{CommandError, InstallError};

/// Completion callback for one invocation. Fires at most once.
type Completion = Box<dyn FnOnce(Result<String, CommandError>) + Send + 'static>;

/// The command table for one logical process, plus the reply bookkeeping
/// for invocations that originated here.
///
/// Install handlers during startup, register the registry as the
/// process's message sink, then invoke freely from any thread. The
/// table is not mutated after startup; installation must complete
/// before the first invocation can arrive.
pub struct CommandRegistry {
    engine: Arc<dyn Engine>,
    process: ProcessId,
    commands: RwLock<HashMap<String, Arc<dyn AsyncCommand>>>,
    pending: Mutex<HashMap<u64, Completion>>,
    next_request: AtomicU64,
}

impl CommandRegistry {
    /// A registry for the given logical process.
    pub fn new(engine: Arc<dyn Engine>, process: ProcessId) -> Arc<Self> {
        Arc::new(Self {
            engine,
            process,
            commands: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            next_request: AtomicU64::new(1),
        })
    }

    /// The process this registry answers for.
    pub fn process(&self) -> ProcessId {
        self.process
    }

    /// Install `command` under `name`. Duplicate names are rejected and
    /// the first installation stays in place.
    pub fn install(
        &self,
        name: impl Into<String>,
        command: Arc<dyn AsyncCommand>,
    ) -> Result<(), InstallError> {
        let name = name.into();
        let mut commands = self.commands.write().unwrap();
        if commands.contains_key(&name) {
            return Err(InstallError::AlreadyInstalled(name));
        }
        commands.insert(name, command);
        Ok(())
    }

    /// Invoke the command `name` on `target`/`instance` with `args`.
    ///
    /// Returns immediately. `on_complete` fires at most once, on the
    /// invoking process's message context, with the handler's dispatched
    /// string or a [`CommandError`]. If the destination dies before
    /// dispatching, `on_complete` never fires — callers needing a bound
    /// must race their own deadline.
    pub fn invoke<F>(
        &self,
        target: ProcessId,
        instance: InstanceId,
        name: &str,
        args: &str,
        on_complete: F,
    ) where
        F: FnOnce(Result<String, CommandError>) + Send + 'static,
    {
        let id = self.next_request.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .unwrap()
            .insert(id, Box::new(on_complete));

        let payload = envelope::encode_request(id, self.process, args);
        self.engine.send_named(target, instance, name, &payload);
    }

    fn handle_request(&self, instance: InstanceId, name: &str, args: &str) {
        let Some(request) = envelope::decode_request(args) else {
            log::warn!("malformed request envelope for `{}`, dropping", name);
            return;
        };

        let command = self.commands.read().unwrap().get(name).cloned();
        let reply = ResultChannel::new(
            self.engine.clone(),
            request.source,
            instance,
            request.id,
        );

        match command {
            Some(command) => {
                let ctx = CommandContext {
                    instance,
                    source: request.source,
                };
                command.execute(ctx, request.payload, reply);
            }
            None => {
                log::warn!(
                    "no command `{}` installed in process `{}`",
                    name,
                    self.process
                );
                reply.reject(CommandError::UnknownCommand(name.to_string()));
            }
        }
    }

    fn handle_reply(&self, args: &str) {
        let Some((id, outcome)) = envelope::decode_reply(args) else {
            log::warn!("malformed reply envelope, dropping");
            return;
        };
        let Some(completion) = self.pending.lock().unwrap().remove(&id) else {
            log::warn!("reply for unknown request {}, dropping", id);
            return;
        };
        completion(outcome);
    }
}

impl MessageSink for CommandRegistry {
    fn on_named(&self, instance: InstanceId, name: &str, args: &str) {
        if name == REPLY_NAME {
            self.handle_reply(args);
        } else {
            self.handle_request(instance, name, args);
        }
    }
}
