// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The loopback engine: context table plus in-memory message routing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use ferry_engine::{ContextId, Engine, EngineTask, InstanceId, MessageSink, ProcessId};

use crate::context::{thread_is_on, ContextThread};

/// Where a logical process receives its named messages.
struct ProcessEndpoint {
    /// Context the process's sink is invoked on.
    home: ContextId,
    sink: Arc<dyn MessageSink>,
}

/// An engine whose contexts are threads in this process.
///
/// The context set is fixed at construction. Logical processes register
/// a [`MessageSink`] and a home context afterwards, during startup;
/// `send_named` then hops onto the target's home context to deliver.
pub struct LocalEngine {
    contexts: HashMap<ContextId, Arc<ContextThread>>,
    endpoints: RwLock<HashMap<ProcessId, ProcessEndpoint>>,
}

impl LocalEngine {
    /// Start one pinned thread per context id.
    pub fn new(contexts: &[ContextId]) -> Arc<Self> {
        let contexts = contexts
            .iter()
            .map(|&id| (id, ContextThread::start(id)))
            .collect();
        Arc::new(Self {
            contexts,
            endpoints: RwLock::new(HashMap::new()),
        })
    }

    /// Wire up the message sink for a logical process. Incoming named
    /// messages for `process` are delivered on `home`.
    ///
    /// Returns `false` (and wires nothing) if `home` is not one of this
    /// engine's contexts. Re-registering a process replaces its sink.
    pub fn register_process(
        &self,
        process: ProcessId,
        home: ContextId,
        sink: Arc<dyn MessageSink>,
    ) -> bool {
        if !self.contexts.contains_key(&home) {
            log::warn!(
                "cannot register process `{}`: unknown home context `{}`",
                process,
                home
            );
            return false;
        }
        self.endpoints
            .write()
            .unwrap()
            .insert(process, ProcessEndpoint { home, sink });
        true
    }

    /// Stop accepting work on every context, drain, and join. After
    /// this, `enqueue` returns `false` and `send_named` drops messages.
    pub fn shutdown(&self) {
        for ctx in self.contexts.values() {
            ctx.shutdown();
        }
    }
}

impl Drop for LocalEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Engine for LocalEngine {
    fn currently_on(&self, ctx: ContextId) -> bool {
        thread_is_on(ctx)
    }

    fn enqueue(&self, ctx: ContextId, task: EngineTask, delay: Duration) -> bool {
        match self.contexts.get(&ctx) {
            Some(thread) => thread.submit(task, delay),
            None => false,
        }
    }

    fn send_named(&self, target: ProcessId, instance: InstanceId, name: &str, args: &str) {
        let (home, sink) = {
            let endpoints = self.endpoints.read().unwrap();
            match endpoints.get(&target) {
                Some(ep) => (ep.home, ep.sink.clone()),
                None => {
                    log::warn!(
                        "dropping message `{}` for unregistered process `{}`",
                        name,
                        target
                    );
                    return;
                }
            }
        };

        let name = name.to_string();
        let args = args.to_string();
        let delivered = self.enqueue(
            home,
            Box::new(move || sink.on_named(instance, &name, &args)),
            Duration::ZERO,
        );
        if !delivered {
            log::warn!("message for process `{}` dropped: engine shutting down", target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;

    const MAIN: ContextId = ContextId::new("main-test");
    const AUX: ContextId = ContextId::new("aux-test");

    #[test]
    fn enqueue_runs_on_the_named_context() {
        let engine = LocalEngine::new(&[MAIN, AUX]);
        let (tx, rx) = mpsc::channel();
        let probe = engine.clone();
        engine.enqueue(
            AUX,
            Box::new(move || {
                tx.send((probe.currently_on(AUX), probe.currently_on(MAIN)))
                    .unwrap();
            }),
            Duration::ZERO,
        );
        assert_eq!(rx.recv().unwrap(), (true, false));
        engine.shutdown();
    }

    #[test]
    fn enqueue_to_unknown_context_is_rejected() {
        let engine = LocalEngine::new(&[MAIN]);
        assert!(!engine.enqueue(
            ContextId::new("nowhere"),
            Box::new(|| {}),
            Duration::ZERO
        ));
        engine.shutdown();
    }

    #[test]
    fn enqueue_after_shutdown_is_rejected() {
        let engine = LocalEngine::new(&[MAIN]);
        engine.shutdown();
        assert!(!engine.enqueue(MAIN, Box::new(|| {}), Duration::ZERO));
    }

    struct Recorder {
        seen: Mutex<mpsc::Sender<(InstanceId, String, String)>>,
    }

    impl MessageSink for Recorder {
        fn on_named(&self, instance: InstanceId, name: &str, args: &str) {
            self.seen
                .lock()
                .unwrap()
                .send((instance, name.to_string(), args.to_string()))
                .unwrap();
        }
    }

    #[test]
    fn send_named_delivers_on_the_home_context() {
        let engine = LocalEngine::new(&[MAIN, AUX]);
        let (tx, rx) = mpsc::channel();
        engine.register_process(
            ProcessId::Browser,
            AUX,
            Arc::new(Recorder {
                seen: Mutex::new(tx),
            }),
        );

        engine.send_named(ProcessId::Browser, InstanceId(7), "PING", "payload");
        let (instance, name, args) = rx.recv().unwrap();
        assert_eq!(instance, InstanceId(7));
        assert_eq!(name, "PING");
        assert_eq!(args, "payload");
        engine.shutdown();
    }

    #[test]
    fn send_named_to_unregistered_process_is_dropped() {
        let engine = LocalEngine::new(&[MAIN]);
        // Nothing to assert beyond "does not panic or hang".
        engine.send_named(ProcessId::Renderer, InstanceId(0), "PING", "");
        engine.shutdown();
    }

    #[test]
    fn register_process_rejects_unknown_home_context() {
        let engine = LocalEngine::new(&[MAIN]);
        let (tx, _rx) = mpsc::channel();
        let ok = engine.register_process(
            ProcessId::Browser,
            ContextId::new("nowhere"),
            Arc::new(Recorder {
                seen: Mutex::new(tx),
            }),
        );
        assert!(!ok);
        engine.shutdown();
    }
}
