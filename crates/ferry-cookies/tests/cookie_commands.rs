// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Cookie commands end to end: renderer asks, browser enumerates,
//! accumulated strings come back over the reply path.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use ferry_cookies::{CookieJar, CookieMapCommand, CookieStringCommand};
use ferry_engine::{ContextId, Engine, InstanceId, ProcessId};
use ferry_ipc::{CommandError, CommandRegistry};
use ferry_local::LocalEngine;
use ferry_rt::Dispatcher;

const DEFAULT_ORIGIN: &str = "https://app.test/index.html";

struct Fixture {
    engine: Arc<LocalEngine>,
    renderer: Arc<CommandRegistry>,
    jar: Arc<CookieJar>,
}

impl Fixture {
    fn new() -> Self {
        let engine = LocalEngine::new(&[ContextId::UI, ContextId::IO, ContextId::RENDERER]);
        let browser = CommandRegistry::new(engine.clone() as Arc<dyn Engine>, ProcessId::Browser);
        let renderer =
            CommandRegistry::new(engine.clone() as Arc<dyn Engine>, ProcessId::Renderer);
        engine.register_process(ProcessId::Browser, ContextId::UI, browser.clone());
        engine.register_process(ProcessId::Renderer, ContextId::RENDERER, renderer.clone());

        let jar = Arc::new(CookieJar::new());
        let dispatcher = Dispatcher::new(engine.clone() as Arc<dyn Engine>);
        browser
            .install(
                "GetAllCookies",
                Arc::new(CookieStringCommand::new(
                    jar.clone(),
                    dispatcher,
                    ContextId::IO,
                    DEFAULT_ORIGIN,
                )),
            )
            .unwrap();
        browser
            .install(
                "GetAllCookies_FromMap",
                Arc::new(CookieMapCommand::new(jar.clone(), DEFAULT_ORIGIN)),
            )
            .unwrap();

        Self {
            engine,
            renderer,
            jar,
        }
    }

    /// Invoke a cookie command and block on its completion, the way a
    /// test harness on a plain thread can afford to.
    fn fetch(&self, command: &str, origin: &str) -> Result<String, CommandError> {
        let (tx, rx) = mpsc::channel();
        self.renderer.invoke(
            ProcessId::Browser,
            InstanceId(1),
            command,
            origin,
            move |outcome| {
                tx.send(outcome).unwrap();
            },
        );
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    fn cookie_string(&self, origin: &str) -> String {
        self.fetch("GetAllCookies", origin).unwrap()
    }

    fn cookie_map_string(&self, origin: &str) -> String {
        self.fetch("GetAllCookies_FromMap", origin).unwrap()
    }
}

#[test]
fn no_cookies_yields_the_empty_string() {
    let fx = Fixture::new();
    assert_eq!(fx.cookie_string(""), "");
    assert_eq!(fx.cookie_map_string(""), "");
    fx.engine.shutdown();
}

#[test]
fn one_cookie_has_no_separator() {
    let fx = Fixture::new();
    fx.jar.set(DEFAULT_ORIGIN, "username", "Test.User");
    assert_eq!(fx.cookie_string(""), "username=Test.User");
    assert_eq!(fx.cookie_map_string(""), "username=Test.User");
    fx.engine.shutdown();
}

#[test]
fn two_cookies_join_with_a_separator_and_no_trailer() {
    let fx = Fixture::new();
    fx.jar.set(DEFAULT_ORIGIN, "username", "Test.User");
    fx.jar.set(DEFAULT_ORIGIN, "username2", "Test.User2");
    assert_eq!(
        fx.cookie_string(""),
        "username=Test.User; username2=Test.User2"
    );
    assert_eq!(
        fx.cookie_map_string(""),
        "username=Test.User; username2=Test.User2"
    );
    fx.engine.shutdown();
}

#[test]
fn empty_args_fall_back_to_the_default_origin() {
    let fx = Fixture::new();
    fx.jar.set(DEFAULT_ORIGIN, "a", "1");
    assert_eq!(fx.cookie_string(""), "a=1");
    assert_eq!(fx.cookie_string(DEFAULT_ORIGIN), "a=1");
    fx.engine.shutdown();
}

#[test]
fn an_unknown_origin_yields_the_empty_string() {
    let fx = Fixture::new();
    fx.jar.set(DEFAULT_ORIGIN, "username", "Test.User");
    assert_eq!(fx.cookie_string("not a url"), "");
    assert_eq!(fx.cookie_string("https://elsewhere.test"), "");
    fx.engine.shutdown();
}

#[test]
fn cleared_origin_reads_back_empty() {
    let fx = Fixture::new();
    fx.jar.set(DEFAULT_ORIGIN, "username", "Test.User");
    assert_eq!(fx.cookie_string(""), "username=Test.User");
    fx.jar.clear(DEFAULT_ORIGIN);
    assert_eq!(fx.cookie_string(""), "");
    fx.engine.shutdown();
}
