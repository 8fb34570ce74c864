// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The two cookie-string commands.
//!
//! Both answer with `"name=value; name=value"`. The streaming variant
//! accumulates while the jar enumerates on a separate context; the map
//! variant snapshots first and joins. Either way: no trailing
//! separator, and an empty source answers with the empty string.

use std::sync::Arc;

use ferry_engine::ContextId;
use ferry_ipc::{AsyncCommand, CommandContext, ResultChannel};
use ferry_rt::Dispatcher;

use crate::jar::{CookieJar, CookiesRemaining};

/// Streams the jar's enumeration into an accumulated string.
///
/// Enumeration runs on `enumerate_on` (the engine keeps cookie access
/// off the message context), so the reply channel rides across a
/// context boundary before dispatching.
pub struct CookieStringCommand {
    jar: Arc<CookieJar>,
    dispatcher: Dispatcher,
    enumerate_on: ContextId,
    default_origin: String,
}

impl CookieStringCommand {
    pub fn new(
        jar: Arc<CookieJar>,
        dispatcher: Dispatcher,
        enumerate_on: ContextId,
        default_origin: impl Into<String>,
    ) -> Self {
        Self {
            jar,
            dispatcher,
            enumerate_on,
            default_origin: default_origin.into(),
        }
    }

    fn origin_for(&self, args: &str) -> String {
        if args.is_empty() {
            self.default_origin.clone()
        } else {
            args.to_string()
        }
    }
}

impl AsyncCommand for CookieStringCommand {
    fn execute(&self, _ctx: CommandContext, args: &str, reply: ResultChannel) {
        let origin = self.origin_for(args);
        let jar = self.jar.clone();

        let posted = self.dispatcher.post(self.enumerate_on, move || {
            let mut accumulated = String::new();
            let mut reply = Some(reply);
            jar.for_each_cookie(&origin, |name, value, remaining| {
                if remaining != CookiesRemaining::NoCookies {
                    accumulated.push_str(name);
                    accumulated.push('=');
                    accumulated.push_str(value);
                }
                match remaining {
                    CookiesRemaining::NoCookies | CookiesRemaining::NoMore => {
                        if let Some(channel) = reply.take() {
                            channel.dispatch(std::mem::take(&mut accumulated));
                        }
                    }
                    CookiesRemaining::More => accumulated.push_str("; "),
                }
            });
        });

        if let Err(e) = posted {
            // The reply channel went down with the closure; the invoker
            // times out on its own.
            log::warn!("cookie enumeration could not be scheduled: {}", e);
        }
    }
}

/// Joins a snapshot of the jar's ordered map.
pub struct CookieMapCommand {
    jar: Arc<CookieJar>,
    default_origin: String,
}

impl CookieMapCommand {
    pub fn new(jar: Arc<CookieJar>, default_origin: impl Into<String>) -> Self {
        Self {
            jar,
            default_origin: default_origin.into(),
        }
    }
}

impl AsyncCommand for CookieMapCommand {
    fn execute(&self, _ctx: CommandContext, args: &str, reply: ResultChannel) {
        let origin = if args.is_empty() {
            &self.default_origin
        } else {
            args
        };

        let mut joined = String::new();
        for (i, (name, value)) in self.jar.cookie_map(origin).iter().enumerate() {
            if i > 0 {
                joined.push_str("; ");
            }
            joined.push_str(name);
            joined.push('=');
            joined.push_str(value);
        }
        reply.dispatch(joined);
    }
}
