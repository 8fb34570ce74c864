// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Wire form of requests and replies.
//!
//! The engine owns the outer envelope (name + argument string); this
//! module owns what goes inside the argument string. The request id
//! leads every payload, so splitting on the first separators stays
//! unambiguous even when the payload itself contains `';'`.
//!
//! Request args:  `{id};{source-process};{payload}`
//! Reply args:    `{id};ok;{payload}`  or  `{id};err;{command-name}`

use ferry_engine::ProcessId;

use crate::error::CommandError;

/// Reserved message name carrying replies back to the invoker.
pub(crate) const REPLY_NAME: &str = "ferry/reply";

/// A decoded request envelope.
pub(crate) struct Request<'a> {
    pub id: u64,
    pub source: ProcessId,
    pub payload: &'a str,
}

pub(crate) fn encode_request(id: u64, source: ProcessId, payload: &str) -> String {
    format!("{};{};{}", id, source.name(), payload)
}

pub(crate) fn decode_request(args: &str) -> Option<Request<'_>> {
    let (id, rest) = args.split_once(';')?;
    let (source, payload) = rest.split_once(';')?;
    Some(Request {
        id: id.parse().ok()?,
        source: ProcessId::from_name(source)?,
        payload,
    })
}

pub(crate) fn encode_reply(id: u64, outcome: &Result<String, CommandError>) -> String {
    match outcome {
        Ok(payload) => format!("{};ok;{}", id, payload),
        Err(CommandError::UnknownCommand(name)) => format!("{};err;{}", id, name),
    }
}

pub(crate) fn decode_reply(args: &str) -> Option<(u64, Result<String, CommandError>)> {
    let (id, rest) = args.split_once(';')?;
    let id = id.parse().ok()?;
    let (kind, payload) = rest.split_once(';')?;
    match kind {
        "ok" => Some((id, Ok(payload.to_string()))),
        "err" => Some((id, Err(CommandError::UnknownCommand(payload.to_string())))),
        _ => None,
    }
}
