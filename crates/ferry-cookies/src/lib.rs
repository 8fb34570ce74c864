// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Cookie enumeration commands.
//!
//! The jar is a plain in-memory store; the interesting part is the
//! enumeration contract its visitors get. The terminal marker is
//! three-way — empty source, last entry, more to come — because the
//! consumer building a `name=value; ...` string has to decide between
//! appending a separator and finalizing, and "no entries at all" must
//! produce the empty string rather than an error.

mod commands;
mod jar;

pub use commands::{CookieMapCommand, CookieStringCommand};
pub use jar::{CookieJar, CookiesRemaining};
