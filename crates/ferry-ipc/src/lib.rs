// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Named asynchronous commands across process and context boundaries.
//!
//! A process installs handlers under string names at startup; any
//! process can then invoke a name with an argument string and a
//! one-shot completion callback. The handler answers through a
//! [`ResultChannel`] it can carry to whatever context produces the
//! result — no blocking wait anywhere on the invocation path.

mod channel;
mod command;
mod envelope;
mod error;
mod registry;

pub use channel::ResultChannel;
pub use command::{AsyncCommand, CommandContext};
pub use error::{CommandError, InstallError};
pub use registry::CommandRegistry;
