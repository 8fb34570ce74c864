// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command installation and invocation errors.

use thiserror::Error;

/// Why a handler could not be installed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstallError {
    /// The name is taken. First registration wins; installation is a
    /// startup-time activity, so a collision is a wiring bug.
    #[error("command `{0}` is already installed")]
    AlreadyInstalled(String),
}

/// Why an invocation completed without a result.
///
/// Delivered through the completion callback, never thrown: an invoker
/// always hears back once when the destination is alive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// No handler is installed under the invoked name on the receiving
    /// side.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}
