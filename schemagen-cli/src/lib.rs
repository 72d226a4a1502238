//! schemagen CLI library
//!
//! Argument definitions and command implementations behind the `schemagen`
//! binary, exposed so they can be tested without spawning a process.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, LogFormatArg};
pub use commands::{GenerateCommand, InitCommand, SourceArgs, TablesCommand};
