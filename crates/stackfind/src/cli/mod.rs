//! CLI support for the `stackfind` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod logging;
pub mod output;
pub mod script;
