//! algostep CLI library.
//!
//! Argument types, command handlers, terminal styling and output formatting
//! for the `algostep-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;
