//! Subcommand implementations.

pub mod init;
pub mod languages;
pub mod output;
pub mod pragmas;
