//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod langx;
pub mod completions;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand
}
