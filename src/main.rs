//! # Command Line Interface
//!
//! The argument structure is in `cli.rs`.
//! The subcommands are in the `commands` module.

mod cli;

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use ca65kit::commands;
use ca65kit::commands::CommandError;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();
    let matches = cli::build_cli().get_matches();

    if let Some(cmd) = matches.subcommand_matches("verify") {
        return commands::langx::verify(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("parse") {
        return commands::langx::parse(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("format") {
        return commands::langx::format(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    error!("No subcommand was found, try `ca65kit --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
