//! Command-line interface wiring for the `magstripe` binary.
//!
//! This module owns the clap definitions and delegates execution to the
//! submodule for each command.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

pub mod classify;
pub mod decode;
pub mod encode;
pub mod utils;

/// Parsed CLI entrypoint for the `magstripe` binary.
#[derive(Parser, Debug)]
#[command(name = "magstripe", version, about = "Magnetic-stripe Track 1 toolkit")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON card record as Track 1 data.
    Encode(encode::EncodeArgs),
    /// Decode Track 1 data into a JSON card record.
    Decode(decode::DecodeArgs),
    /// Report the card network for an account number.
    Classify(classify::ClassifyArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Encode(args) => encode::handle(args),
        Command::Decode(args) => decode::handle(args),
        Command::Classify(args) => classify::handle(args),
    }
}
