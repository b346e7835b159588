//! Decoding (`magstripe decode ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use magstripe::{CardRecord, Track, Track1, Track1Options, TrackError};

use crate::cli::utils::{read_text_arg, strip_line_end};

/// Arguments for `magstripe decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Raw track data (falls back to stdin if omitted).
    #[arg(long)]
    pub text: Option<String>,
    /// Read track data from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Print single-line JSON instead of pretty output.
    #[arg(long)]
    pub compact: bool,
}

/// Execute a decode command.
///
/// A record that decoded except for one malformed sub-field is still
/// printed, but the command fails.
pub fn handle(args: DecodeArgs) -> Result<()> {
    let input = read_text_arg(args.text, args.from)?;
    let codec = Track1::new(Track1Options::default())?;
    match codec.read(strip_line_end(&input).as_bytes()) {
        Ok(card) => print_card(&card, args.compact),
        Err(err @ TrackError::Field { .. }) => {
            let message = err.to_string();
            if let Some(card) = err.into_partial_card() {
                print_card(&card, args.compact)?;
            }
            Err(anyhow!("track decoded partially: {message}"))
        }
        Err(err) => Err(err).with_context(|| format!("failed to decode {} data", codec.name())),
    }
}

fn print_card(card: &CardRecord, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(card)?
    } else {
        serde_json::to_string_pretty(card)?
    };
    println!("{json}");
    Ok(())
}
