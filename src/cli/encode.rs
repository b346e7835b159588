//! Encoding (`magstripe encode ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use magstripe::{CardRecord, Track, Track1, Track1Options};

use crate::cli::utils::read_text_arg;

/// Arguments for `magstripe encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Card record as inline JSON (falls back to stdin if omitted).
    #[arg(long)]
    pub json: Option<String>,
    /// Read the JSON record from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Pad or truncate the cardholder name to 26 characters.
    #[arg(long)]
    pub fixed_length: bool,
}

/// Execute an encode command.
pub fn handle(args: EncodeArgs) -> Result<()> {
    let input = read_text_arg(args.json, args.from)?;
    let card: CardRecord =
        serde_json::from_str(&input).context("failed to parse card record JSON")?;
    let codec = Track1::new(Track1Options {
        fixed_length: args.fixed_length,
    })?;
    let raw = codec.write(&card).with_context(|| {
        format!("failed to encode {} for card {}", codec.name(), card.masked_pan())
    })?;
    println!("{}", String::from_utf8_lossy(&raw));
    Ok(())
}
