//! Account number classification (`magstripe classify ...`).

use anyhow::Result;
use clap::Args;
use magstripe::{CardType, mask_pan};

/// Arguments for `magstripe classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Primary account number to classify.
    pub pan: String,
}

pub fn handle(args: ClassifyArgs) -> Result<()> {
    let card_type = CardType::classify(&args.pan);
    println!("{}\t{}", mask_pan(args.pan.trim()), card_type);
    Ok(())
}
