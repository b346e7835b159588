use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    cli::run(cli)
}
