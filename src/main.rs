use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use printpass::cli::{run, CliArgs};
use printpass::{init_logging, Config, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    let config =
        Config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging)?;
    tracing::debug!("printpass {} (built {})", VERSION, BUILD_DATE);

    run(args.command, &config)
}
