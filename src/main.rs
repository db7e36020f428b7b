use anyhow::Context;
use clap::Parser;
use docqa::{cli::Cli, config, logging};

fn main() -> anyhow::Result<()> {
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_tracing(config.log_file.as_deref());
    Cli::parse().run(config)
}
