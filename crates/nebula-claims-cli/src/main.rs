use clap::Parser as _;

use crate::{command::Cli, logger::LoggerConfig};

mod command;
mod config;
mod logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = config::load_config(&cli.global)?;

    logger::init_logger(LoggerConfig { format: app_config.log.format });

    cli.run(&app_config)
}
