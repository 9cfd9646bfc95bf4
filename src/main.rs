//! docrag CLI entry point.

use clap::Parser;

use docrag::cli::commands::{self, ask, chunks, models};
use docrag::cli::{handle_error, Cli, Commands};
use docrag::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Ask(args) => ask::execute(args, config, cli.json).await,
        Commands::Chunks(args) => chunks::execute(args, config, cli.json).await,
        Commands::Models => models::execute(config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
