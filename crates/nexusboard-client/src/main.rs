//! nexusboard CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use nexusboard_client::cli::{Cli, Command, ConfigAction};
use nexusboard_client::commands;
use nexusboard_client::config::ClientConfig;
use nexusboard_client::error::ClientResult;
use nexusboard_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ClientConfig::default_path);
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let debug = cli.debug || config.debug;
    let tracing_config = match cli.command {
        Some(Command::Watch { .. }) => TracingConfig::watcher(debug),
        _ => TracingConfig::cli(debug),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config, &config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
}

async fn run(cli: Cli, config: ClientConfig, config_path: &std::path::Path) -> ClientResult<()> {
    let feeds = config.feed_urls(&cli.feeds);

    match cli.command {
        Some(Command::Agenda { json }) => commands::agenda::run(&config, &feeds, json).await,
        Some(Command::Month { json }) => commands::month::run(&config, &feeds, json).await,
        Some(Command::Check { url }) => commands::check::run(&config, &url).await,
        Some(Command::Watch { interval }) => {
            commands::watch::run(&config, feeds, interval.map(Duration::from_secs)).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(config_path),
        },
        None => commands::agenda::run(&config, &feeds, false).await,
    }
}
