mod cli;
mod config;
mod error;
mod models;
mod services;
mod utils;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::Result;
use crate::services::api::OpenDotaClient;
use crate::services::pipeline::MatchBrowser;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.api_url, cli.pages)?;
    let client = OpenDotaClient::new(&config)?;
    let mut browser = MatchBrowser::new(client, &config);

    match cli.command.unwrap_or(Command::Browse) {
        Command::Heroes => cli::list_heroes(&mut browser).await,
        Command::Matches { mmr, hero } => {
            cli::show_matches(&mut browser, mmr, hero.as_deref()).await?
        }
        Command::Browse => cli::browse(&mut browser).await?,
    }

    Ok(())
}
