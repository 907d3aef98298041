#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal host for the crash map dashboard.
//!
//! ```text
//! crash_map [--config <path>] [--base-url <url>]
//! crash_map map-url [filter flags]
//! crash_map ranking [filter flags]
//! ```
//!
//! Running `crash_map` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`crash_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the loading spinner never fight for the terminal.

mod args;
mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crash_map_dashboard::app::Dashboard;
use crash_map_dashboard::client::HttpRankingClient;
use crash_map_dashboard::config::DashboardConfig;
use crash_map_dashboard::map_frame::RefreshKey;
use crash_map_dashboard::results::ResultsView;

use crate::args::SettingsArgs;

#[derive(Parser)]
#[command(
    name = "crash_map",
    about = "Explore high-risk crash locations from the crash data service"
)]
struct Cli {
    /// Config file to use instead of the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the crash data service
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive dashboard (the default)
    Interactive,
    /// Print the map URL and its refresh key
    MapUrl {
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Fetch and print the ranking once
    Ranking {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crash_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::embedded(),
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let client = HttpRankingClient::new(&config)?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            check_health(&client).await;
            let dashboard = Dashboard::new(
                client.api().clone(),
                config.title.clone(),
                Arc::new(client),
            );
            interactive::run(&multi, dashboard).await?;
        }
        Commands::MapUrl { settings } => {
            let snapshot = settings.snapshot()?;
            println!("{}", client.api().map_url(&snapshot.filters));
            for value in snapshot.filters.selected() {
                println!("  {} = {:?}", value.param(), value.wire_value());
            }
            println!("key: {}", RefreshKey::of(&snapshot.filters));
        }
        Commands::Ranking { settings } => {
            let snapshot = settings.snapshot()?;
            let mut view =
                ResultsView::new(client.api().clone(), config.title.clone(), Arc::new(snapshot));
            let ticket = view.mount();
            view.run(&client, ticket).await;
            print!("{}", render::render_total(&view));
            print!("{}", render::render_rankings(&view));
            if view.error().is_some() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Logs whether the service answers its health check. Never fails.
async fn check_health(client: &HttpRankingClient) {
    match client.check_health().await {
        Ok(health) => log::info!("Crash data service at {}: {}", client.api(), health.status),
        Err(e) => log::warn!(
            "Crash data service at {} is not responding ({e}); rankings will fail until it is",
            client.api()
        ),
    }
}
