// src/main.rs — ShareTunes CLI entry point

use clap::Parser;
use std::sync::Arc;

use sharetunes::api::ShareTunesApi;
use sharetunes::auth::{FileTokenStore, Session};
use sharetunes::cli::{profile, recommend, session, Cli, Commands};
use sharetunes::client::{ApiClient, SessionEvent};
use sharetunes::infra::config::Config;
use sharetunes::infra::{logger, paths};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    config.apply_env_overrides();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let store = FileTokenStore::new(paths::token_file_path());
    tracing::debug!(path = %store.path().display(), "using token file");
    let client = ApiClient::new(&config.api, Session::new(Arc::new(store)))?;
    let mut events = client.subscribe();
    let api = ShareTunesApi::new(client);

    let result = match cli.command {
        Commands::Login { open } => session::run_login(&api, open).await,
        Commands::Callback { redirect } => session::run_callback(&api, &redirect),
        Commands::Logout => session::run_logout(&api),
        Commands::Status => session::run_status(&api),
        Commands::SpotifyRefresh => session::run_spotify_refresh(&api).await,
        Commands::Dashboard { generate } => recommend::run_dashboard(&api, generate).await,
        Commands::Recommendations { action } => {
            recommend::run_recommendations(&api, action).await
        }
        Commands::Profile { action } => profile::run_profile(&api, action).await,
    };

    if let Ok(SessionEvent::Expired) = events.try_recv() {
        eprintln!("Your session has expired and was cleared. Run `sharetunes login` to sign in again.");
    }
    result
}
