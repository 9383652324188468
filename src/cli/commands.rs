//! CLI command implementations

use clap::Parser;
use tracing::info;

use crate::config::AppConfig;
use crate::server::HttpServer;
use crate::store::GuestStore;
use crate::telemetry;

use super::args::{Cli, Command, DatabaseArgs};
use super::errors::{CliError, CliResult};

/// Load `.env`, parse arguments, install tracing and dispatch.
pub async fn run() -> CliResult<()> {
    // Must happen before clap reads DATABASE_URL and friends.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_json);
    run_command(cli.command).await
}

pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve(args) => serve(AppConfig::from(args)).await,
        Command::Migrate(args) => migrate(args).await,
    }
}

/// Open the store, apply the schema and serve until shutdown.
pub async fn serve(config: AppConfig) -> CliResult<()> {
    config.validate()?;

    let store = GuestStore::connect(&config.database_url).await?;
    let server = HttpServer::new(config, store.clone());
    let result = server.start().await;
    store.close().await;

    result.map_err(CliError::from)
}

/// Apply the schema and exit.
pub async fn migrate(args: DatabaseArgs) -> CliResult<()> {
    if args.database_url.trim().is_empty() {
        return Err(CliError::config("DATABASE_URL must not be empty"));
    }

    let store = GuestStore::connect(&args.database_url).await?;
    store.close().await;
    info!("schema is up to date");
    Ok(())
}
