//! CLI argument definitions using clap
//!
//! Commands:
//! - guestlist serve [--host <host>] [--port <port>] [--cors-origins <a,b>]
//! - guestlist migrate
//!
//! The connection string always comes from `--database-url` or `DATABASE_URL`.

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// guestlist - guests, accompanists and their quotas
#[derive(Parser, Debug)]
#[command(name = "guestlist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve(ServeArgs),

    /// Create the database schema and exit
    Migrate(DatabaseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Host to bind to
    #[arg(long, env = "GUESTLIST_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, env = "GUESTLIST_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Allowed CORS origins, comma separated. Any origin when empty.
    #[arg(long, env = "GUESTLIST_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl From<ServeArgs> for AppConfig {
    fn from(args: ServeArgs) -> Self {
        AppConfig {
            database_url: args.database.database_url,
            host: args.host,
            port: args.port,
            cors_origins: args.cors_origins,
        }
    }
}
