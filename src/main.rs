//! influxsql server
//!
//! Run with: cargo run -- --config config.toml
//!
//! Without `--config`, configuration is read from `./config.toml`, the user
//! config directory or `/etc/influxsql/config.toml`, falling back to defaults.
//! `INFLUXSQL_*` environment variables override file values and `RUST_LOG`
//! overrides the configured log level.

use clap::{Parser, Subcommand};
use influxsql::api::{serve, AppState};
use influxsql::config::{generate_default_config, Config, LoggingConfig};
use influxsql::db::{Database, QueryBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "influxsql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Influx-compatible query endpoint for MySQL and PostgreSQL")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the query server (default)
    Serve,

    /// Print a default config file
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::PrintConfig) = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting influxsql v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        driver = %config.database.driver,
        listen = %config.server.listen_address,
        "Configuration loaded"
    );

    let database = Arc::new(Database::connect(&config.database)?);
    let backend: Arc<dyn QueryBackend> = database.clone();
    let state = AppState::from_config(backend, &config);

    serve(state, &config.server.listen_address).await?;

    tracing::info!("Closing database pool...");
    database.close().await;
    tracing::info!("influxsql stopped");

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("influxsql={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
