use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use foodgram::server::{config::Config, error::Error, service::fixture::FixtureService, startup};

#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Foodgram recipe sharing API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Load tags from a JSON array of `{name, color, slug}` objects
    LoadTags {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Load ingredients from a JSON array of `{name, measurement_unit}` objects
    LoadIngredients {
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // `.env` may carry RUST_LOG, so it has to be loaded before the subscriber reads it
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = startup::connect_to_database(&config).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => startup::serve(&config, db).await?,
        Commands::LoadTags { file } => {
            let loaded = FixtureService::new(&db).load_tags(&file).await?;
            tracing::info!("Loaded {} tags from {}", loaded, file.display());
        }
        Commands::LoadIngredients { file } => {
            let loaded = FixtureService::new(&db).load_ingredients(&file).await?;
            tracing::info!("Loaded {} ingredients from {}", loaded, file.display());
        }
    }

    Ok(())
}

static DEFAULT_LOG_FILTER: &str = "info,foodgram=debug,tower_http=debug";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
