use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorebook::api::state::AppState;
use scorebook::api::build_router;
use scorebook::config::AppConfig;
use scorebook::seed;
use scorebook::store::Database;

#[derive(Parser)]
#[command(name = "scorebook")]
#[command(about = "Cricket tournament statistics API seeded from JSON fixtures")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// SQLite database path (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database from fixture files
    Seed {
        /// Directory containing the fixture JSON files
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting scorebook v{}", env!("CARGO_PKG_VERSION"));

    // Config file is optional; CLI flags override what it provides.
    let config = if Path::new(&cli.config).exists() {
        AppConfig::from_file(&PathBuf::from(&cli.config))?
    } else {
        AppConfig::default()
    };

    let database = cli
        .database
        .map(PathBuf::from)
        .unwrap_or_else(|| config.database.clone());
    let database = database.to_string_lossy().to_string();

    match cli.command {
        Commands::Seed { data_dir } => {
            let data_dir = data_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| config.data_dir.clone());
            tracing::info!(
                "Seeding {} from fixtures in {}",
                database,
                data_dir.display()
            );

            let db = Database::open(&database)?;
            let report = seed::run(&db, &data_dir);

            println!("\n=== Seed Results ===");
            for (name, category) in [
                ("Teams", &report.teams),
                ("Players", &report.players),
                ("Matches", &report.matches),
                ("Innings", &report.innings),
                ("Standings", &report.standings),
            ] {
                println!(
                    "{:<10} seeded {:>5}, skipped {:>3}",
                    name, category.seeded, category.skipped
                );
            }
            let reasons: Vec<&String> = [
                &report.teams,
                &report.players,
                &report.matches,
                &report.innings,
                &report.standings,
            ]
            .into_iter()
            .flat_map(|c| c.reasons.iter())
            .collect();
            if !reasons.is_empty() {
                println!("\nSkipped records:");
                for reason in reasons {
                    println!("  - {reason}");
                }
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let db = Database::open(&database)?;
            let state = AppState { db: Arc::new(db) };
            let app = build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
