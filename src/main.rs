use clap::{Parser, Subcommand};
use ipl_dashboard::apis::cricbuzz::CricbuzzClient;
use ipl_dashboard::config::Config;
use ipl_dashboard::server::{start_server, AppState};
use ipl_dashboard::storage::{InMemoryStorage, Storage};
use ipl_dashboard::{ingest, logging, tasks};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

#[derive(Parser)]
#[command(name = "ipl_dashboard")]
#[command(about = "IPL statistics dashboard backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the historical match CSV and print a summary
    Ingest {
        /// CSV file to ingest (defaults to the configured path)
        #[arg(long)]
        file: Option<String>,
    },
    /// Ingest the CSV, then serve the REST API and live-score feed
    Serve {
        /// Bind address override, e.g. 127.0.0.1:8080
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config)?;

    match cli.command {
        Commands::Ingest { file } => {
            let csv_path = file.unwrap_or_else(|| config.data.match_csv.clone());
            let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());

            println!("🔄 Ingesting match data from {}...", csv_path);
            let summary = ingest::run(Path::new(&csv_path), storage).await?;
            println!("✅ Matches saved: {}", summary.matches);
            println!("✅ Teams saved: {}", summary.teams);
            println!("✅ Players saved: {}", summary.players);
        }
        Commands::Serve { addr } => {
            let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());

            // Startup batch; any malformed row is fatal
            let summary = ingest::run(Path::new(&config.data.match_csv), storage.clone()).await?;
            info!(
                matches = summary.matches,
                teams = summary.teams,
                players = summary.players,
                "Startup ingestion finished"
            );

            let (live_tx, _) = broadcast::channel(16);

            let api_key = config.live_score_api_key();
            if api_key.is_none() {
                info!(
                    env = %config.live_score.api_key_env,
                    "Live-score API key not set; poller will broadcast empty updates"
                );
            }
            let client = CricbuzzClient::new(config.live_score.clone(), api_key);
            tokio::spawn(tasks::poll_live_scores(
                client,
                live_tx.clone(),
                config.live_score.poll_interval_secs,
            ));

            let state = Arc::new(AppState { storage, live_tx });
            let bind_addr = addr.unwrap_or_else(|| config.server.bind_addr.clone());
            start_server(state, &bind_addr, &config.server.cors_origins)
                .await
                .map_err(|e| anyhow::anyhow!("server error: {e}"))?;
        }
    }

    Ok(())
}
