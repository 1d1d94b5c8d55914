use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cwl_bonus_tracker::api::build_router;
use cwl_bonus_tracker::api::state::AppState;
use cwl_bonus_tracker::config::AppConfig;
use cwl_bonus_tracker::models::{LeaderboardEntry, RefreshReport};
use cwl_bonus_tracker::storage::LeaderboardStore;
use cwl_bonus_tracker::sync::SyncOrchestrator;

#[derive(Parser)]
#[command(name = "cwl-bonus-tracker")]
#[command(about = "Clan War League leaderboard with effective-star bonuses")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Compute the leaderboard once before accepting requests
        #[arg(long)]
        refresh_on_start: bool,

        /// Refresh periodically (e.g., "30m", "6h")
        #[arg(long)]
        refresh_every: Option<String>,
    },

    /// Compute the leaderboard once and print it
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting cwl-bonus-tracker v{}", env!("CARGO_PKG_VERSION"));
    if cli.config.exists() {
        tracing::info!("Loaded config from {}", cli.config.display());
    } else {
        tracing::info!("No config file at {}, using defaults", cli.config.display());
    }
    if config.api.token.is_none() {
        tracing::warn!("No API token configured (set API_KEY); war data requests will be rejected");
    }

    let orchestrator = Arc::new(SyncOrchestrator::from_config(&config)?);
    let store = Arc::new(LeaderboardStore::new());

    match cli.command {
        Commands::Serve {
            host,
            port,
            refresh_on_start,
            refresh_every,
        } => {
            let period = match refresh_every {
                Some(s) => Some(
                    cwl_bonus_tracker::parse_duration(&s)
                        .filter(|d| !d.is_zero())
                        .filter(|d| tokio::time::Instant::now().checked_add(*d).is_some())
                        .with_context(|| format!("Invalid --refresh-every value: {}", s))?,
                ),
                None => None,
            };

            if refresh_on_start {
                let report = orchestrator.refresh(&store).await?;
                tracing::info!(
                    "Initial refresh: {:?}, {} players",
                    report.status,
                    report.players
                );
            }

            if let Some(period) = period {
                tokio::spawn(orchestrator.clone().run_periodic(store.clone(), period));
            }

            let state = AppState::new(store, orchestrator, &config.server.cors_origin);
            let app = build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            tracing::info!("Clan {} leaderboard API on http://{}", config.clan.tag, addr);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            axum::serve(listener, app).await?;
        }

        Commands::Refresh => {
            let report = orchestrator.refresh(&store).await?;
            let entries = store.entries().await;
            print_leaderboard(&entries);
            print_report(&report);
        }
    }

    Ok(())
}

fn print_leaderboard(entries: &[LeaderboardEntry]) {
    if entries.is_empty() {
        println!("Leaderboard is empty.");
        return;
    }

    println!(
        "{:>4}  {:<12} {:<20} {:>6} {:>10}",
        "Rank", "Tag", "Name", "Stars", "Destr. %"
    );
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {:<12} {:<20} {:>6} {:>10.1}",
            i + 1,
            entry.tag.as_str(),
            entry.name,
            entry.stars,
            entry.percentage
        );
    }
}

fn print_report(report: &RefreshReport) {
    println!();
    print!("Status: {:?}", report.status);
    if let Some(state) = report.league_state {
        print!(" (league {})", state);
    }
    println!();
    println!(
        "Wars fetched: {}, skipped: {}, players: {}",
        report.wars_fetched, report.wars_skipped, report.players
    );
    for failure in &report.failed_wars {
        println!("  Failed war {}: {}", failure.war_tag, failure.error);
    }
    for error in &report.errors {
        println!("  Error: {}", error);
    }
}
