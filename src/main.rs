//! Main entry point for fight-elo
//!
//! `compute` rebuilds the rating and statistics tables from a match log;
//! `serve` exposes the published tables over HTTP until shut down.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fight_elo::config::{AppConfig, OutcomeVocabulary};
use fight_elo::metrics::MetricsCollector;
use fight_elo::query::{FileTableSource, QueryServer, QueryService, ServerState};
use fight_elo::service::{HealthCheck, HealthStatus, Pipeline, RunSummary};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Fight Elo - ratings and fight statistics for combat sports
#[derive(Parser)]
#[command(
    name = "fight-elo",
    version,
    about = "Sequential Elo ratings and fight statistics for combat-sports match logs",
    long_about = "fight-elo folds a chronological match log into per-bout Elo ratings, a \
                 leaderboard and cumulative per-competitor statistics, publishes them as CSV \
                 tables, and serves those tables through a read-only JSON API."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the tables from a match log
    Compute {
        #[arg(short, long, value_name = "PATH", help = "Override the match log path")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR", help = "Override the output directory")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Do not write the per-bout match ratings table")]
        no_match_ratings: bool,

        #[arg(
            long,
            help = "Parse and compute everything but publish nothing"
        )]
        dry_run: bool,
    },

    /// Serve the published tables over HTTP
    Serve {
        #[arg(long, value_name = "DIR", help = "Directory holding the published tables")]
        data_dir: Option<PathBuf>,

        #[arg(long, value_name = "HOST", help = "Override bind host")]
        host: Option<String>,

        #[arg(short, long, value_name = "PORT", help = "Override HTTP server port")]
        port: Option<u16>,

        #[arg(long, help = "Perform a health check and exit with status code")]
        health_check: bool,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration and apply the global CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    Ok(config)
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig, data_dir: &std::path::Path) {
    info!("🥊 Fight Elo query service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Data directory: {}", data_dir.display());
    info!("   Listening on: {}:{}", config.server.host, config.server.port);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn print_summary(summary: &RunSummary) {
    println!("Run {}", summary.run_id);
    println!("  Input: {}", summary.input.display());
    println!("  Rows read: {}", summary.rows_read);
    println!("  Matches rated: {}", summary.matches);
    println!("  Rows dropped: {}", summary.dropped_rows);
    println!("  Unrecognized outcomes: {}", summary.unrecognized_outcomes);
    println!("  Competitors: {}", summary.competitors);
    if summary.dry_run {
        println!("  Dry run: nothing published");
    }
    for table in &summary.tables {
        println!("  {} -> {} ({} rows)", table.name, table.path.display(), table.rows);
    }
}

async fn run_compute(
    mut config: AppConfig,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    no_match_ratings: bool,
    dry_run: bool,
) -> Result<()> {
    if let Some(input) = input {
        config.input.path = input;
    }
    if let Some(output_dir) = output_dir {
        config.output.dir = output_dir;
    }
    if no_match_ratings {
        config.output.write_match_ratings = false;
    }

    let metrics = Arc::new(MetricsCollector::new()?);
    let pipeline = Pipeline::new(config)?
        .with_dry_run(dry_run)
        .with_metrics(metrics);

    let summary = pipeline.run().await?;
    print_summary(&summary);
    Ok(())
}

fn build_state(config: &AppConfig, data_dir: &std::path::Path) -> Result<ServerState> {
    let source = FileTableSource::new(data_dir, &config.output);
    let vocabulary: OutcomeVocabulary = config.input.outcomes.clone();

    Ok(ServerState {
        query: QueryService::new(Arc::new(source), vocabulary),
        metrics: Arc::new(MetricsCollector::new()?),
        service_name: config.service.name.clone(),
    })
}

/// Perform health check and return appropriate exit code
async fn perform_health_check(state: &ServerState) -> Result<()> {
    info!("Performing health check...");

    let source = state.query.source();
    let health = HealthCheck::check(source.as_ref(), &state.service_name).await;

    println!("Health Check: {}", health.status);
    for check in &health.checks {
        println!(
            "  {}: {} ({})",
            check.name,
            check.status,
            check.message.as_deref().unwrap_or("-")
        );
    }

    if health.status == HealthStatus::Unhealthy {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_serve(
    mut config: AppConfig,
    data_dir: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    health_check: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let data_dir = data_dir.unwrap_or_else(|| config.output.dir.clone());
    let state = build_state(&config, &data_dir)?;

    if health_check {
        return perform_health_check(&state).await;
    }

    display_startup_banner(&config, &data_dir);

    let readiness = HealthCheck::readiness_check(state.query.source().as_ref()).await;
    if readiness != HealthStatus::Healthy {
        warn!("Published tables are not ready yet; data endpoints will answer 503 until they are");
    }

    let server = Arc::new(QueryServer::new(config.server.clone(), state));
    let server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("✅ Fight Elo query service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("🛑 Shutdown signal received, beginning graceful shutdown...");
            server.stop().await?;
        }
        result = server_task => {
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(anyhow::anyhow!("Query server task failed: {}", e)),
            };
        }
    }

    info!("🛑 Fight Elo query service stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let result = match args.command {
        Command::Compute {
            input,
            output_dir,
            no_match_ratings,
            dry_run,
        } => run_compute(config, input, output_dir, no_match_ratings, dry_run).await,
        Command::Serve {
            data_dir,
            host,
            port,
            health_check,
        } => run_serve(config, data_dir, host, port, health_check).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
