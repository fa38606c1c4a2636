//! ECS health server entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecs_health_server::api::{create_router, AppState};
use ecs_health_server::config::Config;
use ecs_health_server::metrics;
use ecs_health_server::utils::shutdown_signal;

/// Minimal JSON HTTP service for container liveness checks.
#[derive(Parser, Debug)]
#[command(name = "ecs-health-server")]
#[command(about = "Minimal JSON HTTP service for container liveness checks")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Run {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration drives the log filter, so load it before logging starts
    let config = Config::load();

    // Initialize logging
    let directives = match &config {
        Ok(c) => c.log_filter(args.verbose).to_string(),
        Err(_) => Config::default().log_filter(args.verbose).to_string(),
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    let (plain, json) = if args.json_logs {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Run { port }) => cmd_run(config, port.or(args.port)).await,
        None => cmd_run(config, args.port).await,
    }
}

/// Log a configuration failure before propagating it.
fn require_config(config: Result<Config, envy::Error>) -> anyhow::Result<Config> {
    config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e.into()
    })
}

/// Check configuration validity.
fn cmd_check_config(config: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ECS HEALTH SERVER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  Environment: {}", config.environment);
    println!("  App Name: {}", config.app_name);
    println!(
        "  App Secret: {}",
        if config.has_secret() { "present" } else { "absent" }
    );
    println!(
        "  Secret Endpoint: {}",
        if config.secret_endpoint { "Enabled" } else { "Disabled" }
    );
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_run(
    config: Result<Config, envy::Error>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = require_config(config)?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    if config.secret_endpoint && config.has_secret() {
        warn!("/secret exposes APP_SECRET without authentication; set SECRET_ENDPOINT=false to disable it");
    }

    // Create app state
    let mut app_state = AppState::new(config.clone());
    if config.metrics_enabled {
        let handle = metrics::install_recorder()?;
        metrics::init_metrics();
        metrics::spawn_upkeep(handle.clone(), metrics::UPKEEP_INTERVAL);
        app_state = app_state.with_metrics(handle);
    }

    let router = create_router(app_state);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;

    info!("Server running on port {}", config.port);
    info!("Environment: {}", config.environment);
    info!("App Name: {}", config.app_name);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
