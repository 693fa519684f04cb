//! failover-server
//!
//! Serves a templated home page whose image and stylesheet URLs switch to a
//! fallback pair while the primary resources are unreachable.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                FAILOVER SERVER                │
//!                     │                                               │
//!                     │  ┌──────────────┐   every interval            │
//!                     │  │   monitor    │──────────────┐              │
//!                     │  │    loop      │              ▼              │        Primary
//!                     │  └──────┬───────┘      ┌──────────────┐       │       resources
//!                     │         │              │    prober    │───────┼───▶  (image, css)
//!                     │         │ set once     │ (concurrent) │       │
//!                     │         │ per round    └──────────────┘       │
//!                     │         ▼                                     │
//!                     │  ┌──────────────┐                             │
//!                     │  │   failover   │                             │
//!                     │  │    state     │                             │
//!                     │  └──────┬───────┘                             │
//!                     │         │ get() per request                   │
//!     Client          │         ▼                                     │
//!     ────────────────┼─▶┌──────────────┐    ┌──────────────┐         │
//!                     │  │     http     │───▶│    render    │         │
//!     ◀───────────────┼──│   handlers   │◀───│   template   │         │
//!                     │  └──────────────┘    └──────────────┘         │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use failover_server::config::{read_config, validate_config, ConfigError};
use failover_server::lifecycle::{signals, Application, Shutdown};
use failover_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "failover-server")]
#[command(about = "Home page server with primary/fallback resource failover", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the listener port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file, so config errors go to stderr.
    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failover-server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "failover-server starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = match Application::build(config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c_handler(shutdown.clone());

    if let Err(e) = app.run(&shutdown).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

fn load(cli: &Cli) -> Result<failover_server::ServerConfig, ConfigError> {
    let mut config = read_config(&cli.config)?;
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
