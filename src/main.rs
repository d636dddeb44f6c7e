//! Visitor counter server binary.
//!
//! Serves the landing page at `/` and visitor sessions at `/ws`. On Ctrl+C
//! (or SIGTERM) it stops accepting, closes open sessions, prints every
//! recorded visit, and exits.

use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use visitor_counter::config::AppConfig;
use visitor_counter::server::{StartupError, VisitorServer};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&AppConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Visitor counter failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> Result<(), StartupError> {
    tracing::info!(
        environment = ?config.server.environment,
        "Starting visitor counter"
    );

    let server = VisitorServer::bootstrap(config).await?;
    let listener = server.bind().await?;

    server.serve(listener, shutdown_signal()).await?;

    // Shutdown must still succeed when the log cannot be read.
    match server.summarize().await {
        Ok(log) => println!("{}", log),
        Err(e) => tracing::error!(error = %e, "Failed to read visitor log"),
    }

    server.close().await;
    tracing::info!("Visitor counter stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter. Production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
