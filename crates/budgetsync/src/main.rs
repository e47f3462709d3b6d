//! budgetsync CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use budgetsync::app::App;
use budgetsync::cli::{dispatch, Cli, Context};
use budgetsync::config::Config;
use budgetsync_client::BudgetsyncClient;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetsync=info,budgetsync_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.sqlite_path = database;
    }
    if let Some(remote_url) = cli.remote_url {
        config.remote_url = remote_url;
    }

    let app = App::open(&config).await?;
    app.ready().await?;

    let ctx = Context {
        app: &app,
        remote: Arc::new(BudgetsyncClient::new(&config.remote_url)),
        format: cli.format,
        quiet: cli.quiet,
        sync_interval: config.sync_interval(),
    };

    let mut stdout = std::io::stdout();
    let result = dispatch(&ctx, cli.command, &mut stdout, shutdown_signal()).await;

    app.shutdown();
    result
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
