//! roomrelay CLI and HTTP API entry point.
//!
//! Binary name: `roomrelay`
//!
//! Parses CLI arguments, initializes the database and completion client,
//! then dispatches to the room command handlers or starts the HTTP server.

mod cli;
mod http;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clap_complete::generate;

use roomrelay_core::completion::client::CompletionClient;
use roomrelay_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

/// Upper bound on how often idle room sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,roomrelay_core=debug,roomrelay_infra=debug",
        _ => "trace",
    };
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(filter, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "roomrelay", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, DB, completion client)
    let state = AppState::init().await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            let completion = state.rooms.completion();
            tracing::info!(
                %addr,
                provider = completion.name(),
                model = completion.model(),
                data_dir = %state.data_dir.display(),
                "HTTP API listening"
            );

            if !cli.quiet {
                println!(
                    "  {} roomrelay listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {}",
                    console::style(format!(
                        "Completion: {} ({})",
                        completion.name(),
                        completion.model()
                    ))
                    .dim()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            spawn_session_sweeper(&state);
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::History { room } => {
            cli::room::show_history(&state, &room, cli.json).await?;
        }

        Commands::Send { room, text, sender } => {
            cli::room::send_message(&state, &room, &sender, &text, cli.json).await?;
        }

        Commands::Post { room, text, sender } => {
            cli::room::post_message(&state, &room, &sender, &text, cli.json).await?;
        }

        Commands::Log { room, limit } => {
            cli::room::show_log(&state, &room, limit, cli.json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Periodically drop room sessions that have seen no traffic for
/// `server.idle_session_secs`.
fn spawn_session_sweeper(state: &AppState) {
    let rooms = Arc::clone(&state.rooms);
    let idle = Duration::from_secs(state.config.server.idle_session_secs.max(1));
    let max_idle_ms = i64::try_from(idle.as_millis()).unwrap_or(i64::MAX);

    tokio::spawn(async move {
        let mut tick = tokio::time::interval(idle.min(SWEEP_INTERVAL));
        loop {
            tick.tick().await;
            let evicted = rooms.evict_idle(max_idle_ms);
            if evicted > 0 {
                tracing::debug!(evicted, live = rooms.room_count(), "Idle room sessions evicted");
            }
        }
    });
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
