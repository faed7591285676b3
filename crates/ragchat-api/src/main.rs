//! ragchat CLI and REST API entry point.
//!
//! Binary name: `ragchat`
//!
//! Parses CLI arguments, loads configuration, wires services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use ragchat_infra::config::{load_app_config, resolve_data_dir};
use ragchat_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_filter(), cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need config or services
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ragchat", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_app_config(&data_dir).await;

    // Ingestion only needs the vector index, not the chat service
    if let Commands::Ingest { files } = &cli.command {
        return cli::ingest::ingest(&config, files, cli.json).await;
    }

    let state = AppState::init(config, data_dir).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} ragchat API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, data_dir = %state.data_dir.display(), "Server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Start => {
            cli::chat::start_chat(&state, cli.json).await?;
        }

        Commands::Continue {
            conversation_id,
            query,
            voice,
        } => {
            cli::chat::continue_chat(
                &state,
                &conversation_id,
                query.as_deref(),
                voice.as_deref(),
                cli.json,
            )
            .await?;
        }

        Commands::Ingest { .. } | Commands::Completions { .. } => {
            unreachable!("handled above")
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
}
