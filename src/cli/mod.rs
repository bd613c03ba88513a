use clap::{Parser, Subcommand};
use std::io::BufRead;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::issuer::hash_password;

#[derive(Parser)]
#[command(name = "config-editor")]
#[command(about = "Session-gated editor and read API for a flat JSON configuration document")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Address to bind, overrides EDITOR_HOST")]
        host: Option<String>,
        #[arg(long, help = "Port to bind, overrides EDITOR_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Read a password from stdin and print its argon2 hash for EDITOR_ACCOUNTS")]
    HashPassword,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::HashPassword => {
            let password = read_password(std::io::stdin().lock())?;
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

/// First line of `input` without its line ending. Empty passwords are refused.
fn read_password(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("No password on stdin");
    }
    Ok(password.to_string())
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        "Starting config editor in {:?} mode with {} store",
        config.environment,
        config.store.backend_name()
    );
    if config.issuer.providers.is_empty() {
        tracing::warn!("No accounts configured; set EDITOR_ACCOUNTS to allow sign-in");
    }

    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config).await?;
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
