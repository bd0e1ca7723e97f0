use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tts_relay::api::routes::{create_router, AppState};
use tts_relay::client;
use tts_relay::config::{ClientConfig, ServerConfig};
use tts_relay::tts::{GoogleTranslateBackend, TtsService};

/// Text-to-speech service and its interactive client
#[derive(Parser)]
#[command(name = "tts-relay", version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the synthesis API service
    Serve(ServerConfig),

    /// Start the API service in the background and compose requests interactively
    Client(ClientConfig),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        Commands::Client(_) => "warn",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command {
        Commands::Serve(config) => runtime.block_on(serve(config)),
        Commands::Client(config) => {
            let result = runtime.block_on(client::run_orchestrator(config));
            // The stdin reader may still be parked on a blocking read.
            runtime.shutdown_background();
            result
        }
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config
        .addr()
        .with_context(|| format!("Invalid address {}:{}", config.host, config.port))?;

    tracing::info!("TTS relay v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static files: {}", config.static_dir.display());

    // Create TTS service
    let backend = GoogleTranslateBackend::new(config.tld.clone(), config.backend_timeout())
        .context("Failed to build speech backend")?;
    let tts = TtsService::new(Arc::new(backend));

    // Create app state
    let state = Arc::new(AppState { tts });

    // Create router
    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(e).with_context(|| format!("Failed to bind to {}", addr));
        }
    };

    axum::serve(listener, app).await.context("Server error")
}
