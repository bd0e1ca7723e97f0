pub mod http;
pub mod language;
pub mod playback;
pub mod process;
pub mod session;

use std::time::Duration;

use anyhow::Context;
use tokio::io::BufReader;

use crate::config::ClientConfig;

pub use http::TtsClient;
pub use language::Language;
pub use process::ServiceProcess;
pub use session::{Session, SessionState};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Launch the API service, run the interactive session on the terminal, and
/// stop the service again however the session ends.
pub async fn run_orchestrator(config: ClientConfig) -> anyhow::Result<()> {
    let client = TtsClient::new(config.api_url(), config.request_timeout())
        .context("Failed to build HTTP client")?;

    let service = if config.no_spawn {
        None
    } else {
        Some(ServiceProcess::launch(config.port).context("Failed to launch the API service")?)
    };

    if let Some(timeout) = config.ready_timeout() {
        match client.wait_until_ready(timeout, READY_POLL_INTERVAL).await {
            Ok(health) => tracing::info!(
                "API service v{} ready at {}",
                health.version,
                client.base_url()
            ),
            Err(e) => {
                tracing::warn!("API service not ready: {}", e);
                println!(
                    "Warning: API service at {} did not answer within {}s; requests will fail until it does.",
                    client.base_url(),
                    timeout.as_secs()
                );
            }
        }
    }

    let mut session = Session::new(
        client,
        config.lang,
        config.slow,
        config.output_dir.clone(),
        std::io::stdout(),
    )
    .with_playback(config.play());

    let result = tokio::select! {
        result = session.run(BufReader::new(tokio::io::stdin())) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            Ok(())
        }
    };

    if let Some(service) = service {
        if let Err(e) = service.shutdown() {
            tracing::warn!("Failed to stop API service: {}", e);
        }
    }

    result.context("Interactive session failed")
}
