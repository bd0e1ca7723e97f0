use std::time::{Duration, Instant};

use reqwest::Client;

use crate::api::{HealthResponse, SynthesisRequest};
use crate::error::{ClientError, ErrorResponse};

/// Blocking-per-call client for the API service: one request in flight, one
/// attempt per call.
#[derive(Clone)]
pub struct TtsClient {
    http: Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, ClientError> {
        if request.text.trim().is_empty() {
            return Err(ClientError::Validation("Please enter some text".into()));
        }

        let response = self
            .http
            .post(format!("{}/api/tts", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let body = response.text().await?;
        let detail = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => error.detail,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body,
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let health = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(health)
    }

    /// Poll the health endpoint until it answers or `timeout` elapses. The
    /// last failure is returned when the service never comes up.
    pub async fn wait_until_ready(
        &self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<HealthResponse, ClientError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.health().await {
                Ok(health) => return Ok(health),
                Err(e) if Instant::now() + interval < deadline => {
                    tracing::debug!("API service not ready yet: {}", e);
                    tokio::time::sleep(interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
