pub mod google;
pub mod lang;
pub mod text;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::BackendError;

pub use google::GoogleTranslateBackend;
pub use lang::LanguageInfo;

/// MIME type of every payload a backend produces.
pub const AUDIO_MIME: &str = "audio/mpeg";

/// An engine that turns text into MP3 audio. Implementations make a single
/// attempt per call and report any failure as a `BackendError`.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str, slow: bool)
        -> Result<Vec<u8>, BackendError>;

    fn languages(&self) -> Vec<LanguageInfo> {
        Vec::new()
    }
}

#[derive(Clone)]
pub struct TtsService {
    backend: Arc<dyn SynthesisBackend>,
}

impl TtsService {
    pub fn new(backend: Arc<dyn SynthesisBackend>) -> Self {
        Self { backend }
    }

    pub async fn speak(&self, text: &str, lang: &str, slow: bool) -> Result<Vec<u8>, BackendError> {
        let started = Instant::now();
        let audio = self.backend.synthesize(text, lang, slow).await?;

        tracing::info!(
            lang,
            slow,
            chars = text.chars().count(),
            bytes = audio.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Synthesized speech"
        );

        Ok(audio)
    }

    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.backend.languages()
    }
}
