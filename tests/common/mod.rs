#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use tts_relay::api::routes::{create_router, AppState};
use tts_relay::error::BackendError;
use tts_relay::tts::{lang, LanguageInfo, SynthesisBackend, TtsService};

/// Records every call and answers with fake MP3 bytes.
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<(String, String, bool)>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<(String, String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisBackend for MockBackend {
    async fn synthesize(
        &self,
        text: &str,
        lang: &str,
        slow: bool,
    ) -> Result<Vec<u8>, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), lang.to_string(), slow));

        let lang = lang::canonical(lang)
            .ok_or_else(|| BackendError::UnsupportedLanguage(lang.to_string()))?;

        let mut audio = b"ID3\x04\x00".to_vec();
        audio.extend(format!("{}:{}:{}", lang, slow, text).into_bytes());
        Ok(audio)
    }

    fn languages(&self) -> Vec<LanguageInfo> {
        lang::all()
    }
}

pub fn router(backend: Arc<MockBackend>) -> Router {
    let state = Arc::new(AppState {
        tts: TtsService::new(backend),
    });
    create_router(state, Path::new("static"))
}

/// Serve the router on an ephemeral loopback port.
pub async fn spawn_server(backend: Arc<MockBackend>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A loopback address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
