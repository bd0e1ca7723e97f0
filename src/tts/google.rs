use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use super::{lang, text, LanguageInfo, SynthesisBackend};
use crate::error::BackendError;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Speech from the Google Translate `translate_tts` endpoint. Text is split
/// into short chunks, each fetched in order, and the MP3 frames concatenated.
pub struct GoogleTranslateBackend {
    client: Client,
    tld: String,
}

impl GoogleTranslateBackend {
    pub fn new(tld: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            tld: tld.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("https://translate.google.{}/translate_tts", self.tld)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        lang: &str,
        slow: bool,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, BackendError> {
        let params = query_params(chunk, lang, slow, idx, total);

        let response = self
            .client
            .get(self.endpoint())
            .header(header::REFERER, format!("https://translate.google.{}/", self.tld))
            .query(&params)
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status, &self.tld));
        }

        let bytes = response.bytes().await.map_err(connection_error)?;
        if bytes.is_empty() {
            return Err(upstream_error(status, &self.tld));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SynthesisBackend for GoogleTranslateBackend {
    async fn synthesize(
        &self,
        text: &str,
        lang: &str,
        slow: bool,
    ) -> Result<Vec<u8>, BackendError> {
        let lang = lang::canonical(lang)
            .ok_or_else(|| BackendError::UnsupportedLanguage(lang.to_string()))?;

        let chunks = text::chunks(text);
        if chunks.is_empty() {
            return Err(BackendError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            tracing::debug!("Fetching chunk {}/{} ({} chars)", idx + 1, total, chunk.chars().count());
            audio.extend(self.fetch_chunk(chunk, lang, slow, idx, total).await?);
        }

        Ok(audio)
    }

    fn languages(&self) -> Vec<LanguageInfo> {
        lang::all()
    }
}

fn query_params(
    chunk: &str,
    lang: &str,
    slow: bool,
    idx: usize,
    total: usize,
) -> Vec<(&'static str, String)> {
    vec![
        ("ie", "UTF-8".to_string()),
        ("client", "tw-ob".to_string()),
        ("tl", lang.to_string()),
        ("q", chunk.to_string()),
        ("ttsspeed", if slow { "0.3" } else { "1" }.to_string()),
        ("total", total.to_string()),
        ("idx", idx.to_string()),
        ("textlen", chunk.chars().count().to_string()),
    ]
}

fn upstream_error(status: StatusCode, tld: &str) -> BackendError {
    let cause = match status.as_u16() {
        403 => "Bad token or upstream API changes".to_string(),
        404 if tld != "com" => format!("Unsupported tld '{}'", tld),
        200 => "No audio stream in response. Unsupported language?".to_string(),
        s if s >= 500 => "Upstream API error. Try again later.".to_string(),
        _ => "Unknown".to_string(),
    };

    BackendError::Upstream {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        cause,
    }
}

fn connection_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Connection(format!("Timeout ({})", e))
    } else {
        BackendError::Connection(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn endpoint_uses_tld() {
        let backend = GoogleTranslateBackend::new("co.uk", None).unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://translate.google.co.uk/translate_tts"
        );
    }

    #[test]
    fn slow_mode_lowers_speed() {
        let normal = query_params("hi", "en", false, 0, 1);
        let slow = query_params("hi", "en", true, 0, 1);
        assert_eq!(param(&normal, "ttsspeed"), "1");
        assert_eq!(param(&slow, "ttsspeed"), "0.3");
    }

    #[test]
    fn textlen_counts_characters() {
        let params = query_params("你好", "zh-CN", false, 1, 2);
        assert_eq!(param(&params, "textlen"), "2");
        assert_eq!(param(&params, "idx"), "1");
        assert_eq!(param(&params, "total"), "2");
    }

    #[test]
    fn infers_probable_causes() {
        let forbidden = upstream_error(StatusCode::FORBIDDEN, "com").to_string();
        assert_eq!(
            forbidden,
            "403 (Forbidden) from TTS API. Probable cause: Bad token or upstream API changes"
        );

        let missing = upstream_error(StatusCode::NOT_FOUND, "xyz").to_string();
        assert!(missing.contains("Unsupported tld 'xyz'"));

        let missing_com = upstream_error(StatusCode::NOT_FOUND, "com").to_string();
        assert!(missing_com.ends_with("Probable cause: Unknown"));

        let upstream = upstream_error(StatusCode::BAD_GATEWAY, "com").to_string();
        assert!(upstream.contains("Try again later"));
    }

    #[tokio::test]
    async fn unsupported_language_fails_before_any_request() {
        let backend = GoogleTranslateBackend::new("invalid.tld.example", None).unwrap();
        let err = backend.synthesize("Hello", "xx", false).await.unwrap_err();
        assert_eq!(err.to_string(), "Language not supported: xx");
    }

    #[tokio::test]
    async fn punctuation_only_text_fails_before_any_request() {
        let backend = GoogleTranslateBackend::new("invalid.tld.example", None).unwrap();
        let err = backend.synthesize("?!...", "en", false).await.unwrap_err();
        assert!(matches!(err, BackendError::EmptyText));
    }
}
