pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::tts::LanguageInfo;

/// Body of `POST /api/tts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub slow: bool,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, lang: impl Into<String>, slow: bool) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            slow,
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}
