use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::client::Language;

pub const DEFAULT_PORT: u16 = 8000;

/// Options for the `serve` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Directory holding the browser interface
    #[arg(long, default_value = "./static", env = "STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Top-level domain of the Google Translate host (com, co.uk, ...)
    #[arg(long, default_value = "com", env = "TTS_TLD")]
    pub tld: String,

    /// Timeout in seconds for each upstream speech request
    #[arg(long, env = "TTS_BACKEND_TIMEOUT")]
    pub backend_timeout: Option<u64>,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout.map(Duration::from_secs)
    }
}

/// Options for the `client` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Port the API service listens on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Base URL of an already running API service (needs --no-spawn;
    /// defaults to http://localhost:<port>)
    #[arg(long, env = "TTS_API_URL", requires = "no_spawn")]
    pub api_url: Option<String>,

    /// Initial language
    #[arg(short, long, default_value = "en")]
    pub lang: Language,

    /// Start in slow mode
    #[arg(long)]
    pub slow: bool,

    /// Where downloaded audio is written
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Play audio after each successful request
    #[cfg(feature = "audio-playback")]
    #[arg(long)]
    pub play: bool,

    /// Seconds to wait for the service to answer its health check (0 skips the wait)
    #[arg(long, default_value_t = 10)]
    pub ready_timeout: u64,

    /// Timeout in seconds for each synthesis request (none by default)
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Use an already running service instead of launching one
    #[arg(long)]
    pub no_spawn: bool,
}

impl ClientConfig {
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn ready_timeout(&self) -> Option<Duration> {
        (self.ready_timeout > 0).then(|| Duration::from_secs(self.ready_timeout))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    pub fn play(&self) -> bool {
        #[cfg(feature = "audio-playback")]
        {
            self.play
        }
        #[cfg(not(feature = "audio-playback"))]
        {
            false
        }
    }
}
