//! Configuration module for the FlexTeam backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Default key of the storage slot that holds the serialized schedules.
pub const DEFAULT_STORAGE_KEY: &str = "flexteam-schedules";

/// Default Gemini model used for rotation generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings for the hosted generative-AI service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; a missing key only fails when a rotation is requested
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Storage slot key for the schedule blob
    pub storage_key: String,
    /// Optional JSON roster file replacing the built-in roster
    pub roster_path: Option<PathBuf>,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("FLEXTEAM_API_PSK").ok().filter(|s| !s.is_empty());

        let db_path = env::var("FLEXTEAM_DB_PATH")
            .unwrap_or_else(|_| "./data/flexteam.sqlite".to_string())
            .into();

        let bind_addr = env::var("FLEXTEAM_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("FLEXTEAM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("FLEXTEAM_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let storage_key =
            env::var("FLEXTEAM_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        let roster_path = env::var("FLEXTEAM_ROSTER_PATH").ok().map(PathBuf::from);

        let gemini = GeminiConfig {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            log_format,
            storage_key,
            roster_path,
            gemini,
        })
    }
}
