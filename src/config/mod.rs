use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::AppError;

/// Default OpenAI-compatible endpoint (ModelScope inference API)
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api-inference.modelscope.cn/v1";
/// Default chat model
pub const DEFAULT_MODEL_NAME: &str = "Qwen/Qwen2.5-72B-Instruct";
/// Default SerpHouse live search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://api.serphouse.com/serp/live";

static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Bearer token; `None` disables every AI endpoint
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
    /// Language the model is told to answer in
    pub response_language: String,
}

/// Web search provider configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub url: String,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub cors_allow_origin: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Outbound request policy
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    /// Extra attempts allowed when the model answer does not fit the schema
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing secrets are not an error: the dependent feature is disabled
    /// instead, and callers check `is_configured()` before relying on it.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let model = ModelConfig {
            api_key: secret("MODEL_SCOPE_API_KEY"),
            base_url: env::var("MODEL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MODEL_BASE_URL.to_string()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
            response_language: env::var("RESPONSE_LANGUAGE")
                .unwrap_or_else(|_| "Chinese".to_string()),
        };

        let search = SearchConfig {
            api_key: secret("SERPHOUSE_API_KEY"),
            url: env::var("SERPHOUSE_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string()),
        };

        let server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("SERVER_PORT", 7860),
            static_dir: PathBuf::from(
                env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            ),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 60_000),
            max_retries: parse_or("MAX_RETRIES", 2),
            retry_delay_ms: parse_or("RETRY_DELAY_MS", 500),
        };

        if request.timeout_ms == 0 {
            return Err(AppError::Config {
                message: "REQUEST_TIMEOUT_MS must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            model,
            search,
            server,
            logging,
            request,
        })
    }

    /// Process-wide configuration, loaded from the environment on first use.
    ///
    /// Falls back to defaults if the environment is invalid so the getter
    /// never fails; `main` validates with `from_env` first.
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(|| Config::from_env().unwrap_or_default())
    }
}

impl ModelConfig {
    /// Whether an API key is available for the LLM provider
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl SearchConfig {
    /// Whether an API key is available for the search provider
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            request: RequestConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            response_language: "Chinese".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            static_dir: PathBuf::from("./static"),
            cors_allow_origin: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

/// Read a secret, treating empty values as absent
fn secret(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
