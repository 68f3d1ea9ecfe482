// src/config.rs

use std::{env, net::SocketAddr};

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

/// Lifetime of a session token (and its cookie) when `JWT_EXPIRATION` is unset: 7 days.
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 60 * 60 * 24 * 7;
/// Upper bound for `JWT_EXPIRATION`: one year.
pub const MAX_JWT_EXPIRATION_SECS: u64 = 60 * 60 * 24 * 365;

/// Groq exposes an OpenAI-compatible chat completions API under this prefix.
pub const DEFAULT_AI_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_AI_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings for the external completion provider.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// No key means AI features answer with their built-in fallbacks.
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse(DEFAULT_AI_BASE_URL).expect("default AI base URL is valid"),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Adds the `Secure` attribute to the session cookie.
    pub secure_cookies: bool,
    pub cors_origins: Vec<String>,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => parse_jwt_expiration(&raw)?,
            Err(_) => DEFAULT_JWT_EXPIRATION_SECS,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let secure_cookies = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );

        let ai = AiConfig {
            api_key: env::var("AI_API_KEY")
                .or_else(|_| env::var("GROQ_API_KEY"))
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: parse_base_url(
                &env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string()),
            )?,
            model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            timeout_secs: match env::var("AI_TIMEOUT_SECS") {
                Ok(raw) => parse_u64("AI_TIMEOUT_SECS", &raw)?,
                Err(_) => DEFAULT_AI_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            secure_cookies,
            cors_origins,
            ai,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_jwt_expiration(raw: &str) -> Result<u64, ConfigError> {
    let secs = parse_u64("JWT_EXPIRATION", raw)?;
    if secs == 0 || secs > MAX_JWT_EXPIRATION_SECS {
        return Err(ConfigError::Invalid {
            name: "JWT_EXPIRATION",
            reason: format!("must be between 1 and {} seconds", MAX_JWT_EXPIRATION_SECS),
        });
    }
    Ok(secs)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: "AI_BASE_URL",
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            name: "AI_BASE_URL",
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
