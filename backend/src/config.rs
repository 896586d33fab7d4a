use std::env;
use std::str::FromStr;

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// Shared secret of the external auth provider's HS256 access tokens.
    pub jwt_secret: String,
    pub jwt_audience: String,

    pub claude_api_key: String,
    pub claude_model: String,
    pub claude_api_url: String,
    pub analysis_timeout_secs: u64,

    // Per-user limits on POST /api/chat
    pub chat_rate_limit: u32,
    pub chat_rate_window_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_backend: StoreBackend = env_or("STORE_BACKEND", "postgres").parse()?;
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", "8080")?,
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),

            store_backend,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "20")?,

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_audience: env_or("JWT_AUDIENCE", "authenticated"),

            claude_api_key: env_or("CLAUDE_API_KEY", ""),
            claude_model: env_or("CLAUDE_MODEL", "claude-sonnet-4-20250514"),
            claude_api_url: env_or("CLAUDE_API_URL", "https://api.anthropic.com/v1/messages"),
            analysis_timeout_secs: parse_env("ANALYSIS_TIMEOUT_SECS", "30")?,

            chat_rate_limit: parse_env("CHAT_RATE_LIMIT", "10")?,
            chat_rate_window_secs: parse_env("CHAT_RATE_WINDOW_SECS", "60")?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_or(key, default)
        .parse()
        .with_context(|| format!("{} must be a number", key))
}
