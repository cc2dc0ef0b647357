//! Environment-driven server configuration.

use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Data directory; the SQLite file lands at `<dir>/billfold.db` unless
    /// `DATABASE_URL` overrides it.
    pub db_path: String,
    /// Comma-separated origin list, or `*` for any.
    pub cors_allow_origins: String,
    pub request_timeout_ms: u64,
    pub scheduler_enabled: bool,
    pub scheduler_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("BF_LISTEN_ADDR", "0.0.0.0:8080"),
            db_path: env_or("BF_DB_PATH", "./data"),
            cors_allow_origins: env_or("BF_CORS_ALLOW_ORIGINS", "*"),
            request_timeout_ms: env_parse("BF_REQUEST_TIMEOUT_MS", 30_000),
            scheduler_enabled: env_parse("BF_SCHEDULER_ENABLED", true),
            scheduler_interval_secs: env_parse("BF_SCHEDULER_INTERVAL_SECS", 60),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
