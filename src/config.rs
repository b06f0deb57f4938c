use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_ENTRIES: usize = 50;
pub const DEFAULT_LOG_PATH: &str = "data/search-log.json";
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Cap on retained log entries; the store evicts the oldest beyond this.
    pub max_entries: usize,
    pub log_path: PathBuf,
    pub static_dir: PathBuf,
    /// When `true`, the client address is taken from `X-Forwarded-For`.
    /// Only safe behind a reverse proxy that overwrites the header; defaults
    /// to `false` so direct deployments record the unspoofable socket address.
    pub trust_proxy: bool,
}

impl Config {
    pub fn from_env() -> Self {
        // Warn on set-but-invalid values so misconfiguration is visible.
        let port = std::env::var("PORT").ok().map_or(DEFAULT_PORT, |s| {
            match s.parse::<u16>() {
                Ok(0) | Err(_) => {
                    tracing::warn!(
                        "PORT env var {s:?} is not a valid port number (1-65535), defaulting to {DEFAULT_PORT}"
                    );
                    DEFAULT_PORT
                }
                Ok(port) => port,
            }
        });
        let max_entries = std::env::var("MAX_LOG_ENTRIES")
            .ok()
            .map_or(DEFAULT_MAX_ENTRIES, |s| match s.parse::<usize>() {
                Ok(0) | Err(_) => {
                    tracing::warn!(
                        "MAX_LOG_ENTRIES env var {s:?} is not a positive integer, defaulting to {DEFAULT_MAX_ENTRIES}"
                    );
                    DEFAULT_MAX_ENTRIES
                }
                Ok(n) => n,
            });
        let trust_proxy = std::env::var("TRUST_PROXY")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        Self {
            port,
            max_entries,
            log_path: std::env::var("SEARCH_LOG_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from),
            static_dir: std::env::var("STATIC_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            trust_proxy,
        }
    }
}
