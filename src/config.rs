use std::{env, fmt::Display, net::SocketAddr, str::FromStr};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Where the console listens and which backend it talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub port: u16,
    pub backend_url: String,
    /// Prefix of the template/segment/campaign/orchestration/events routes.
    pub api_prefix: String,
    /// Prefix of the `/ingestions/*` routes, which the backend mounts unprefixed.
    pub ingestion_prefix: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            ingestion_prefix: String::new(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or("PORT", defaults.port),
            backend_url: env::var("CONSOLE_BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            api_prefix: env::var("CONSOLE_API_PREFIX")
                .map(|prefix| normalize_prefix(&prefix))
                .unwrap_or(defaults.api_prefix),
            ingestion_prefix: env::var("CONSOLE_INGESTION_PREFIX")
                .map(|prefix| normalize_prefix(&prefix))
                .unwrap_or(defaults.ingestion_prefix),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?} ({err}), using default {default}");
            default
        }),
        Err(_) => default,
    }
}

/// `"api/v1/"` -> `"/api/v1"`, `"/"` -> `""`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
