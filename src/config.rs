//! Client Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_STATE_DIR: &str = ".storefront";

/// Connection and local-state settings for the storefront client.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the storefront API
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "STOREFRONT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// GET cache time-to-live in seconds; 0 disables caching
    #[arg(long, env = "STOREFRONT_CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Directory for durable client state (credential, favorites, UI flags)
    #[arg(long, env = "STOREFRONT_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Fixed per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Time-to-live for cached GET responses.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}
