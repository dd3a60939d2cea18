use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::HirelinkError;

/// Store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://hirelink.db` or `sqlite:/abs/path.db`.
    /// TOML: `database.url`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Connections kept open in the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Extra connections the pool may open above `pool_size` under load.
    #[serde(default = "default_max_overflow")]
    pub max_overflow: u32,

    /// Emit every executed statement as a `sqlx::query` tracing event.
    #[serde(default)]
    pub echo: bool,

    /// How long a caller waits for a free connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            pool_size: default_pool_size(),
            max_overflow: default_max_overflow(),
            echo: false,
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a config pointing at `url` with default pool bounds.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), HirelinkError> {
        if self.url.trim().is_empty() {
            return Err(HirelinkError::InvalidConfig(
                "database.url must be set and non-empty".to_string(),
            ));
        }
        if self.max_connections() == 0 {
            return Err(HirelinkError::InvalidConfig(
                "database.pool_size + database.max_overflow must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_url() -> String {
    "sqlite://hirelink.db".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_max_overflow() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}
