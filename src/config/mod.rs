mod basic;
mod database;

pub use basic::BasicConfig;
pub use database::DatabaseConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::HirelinkError;

/// Application configuration managed by Figment.
///
/// Layering, lowest to highest priority: compiled defaults, `hirelink.toml`
/// (when present), `HIRELINK_*` environment variables (`__` separates tables,
/// e.g. `HIRELINK_DATABASE__URL`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener and logging settings (see `basic` table in hirelink.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Store location and pool bounds (see `database` table in hirelink.toml).
    #[serde(default)]
    pub database: DatabaseConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "hirelink.toml";
const ENV_PREFIX: &str = "HIRELINK_";

impl Config {
    /// Builds a Figment that merges defaults, an optional TOML file and the environment.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if path.is_file() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from `hirelink.toml` in the working directory (if any)
    /// plus the environment.
    pub fn load() -> Result<Self, HirelinkError> {
        Self::load_from(PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, HirelinkError> {
        let cfg: Self = Self::figment(path).extract().map_err(Box::new)?;
        cfg.database.validate()?;
        Ok(cfg)
    }
}
