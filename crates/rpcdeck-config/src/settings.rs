//! Resolved application settings: defaults < config file < environment < CLI

use crate::env_resolver::EnvResolver;
use crate::error::{ConfigError, ConfigResult};
use crate::loader::ConfigFile;
use rpcdeck_store::{PersistencePolicy, DEFAULT_STORAGE_KEY};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
pub const DEFAULT_STATE_DIR: &str = ".rpcdeck";

pub const ENV_RPC_URL: &str = "RPCDECK_RPC_URL";
pub const ENV_STATE_DIR: &str = "RPCDECK_STATE_DIR";
pub const ENV_STORAGE_KEY: &str = "RPCDECK_STORAGE_KEY";
pub const ENV_PERSISTENCE: &str = "RPCDECK_PERSISTENCE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Directory of the file-backed slot storage
    pub state_dir: PathBuf,
    pub storage_key: String,
    pub persistence_policy: PersistencePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persistence_policy: PersistencePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `path` (if any), then the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Like [`AppConfig::load`] with an explicit environment lookup
    pub fn load_with<F>(path: Option<&Path>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = path {
            config.merge_file(ConfigFile::load(path, &EnvResolver::default())?);
        }
        config.apply_env(env)?;
        config.validate()?;
        tracing::debug!(
            rpc_url = %config.rpc_url,
            state_dir = %config.state_dir.display(),
            policy = %config.persistence_policy,
            "Configuration resolved"
        );
        Ok(config)
    }

    pub fn merge_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.rpc_url {
            self.rpc_url = url;
        }
        if let Some(dir) = file.state_dir {
            self.state_dir = dir;
        }
        if let Some(key) = file.storage_key {
            self.storage_key = key;
        }
        if let Some(policy) = file.persistence_policy {
            self.persistence_policy = policy;
        }
    }

    /// Apply `RPCDECK_*` overrides; empty values are ignored
    pub fn apply_env<F>(&mut self, env: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(dir) = get(ENV_STATE_DIR) {
            self.state_dir = PathBuf::from(dir);
        }
        if let Some(key) = get(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        if let Some(policy) = get(ENV_PERSISTENCE) {
            self.persistence_policy = policy.parse().map_err(|e: String| {
                ConfigError::validation(format!("{}: {}", ENV_PERSISTENCE, e))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let parsed = url::Url::parse(&self.rpc_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.rpc_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.rpc_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::validation("storage_key must not be empty"));
        }
        Ok(())
    }
}
