//! Wiring from resolved configuration to a ready dashboard

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use anyhow::Context;
use rpcdeck_config::AppConfig;
use rpcdeck_core::SlotId;
use rpcdeck_registry::catalog;
use rpcdeck_runtime::Dashboard;
use rpcdeck_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SlotStore};
use rpcdeck_transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing::debug;

pub struct AppContext {
    pub config: AppConfig,
    pub dashboard: Dashboard,
}

impl AppContext {
    /// Resolve configuration (file < env < flags) and open the dashboard
    pub fn build(cli: &Cli) -> CliResult<Self> {
        let mut config = AppConfig::load(cli.config.as_deref())?;
        if let Some(url) = &cli.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(dir) = &cli.state_dir {
            config.state_dir = dir.clone();
        }
        config.validate()?;
        Self::from_config(config, cli.ephemeral)
    }

    pub fn from_config(config: AppConfig, ephemeral: bool) -> CliResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.rpc_url.clone())?);
        let registry = Arc::new(catalog::anvil(transport));

        let backend: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryKeyValueStore::new())
        } else {
            let store = FileKeyValueStore::new(&config.state_dir).with_context(|| {
                format!("opening state directory {}", config.state_dir.display())
            })?;
            Arc::new(store)
        };
        let store = SlotStore::open(backend, config.storage_key.clone(), config.persistence_policy);
        debug!(slots = store.slots().len(), ephemeral, "Dashboard ready");

        Ok(Self {
            config,
            dashboard: Dashboard::new(registry, store),
        })
    }

    /// Find a slot by full id or unique id prefix
    pub fn resolve_slot(&self, reference: &str) -> CliResult<SlotId> {
        let ids = self.dashboard.slots().ids();
        if let Some(id) = ids.iter().find(|id| id.as_str() == reference) {
            return Ok(id.clone());
        }
        let matches: Vec<&SlotId> =
            ids.iter().filter(|id| id.as_str().starts_with(reference)).collect();
        match matches.as_slice() {
            [id] if !reference.is_empty() => Ok((*id).clone()),
            [] | [_] => Err(CliError::InvalidArgument(format!("No slot matches '{}'", reference))),
            _ => Err(CliError::InvalidArgument(format!(
                "'{}' matches {} slots; use a longer prefix",
                reference,
                matches.len()
            ))),
        }
    }
}
