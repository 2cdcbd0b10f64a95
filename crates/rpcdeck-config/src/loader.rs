use crate::env_resolver::EnvResolver;
use crate::error::{ConfigError, ConfigResult};
use rpcdeck_store::PersistencePolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported file formats for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Detect file format from extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

/// Contents of a config file; every field is optional and overrides the default
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub rpc_url: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub persistence_policy: Option<PersistencePolicy>,
}

impl ConfigFile {
    /// Load a config file, detecting the format from its extension
    pub fn load<P: AsRef<Path>>(path: P, resolver: &EnvResolver) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "Loading config file");
        Self::parse_content(&content, format, resolver)
    }

    /// Parse configuration content directly, then resolve `${VAR}` placeholders
    pub fn parse_content(
        content: &str,
        format: FileFormat,
        resolver: &EnvResolver,
    ) -> ConfigResult<Self> {
        let file: ConfigFile = match format {
            FileFormat::Yaml => {
                serde_yaml::from_str::<Option<ConfigFile>>(content)?.unwrap_or_default()
            }
            FileFormat::Json => serde_json::from_str(content)?,
        };
        file.resolve(resolver)
    }

    fn resolve(self, resolver: &EnvResolver) -> ConfigResult<Self> {
        Ok(Self {
            rpc_url: self.rpc_url.map(|v| resolver.resolve(&v)).transpose()?,
            state_dir: match self.state_dir {
                Some(dir) => Some(PathBuf::from(resolver.resolve(&dir.to_string_lossy())?)),
                None => None,
            },
            storage_key: self.storage_key.map(|v| resolver.resolve(&v)).transpose()?,
            persistence_policy: self.persistence_policy,
        })
    }
}
