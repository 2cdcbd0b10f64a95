pub mod env_resolver;
pub mod error;
pub mod loader;
pub mod settings;

// Re-export commonly used types
pub use env_resolver::EnvResolver;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFile, FileFormat};
pub use settings::{
    AppConfig, DEFAULT_RPC_URL, DEFAULT_STATE_DIR, ENV_PERSISTENCE, ENV_RPC_URL, ENV_STATE_DIR,
    ENV_STORAGE_KEY,
};
