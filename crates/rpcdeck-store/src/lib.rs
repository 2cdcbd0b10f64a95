pub mod error;
pub mod file;
pub mod kv;
pub mod slots;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use kv::{KeyValueStore, MemoryKeyValueStore};
pub use slots::{PersistencePolicy, SlotStore, DEFAULT_STORAGE_KEY};
