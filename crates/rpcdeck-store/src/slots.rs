//! Ordered, persisted collection of invocation slots

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use rpcdeck_core::{InvocationSlot, SlotCollection, SlotId, DEFAULT_METHODS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key of the slot collection
pub const DEFAULT_STORAGE_KEY: &str = "rpcdeck.slots";

/// What a mutation does when the backend refuses the write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistencePolicy {
    /// Apply the change in memory anyway and remember the failure
    #[default]
    #[serde(rename = "degrade")]
    DegradeToMemory,
    /// Keep memory unchanged and report the failure from `try_*` operations
    Strict,
}

impl FromStr for PersistencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" | "memory" => Ok(Self::DegradeToMemory),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown persistence policy '{}' (expected degrade or strict)",
                other
            )),
        }
    }
}

impl fmt::Display for PersistencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegradeToMemory => f.write_str("degrade"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// Slot collection with write-through persistence.
///
/// Every mutation serializes the whole next collection and writes it before the
/// in-memory state is replaced. The plain operations never fail; the `try_*`
/// variants expose write failures under [`PersistencePolicy::Strict`].
pub struct SlotStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    policy: PersistencePolicy,
    slots: SlotCollection,
    last_error: Option<String>,
    failures: u64,
}

impl SlotStore {
    /// Create a store over `backend`; nothing is read until [`SlotStore::load`]
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            policy: PersistencePolicy::default(),
            slots: SlotCollection::new(),
            last_error: None,
            failures: 0,
        }
    }

    pub fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create and load in one step
    pub fn open(
        backend: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        policy: PersistencePolicy,
    ) -> Self {
        let mut store = Self::new(backend, key).with_policy(policy);
        store.load();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    pub fn slots(&self) -> &SlotCollection {
        &self.slots
    }

    pub fn get(&self, id: &SlotId) -> Option<&InvocationSlot> {
        self.slots.get(id)
    }

    /// Message of the most recent failed write, cleared by the next successful one
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of failed writes since the store was created
    pub fn persist_failures(&self) -> u64 {
        self.failures
    }

    /// Read persisted slots. Absent, unreadable or corrupt state (including duplicate
    /// ids) falls back to the default collection, which is written back immediately.
    pub fn load(&mut self) -> SlotCollection {
        match self.read_persisted() {
            Ok(Some(slots)) => {
                debug!(key = %self.key, slots = slots.len(), "loaded slot collection");
                self.slots = slots;
                return self.slots.clone();
            }
            Ok(None) => info!(key = %self.key, "no saved slots; using defaults"),
            Err(e) => warn!(key = %self.key, error = %e, "saved slots unusable; using defaults"),
        }

        let defaults = SlotCollection::defaults();
        match self.commit(defaults.clone()) {
            Ok(slots) => slots,
            Err(_) => {
                // Start-up always has a collection, even when Strict refused the write
                self.slots = defaults;
                self.slots.clone()
            }
        }
    }

    fn read_persisted(&self) -> StoreResult<Option<SlotCollection>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let slots: SlotCollection = serde_json::from_str(&raw)?;
        if !slots.has_unique_ids() {
            return Err(StoreError::Corrupt("duplicate slot ids".to_string()));
        }
        Ok(Some(slots))
    }

    /// Append a slot with a fresh id
    pub fn add(&mut self, method_name: Option<&str>) -> SlotCollection {
        let result = self.try_add(method_name);
        self.or_current(result)
    }

    pub fn try_add(&mut self, method_name: Option<&str>) -> StoreResult<SlotCollection> {
        let mut next = self.slots.clone();
        next.push(InvocationSlot::new(normalize(method_name)));
        self.commit(next)
    }

    /// Remove slot `id`; unknown ids leave the collection as it is
    pub fn remove(&mut self, id: &SlotId) -> SlotCollection {
        let result = self.try_remove(id);
        self.or_current(result)
    }

    pub fn try_remove(&mut self, id: &SlotId) -> StoreResult<SlotCollection> {
        let mut next = self.slots.clone();
        next.remove(id);
        self.commit(next)
    }

    /// Point slot `id` at another method; `None` or `""` unconfigures it
    pub fn set_method(&mut self, id: &SlotId, method_name: Option<&str>) -> SlotCollection {
        let result = self.try_set_method(id, method_name);
        self.or_current(result)
    }

    pub fn try_set_method(
        &mut self,
        id: &SlotId,
        method_name: Option<&str>,
    ) -> StoreResult<SlotCollection> {
        let mut next = self.slots.clone();
        next.set_method(id, normalize(method_name));
        self.commit(next)
    }

    /// Move `from` to the index currently held by `to`
    pub fn reorder(&mut self, from: &SlotId, to: &SlotId) -> SlotCollection {
        let result = self.try_reorder(from, to);
        self.or_current(result)
    }

    pub fn try_reorder(&mut self, from: &SlotId, to: &SlotId) -> StoreResult<SlotCollection> {
        let mut next = self.slots.clone();
        next.move_slot(from, to);
        self.commit(next)
    }

    /// Discard everything and create one fresh slot per name
    pub fn replace_all<I, S>(&mut self, method_names: I) -> SlotCollection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = self.try_replace_all(method_names);
        self.or_current(result)
    }

    pub fn try_replace_all<I, S>(&mut self, method_names: I) -> StoreResult<SlotCollection>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commit(SlotCollection::from_method_names(method_names))
    }

    pub fn clear(&mut self) -> SlotCollection {
        let result = self.try_clear();
        self.or_current(result)
    }

    pub fn try_clear(&mut self) -> StoreResult<SlotCollection> {
        self.try_replace_all(Vec::<String>::new())
    }

    /// Back to the default method set
    pub fn reset(&mut self) -> SlotCollection {
        let result = self.try_reset();
        self.or_current(result)
    }

    pub fn try_reset(&mut self) -> StoreResult<SlotCollection> {
        self.try_replace_all(DEFAULT_METHODS)
    }

    /// Persist `next`, then make it current (subject to the policy)
    fn commit(&mut self, next: SlotCollection) -> StoreResult<SlotCollection> {
        match self.persist(&next) {
            Ok(()) => {
                self.last_error = None;
            }
            Err(e) => {
                self.failures += 1;
                self.last_error = Some(e.to_string());
                warn!(
                    key = %self.key,
                    policy = %self.policy,
                    error = %e,
                    "failed to persist slots"
                );
                if self.policy == PersistencePolicy::Strict {
                    return Err(e);
                }
            }
        }
        self.slots = next;
        Ok(self.slots.clone())
    }

    fn persist(&self, slots: &SlotCollection) -> StoreResult<()> {
        let encoded = serde_json::to_string(slots)?;
        self.backend.set(&self.key, &encoded)?;
        debug!(key = %self.key, slots = slots.len(), "persisted slots");
        Ok(())
    }

    fn or_current(&self, result: StoreResult<SlotCollection>) -> SlotCollection {
        result.unwrap_or_else(|_| self.slots.clone())
    }
}

fn normalize(method_name: Option<&str>) -> Option<String> {
    method_name.filter(|name| !name.is_empty()).map(str::to_string)
}
