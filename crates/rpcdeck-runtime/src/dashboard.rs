//! Slots, catalog and engines wired together

use crate::board::ExecutionBoard;
use crate::error::{RuntimeError, RuntimeResult};
use crate::execution::{ExecutionRecord, ExecutionState};
use futures::future::join_all;
use parking_lot::Mutex;
use rpcdeck_core::{InvocationSlot, SlotCollection, SlotId};
use rpcdeck_registry::{MethodDescriptor, MethodRegistry};
use rpcdeck_store::{PersistencePolicy, SlotStore, StoreResult};
use std::collections::HashMap;
use std::sync::Arc;

/// The dashboard: a method catalog, the persisted slots and one engine per slot.
///
/// Slot mutations go through the store first and keep the board in step:
/// removing or replacing slots detaches their engines. Engines are only created
/// and detached while the store lock is held, so a removed slot never regains one.
pub struct Dashboard {
    registry: Arc<MethodRegistry>,
    store: Mutex<SlotStore>,
    board: ExecutionBoard,
}

impl Dashboard {
    /// `store` should already be loaded
    pub fn new(registry: Arc<MethodRegistry>, store: SlotStore) -> Self {
        Self {
            registry,
            store: Mutex::new(store),
            board: ExecutionBoard::new(),
        }
    }

    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    pub fn board(&self) -> &ExecutionBoard {
        &self.board
    }

    pub fn slots(&self) -> SlotCollection {
        self.store.lock().slots().clone()
    }

    pub fn slot(&self, id: &SlotId) -> Option<InvocationSlot> {
        self.store.lock().get(id).cloned()
    }

    /// Descriptor a slot points at; `None` when unconfigured or no longer in the catalog
    pub fn resolve(&self, slot: &InvocationSlot) -> Option<Arc<MethodDescriptor>> {
        slot.method_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.registry.get(name))
    }

    pub fn persistence_policy(&self) -> PersistencePolicy {
        self.store.lock().policy()
    }

    /// Message of the last failed slot write, if the most recent one failed
    pub fn last_persist_error(&self) -> Option<String> {
        self.store.lock().last_persist_error().map(str::to_string)
    }

    pub fn add_slot(&self, method_name: Option<&str>) -> SlotCollection {
        self.store.lock().add(method_name)
    }

    pub fn try_add_slot(&self, method_name: Option<&str>) -> StoreResult<SlotCollection> {
        self.store.lock().try_add(method_name)
    }

    pub fn remove_slot(&self, id: &SlotId) -> SlotCollection {
        let mut store = self.store.lock();
        let slots = store.remove(id);
        self.sync_board(&slots);
        slots
    }

    pub fn try_remove_slot(&self, id: &SlotId) -> StoreResult<SlotCollection> {
        let mut store = self.store.lock();
        let slots = store.try_remove(id)?;
        self.sync_board(&slots);
        Ok(slots)
    }

    pub fn set_slot_method(&self, id: &SlotId, method_name: Option<&str>) -> SlotCollection {
        self.store.lock().set_method(id, method_name)
    }

    pub fn try_set_slot_method(
        &self,
        id: &SlotId,
        method_name: Option<&str>,
    ) -> StoreResult<SlotCollection> {
        self.store.lock().try_set_method(id, method_name)
    }

    pub fn reorder_slots(&self, from: &SlotId, to: &SlotId) -> SlotCollection {
        self.store.lock().reorder(from, to)
    }

    pub fn try_reorder_slots(&self, from: &SlotId, to: &SlotId) -> StoreResult<SlotCollection> {
        self.store.lock().try_reorder(from, to)
    }

    /// One slot per catalog method, in catalog order
    pub fn load_all_methods(&self) -> SlotCollection {
        let names = self.registry.method_names();
        let mut store = self.store.lock();
        let slots = store.replace_all(names);
        self.sync_board(&slots);
        slots
    }

    pub fn try_load_all_methods(&self) -> StoreResult<SlotCollection> {
        let names = self.registry.method_names();
        let mut store = self.store.lock();
        let slots = store.try_replace_all(names)?;
        self.sync_board(&slots);
        Ok(slots)
    }

    pub fn reset_slots(&self) -> SlotCollection {
        let mut store = self.store.lock();
        let slots = store.reset();
        self.sync_board(&slots);
        slots
    }

    pub fn try_reset_slots(&self) -> StoreResult<SlotCollection> {
        let mut store = self.store.lock();
        let slots = store.try_reset()?;
        self.sync_board(&slots);
        Ok(slots)
    }

    pub fn clear_slots(&self) -> SlotCollection {
        let mut store = self.store.lock();
        let slots = store.clear();
        self.sync_board(&slots);
        slots
    }

    pub fn try_clear_slots(&self) -> StoreResult<SlotCollection> {
        let mut store = self.store.lock();
        let slots = store.try_clear()?;
        self.sync_board(&slots);
        Ok(slots)
    }

    pub fn state(&self, id: &SlotId) -> ExecutionState {
        self.board.state(id)
    }

    pub fn record(&self, id: &SlotId) -> Option<ExecutionRecord> {
        self.board.record(id)
    }

    /// Slots in display order with their current state
    pub fn states(&self) -> Vec<(InvocationSlot, ExecutionState)> {
        self.slots()
            .into_iter()
            .map(|slot| {
                let state = self.board.state(&slot.id);
                (slot, state)
            })
            .collect()
    }

    /// Run the method behind slot `id` with named parameter values
    pub async fn execute(
        &self,
        id: &SlotId,
        params: &HashMap<String, String>,
    ) -> RuntimeResult<ExecutionState> {
        let (descriptor, engine) = {
            let store = self.store.lock();
            let slot = store.get(id).ok_or_else(|| RuntimeError::SlotNotFound(id.clone()))?;
            let descriptor =
                self.resolve(slot).ok_or_else(|| RuntimeError::SlotNotConfigured(id.clone()))?;
            (descriptor, self.board.engine_for(id))
        };
        Ok(engine.execute(&descriptor, params).await)
    }

    /// Run every configured slot concurrently. Results follow slot order;
    /// unconfigured slots are skipped.
    pub async fn execute_all(
        &self,
        params_by_slot: &HashMap<SlotId, HashMap<String, String>>,
    ) -> Vec<(SlotId, ExecutionState)> {
        let empty = HashMap::new();
        let prepared: Vec<_> = {
            let store = self.store.lock();
            store
                .slots()
                .iter()
                .filter_map(|slot| {
                    let descriptor = self.resolve(slot)?;
                    let engine = self.board.engine_for(&slot.id);
                    Some((slot.id.clone(), descriptor, engine))
                })
                .collect()
        };
        let runs: Vec<_> = prepared
            .into_iter()
            .map(|(id, descriptor, engine)| {
                let params = params_by_slot.get(&id).unwrap_or(&empty);
                async move {
                    let state = engine.execute(&descriptor, params).await;
                    (id, state)
                }
            })
            .collect();

        tracing::info!(slots = runs.len(), "Executing all configured slots");
        join_all(runs).await
    }

    fn sync_board(&self, slots: &SlotCollection) {
        self.board.retain(slots.iter().map(|slot| &slot.id));
    }
}
