use crate::execution::{ExecutionEngine, ExecutionRecord, ExecutionState};
use parking_lot::RwLock;
use rpcdeck_core::SlotId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Transient execution engines keyed by slot id. Never persisted.
#[derive(Debug, Default, Clone)]
pub struct ExecutionBoard {
    engines: Arc<RwLock<HashMap<SlotId, Arc<ExecutionEngine>>>>,
}

impl ExecutionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine for `slot_id`, created on first use
    pub fn engine_for(&self, slot_id: &SlotId) -> Arc<ExecutionEngine> {
        if let Some(engine) = self.engines.read().get(slot_id) {
            return engine.clone();
        }
        self.engines.write().entry(slot_id.clone()).or_default().clone()
    }

    pub fn get(&self, slot_id: &SlotId) -> Option<Arc<ExecutionEngine>> {
        self.engines.read().get(slot_id).cloned()
    }

    /// State of `slot_id`; slots that never ran are idle
    pub fn state(&self, slot_id: &SlotId) -> ExecutionState {
        self.get(slot_id).map(|engine| engine.state()).unwrap_or_default()
    }

    pub fn record(&self, slot_id: &SlotId) -> Option<ExecutionRecord> {
        self.get(slot_id).and_then(|engine| engine.last_record())
    }

    /// Drop the engine of `slot_id`; an in-flight call finishes unobserved
    pub fn detach(&self, slot_id: &SlotId) -> bool {
        match self.engines.write().remove(slot_id) {
            Some(engine) => {
                engine.detach();
                tracing::debug!(
                    slot = %slot_id,
                    pending = engine.is_pending(),
                    "Detached execution engine"
                );
                true
            }
            None => false,
        }
    }

    /// Detach every engine whose slot is not in `live`
    pub fn retain<'a>(&self, live: impl IntoIterator<Item = &'a SlotId>) {
        let live: HashSet<&SlotId> = live.into_iter().collect();
        self.engines.write().retain(|id, engine| {
            let keep = live.contains(id);
            if !keep {
                engine.detach();
            }
            keep
        });
    }

    /// Current state of every engine, in no particular order
    pub fn snapshot(&self) -> Vec<(SlotId, ExecutionState)> {
        self.engines.read().iter().map(|(id, engine)| (id.clone(), engine.state())).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engines_are_created_once_per_slot() {
        let board = ExecutionBoard::new();
        let id = SlotId::new("a");

        let first = board.engine_for(&id);
        let second = board.engine_for(&id);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(board.len(), 1);
        assert_eq!(board.state(&SlotId::new("other")), ExecutionState::Idle);
    }

    #[test]
    fn detach_marks_and_forgets_the_engine() {
        let board = ExecutionBoard::new();
        let id = SlotId::new("a");
        let engine = board.engine_for(&id);

        assert!(board.detach(&id));
        assert!(engine.is_detached());
        assert!(board.get(&id).is_none());
        assert!(!board.detach(&id));
    }

    #[test]
    fn retain_drops_removed_slots() {
        let board = ExecutionBoard::new();
        let keep = SlotId::new("keep");
        let gone = SlotId::new("gone");
        board.engine_for(&keep);
        let orphan = board.engine_for(&gone);

        board.retain([&keep]);

        assert!(orphan.is_detached());
        let snapshot = board.snapshot();
        assert_eq!(snapshot, vec![(keep, ExecutionState::Idle)]);
    }
}
