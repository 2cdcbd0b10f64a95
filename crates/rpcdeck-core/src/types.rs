use serde::{Deserialize, Serialize};
use std::fmt;

/// Method names seeded into a fresh slot collection, in display order.
pub const DEFAULT_METHODS: [&str; 3] = ["setBalance", "getBalance", "getBlockNumber"];

/// Opaque slot identity, stable for the slot's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One dashboard panel: a persisted reference to a catalog method by name.
/// `method_name == None` is an unconfigured placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationSlot {
    pub id: SlotId,
    pub method_name: Option<String>,
}

impl InvocationSlot {
    /// Create a slot with a freshly generated id
    pub fn new(method_name: Option<String>) -> Self {
        Self {
            id: SlotId::generate(),
            method_name,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.method_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Ordered sequence of slots; order is display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotCollection(Vec<InvocationSlot>);

impl SlotCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// One fresh slot per name, in the given order
    pub fn from_method_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(|name| InvocationSlot::new(Some(name.into()))).collect())
    }

    /// The collection new installs start with
    pub fn defaults() -> Self {
        Self::from_method_names(DEFAULT_METHODS)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InvocationSlot> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[InvocationSlot] {
        &self.0
    }

    pub fn get(&self, id: &SlotId) -> Option<&InvocationSlot> {
        self.0.iter().find(|slot| &slot.id == id)
    }

    pub fn position(&self, id: &SlotId) -> Option<usize> {
        self.0.iter().position(|slot| &slot.id == id)
    }

    pub fn ids(&self) -> Vec<SlotId> {
        self.0.iter().map(|slot| slot.id.clone()).collect()
    }

    pub fn method_names(&self) -> Vec<Option<String>> {
        self.0.iter().map(|slot| slot.method_name.clone()).collect()
    }

    /// True when no id appears twice
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.0.len());
        self.0.iter().all(|slot| seen.insert(slot.id.as_str()))
    }

    pub fn push(&mut self, slot: InvocationSlot) {
        self.0.push(slot);
    }

    /// Remove the slot with `id`; returns whether anything was removed
    pub fn remove(&mut self, id: &SlotId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set the method of slot `id`; returns whether the slot exists
    pub fn set_method(&mut self, id: &SlotId, method_name: Option<String>) -> bool {
        match self.0.iter_mut().find(|slot| &slot.id == id) {
            Some(slot) => {
                slot.method_name = method_name;
                true
            }
            None => false,
        }
    }

    /// Move `from` to the current index of `to`, shifting the others.
    /// Returns false (and leaves the order alone) when either id is missing or both are equal.
    pub fn move_slot(&mut self, from: &SlotId, to: &SlotId) -> bool {
        if from == to {
            return false;
        }
        let (Some(from_index), Some(to_index)) = (self.position(from), self.position(to)) else {
            return false;
        };
        let slot = self.0.remove(from_index);
        self.0.insert(to_index, slot);
        true
    }
}

impl From<Vec<InvocationSlot>> for SlotCollection {
    fn from(slots: Vec<InvocationSlot>) -> Self {
        Self(slots)
    }
}

impl IntoIterator for SlotCollection {
    type Item = InvocationSlot;
    type IntoIter = std::vec::IntoIter<InvocationSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SlotCollection {
    type Item = &'a InvocationSlot;
    type IntoIter = std::slice::Iter<'a, InvocationSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
