use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::SlotStore;

/// In-memory, HashMap-based slot store.
///
/// Intended for tests and embedding. All payloads are held in memory behind
/// a `RwLock`; payloads are cloned on read.
pub struct InMemorySlotStore {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySlotStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of slots currently holding a payload.
    pub fn len(&self) -> usize {
        self.slots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no slot holds a payload.
    pub fn is_empty(&self) -> bool {
        self.slots.read().expect("lock poisoned").is_empty()
    }

    /// Remove all slots.
    pub fn clear(&self) {
        self.slots.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStore for InMemorySlotStore {
    fn read(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        let slots = self.slots.read().expect("lock poisoned");
        Ok(slots.get(slot).cloned())
    }

    fn write(&self, slot: &str, payload: &[u8]) -> StoreResult<()> {
        let mut slots = self.slots.write().expect("lock poisoned");
        slots.insert(slot.to_string(), payload.to_vec());
        Ok(())
    }

    fn delete(&self, slot: &str) -> StoreResult<bool> {
        let mut slots = self.slots.write().expect("lock poisoned");
        Ok(slots.remove(slot).is_some())
    }
}

impl std::fmt::Debug for InMemorySlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySlotStore")
            .field("slot_count", &self.len())
            .finish()
    }
}
