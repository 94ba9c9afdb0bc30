use crate::error::StoreResult;

/// Named durable byte slots.
///
/// All implementations must satisfy these invariants:
/// - A slot holds at most one payload; `write` replaces it whole.
/// - Writes are atomic: a concurrent or subsequent `read` returns either
///   the previous payload or the new one, never a torn mix.
/// - `read` of an absent slot is `Ok(None)`, never an error.
/// - The store never interprets payloads — it is a pure byte store.
pub trait SlotStore: Send + Sync {
    /// Read the payload of a slot.
    ///
    /// Returns `Ok(None)` if the slot has never been written or was deleted.
    fn read(&self, slot: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write a slot's payload, replacing any previous payload.
    fn write(&self, slot: &str, payload: &[u8]) -> StoreResult<()>;

    /// Delete a slot. Returns `true` if the slot existed.
    fn delete(&self, slot: &str) -> StoreResult<bool>;
}
