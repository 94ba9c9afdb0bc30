use async_trait::async_trait;

use pv_ledger::ProofRecord;
use pv_types::{ContentHash, TxHash};

use crate::error::ChainResult;
use crate::status::Outcome;

/// Opaque handle for a submitted, unconfirmed chain transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingHandle(pub String);

/// Confirmed result reported by the external backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub outcome: Outcome,
}

/// Interface to the real chain backend (deployed registry and certificate
/// contracts).
///
/// Out of scope for this repository beyond the boundary itself: the facade
/// speaks this trait so the simulated and real backends stay
/// interchangeable. Content hashes cross the boundary as fixed 32-byte
/// values rendered `0x`-prefixed; proof ids and content addresses are
/// free-form strings.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn submit_register(
        &self,
        proof_id: &str,
        content_hash: &ContentHash,
        content_address: &str,
    ) -> ChainResult<PendingHandle>;

    async fn submit_mint(
        &self,
        proof_id: &str,
        content_hash: &ContentHash,
        content_address: &str,
        file_name: &str,
        file_size: u64,
    ) -> ChainResult<PendingHandle>;

    async fn query_exists(&self, proof_id: &str) -> ChainResult<bool>;

    async fn query_minted(&self, proof_id: &str) -> ChainResult<bool>;

    async fn query_proof(&self, proof_id: &str) -> ChainResult<Option<ProofRecord>>;

    /// Track a submitted transaction through to confirmation.
    async fn await_confirmation(&self, handle: PendingHandle) -> ChainResult<Confirmation>;
}
