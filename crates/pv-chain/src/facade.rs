use std::sync::{Arc, RwLock};

use tracing::debug;

use pv_ledger::{LedgerConfig, ProofRecord, SimulatedLedger};
use pv_store::{SlotStore, StoreResult};
use pv_types::{BackendMode, ContentHash};

use crate::client::ChainClient;
use crate::error::{ChainError, ChainResult};
use crate::mode::ModeSelector;
use crate::status::{OperationStatus, Outcome};

/// One uniform interface over both backends.
///
/// Owns the simulated ledger and the mode selector outright (no globals);
/// the real backend is an optional injected [`ChainClient`] session. The
/// backend mode is captured once at the start of each logical operation
/// and never re-read mid-operation.
pub struct ProofChain {
    mode: ModeSelector,
    ledger: SimulatedLedger,
    client: RwLock<Option<Arc<dyn ChainClient>>>,
}

impl ProofChain {
    /// Open the facade over a slot store. The mode preference and the
    /// ledger snapshot live in separate slots of the same store.
    pub fn open(store: Arc<dyn SlotStore>, config: LedgerConfig) -> Self {
        Self {
            mode: ModeSelector::open(store.clone()),
            ledger: SimulatedLedger::open(store, config),
            client: RwLock::new(None),
        }
    }

    /// Attach or detach the real chain client session.
    pub fn set_client(&self, client: Option<Arc<dyn ChainClient>>) {
        *self.client.write().expect("client lock poisoned") = client;
    }

    pub fn mode(&self) -> BackendMode {
        self.mode.get()
    }

    pub fn set_mode(&self, mode: BackendMode) -> StoreResult<()> {
        self.mode.set(mode)
    }

    /// Direct access to the simulated ledger, for callers inspecting the
    /// simulated transaction log or counters.
    pub fn ledger(&self) -> &SimulatedLedger {
        &self.ledger
    }

    fn current_client(&self) -> ChainResult<Arc<dyn ChainClient>> {
        self.client
            .read()
            .expect("client lock poisoned")
            .clone()
            .ok_or(ChainError::BackendUnavailable)
    }

    // ---- Operations ----

    /// Register a proof, returning the normalized terminal status.
    ///
    /// Domain rejections surface as `Failed` with a human-readable message;
    /// they are never retried automatically.
    pub async fn register(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
    ) -> OperationStatus {
        let mode = self.mode.get();
        debug!(proof_id, %mode, "register dispatched");
        match mode {
            BackendMode::Simulated => {
                match self
                    .ledger
                    .register_proof(proof_id, content_hash, content_address)
                    .await
                {
                    Ok(receipt) => OperationStatus::succeeded(
                        receipt.tx_hash,
                        Outcome::Registered {
                            block_number: receipt.block_number,
                        },
                    ),
                    Err(e) => OperationStatus::failed(&ChainError::Ledger(e)),
                }
            }
            BackendMode::Real => match self
                .register_real(proof_id, &content_hash, content_address)
                .await
            {
                Ok(status) => status,
                Err(e) => OperationStatus::failed(&e),
            },
        }
    }

    async fn register_real(
        &self,
        proof_id: &str,
        content_hash: &ContentHash,
        content_address: &str,
    ) -> ChainResult<OperationStatus> {
        let client = self.current_client()?;
        let handle = client
            .submit_register(proof_id, content_hash, content_address)
            .await?;
        let confirmation = client.await_confirmation(handle).await?;
        Ok(OperationStatus::succeeded(
            confirmation.tx_hash,
            confirmation.outcome,
        ))
    }

    /// Mint a certificate, returning the normalized terminal status.
    pub async fn mint(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
        file_name: &str,
        file_size: u64,
    ) -> OperationStatus {
        let mode = self.mode.get();
        debug!(proof_id, %mode, "mint dispatched");
        match mode {
            BackendMode::Simulated => {
                match self
                    .ledger
                    .mint_certificate(proof_id, content_hash, content_address, file_name, file_size)
                    .await
                {
                    Ok(receipt) => OperationStatus::succeeded(
                        receipt.tx_hash,
                        Outcome::Minted {
                            token_id: receipt.token_id,
                        },
                    ),
                    Err(e) => OperationStatus::failed(&ChainError::Ledger(e)),
                }
            }
            BackendMode::Real => match self
                .mint_real(proof_id, &content_hash, content_address, file_name, file_size)
                .await
            {
                Ok(status) => status,
                Err(e) => OperationStatus::failed(&e),
            },
        }
    }

    async fn mint_real(
        &self,
        proof_id: &str,
        content_hash: &ContentHash,
        content_address: &str,
        file_name: &str,
        file_size: u64,
    ) -> ChainResult<OperationStatus> {
        let client = self.current_client()?;
        let handle = client
            .submit_mint(proof_id, content_hash, content_address, file_name, file_size)
            .await?;
        let confirmation = client.await_confirmation(handle).await?;
        Ok(OperationStatus::succeeded(
            confirmation.tx_hash,
            confirmation.outcome,
        ))
    }

    /// Whether a proof is registered.
    pub async fn exists(&self, proof_id: &str) -> ChainResult<bool> {
        match self.mode.get() {
            BackendMode::Simulated => Ok(self.ledger.proof_exists(proof_id)),
            BackendMode::Real => self.current_client()?.query_exists(proof_id).await,
        }
    }

    /// Whether a certificate has been minted for the proof id.
    pub async fn minted(&self, proof_id: &str) -> ChainResult<bool> {
        match self.mode.get() {
            BackendMode::Simulated => Ok(self.ledger.is_minted(proof_id)),
            BackendMode::Real => self.current_client()?.query_minted(proof_id).await,
        }
    }

    /// Fetch the registered record for a proof id, if any.
    pub async fn get_record(&self, proof_id: &str) -> ChainResult<Option<ProofRecord>> {
        match self.mode.get() {
            BackendMode::Simulated => Ok(self.ledger.get_proof(proof_id)),
            BackendMode::Real => self.current_client()?.query_proof(proof_id).await,
        }
    }
}

impl std::fmt::Debug for ProofChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofChain")
            .field("mode", &self.mode.get())
            .field("ledger", &self.ledger)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use pv_store::InMemorySlotStore;
    use pv_types::TxHash;

    use crate::client::{Confirmation, PendingHandle};
    use crate::status::FailureKind;

    fn chain() -> ProofChain {
        ProofChain::open(Arc::new(InMemorySlotStore::new()), LedgerConfig::instant())
    }

    fn hash(seed: u8) -> ContentHash {
        ContentHash::from_raw([seed; 32])
    }

    #[tokio::test]
    async fn simulated_register_normalizes_to_succeeded() {
        let chain = chain();
        let status = chain.register("PV-1", hash(1), "addr1").await;
        match status {
            OperationStatus::Succeeded { outcome, .. } => {
                assert_eq!(outcome, Outcome::Registered { block_number: 1 });
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert!(chain.exists("PV-1").await.unwrap());
        assert!(!chain.minted("PV-1").await.unwrap());
    }

    #[tokio::test]
    async fn simulated_mint_normalizes_to_succeeded() {
        let chain = chain();
        let status = chain.mint("PV-1", hash(1), "addr1", "a.txt", 9).await;
        assert!(status.tx_hash().is_some(), "mint should produce a tx hash");
        match status {
            OperationStatus::Succeeded { outcome, .. } => {
                assert_eq!(outcome, Outcome::Minted { token_id: 1 });
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn domain_rejection_surfaces_as_failed() {
        let chain = chain();
        chain.register("PV-1", hash(1), "addr1").await;
        let status = chain.register("PV-1", hash(2), "addr2").await;
        assert!(matches!(
            status,
            OperationStatus::Failed {
                kind: FailureKind::DuplicateProofId,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn real_mode_without_session_is_backend_unavailable() {
        let chain = chain();
        chain.set_mode(BackendMode::Real).unwrap();

        let status = chain.register("PV-1", hash(1), "addr1").await;
        assert!(matches!(
            status,
            OperationStatus::Failed {
                kind: FailureKind::BackendUnavailable,
                ..
            }
        ));
        assert!(matches!(
            chain.exists("PV-1").await,
            Err(ChainError::BackendUnavailable)
        ));
        assert!(matches!(
            chain.get_record("PV-1").await,
            Err(ChainError::BackendUnavailable)
        ));
    }

    struct MockClient;

    #[async_trait]
    impl ChainClient for MockClient {
        async fn submit_register(
            &self,
            proof_id: &str,
            _content_hash: &ContentHash,
            _content_address: &str,
        ) -> ChainResult<PendingHandle> {
            Ok(PendingHandle(format!("reg:{proof_id}")))
        }

        async fn submit_mint(
            &self,
            proof_id: &str,
            _content_hash: &ContentHash,
            _content_address: &str,
            _file_name: &str,
            _file_size: u64,
        ) -> ChainResult<PendingHandle> {
            Ok(PendingHandle(format!("mint:{proof_id}")))
        }

        async fn query_exists(&self, proof_id: &str) -> ChainResult<bool> {
            Ok(proof_id == "PV-known")
        }

        async fn query_minted(&self, _proof_id: &str) -> ChainResult<bool> {
            Ok(false)
        }

        async fn query_proof(&self, _proof_id: &str) -> ChainResult<Option<ProofRecord>> {
            Ok(None)
        }

        async fn await_confirmation(&self, handle: PendingHandle) -> ChainResult<Confirmation> {
            let outcome = if handle.0.starts_with("mint:") {
                Outcome::Minted { token_id: 7 }
            } else {
                Outcome::Registered { block_number: 42 }
            };
            Ok(Confirmation {
                tx_hash: TxHash::from_raw([0xfe; 32]),
                outcome,
            })
        }
    }

    #[tokio::test]
    async fn real_mode_delegates_to_the_attached_client() {
        let chain = chain();
        chain.set_mode(BackendMode::Real).unwrap();
        chain.set_client(Some(Arc::new(MockClient)));

        let status = chain.register("PV-1", hash(1), "addr1").await;
        match status {
            OperationStatus::Succeeded { tx_hash, outcome } => {
                assert_eq!(tx_hash, TxHash::from_raw([0xfe; 32]));
                assert_eq!(outcome, Outcome::Registered { block_number: 42 });
            }
            other => panic!("expected success, got {other:?}"),
        }

        let status = chain.mint("PV-1", hash(1), "addr1", "a", 1).await;
        match status {
            OperationStatus::Succeeded { outcome, .. } => {
                assert_eq!(outcome, Outcome::Minted { token_id: 7 });
            }
            other => panic!("expected success, got {other:?}"),
        }

        assert!(chain.exists("PV-known").await.unwrap());
        assert!(!chain.exists("PV-other").await.unwrap());

        // The simulated ledger never saw the real-mode traffic.
        assert_eq!(chain.ledger().total_proofs(), 0);
    }

    #[tokio::test]
    async fn switching_back_to_simulated_reuses_local_state() {
        let chain = chain();
        chain.register("PV-1", hash(1), "addr1").await;

        chain.set_mode(BackendMode::Real).unwrap();
        chain.set_mode(BackendMode::Simulated).unwrap();
        assert!(chain.exists("PV-1").await.unwrap());
    }
}
