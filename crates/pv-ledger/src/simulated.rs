use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, warn};

use pv_store::SlotStore;
use pv_types::{AccountId, ContentHash, TxHash};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::records::{CertificateToken, ProofRecord, TransactionRecord, TxKind};
use crate::snapshot::LedgerSnapshot;

/// Durable slot holding the serialized ledger snapshot.
pub const CHAIN_SLOT: &str = "simulated-chain";

/// Validated registration awaiting confirmation.
///
/// Submitting reserves no state; the confirmation re-validates before
/// committing, so a conflicting commit in between fails at confirm time.
#[derive(Clone, Debug)]
pub struct PendingRegister {
    pub proof_id: String,
    pub content_hash: ContentHash,
    pub content_address: String,
    pub delay: Duration,
}

/// Validated mint awaiting confirmation.
#[derive(Clone, Debug)]
pub struct PendingMint {
    pub proof_id: String,
    pub content_hash: ContentHash,
    pub content_address: String,
    pub file_name: String,
    pub file_size: u64,
    pub delay: Duration,
}

/// Committed result of a proof registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterReceipt {
    pub tx_hash: TxHash,
    /// Block number assigned to this transaction (the counter value before
    /// the post-commit increment).
    pub block_number: u64,
    pub record: ProofRecord,
}

/// Committed result of a certificate mint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub token_id: u64,
    pub block_number: u64,
}

struct LedgerState {
    block_number: u64,
    proofs: HashMap<String, ProofRecord>,
    tokens: HashMap<String, CertificateToken>,
    next_token_id: u64,
    transactions: Vec<TransactionRecord>,
}

impl LedgerState {
    fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            block_number: snapshot.block_number,
            proofs: snapshot.proofs.into_iter().collect(),
            tokens: snapshot.tokens.into_iter().collect(),
            next_token_id: snapshot.next_token_id,
            transactions: snapshot.transactions,
        }
    }

    fn to_snapshot(&self) -> LedgerSnapshot {
        let mut proofs: Vec<_> = self
            .proofs
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();
        proofs.sort_by_key(|(_, record)| record.created_at_block);

        let mut tokens: Vec<_> = self
            .tokens
            .iter()
            .map(|(id, token)| (id.clone(), token.clone()))
            .collect();
        tokens.sort_by_key(|(_, token)| token.token_id);

        let mut snapshot = LedgerSnapshot {
            block_number: self.block_number,
            proofs,
            tokens,
            next_token_id: self.next_token_id,
            transactions: self.transactions.clone(),
        };
        snapshot.trim_transactions();
        snapshot
    }

    fn check_register(&self, proof_id: &str, content_hash: &ContentHash) -> Result<(), LedgerError> {
        if self.proofs.contains_key(proof_id) {
            return Err(LedgerError::DuplicateProofId(proof_id.to_string()));
        }
        // Linear scan; simulated-mode record counts stay small.
        if self.proofs.values().any(|p| p.content_hash == *content_hash) {
            return Err(LedgerError::DuplicateContentHash(*content_hash));
        }
        Ok(())
    }

    fn check_mint(&self, proof_id: &str) -> Result<(), LedgerError> {
        if self.tokens.contains_key(proof_id) {
            return Err(LedgerError::AlreadyMinted(proof_id.to_string()));
        }
        Ok(())
    }
}

/// In-process simulated ledger standing in for the two deployed contracts.
///
/// Explicitly constructed and owned by the caller — each instance holds its
/// own state, hydrated from the slot store at open and persisted after
/// every committed mutation. Registration and minting share only the proof
/// id namespace; neither requires the other, mirroring two independently
/// deployable contracts.
pub struct SimulatedLedger {
    store: Arc<dyn SlotStore>,
    config: LedgerConfig,
    state: RwLock<LedgerState>,
}

impl SimulatedLedger {
    /// Open a ledger, hydrating state from the store's chain slot.
    ///
    /// An absent, malformed, or unreadable snapshot yields a fresh empty
    /// state; hydration never fails.
    pub fn open(store: Arc<dyn SlotStore>, config: LedgerConfig) -> Self {
        let snapshot = match store.read(CHAIN_SLOT) {
            Ok(Some(bytes)) => match serde_json::from_slice::<LedgerSnapshot>(&bytes) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "malformed ledger snapshot; starting fresh");
                    LedgerSnapshot::default()
                }
            },
            Ok(None) => LedgerSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "ledger snapshot unreadable; starting fresh");
                LedgerSnapshot::default()
            }
        };
        debug!(
            block = snapshot.block_number,
            proofs = snapshot.proofs.len(),
            tokens = snapshot.tokens.len(),
            "simulated ledger hydrated"
        );
        Self {
            store,
            config,
            state: RwLock::new(LedgerState::from_snapshot(snapshot)),
        }
    }

    // ---- Mutations ----

    /// Validate a registration without reserving state.
    pub fn submit_register(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
    ) -> Result<PendingRegister, LedgerError> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.check_register(proof_id, &content_hash)?;
        Ok(PendingRegister {
            proof_id: proof_id.to_string(),
            content_hash,
            content_address: content_address.to_string(),
            delay: self.config.register_latency.sample(),
        })
    }

    /// Wait out the confirmation delay, then commit the registration.
    ///
    /// Re-validates under the write lock: the check, mutation, and persist
    /// form one atomic unit, so interleaved confirmations serialize
    /// correctly and commit in completion order.
    pub async fn confirm_register(
        &self,
        pending: PendingRegister,
    ) -> Result<RegisterReceipt, LedgerError> {
        tokio::time::sleep(pending.delay).await;

        let mut state = self.state.write().expect("ledger lock poisoned");
        state.check_register(&pending.proof_id, &pending.content_hash)?;

        let block_number = state.block_number;
        let timestamp = chrono::Utc::now().timestamp();
        let record = ProofRecord {
            proof_id: pending.proof_id.clone(),
            content_hash: pending.content_hash,
            content_address: pending.content_address,
            registrant: AccountId::simulated(),
            created_at_block: block_number,
            created_at_time: timestamp,
        };
        state.proofs.insert(pending.proof_id.clone(), record.clone());

        let tx_hash = TxHash::generate();
        state.transactions.push(TransactionRecord {
            hash: tx_hash,
            kind: TxKind::Register,
            proof_id: pending.proof_id.clone(),
            token_id: None,
            block_number,
            timestamp,
        });
        state.block_number += 1;
        self.persist(&state);

        debug!(proof_id = %pending.proof_id, block = block_number, tx = %tx_hash.short_id(), "proof registered");
        Ok(RegisterReceipt {
            tx_hash,
            block_number,
            record,
        })
    }

    /// Register a proof: submit, wait for confirmation, commit.
    pub async fn register_proof(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
    ) -> Result<RegisterReceipt, LedgerError> {
        let pending = self.submit_register(proof_id, content_hash, content_address)?;
        self.confirm_register(pending).await
    }

    /// Validate a mint without reserving state.
    ///
    /// Minting does not require a prior registration for the same proof id;
    /// the registry and the certificate ledger are independent.
    pub fn submit_mint(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<PendingMint, LedgerError> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.check_mint(proof_id)?;
        Ok(PendingMint {
            proof_id: proof_id.to_string(),
            content_hash,
            content_address: content_address.to_string(),
            file_name: file_name.to_string(),
            file_size,
            delay: self.config.mint_latency.sample(),
        })
    }

    /// Wait out the confirmation delay, then commit the mint.
    pub async fn confirm_mint(&self, pending: PendingMint) -> Result<MintReceipt, LedgerError> {
        tokio::time::sleep(pending.delay).await;

        let mut state = self.state.write().expect("ledger lock poisoned");
        state.check_mint(&pending.proof_id)?;

        let block_number = state.block_number;
        let timestamp = chrono::Utc::now().timestamp();
        let token_id = state.next_token_id;
        state.next_token_id += 1;

        let token = CertificateToken {
            token_id,
            proof_id: pending.proof_id.clone(),
            content_hash: pending.content_hash,
            content_address: pending.content_address,
            file_name: pending.file_name,
            file_size: pending.file_size,
            owner: AccountId::simulated(),
            minted_at_time: timestamp,
        };
        state.tokens.insert(pending.proof_id.clone(), token);

        let tx_hash = TxHash::generate();
        state.transactions.push(TransactionRecord {
            hash: tx_hash,
            kind: TxKind::Mint,
            proof_id: pending.proof_id.clone(),
            token_id: Some(token_id),
            block_number,
            timestamp,
        });
        state.block_number += 1;
        self.persist(&state);

        debug!(proof_id = %pending.proof_id, token_id, block = block_number, "certificate minted");
        Ok(MintReceipt {
            tx_hash,
            token_id,
            block_number,
        })
    }

    /// Mint a certificate: submit, wait for confirmation, commit.
    pub async fn mint_certificate(
        &self,
        proof_id: &str,
        content_hash: ContentHash,
        content_address: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<MintReceipt, LedgerError> {
        let pending =
            self.submit_mint(proof_id, content_hash, content_address, file_name, file_size)?;
        self.confirm_mint(pending).await
    }

    // ---- Reads (no latency, no persistence) ----

    pub fn proof_exists(&self, proof_id: &str) -> bool {
        let state = self.state.read().expect("ledger lock poisoned");
        state.proofs.contains_key(proof_id)
    }

    pub fn is_minted(&self, proof_id: &str) -> bool {
        let state = self.state.read().expect("ledger lock poisoned");
        state.tokens.contains_key(proof_id)
    }

    pub fn get_proof(&self, proof_id: &str) -> Option<ProofRecord> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.proofs.get(proof_id).cloned()
    }

    pub fn get_proof_by_hash(&self, content_hash: &ContentHash) -> Option<ProofRecord> {
        let state = self.state.read().expect("ledger lock poisoned");
        state
            .proofs
            .values()
            .find(|p| p.content_hash == *content_hash)
            .cloned()
    }

    pub fn get_token(&self, proof_id: &str) -> Option<CertificateToken> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.tokens.get(proof_id).cloned()
    }

    pub fn get_transaction(&self, hash: &TxHash) -> Option<TransactionRecord> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.transactions.iter().find(|tx| tx.hash == *hash).cloned()
    }

    /// The transaction log, oldest first.
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        let state = self.state.read().expect("ledger lock poisoned");
        state.transactions.clone()
    }

    pub fn total_proofs(&self) -> usize {
        let state = self.state.read().expect("ledger lock poisoned");
        state.proofs.len()
    }

    pub fn total_tokens(&self) -> usize {
        let state = self.state.read().expect("ledger lock poisoned");
        state.tokens.len()
    }

    /// The next block number to be assigned.
    pub fn block_number(&self) -> u64 {
        let state = self.state.read().expect("ledger lock poisoned");
        state.block_number
    }

    /// Persist the current state to the chain slot.
    ///
    /// Durability failure must never fail a committed operation: errors are
    /// logged and swallowed.
    fn persist(&self, state: &LedgerState) {
        let snapshot = state.to_snapshot();
        let bytes = match serde_json::to_vec(&snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to serialize ledger snapshot; skipping persist");
                return;
            }
        };
        if let Err(e) = self.store.write(CHAIN_SLOT, &bytes) {
            warn!(error = %e, "failed to persist ledger snapshot; continuing");
        }
    }
}

impl std::fmt::Debug for SimulatedLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("ledger lock poisoned");
        f.debug_struct("SimulatedLedger")
            .field("block_number", &state.block_number)
            .field("proofs", &state.proofs.len())
            .field("tokens", &state.tokens.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_store::{InMemorySlotStore, StoreResult};

    fn hash(seed: u8) -> ContentHash {
        ContentHash::from_raw([seed; 32])
    }

    fn ledger() -> SimulatedLedger {
        SimulatedLedger::open(Arc::new(InMemorySlotStore::new()), LedgerConfig::instant())
    }

    #[tokio::test]
    async fn first_register_commits_at_block_one() {
        let ledger = ledger();
        let receipt = ledger.register_proof("PV-1", hash(1), "addr1").await.unwrap();
        assert_eq!(receipt.block_number, 1);
        assert_eq!(receipt.record.proof_id, "PV-1");
        assert_eq!(receipt.record.registrant, AccountId::simulated());
        assert_eq!(receipt.record.created_at_block, 1);
        assert!(ledger.proof_exists("PV-1"));
        assert_eq!(ledger.block_number(), 2);
    }

    #[tokio::test]
    async fn duplicate_proof_id_is_rejected() {
        let ledger = ledger();
        ledger.register_proof("PV-1", hash(1), "addr1").await.unwrap();
        let err = ledger
            .register_proof("PV-1", hash(2), "addr2")
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateProofId("PV-1".into()));
    }

    #[tokio::test]
    async fn duplicate_content_hash_is_rejected_across_case() {
        let ledger = ledger();
        let upper = ContentHash::from_hex(&"AB".repeat(32)).unwrap();
        let lower = ContentHash::from_hex(&"ab".repeat(32)).unwrap();
        ledger.register_proof("PV-1", upper, "addr1").await.unwrap();
        let err = ledger
            .register_proof("PV-2", lower, "addr2")
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateContentHash(lower));
        assert!(!ledger.proof_exists("PV-2"));
    }

    #[tokio::test]
    async fn block_numbers_increase_by_one_per_committed_operation() {
        let ledger = ledger();
        let initial = ledger.block_number();
        for i in 0..5u8 {
            ledger
                .register_proof(&format!("PV-{i}"), hash(i), "addr")
                .await
                .unwrap();
        }
        ledger
            .mint_certificate("PV-0", hash(0), "addr", "file.txt", 10)
            .await
            .unwrap();
        assert_eq!(ledger.block_number(), initial + 6);
    }

    #[tokio::test]
    async fn mint_is_independent_of_registration() {
        let ledger = ledger();
        let receipt = ledger
            .mint_certificate("PV-unregistered", hash(9), "addr", "a.bin", 1)
            .await
            .unwrap();
        assert_eq!(receipt.token_id, 1);
        assert!(ledger.is_minted("PV-unregistered"));
        assert!(!ledger.proof_exists("PV-unregistered"));
    }

    #[tokio::test]
    async fn minting_twice_yields_already_minted() {
        let ledger = ledger();
        ledger
            .mint_certificate("PV-1", hash(1), "addr", "a.txt", 5)
            .await
            .unwrap();
        let err = ledger
            .mint_certificate("PV-1", hash(1), "addr", "a.txt", 5)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyMinted("PV-1".into()));
    }

    #[tokio::test]
    async fn token_ids_are_sequential_and_survive_failed_mints() {
        let ledger = ledger();
        let first = ledger
            .mint_certificate("PV-1", hash(1), "addr", "a", 1)
            .await
            .unwrap();
        assert_eq!(first.token_id, 1);

        // Failed attempt must not consume an id.
        ledger
            .mint_certificate("PV-1", hash(1), "addr", "a", 1)
            .await
            .unwrap_err();

        let second = ledger
            .mint_certificate("PV-2", hash(2), "addr", "b", 2)
            .await
            .unwrap();
        assert_eq!(second.token_id, 2);
    }

    #[tokio::test]
    async fn register_then_mint_scenario() {
        let ledger = ledger();
        let aa = ContentHash::from_hex(&"aa".repeat(32)).unwrap();

        let reg = ledger.register_proof("PV-1", aa, "addr1").await.unwrap();
        assert_eq!(reg.block_number, 1);

        let err = ledger.register_proof("PV-2", aa, "addr2").await.unwrap_err();
        assert_eq!(err, LedgerError::DuplicateContentHash(aa));

        let mint = ledger
            .mint_certificate("PV-1", aa, "addr1", "doc.pdf", 1234)
            .await
            .unwrap();
        assert_eq!(mint.token_id, 1);

        let err = ledger
            .mint_certificate("PV-1", aa, "addr1", "doc.pdf", 1234)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyMinted("PV-1".into()));
    }

    #[tokio::test]
    async fn submit_reserves_no_state_and_confirm_revalidates() {
        let ledger = ledger();
        let a = ledger.submit_register("PV-1", hash(1), "addr").unwrap();
        // Same id submits cleanly: nothing was reserved.
        let b = ledger.submit_register("PV-1", hash(1), "addr").unwrap();

        ledger.confirm_register(a).await.unwrap();
        let err = ledger.confirm_register(b).await.unwrap_err();
        assert_eq!(err, LedgerError::DuplicateProofId("PV-1".into()));
    }

    #[tokio::test]
    async fn reloaded_ledger_is_behaviorally_equivalent() {
        let store: Arc<InMemorySlotStore> = Arc::new(InMemorySlotStore::new());
        let first = SimulatedLedger::open(store.clone(), LedgerConfig::instant());
        first.register_proof("PV-1", hash(1), "addr1").await.unwrap();
        first.register_proof("PV-2", hash(2), "addr2").await.unwrap();
        first
            .mint_certificate("PV-1", hash(1), "addr1", "a.txt", 7)
            .await
            .unwrap();
        drop(first);

        let reloaded = SimulatedLedger::open(store, LedgerConfig::instant());
        assert!(reloaded.proof_exists("PV-1"));
        assert!(reloaded.proof_exists("PV-2"));
        assert!(reloaded.is_minted("PV-1"));
        assert_eq!(reloaded.block_number(), 4);
        assert_eq!(
            reloaded.get_proof("PV-1").unwrap().content_hash,
            hash(1)
        );
        assert_eq!(reloaded.get_token("PV-1").unwrap().token_id, 1);
        // Next token id continues the sequence.
        let next = reloaded
            .mint_certificate("PV-2", hash(2), "addr2", "b.txt", 8)
            .await
            .unwrap();
        assert_eq!(next.token_id, 2);
    }

    #[tokio::test]
    async fn persisted_log_retains_last_hundred_transactions() {
        let store: Arc<InMemorySlotStore> = Arc::new(InMemorySlotStore::new());
        let ledger = SimulatedLedger::open(store.clone(), LedgerConfig::instant());
        for i in 0..150u32 {
            let mut bytes = [0u8; 32];
            bytes[..4].copy_from_slice(&i.to_be_bytes());
            ledger
                .register_proof(&format!("PV-{i}"), ContentHash::from_raw(bytes), "addr")
                .await
                .unwrap();
        }

        let reloaded = SimulatedLedger::open(store, LedgerConfig::instant());
        let log = reloaded.transactions();
        assert_eq!(log.len(), 100);
        assert_eq!(log[0].proof_id, "PV-50");
        assert_eq!(log.last().unwrap().proof_id, "PV-149");
    }

    #[tokio::test]
    async fn reads_find_records_by_hash_and_tx() {
        let ledger = ledger();
        let receipt = ledger.register_proof("PV-1", hash(3), "addr").await.unwrap();

        let by_hash = ledger.get_proof_by_hash(&hash(3)).unwrap();
        assert_eq!(by_hash.proof_id, "PV-1");
        assert!(ledger.get_proof_by_hash(&hash(4)).is_none());

        let tx = ledger.get_transaction(&receipt.tx_hash).unwrap();
        assert_eq!(tx.kind, TxKind::Register);
        assert_eq!(tx.block_number, 1);
        assert!(ledger.get_transaction(&TxHash::from_raw([9; 32])).is_none());

        assert_eq!(ledger.total_proofs(), 1);
        assert_eq!(ledger.total_tokens(), 0);
    }

    #[test]
    fn malformed_snapshot_yields_fresh_state() {
        let store: Arc<InMemorySlotStore> = Arc::new(InMemorySlotStore::new());
        store.write(CHAIN_SLOT, b"not json at all").unwrap();
        let ledger = SimulatedLedger::open(store, LedgerConfig::instant());
        assert_eq!(ledger.block_number(), 1);
        assert_eq!(ledger.total_proofs(), 0);
    }

    struct FailingStore;

    impl SlotStore for FailingStore {
        fn read(&self, _slot: &str) -> StoreResult<Option<Vec<u8>>> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "offline").into())
        }
        fn write(&self, _slot: &str, _payload: &[u8]) -> StoreResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "offline").into())
        }
        fn delete(&self, _slot: &str) -> StoreResult<bool> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "offline").into())
        }
    }

    #[tokio::test]
    async fn persistence_failure_never_fails_the_operation() {
        let ledger = SimulatedLedger::open(Arc::new(FailingStore), LedgerConfig::instant());
        let receipt = ledger.register_proof("PV-1", hash(1), "addr").await.unwrap();
        assert_eq!(receipt.block_number, 1);
        assert!(ledger.proof_exists("PV-1"));
    }
}
