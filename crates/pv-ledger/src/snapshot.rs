use serde::{Deserialize, Serialize};

use crate::records::{CertificateToken, ProofRecord, TransactionRecord};

/// Maximum transaction log entries retained in a persisted snapshot.
/// Oldest entries are discarded first. Retention policy only, not a
/// correctness requirement.
pub const TX_LOG_RETENTION: usize = 100;

/// Persisted layout of the simulated ledger state.
///
/// Conceptually a single JSON document. Mappings are serialized as ordered
/// lists of `[proofId, record]` pairs to survive formats that cannot
/// natively serialize non-string-keyed maps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub block_number: u64,
    pub proofs: Vec<(String, ProofRecord)>,
    pub tokens: Vec<(String, CertificateToken)>,
    pub next_token_id: u64,
    pub transactions: Vec<TransactionRecord>,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self {
            block_number: 1,
            proofs: Vec::new(),
            tokens: Vec::new(),
            next_token_id: 1,
            transactions: Vec::new(),
        }
    }
}

impl LedgerSnapshot {
    /// Drop all but the most recent [`TX_LOG_RETENTION`] log entries.
    pub fn trim_transactions(&mut self) {
        if self.transactions.len() > TX_LOG_RETENTION {
            let drop = self.transactions.len() - TX_LOG_RETENTION;
            self.transactions.drain(..drop);
        }
    }
}
