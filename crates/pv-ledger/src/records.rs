use std::fmt;

use serde::{Deserialize, Serialize};

use pv_types::{AccountId, ContentHash, TxHash};

/// One certified file: a registered binding of content hash and address to
/// an identity and time.
///
/// Created exactly once by a successful registration; never updated or
/// deleted by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// Caller-supplied globally unique identifier.
    pub proof_id: String,
    /// 32-byte content digest, unique across all records.
    pub content_hash: ContentHash,
    /// Opaque external locator for the file's bytes.
    pub content_address: String,
    /// Identity of the submitting party.
    pub registrant: AccountId,
    /// Block number assigned at creation.
    pub created_at_block: u64,
    /// UNIX seconds at creation.
    pub created_at_time: i64,
}

/// A minted, ownable certificate for a proof.
///
/// At most one token exists per proof id; token ids are sequential from 1
/// and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateToken {
    pub token_id: u64,
    pub proof_id: String,
    pub content_hash: ContentHash,
    pub content_address: String,
    /// Descriptive metadata copied at mint time; not re-validated against
    /// the original file.
    pub file_name: String,
    pub file_size: u64,
    /// Current holder. Ownership transfer is outside the simulated model.
    pub owner: AccountId,
    pub minted_at_time: i64,
}

/// Which mutation produced a transaction log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Register,
    Mint,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::Mint => f.write_str("mint"),
        }
    }
}

/// Append-only audit entry recorded on every successful mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub kind: TxKind,
    pub proof_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub token_id: Option<u64>,
    pub block_number: u64,
    pub timestamp: i64,
}
