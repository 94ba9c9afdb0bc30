use pv_types::ContentHash;

/// Domain rejections produced by ledger operations.
///
/// All three are non-retriable: the caller must change its input (a new
/// proof id, different content, or a different proof to mint).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("proof id already exists: {0}")]
    DuplicateProofId(String),

    #[error("content hash already registered: {0}")]
    DuplicateContentHash(ContentHash),

    #[error("proof already minted: {0}")]
    AlreadyMinted(String),
}
