use serde::Serialize;

use pv_ledger::LedgerError;
use pv_types::TxHash;

use crate::error::ChainError;

/// What a successful operation produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outcome {
    Registered { block_number: u64 },
    Minted { token_id: u64 },
}

/// Classified failure cause, normalized across both backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    DuplicateProofId,
    DuplicateContentHash,
    AlreadyMinted,
    BackendUnavailable,
    Backend,
}

/// Normalized lifecycle of one facade operation.
///
/// Callers pattern-match exhaustively instead of probing boolean flags.
/// The only ordering guarantee is `Pending`/`Confirming` before a terminal
/// `Succeeded` or `Failed`; no particular latency may be assumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum OperationStatus {
    /// Submitted, not yet confirmed.
    Pending,
    /// Accepted by the backend, awaiting confirmation (real backend only).
    Confirming,
    Succeeded {
        tx_hash: TxHash,
        outcome: Outcome,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl OperationStatus {
    pub fn succeeded(tx_hash: TxHash, outcome: Outcome) -> Self {
        Self::Succeeded { tx_hash, outcome }
    }

    pub fn failed(error: &ChainError) -> Self {
        let kind = match error {
            ChainError::Ledger(LedgerError::DuplicateProofId(_)) => FailureKind::DuplicateProofId,
            ChainError::Ledger(LedgerError::DuplicateContentHash(_)) => {
                FailureKind::DuplicateContentHash
            }
            ChainError::Ledger(LedgerError::AlreadyMinted(_)) => FailureKind::AlreadyMinted,
            ChainError::BackendUnavailable => FailureKind::BackendUnavailable,
            ChainError::Store(_) | ChainError::Client(_) => FailureKind::Backend,
        };
        Self::Failed {
            kind,
            message: error.to_string(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Succeeded { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_rejections_map_to_domain_kinds() {
        let err = ChainError::Ledger(LedgerError::DuplicateProofId("PV-1".into()));
        match OperationStatus::failed(&err) {
            OperationStatus::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::DuplicateProofId);
                assert!(message.contains("PV-1"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn backend_unavailable_maps_to_its_own_kind() {
        let status = OperationStatus::failed(&ChainError::BackendUnavailable);
        assert!(matches!(
            status,
            OperationStatus::Failed {
                kind: FailureKind::BackendUnavailable,
                ..
            }
        ));
    }

    #[test]
    fn terminal_states() {
        assert!(!OperationStatus::Pending.is_terminal());
        assert!(!OperationStatus::Confirming.is_terminal());
        let ok = OperationStatus::succeeded(
            TxHash::from_raw([1; 32]),
            Outcome::Registered { block_number: 1 },
        );
        assert!(ok.is_terminal());
        assert!(ok.tx_hash().is_some());
    }

    #[test]
    fn serializes_with_status_tag() {
        let ok = OperationStatus::succeeded(
            TxHash::from_raw([1; 32]),
            Outcome::Minted { token_id: 3 },
        );
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["outcome"]["minted"]["tokenId"], 3);
    }
}
