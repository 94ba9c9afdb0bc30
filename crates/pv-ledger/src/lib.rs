//! Simulated ledger core for ProofVault.
//!
//! This crate is the heart of ProofVault's simulated backend. It provides:
//! - Proof, certificate-token, and transaction record types
//! - `SimulatedLedger`: register/mint with uniqueness and idempotency
//!   guarantees, a monotonic block counter, and an append-only tx log
//! - Two-phase operations: synchronous `submit_*` validation followed by an
//!   async `confirm_*` that models confirmation latency and commits
//!   atomically
//! - Snapshot persistence through a `pv-store` slot, with deterministic
//!   replay of the persisted state into a fresh ledger

pub mod config;
pub mod error;
pub mod records;
pub mod simulated;
pub mod snapshot;

pub use config::{LatencyWindow, LedgerConfig};
pub use error::LedgerError;
pub use records::{CertificateToken, ProofRecord, TransactionRecord, TxKind};
pub use simulated::{
    MintReceipt, PendingMint, PendingRegister, RegisterReceipt, SimulatedLedger, CHAIN_SLOT,
};
pub use snapshot::{LedgerSnapshot, TX_LOG_RETENTION};
