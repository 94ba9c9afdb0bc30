//! Foundation types for ProofVault.
//!
//! This crate provides the identity and digest types used throughout the
//! ProofVault system. Every other `pv-*` crate depends on `pv-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Fixed 32-byte content digest, interchanged as a
//!   `0x`-prefixed 64-hex-character string
//! - [`TxHash`] — Synthetic 32-byte transaction identifier
//! - [`AccountId`] — Free-form party identity (placeholder in simulated mode)
//! - [`BackendMode`] — Simulated vs. real backend selection

pub mod account;
pub mod error;
pub mod hash;
pub mod mode;

pub use account::AccountId;
pub use error::TypeError;
pub use hash::{ContentHash, TxHash};
pub use mode::BackendMode;
