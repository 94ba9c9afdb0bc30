//! Backend selection and the operation facade for ProofVault.
//!
//! This crate presents one uniform interface — register, mint, exists,
//! fetch record — and hides whether the in-process [`pv_ledger`] core or an
//! external chain client services the call. Both backends normalize into
//! the [`OperationStatus`] tagged union, so switching between simulated and
//! real mode is transparent to callers.

pub mod client;
pub mod error;
pub mod facade;
pub mod mode;
pub mod status;

pub use client::{ChainClient, Confirmation, PendingHandle};
pub use error::{ChainError, ChainResult};
pub use facade::ProofChain;
pub use mode::{ModeSelector, MODE_SLOT};
pub use status::{FailureKind, OperationStatus, Outcome};
