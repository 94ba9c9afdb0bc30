//! Durable slot storage for ProofVault.
//!
//! This crate implements the persistence boundary of the simulated ledger:
//! named slots holding opaque byte payloads. It owns no business logic --
//! serialization stays with the caller, the store only moves bytes.
//!
//! # Storage Backends
//!
//! All backends implement the [`SlotStore`] trait:
//!
//! - [`InMemorySlotStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileSlotStore`] -- one file per slot, atomic tempfile-then-rename writes
//!
//! # Design Rules
//!
//! 1. A slot holds at most one payload; writes replace it whole.
//! 2. Writes are atomic: a reader never observes a torn payload.
//! 3. Reading an absent slot returns `Ok(None)`, not an error.
//! 4. All I/O errors are propagated; the caller decides whether durability
//!    failure may fail its own operation.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileSlotStore;
pub use memory::InMemorySlotStore;
pub use traits::SlotStore;
