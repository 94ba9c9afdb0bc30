use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Mode is `Real` but no chain session has been established.
    /// Recoverable: connect a session or switch to simulated mode.
    #[error("no chain session available; connect a wallet or switch to simulated mode")]
    BackendUnavailable,

    #[error("ledger rejection: {0}")]
    Ledger(#[from] pv_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] pv_store::StoreError),

    /// Failure reported by the external chain client.
    #[error("chain client error: {0}")]
    Client(String),
}

pub type ChainResult<T> = Result<T, ChainError>;
