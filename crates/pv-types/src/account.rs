use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a registering or owning party.
///
/// Free-form string so both backends stay interchangeable: the real chain
/// supplies wallet addresses, the simulated ledger stamps a fixed
/// placeholder identity.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

/// Placeholder identity used for every simulated registration and mint.
const SIMULATED_ACCOUNT: &str = "0xSimulated1234567890abcdef1234567890abcdef";

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The fixed placeholder identity for simulated mode.
    pub fn simulated() -> Self {
        Self(SIMULATED_ACCOUNT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
