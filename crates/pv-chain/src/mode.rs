use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use pv_store::{SlotStore, StoreResult};
use pv_types::BackendMode;

/// Durable slot holding the backend mode preference.
pub const MODE_SLOT: &str = "backend-mode";

/// Process-wide backend mode flag.
///
/// Defaults to `Simulated` unless the durable preference says otherwise.
/// `set` writes the preference synchronously before updating the in-memory
/// value; the facade captures the mode once at the start of each logical
/// operation, so a mode change never races an operation mid-flight.
pub struct ModeSelector {
    store: Arc<dyn SlotStore>,
    mode: RwLock<BackendMode>,
}

impl ModeSelector {
    /// Open the selector, reading the durable preference.
    ///
    /// An absent, unreadable, or unparsable preference yields the default
    /// `Simulated` mode.
    pub fn open(store: Arc<dyn SlotStore>) -> Self {
        let mode = match store.read(MODE_SLOT) {
            Ok(Some(bytes)) => match std::str::from_utf8(&bytes)
                .map_err(|e| e.to_string())
                .and_then(|s| s.trim().parse::<BackendMode>().map_err(|e| e.to_string()))
            {
                Ok(mode) => mode,
                Err(e) => {
                    warn!(error = %e, "malformed backend mode preference; defaulting to simulated");
                    BackendMode::Simulated
                }
            },
            Ok(None) => BackendMode::Simulated,
            Err(e) => {
                warn!(error = %e, "backend mode preference unreadable; defaulting to simulated");
                BackendMode::Simulated
            }
        };
        debug!(%mode, "backend mode selected");
        Self {
            store,
            mode: RwLock::new(mode),
        }
    }

    pub fn get(&self) -> BackendMode {
        *self.mode.read().expect("mode lock poisoned")
    }

    /// Persist the preference, then update the in-memory flag.
    ///
    /// If the durable write fails, the in-memory mode is left unchanged.
    pub fn set(&self, mode: BackendMode) -> StoreResult<()> {
        self.store.write(MODE_SLOT, mode.as_str().as_bytes())?;
        *self.mode.write().expect("mode lock poisoned") = mode;
        debug!(%mode, "backend mode changed");
        Ok(())
    }
}

impl std::fmt::Debug for ModeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeSelector")
            .field("mode", &self.get())
            .finish()
    }
}
