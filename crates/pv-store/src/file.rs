use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::SlotStore;

/// File-backed slot store: one file per slot under a root directory.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a crash mid-write leaves either the previous payload or the
/// new one, never a torn file.
pub struct FileSlotStore {
    root: PathBuf,
}

impl FileSlotStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, slot: &str) -> StoreResult<PathBuf> {
        if slot.is_empty() || slot.contains(['/', '\\']) || slot == "." || slot == ".." {
            return Err(StoreError::InvalidSlotName(slot.to_string()));
        }
        Ok(self.root.join(slot))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.slot_path(slot)?;
        match fs::read(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slot: &str, payload: &[u8]) -> StoreResult<()> {
        let path = self.slot_path(slot)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(payload)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::PersistFailed {
            slot: slot.to_string(),
            reason: e.error.to_string(),
        })?;
        debug!(slot, bytes = payload.len(), "slot written");
        Ok(())
    }

    fn delete(&self, slot: &str) -> StoreResult<bool> {
        let path = self.slot_path(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for FileSlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSlotStore")
            .field("root", &self.root)
            .finish()
    }
}
