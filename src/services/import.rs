//! Async file reads for asset imports.
//!
//! At most one read may be in flight per slot; a second request for a busy
//! slot fails fast instead of queueing.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{Error, Result};
use crate::types::AssetSlot;

/// Bytes and name of a file picked for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    /// File contents.
    pub bytes: Vec<u8>,
    /// File name without directories.
    pub file_name: String,
}

impl ImportedFile {
    /// Decode the contents as text, dropping a UTF-8 byte order mark.
    pub fn into_text(self) -> String {
        let text = String::from_utf8_lossy(&self.bytes);
        text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string()
    }
}

/// Proof that a slot's import is in progress. Dropping it frees the slot.
#[derive(Debug)]
pub struct SlotGuard {
    slot: AssetSlot,
    _guard: OwnedMutexGuard<()>,
}

impl SlotGuard {
    /// Slot this guard holds.
    pub const fn slot(&self) -> AssetSlot {
        self.slot
    }
}

/// Reads import files, one in flight per slot.
///
/// Cheap to clone; clones share the same slot gates.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    gates: [Arc<Mutex<()>>; 3],
}

impl Importer {
    /// Create an importer with every slot free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `slot` for the duration of an import.
    pub fn begin(&self, slot: AssetSlot) -> Result<SlotGuard> {
        let gate = Arc::clone(&self.gates[slot.index()]);
        let guard = gate
            .try_lock_owned()
            .map_err(|_| Error::ImportInFlight(slot))?;
        Ok(SlotGuard { slot, _guard: guard })
    }

    /// Check whether an import into `slot` is in progress.
    pub fn is_busy(&self, slot: AssetSlot) -> bool {
        self.gates[slot.index()].try_lock().is_err()
    }

    /// Read `path` for `slot`, validating its extension and size.
    pub async fn read_file(&self, slot: AssetSlot, path: &Path) -> Result<ImportedFile> {
        let _guard = self.begin(slot)?;

        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        if !slot.accepts(&file_name) {
            return Err(Error::UnsupportedFile { slot, file_name });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(e, path.to_path_buf()))?;
        if bytes.is_empty() {
            return Err(Error::EmptyInput { slot });
        }

        tracing::debug!("Read {} bytes for {slot} import from {}", bytes.len(), path.display());
        Ok(ImportedFile { bytes, file_name })
    }
}
