//! Temporary audio files handed to the playback engine.
//!
//! The engine plays from a content-typed file, so the in-memory audio buffer
//! is written out once per load/import. A [`PreviewFile`] owns that file and
//! deletes it when dropped.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::AudioAsset;
use crate::error::{Error, Result};

/// A preview copy of an audio asset on disk.
#[derive(Debug)]
pub struct PreviewFile {
    path: PathBuf,
    content_type: &'static str,
}

impl PreviewFile {
    /// Write `audio` into `dir` under a unique, sanitized name.
    pub fn create(dir: &Path, audio: &AudioAsset) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;

        let name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(audio.source_filename())
        );
        let path = dir.join(name);
        fs::write(&path, audio.data()).map_err(|e| Error::io(e, path.clone()))?;

        tracing::debug!("Created preview file {}", path.display());
        Ok(Self {
            path,
            content_type: audio.content_type(),
        })
    }

    /// Location of the preview file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// MIME type to announce to the playback engine.
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }
}

impl Drop for PreviewFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Released preview file {}", self.path.display()),
            Err(e) => tracing::warn!("Failed to remove preview file {}: {e}", self.path.display()),
        }
    }
}

/// Replace characters that are not valid in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    const INVALID: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_control() || INVALID.contains(&c) { '_' } else { c })
        .collect();
    if cleaned.trim_matches(['.', ' ']).is_empty() {
        "audio".to_string()
    } else {
        cleaned
    }
}
