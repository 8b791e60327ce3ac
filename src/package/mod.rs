//! Music package model and its on-disk container.
//!
//! [`PackageModel`] is the editable unit. It reads and writes through a
//! [`PackageStore`], which owns the container byte layout.

pub mod container;
pub mod model;

use std::path::Path;

use crate::lyrics::LyricsAsset;
use crate::media::{AudioAsset, CoverAsset};
use crate::types::Metadata;

pub use container::{ContainerError, ZipPackageStore};
pub use model::{PackageModel, PackageState};

/// Snapshot of the four slots exchanged with a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageContents {
    metadata: Metadata,
    audio: Option<AudioAsset>,
    cover: Option<CoverAsset>,
    lyrics: Option<LyricsAsset>,
}

impl PackageContents {
    /// Create contents with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata record.
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Audio slot.
    pub const fn audio(&self) -> Option<&AudioAsset> {
        self.audio.as_ref()
    }

    /// Cover slot.
    pub const fn cover(&self) -> Option<&CoverAsset> {
        self.cover.as_ref()
    }

    /// Lyrics slot.
    pub const fn lyrics(&self) -> Option<&LyricsAsset> {
        self.lyrics.as_ref()
    }

    /// Replace the metadata record.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    /// Replace or clear the audio slot.
    pub fn set_audio(&mut self, audio: Option<AudioAsset>) {
        self.audio = audio;
    }

    /// Replace or clear the cover slot.
    pub fn set_cover(&mut self, cover: Option<CoverAsset>) {
        self.cover = cover;
    }

    /// Replace or clear the lyrics slot.
    pub fn set_lyrics(&mut self, lyrics: Option<LyricsAsset>) {
        self.lyrics = lyrics;
    }
}

/// Container collaborator: reads and writes whole packages.
///
/// Implementations decide the byte layout. `open` must not return partial
/// contents; `save` writes all four slots at once.
pub trait PackageStore {
    /// Read the package at `path`.
    fn open(&self, path: &Path) -> Result<PackageContents, ContainerError>;

    /// Write `contents` to `path`, replacing any existing file.
    fn save(&self, contents: &PackageContents, path: &Path) -> Result<(), ContainerError>;

    /// Get the format name (for display purposes).
    fn format_name(&self) -> &'static str;
}
