//! Editable package state machine.
//!
//! `Empty` (nothing open) → `Clean` on create/load, `Clean` ⇄ `Dirty` on
//! edits and saves. Every mutation needs an open package.

use std::path::{Path, PathBuf};

use super::{PackageContents, PackageStore, ZipPackageStore};
use crate::error::{Error, Result};
use crate::lyrics::LyricsAsset;
use crate::media::{AudioAsset, CoverAsset};
use crate::types::{LyricFormat, Metadata, MetadataField, EMPTY_METADATA};

/// Lifecycle state of a [`PackageModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    /// No package is open.
    Empty,
    /// A package is open with no unsaved edits.
    Clean,
    /// A package is open with unsaved edits.
    Dirty,
}

#[derive(Debug)]
struct OpenPackage {
    contents: PackageContents,
    path: Option<PathBuf>,
    dirty: bool,
}

impl OpenPackage {
    const fn new(contents: PackageContents, path: Option<PathBuf>) -> Self {
        Self { contents, path, dirty: false }
    }
}

/// The package being edited.
///
/// Owns all asset buffers exclusively. Replacing the package (create/load)
/// drops the previous buffers without merging.
#[derive(Debug)]
pub struct PackageModel<S = ZipPackageStore> {
    store: S,
    open: Option<OpenPackage>,
}

impl PackageModel<ZipPackageStore> {
    /// Create an empty model backed by the ZIP container.
    pub const fn new() -> Self {
        Self::with_store(ZipPackageStore::new())
    }
}

impl Default for PackageModel<ZipPackageStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PackageStore> PackageModel<S> {
    /// Create an empty model backed by `store`.
    pub const fn with_store(store: S) -> Self {
        Self { store, open: None }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> PackageState {
        match &self.open {
            None => PackageState::Empty,
            Some(p) if p.dirty => PackageState::Dirty,
            Some(_) => PackageState::Clean,
        }
    }

    /// Check if a package is open.
    pub const fn has_package(&self) -> bool {
        self.open.is_some()
    }

    /// Check if there are unsaved edits.
    pub const fn is_dirty(&self) -> bool {
        matches!(self.state(), PackageState::Dirty)
    }

    /// Path of the last load or save, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.open.as_ref().and_then(|p| p.path.as_deref())
    }

    /// Start a fresh, empty package, discarding the current one unsaved.
    pub fn create_new(&mut self) {
        tracing::info!("Creating new package");
        self.open = Some(OpenPackage::new(PackageContents::new(), None));
    }

    /// Replace the current package with the one stored at `path`.
    ///
    /// On failure the current package is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Loading {} from {}", self.store.format_name(), path.display());
        let contents = self.store.open(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;
        self.open = Some(OpenPackage::new(contents, Some(path.to_path_buf())));
        Ok(())
    }

    /// Write all four slots to `path` and make it the current path.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoPackageOpen)?;
        tracing::info!("Saving {} to {}", self.store.format_name(), path.display());

        self.store
            .save(&open.contents, path)
            .map_err(|source| Error::Save {
                path: path.to_path_buf(),
                source,
            })?;

        open.path = Some(path.to_path_buf());
        open.dirty = false;
        Ok(())
    }

    /// Save to the current path.
    pub fn save_current(&mut self) -> Result<PathBuf> {
        let path = self
            .open
            .as_ref()
            .ok_or(Error::NoPackageOpen)?
            .path
            .clone()
            .ok_or(Error::NoSavePath)?;
        self.save(&path)?;
        Ok(path)
    }

    /// Close the package, releasing its buffers.
    pub fn close(&mut self) {
        if self.open.take().is_some() {
            tracing::debug!("Closed package");
        }
    }

    /// Metadata of the open package, or an all-empty record.
    pub fn metadata(&self) -> &Metadata {
        self.open
            .as_ref()
            .map_or(&EMPTY_METADATA, |p| p.contents.metadata())
    }

    /// Audio slot, absent when empty or no package is open.
    pub fn audio(&self) -> Option<&AudioAsset> {
        self.open.as_ref().and_then(|p| p.contents.audio())
    }

    /// Cover slot, absent when empty or no package is open.
    pub fn cover(&self) -> Option<&CoverAsset> {
        self.open.as_ref().and_then(|p| p.contents.cover())
    }

    /// Lyrics slot, absent when empty or no package is open.
    pub fn lyrics(&self) -> Option<&LyricsAsset> {
        self.open.as_ref().and_then(|p| p.contents.lyrics())
    }

    /// Replace the whole metadata record.
    pub fn set_metadata(&mut self, metadata: Metadata) -> Result<()> {
        self.mutate(|c| {
            c.set_metadata(metadata);
            true
        })
        .map(drop)
    }

    /// Apply a text-box edit to one metadata field.
    ///
    /// Returns `Ok(false)` when the value is unchanged or could not be coerced;
    /// the package is only marked dirty when the record changed.
    pub fn edit_field(&mut self, field: MetadataField, text: &str) -> Result<bool> {
        self.mutate(|c| {
            let mut metadata = c.metadata().clone();
            let changed = metadata.set_field(field, text);
            if changed {
                c.set_metadata(metadata);
            }
            changed
        })
    }

    /// Put `audio` into the audio slot.
    pub fn set_audio(&mut self, audio: AudioAsset) -> Result<()> {
        tracing::debug!("Setting audio: {}", audio.source_filename());
        self.mutate(|c| {
            c.set_audio(Some(audio));
            true
        })
        .map(drop)
    }

    /// Empty the audio slot.
    pub fn clear_audio(&mut self) -> Result<bool> {
        self.mutate(|c| {
            let had = c.audio().is_some();
            c.set_audio(None);
            had
        })
    }

    /// Put `cover` into the cover slot.
    pub fn set_cover(&mut self, cover: CoverAsset) -> Result<()> {
        tracing::debug!("Setting cover: {}", cover.info());
        self.mutate(|c| {
            c.set_cover(Some(cover));
            true
        })
        .map(drop)
    }

    /// Empty the cover slot: buffer, format and dimensions go together.
    pub fn clear_cover(&mut self) -> Result<bool> {
        self.mutate(|c| {
            let had = c.cover().is_some();
            c.set_cover(None);
            had
        })
    }

    /// Put `lyrics` into the lyrics slot.
    pub fn set_lyrics(&mut self, lyrics: LyricsAsset) -> Result<()> {
        tracing::debug!("Setting lyrics: {}", lyrics.format());
        self.mutate(|c| {
            c.set_lyrics(Some(lyrics));
            true
        })
        .map(drop)
    }

    /// Empty the lyrics slot.
    pub fn clear_lyrics(&mut self) -> Result<bool> {
        self.mutate(|c| {
            let had = c.lyrics().is_some();
            c.set_lyrics(None);
            had
        })
    }

    /// Replace the lyric text, reparsing synchronously.
    ///
    /// Creates the lyrics slot (format `None`) on the first non-empty edit.
    pub fn set_lyrics_text(&mut self, text: &str) -> Result<bool> {
        self.mutate(|c| match c.lyrics() {
            Some(current) => {
                let mut lyrics = current.clone();
                let changed = lyrics.set_text(text);
                if changed {
                    c.set_lyrics(Some(lyrics));
                }
                changed
            }
            None if text.is_empty() => false,
            None => {
                c.set_lyrics(Some(LyricsAsset::new(text, LyricFormat::None)));
                true
            }
        })
    }

    /// Change the declared lyric format, reparsing synchronously.
    pub fn set_lyrics_format(&mut self, format: LyricFormat) -> Result<bool> {
        self.mutate(|c| {
            let mut lyrics = c.lyrics().cloned().unwrap_or_default();
            let changed = lyrics.set_format(format);
            if changed {
                c.set_lyrics(Some(lyrics));
            }
            changed
        })
    }

    /// Run `edit` against the open contents, marking the package dirty when it
    /// reports a change.
    fn mutate<F>(&mut self, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut PackageContents) -> bool,
    {
        let open = self.open.as_mut().ok_or(Error::NoPackageOpen)?;
        let changed = edit(&mut open.contents);
        open.dirty |= changed;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::media::{import_audio, import_cover};
    use crate::package::ContainerError;
    use std::cell::RefCell;

    /// In-memory store recording saves, optionally failing every call.
    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<PackageContents>>,
        fail: bool,
    }

    impl PackageStore for MemoryStore {
        fn open(&self, _path: &Path) -> std::result::Result<PackageContents, ContainerError> {
            if self.fail {
                return Err(ContainerError::MissingEntry("manifest.json"));
            }
            self.saved
                .borrow()
                .clone()
                .ok_or(ContainerError::MissingEntry("manifest.json"))
        }

        fn save(
            &self,
            contents: &PackageContents,
            _path: &Path,
        ) -> std::result::Result<(), ContainerError> {
            if self.fail {
                return Err(ContainerError::Io(std::io::Error::other("disk full")));
            }
            *self.saved.borrow_mut() = Some(contents.clone());
            Ok(())
        }

        fn format_name(&self) -> &'static str {
            "memory"
        }
    }

    #[test]
    fn test_new_package_is_clean_and_empty() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        assert_eq!(model.state(), PackageState::Empty);
        assert!(model.metadata().is_empty());
        assert!(model.audio().is_none());

        model.create_new();
        assert_eq!(model.state(), PackageState::Clean);
        assert!(model.audio().is_none());
        assert!(model.cover().is_none());
        assert!(model.lyrics().is_none());
        assert!(model.metadata().is_empty());
        assert!(model.current_path().is_none());
    }

    #[test]
    fn test_mutations_require_open_package() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        assert!(matches!(model.set_metadata(Metadata::new()), Err(Error::NoPackageOpen)));
        assert!(matches!(
            model.edit_field(MetadataField::Title, "x"),
            Err(Error::NoPackageOpen)
        ));
        assert!(matches!(model.set_lyrics_text("x"), Err(Error::NoPackageOpen)));
        assert!(matches!(model.save(Path::new("a.mpak")), Err(Error::NoPackageOpen)));
        assert_eq!(model.state(), PackageState::Empty);
    }

    #[test]
    fn test_edit_then_save_cycles_dirty_flag() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();

        model.set_audio(import_audio(vec![1, 2], Some("a.mp3")).unwrap()).unwrap();
        assert_eq!(model.state(), PackageState::Dirty);

        model.save(Path::new("out.mpak")).unwrap();
        assert_eq!(model.state(), PackageState::Clean);
        assert_eq!(model.current_path(), Some(Path::new("out.mpak")));

        model.set_cover(import_cover(vec![3], "c.png", 1, 1).unwrap()).unwrap();
        assert!(model.is_dirty());
        assert_eq!(model.save_current().unwrap(), PathBuf::from("out.mpak"));
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_rejected_field_edit_keeps_clean() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();

        assert!(!model.edit_field(MetadataField::SampleRateHz, "44.1k").unwrap());
        assert_eq!(model.state(), PackageState::Clean);

        assert!(model.edit_field(MetadataField::SampleRateHz, "44100").unwrap());
        assert_eq!(model.metadata().sample_rate_hz, 44_100);
        assert_eq!(model.state(), PackageState::Dirty);
    }

    #[test]
    fn test_failed_save_leaves_state() {
        let store = MemoryStore { fail: true, ..Default::default() };
        let mut model = PackageModel::with_store(store);
        model.create_new();
        model.edit_field(MetadataField::Title, "t").unwrap();

        let err = model.save(Path::new("x.mpak")).unwrap_err();
        assert!(matches!(err, Error::Save { .. }));
        assert!(model.is_dirty());
        assert!(model.current_path().is_none());
        assert_eq!(model.metadata().title, "t");
    }

    #[test]
    fn test_failed_load_is_all_or_nothing() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();
        model.edit_field(MetadataField::Artist, "kept").unwrap();

        let err = model.load(Path::new("nothing-saved.mpak")).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert_eq!(model.metadata().artist, "kept");
        assert!(model.is_dirty());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();
        model.edit_field(MetadataField::Title, "saved").unwrap();
        model.save(Path::new("p.mpak")).unwrap();

        model.set_audio(import_audio(vec![1], None).unwrap()).unwrap();
        model.load(Path::new("p.mpak")).unwrap();

        assert_eq!(model.state(), PackageState::Clean);
        assert_eq!(model.metadata().title, "saved");
        assert!(model.audio().is_none());
    }

    #[test]
    fn test_lyrics_text_edits_reparse() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();

        assert!(!model.set_lyrics_text("").unwrap());
        assert_eq!(model.state(), PackageState::Clean);

        assert!(model.set_lyrics_format(LyricFormat::LrcLineByLine).unwrap());
        assert!(model.set_lyrics_text("[00:02.00]b\n[00:01.00]a").unwrap());
        let lyrics = model.lyrics().unwrap();
        assert_eq!(lyrics.lines().len(), 2);
        assert_eq!(lyrics.lines()[0].text, "a");

        assert!(model.clear_lyrics().unwrap());
        assert!(model.lyrics().is_none());
    }

    #[test]
    fn test_clear_cover_reports_presence() {
        let mut model = PackageModel::with_store(MemoryStore::default());
        model.create_new();
        assert!(!model.clear_cover().unwrap());
        assert_eq!(model.state(), PackageState::Clean);

        model.set_cover(import_cover(vec![1], "c.bmp", 10, 20).unwrap()).unwrap();
        model.save(Path::new("c.mpak")).unwrap();
        assert!(model.clear_cover().unwrap());
        assert!(model.cover().is_none());
        assert!(model.is_dirty());
    }
}
