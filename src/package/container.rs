//! ZIP-based package container.
//!
//! Layout:
//! - `manifest.json`: format version, metadata and per-slot descriptors
//! - `audio.bin`, `cover.bin`: raw buffers, stored uncompressed
//! - `lyrics.txt`: UTF-8 lyric text, deflated
//!
//! Entries exist only for slots that are present.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{PackageContents, PackageStore};
use crate::constants::container::{
    AUDIO_ENTRY, COVER_ENTRY, FORMAT_VERSION, LYRICS_ENTRY, MANIFEST_ENTRY, MAX_ENTRY_BYTES,
};
use crate::constants::media::DEFAULT_AUDIO_FILE_NAME;
use crate::lyrics::LyricsAsset;
use crate::media::{restore_audio, restore_cover};
use crate::types::{CoverFormat, LyricFormat, Metadata};

/// Errors that can occur when reading or writing package containers
#[derive(Error, Debug)]
pub enum ContainerError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive itself is malformed
    #[error("Archive error: {0}")]
    Archive(#[from] ZipError),

    /// The manifest could not be encoded or decoded
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A required archive entry is absent
    #[error("Missing archive entry: {0}")]
    MissingEntry(&'static str),

    /// The manifest was written by a newer or unknown format revision
    #[error("Unsupported package format version {0}")]
    UnsupportedVersion(u32),

    /// An entry declares a size beyond what a package may hold
    #[error("Archive entry {name} declares {size} bytes, more than a package entry may hold")]
    EntryTooLarge {
        /// Entry name.
        name: &'static str,
        /// Declared uncompressed size.
        size: u64,
    },

    /// A media entry referenced by the manifest holds no bytes
    #[error("Archive entry {0} is empty")]
    EmptyEntry(&'static str),

    /// The lyrics entry is not valid UTF-8
    #[error("Lyrics are not valid UTF-8: {0}")]
    InvalidLyrics(#[from] std::string::FromUtf8Error),
}

/// Descriptor of the audio entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEntry {
    /// Name of the file the audio was imported from.
    pub source_filename: String,
}

/// Descriptor of the cover entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverEntry {
    /// Declared image format.
    pub format: CoverFormat,
    /// Pixel width, 0 when unknown.
    pub width: u32,
    /// Pixel height, 0 when unknown.
    pub height: u32,
}

/// Descriptor of the lyrics entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsEntry {
    /// Declared lyrics format.
    pub format: LyricFormat,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Container format revision.
    pub version: u32,
    /// RFC 3339 time of the save that produced this file.
    #[serde(default)]
    pub saved_at: Option<String>,
    /// Metadata record.
    #[serde(default)]
    pub metadata: Metadata,
    /// Audio descriptor, when the package has audio.
    #[serde(default)]
    pub audio: Option<AudioEntry>,
    /// Cover descriptor, when the package has a cover.
    #[serde(default)]
    pub cover: Option<CoverEntry>,
    /// Lyrics descriptor, when the package has lyrics.
    #[serde(default)]
    pub lyrics: Option<LyricsEntry>,
}

impl Manifest {
    fn describe(contents: &PackageContents) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            metadata: contents.metadata().clone(),
            audio: contents.audio().map(|a| AudioEntry {
                source_filename: a.source_filename().to_string(),
            }),
            cover: contents.cover().map(|c| CoverEntry {
                format: c.format(),
                width: c.width(),
                height: c.height(),
            }),
            lyrics: contents.lyrics().map(|l| LyricsEntry { format: l.format() }),
        }
    }
}

/// Package store writing ZIP archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackageStore;

impl ZipPackageStore {
    /// Create a new store.
    pub const fn new() -> Self {
        Self
    }

    /// Read only the manifest of the package at `path`.
    pub fn read_manifest(&self, path: &Path) -> Result<Manifest, ContainerError> {
        let mut archive = open_archive(path)?;
        read_manifest(&mut archive)
    }
}

impl PackageStore for ZipPackageStore {
    fn open(&self, path: &Path) -> Result<PackageContents, ContainerError> {
        let mut archive = open_archive(path)?;
        let manifest = read_manifest(&mut archive)?;

        let mut contents = PackageContents::new();
        contents.set_metadata(manifest.metadata);

        if let Some(entry) = manifest.audio {
            let data = read_media_entry(&mut archive, AUDIO_ENTRY)?;
            let name = if entry.source_filename.trim().is_empty() {
                DEFAULT_AUDIO_FILE_NAME.to_string()
            } else {
                entry.source_filename
            };
            contents.set_audio(Some(restore_audio(data, name)));
        }

        if let Some(entry) = manifest.cover {
            let data = read_media_entry(&mut archive, COVER_ENTRY)?;
            contents.set_cover(Some(restore_cover(entry.format, data, entry.width, entry.height)));
        }

        if let Some(entry) = manifest.lyrics {
            let text = String::from_utf8(read_entry(&mut archive, LYRICS_ENTRY)?)?;
            contents.set_lyrics(Some(LyricsAsset::new(text, entry.format)));
        }

        tracing::info!("Opened package {}", path.display());
        Ok(contents)
    }

    fn save(&self, contents: &PackageContents, path: &Path) -> Result<(), ContainerError> {
        let partial = partial_path(path);
        let result = write_archive(contents, &partial).and_then(|()| {
            fs::rename(&partial, path)?;
            Ok(())
        });

        if result.is_err() && partial.exists() {
            if let Err(e) = fs::remove_file(&partial) {
                tracing::warn!("Failed to remove partial package {}: {e}", partial.display());
            }
        }
        result?;

        tracing::info!("Saved package {}", path.display());
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "Music package (zip)"
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ContainerError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Manifest, ContainerError> {
    let bytes = read_entry(archive, MANIFEST_ENTRY)?;
    let manifest: Manifest = serde_json::from_slice(&bytes)?;
    if manifest.version == 0 || manifest.version > FORMAT_VERSION {
        return Err(ContainerError::UnsupportedVersion(manifest.version));
    }
    Ok(manifest)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &'static str,
) -> Result<Vec<u8>, ContainerError> {
    let mut entry = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => ContainerError::MissingEntry(name),
        other => ContainerError::Archive(other),
    })?;
    if entry.size() > MAX_ENTRY_BYTES {
        return Err(ContainerError::EntryTooLarge {
            name,
            size: entry.size(),
        });
    }
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Audio and cover buffers must not be empty.
fn read_media_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &'static str,
) -> Result<Vec<u8>, ContainerError> {
    let data = read_entry(archive, name)?;
    if data.is_empty() {
        return Err(ContainerError::EmptyEntry(name));
    }
    Ok(data)
}

fn write_archive(contents: &PackageContents, path: &Path) -> Result<(), ContainerError> {
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(File::create(path)?);

    zip.start_file(MANIFEST_ENTRY, deflated)?;
    zip.write_all(&serde_json::to_vec_pretty(&Manifest::describe(contents))?)?;

    if let Some(audio) = contents.audio() {
        let size = audio.data().len() as u64;
        if size > MAX_ENTRY_BYTES {
            return Err(ContainerError::EntryTooLarge { name: AUDIO_ENTRY, size });
        }
        zip.start_file(AUDIO_ENTRY, stored)?;
        zip.write_all(audio.data())?;
    }

    if let Some(cover) = contents.cover() {
        zip.start_file(COVER_ENTRY, stored)?;
        zip.write_all(cover.data())?;
    }

    if let Some(lyrics) = contents.lyrics() {
        zip.start_file(LYRICS_ENTRY, deflated)?;
        zip.write_all(lyrics.text().as_bytes())?;
    }

    zip.finish()?.sync_all()?;
    Ok(())
}

/// Sibling path the archive is written to before it replaces `path`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
