//! Audio and cover assets.
//!
//! Pure transformations from `(bytes, file name)` pairs handed over by a file
//! picker or drag-and-drop into typed assets, plus the extension tables and
//! size formatting the editor displays next to them.

pub mod preview;

use crate::constants::media::{DEFAULT_AUDIO_CONTENT_TYPE, DEFAULT_AUDIO_FILE_NAME, SIZE_UNITS};
use crate::error::{Error, Result};
use crate::types::{extension_of, AssetSlot, CoverFormat};

/// Audio slot of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    data: Vec<u8>,
    source_filename: String,
}

impl AudioAsset {
    /// Raw audio bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Name of the file the audio came from.
    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }

    /// MIME type inferred from the source file name.
    pub fn content_type(&self) -> &'static str {
        infer_content_type(&self.source_filename)
    }

    /// Human-readable buffer size.
    pub fn display_size(&self) -> String {
        format_byte_size(self.data.len() as u64)
    }
}

/// Cover slot of a package.
///
/// Width and height describe `data` and only travel together with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverAsset {
    format: CoverFormat,
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl CoverAsset {
    /// Declared image format.
    pub const fn format(&self) -> CoverFormat {
        self.format
    }

    /// Raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel width, 0 when unknown.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height, 0 when unknown.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Info line such as `600 × 600 • PNG • 1.5 KB`.
    pub fn info(&self) -> String {
        format!(
            "{} × {} • {} • {}",
            self.width,
            self.height,
            self.format,
            format_byte_size(self.data.len() as u64)
        )
    }
}

/// Build an audio asset from imported bytes.
///
/// A missing or blank file name is replaced by the default audio name.
pub fn import_audio(data: Vec<u8>, file_name: Option<&str>) -> Result<AudioAsset> {
    import_audio_named(data, file_name, DEFAULT_AUDIO_FILE_NAME)
}

/// Like [`import_audio`] with a caller-chosen fallback name.
pub fn import_audio_named(
    data: Vec<u8>,
    file_name: Option<&str>,
    fallback_name: &str,
) -> Result<AudioAsset> {
    if data.is_empty() {
        return Err(Error::EmptyInput { slot: AssetSlot::Audio });
    }

    let source_filename = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback_name)
        .to_string();

    tracing::debug!("Imported audio {source_filename} ({})", format_byte_size(data.len() as u64));
    Ok(AudioAsset { data, source_filename })
}

/// Build a cover asset from imported bytes and probed dimensions.
pub fn import_cover(data: Vec<u8>, file_name: &str, width: u32, height: u32) -> Result<CoverAsset> {
    if data.is_empty() {
        return Err(Error::EmptyInput { slot: AssetSlot::Cover });
    }

    let cover = CoverAsset {
        format: infer_image_format(file_name),
        data,
        width,
        height,
    };
    tracing::debug!("Imported cover {file_name}: {}", cover.info());
    Ok(cover)
}

/// Rebuild assets read back from a container, trusting the stored fields.
pub(crate) const fn restore_audio(data: Vec<u8>, source_filename: String) -> AudioAsset {
    AudioAsset { data, source_filename }
}

pub(crate) const fn restore_cover(
    format: CoverFormat,
    data: Vec<u8>,
    width: u32,
    height: u32,
) -> CoverAsset {
    CoverAsset { format, data, width, height }
}

/// MIME type for an audio file name. Unknown extensions map to `audio/mpeg`.
pub fn infer_content_type(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        _ => DEFAULT_AUDIO_CONTENT_TYPE,
    }
}

/// Image format for a cover file name. Unknown extensions map to JPEG.
pub fn infer_image_format(file_name: &str) -> CoverFormat {
    CoverFormat::from_file_name(file_name)
}

/// Render a byte count as `B`/`KB`/`MB`/`GB` with at most two fraction digits.
///
/// Fractions are truncated, so below the GB cap the number shown is always
/// under 1024.
#[allow(clippy::cast_precision_loss)]
pub fn format_byte_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let truncated = (size * 100.0).floor() / 100.0;
    let text = format!("{truncated:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {}", SIZE_UNITS[unit])
}
