//! Core type definitions shared by the package model and its services.
//!
//! Enumerations with fixed extension tables live here so the media store,
//! the lyrics engine and the container codec agree on a single spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the asset slots a package carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSlot {
    /// The audio stream.
    Audio,
    /// The cover image.
    Cover,
    /// The lyrics track.
    Lyrics,
}

impl AssetSlot {
    /// Returns all slots in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Audio, Self::Cover, Self::Lyrics]
    }

    /// Returns the lowercase name of this slot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Cover => "cover",
            Self::Lyrics => "lyrics",
        }
    }

    /// Position of this slot in [`AssetSlot::all`].
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Audio => 0,
            Self::Cover => 1,
            Self::Lyrics => 2,
        }
    }

    /// File extensions (lowercase, without dot) accepted for this slot.
    #[must_use]
    pub const fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Audio => &["mp3", "flac", "wav", "ogg", "m4a", "aac"],
            Self::Cover => &["jpg", "jpeg", "png", "bmp", "webp"],
            Self::Lyrics => &["lrc", "srt", "ass"],
        }
    }

    /// Check whether `file_name` carries an extension this slot accepts.
    pub fn accepts(self, file_name: &str) -> bool {
        extension_of(file_name)
            .is_some_and(|ext| self.accepted_extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased extension of a file name, without the dot.
pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Declared encoding of a cover image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverFormat {
    /// JPEG, also the fallback for unknown extensions.
    #[default]
    Jpeg,
    /// PNG.
    Png,
    /// WebP.
    WebP,
    /// Windows bitmap.
    Bmp,
}

impl CoverFormat {
    /// Infer the format from a file name's extension. Unknown extensions map to JPEG.
    pub fn from_file_name(file_name: &str) -> Self {
        match extension_of(file_name).as_deref() {
            Some("png") => Self::Png,
            Some("webp") => Self::WebP,
            Some("bmp") => Self::Bmp,
            _ => Self::Jpeg,
        }
    }

    /// Returns the display name of this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
            Self::Bmp => "BMP",
        }
    }
}

impl fmt::Display for CoverFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared kind of a lyrics track.
///
/// The three `Lrc*` variants form the synchronized sub-range whose text is
/// parsed into timed lines; every other variant is stored verbatim only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LyricFormat {
    /// No lyrics format selected.
    #[default]
    None,
    /// LRC with ESLyric extensions.
    LrcEsLyric,
    /// Word-by-word timed LRC.
    LrcWordByWord,
    /// Line-by-line timed LRC.
    LrcLineByLine,
    /// `SubRip` subtitles.
    Srt,
    /// Advanced `SubStation` Alpha subtitles.
    Ass,
}

impl LyricFormat {
    /// Returns all formats in selector order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::LrcEsLyric,
            Self::LrcWordByWord,
            Self::LrcLineByLine,
            Self::Srt,
            Self::Ass,
        ]
    }

    /// Whether text in this format is parsed into timestamped lines.
    #[must_use]
    pub const fn is_synchronized(self) -> bool {
        matches!(self, Self::LrcEsLyric | Self::LrcWordByWord | Self::LrcLineByLine)
    }

    /// Format implied by a lyric file's extension, if any.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match extension_of(file_name).as_deref() {
            Some("lrc") => Some(Self::LrcLineByLine),
            Some("srt") => Some(Self::Srt),
            Some("ass") => Some(Self::Ass),
            _ => None,
        }
    }

    /// Returns the human-readable name of this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::LrcEsLyric => "LRC (ESLyric)",
            Self::LrcWordByWord => "LRC (word by word)",
            Self::LrcLineByLine => "LRC (line by line)",
            Self::Srt => "SRT",
            Self::Ass => "ASS",
        }
    }
}

impl fmt::Display for LyricFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptive tags of a package.
///
/// Every field is independently optional: empty text or zero means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Track title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// Genre.
    pub genre: String,
    /// Release year, free text.
    pub year: String,
    /// Free-form comment.
    pub comment: String,
    /// Duration in milliseconds, 0 when unknown.
    pub duration_ms: u32,
    /// Bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Number of audio channels.
    pub channel_count: u16,
}

/// Metadata record returned for an empty package.
pub(crate) static EMPTY_METADATA: Metadata = Metadata::new();

impl Metadata {
    /// Create a record with every field empty or zero.
    pub const fn new() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            genre: String::new(),
            year: String::new(),
            comment: String::new(),
            duration_ms: 0,
            bitrate_kbps: 0,
            sample_rate_hz: 0,
            channel_count: 0,
        }
    }

    /// Check if every field is empty or zero.
    pub fn is_empty(&self) -> bool {
        *self == EMPTY_METADATA
    }

    /// Editable text of a field. Zero numeric fields render as an empty string.
    pub fn field_text(&self, field: MetadataField) -> String {
        let number = |n: u32| if n == 0 { String::new() } else { n.to_string() };
        match field {
            MetadataField::Title => self.title.clone(),
            MetadataField::Artist => self.artist.clone(),
            MetadataField::Album => self.album.clone(),
            MetadataField::Genre => self.genre.clone(),
            MetadataField::Year => self.year.clone(),
            MetadataField::Comment => self.comment.clone(),
            MetadataField::DurationMs => number(self.duration_ms),
            MetadataField::BitrateKbps => number(self.bitrate_kbps),
            MetadataField::SampleRateHz => number(self.sample_rate_hz),
            MetadataField::ChannelCount => number(u32::from(self.channel_count)),
        }
    }

    /// Apply an edit coming from a text box.
    ///
    /// Numeric fields accept blank text (reset to 0) or an unsigned integer;
    /// anything else leaves the previous value in place. Returns whether the
    /// record changed.
    pub fn set_field(&mut self, field: MetadataField, text: &str) -> bool {
        fn coerce<T: std::str::FromStr + Default>(text: &str) -> Option<T> {
            let text = text.trim();
            if text.is_empty() {
                Some(T::default())
            } else {
                text.parse().ok()
            }
        }
        fn replace<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
            match value {
                Some(v) if *slot != v => {
                    *slot = v;
                    true
                }
                _ => false,
            }
        }

        match field {
            MetadataField::Title => replace(&mut self.title, Some(text.to_string())),
            MetadataField::Artist => replace(&mut self.artist, Some(text.to_string())),
            MetadataField::Album => replace(&mut self.album, Some(text.to_string())),
            MetadataField::Genre => replace(&mut self.genre, Some(text.to_string())),
            MetadataField::Year => replace(&mut self.year, Some(text.to_string())),
            MetadataField::Comment => replace(&mut self.comment, Some(text.to_string())),
            MetadataField::DurationMs => replace(&mut self.duration_ms, coerce(text)),
            MetadataField::BitrateKbps => replace(&mut self.bitrate_kbps, coerce(text)),
            MetadataField::SampleRateHz => replace(&mut self.sample_rate_hz, coerce(text)),
            MetadataField::ChannelCount => replace(&mut self.channel_count, coerce(text)),
        }
    }
}

/// Editable metadata fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    /// [`Metadata::title`].
    Title,
    /// [`Metadata::artist`].
    Artist,
    /// [`Metadata::album`].
    Album,
    /// [`Metadata::genre`].
    Genre,
    /// [`Metadata::year`].
    Year,
    /// [`Metadata::comment`].
    Comment,
    /// [`Metadata::duration_ms`].
    DurationMs,
    /// [`Metadata::bitrate_kbps`].
    BitrateKbps,
    /// [`Metadata::sample_rate_hz`].
    SampleRateHz,
    /// [`Metadata::channel_count`].
    ChannelCount,
}

impl MetadataField {
    /// Returns all fields in form order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Title,
            Self::Artist,
            Self::Album,
            Self::Genre,
            Self::Year,
            Self::Comment,
            Self::DurationMs,
            Self::BitrateKbps,
            Self::SampleRateHz,
            Self::ChannelCount,
        ]
    }

    /// Returns the label shown next to this field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::Genre => "Genre",
            Self::Year => "Year",
            Self::Comment => "Comment",
            Self::DurationMs => "Duration (ms)",
            Self::BitrateKbps => "Bitrate (kbps)",
            Self::SampleRateHz => "Sample rate (Hz)",
            Self::ChannelCount => "Channels",
        }
    }
}
