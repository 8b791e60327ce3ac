//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Media import constants.
pub mod media {
    /// File name given to audio imported without one.
    pub const DEFAULT_AUDIO_FILE_NAME: &str = "audio.mp3";

    /// Content type used when an audio extension is not recognized.
    pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

    /// Byte size unit ladder, capped at GB.
    pub const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
}

/// Playback and lyric cursor constants.
pub mod playback {
    /// Default lyric cursor polling cadence in milliseconds.
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

    /// Lowest accepted polling cadence in milliseconds.
    pub const MIN_POLL_INTERVAL_MS: u64 = 10;

    /// Subdirectory of the user cache dir holding preview files.
    pub const PREVIEW_SUBDIR: &str = "musicpak/preview";
}

/// Package container constants.
pub mod container {
    /// Conventional package file extension.
    pub const PACKAGE_EXTENSION: &str = "mpak";

    /// Manifest format version written by this crate.
    pub const FORMAT_VERSION: u32 = 1;

    /// Archive entry holding the JSON manifest.
    pub const MANIFEST_ENTRY: &str = "manifest.json";

    /// Archive entry holding the audio buffer.
    pub const AUDIO_ENTRY: &str = "audio.bin";

    /// Archive entry holding the cover buffer.
    pub const COVER_ENTRY: &str = "cover.bin";

    /// Archive entry holding the lyrics text.
    pub const LYRICS_ENTRY: &str = "lyrics.txt";

    /// Largest declared entry size accepted when reading (2 GiB).
    pub const MAX_ENTRY_BYTES: u64 = 1 << 31;
}

/// Editor session constants.
pub mod session {
    /// Application name shown in the window title.
    pub const APP_DISPLAY_NAME: &str = "Music Package Creator";

    /// Title fragment for a package that has no file yet.
    pub const UNTITLED: &str = "Untitled";

    /// Status text of an idle session.
    pub const STATUS_READY: &str = "Ready";
}
