//! Editor session: the package model plus everything an editor window shows
//! around it.
//!
//! The session is the single owner of the package. User edits come in through
//! `&mut self` methods; playback polling only reads the parsed lyric lines and
//! moves the cursor. Observers receive [`SessionEvent`]s over a channel.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::import::{ImportedFile, Importer};
use super::playback::{playback_time_text, PlaybackClock, PlaybackEvent};
use super::probe::{PropertyProbe, TagProbe};
use crate::config::Config;
use crate::constants::session::{APP_DISPLAY_NAME, STATUS_READY, UNTITLED};
use crate::error::{Error, Result};
use crate::lyrics::{CursorUpdate, LyricLine, LyricsAsset, LyricsCursor};
use crate::media::{self, preview::PreviewFile};
use crate::package::{PackageModel, PackageStore, ZipPackageStore};
use crate::types::{AssetSlot, LyricFormat, MetadataField};

/// Notifications for whatever renders the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The unsaved-edits flag flipped.
    DirtyChanged(bool),
    /// The window title changed.
    TitleChanged(String),
    /// The status line changed.
    StatusChanged(String),
    /// Lyric text or format changed and the lines were rebuilt.
    LyricsParsed {
        /// Number of timed lines now available.
        line_count: usize,
    },
    /// Playback moved onto a different lyric line, or before the first one.
    CurrentLineChanged(Option<usize>),
    /// Playback stopped or ended and the highlight was cleared.
    LyricsReset,
    /// Position/duration display text changed.
    PlaybackTime(String),
    /// A preview file is ready for the playback engine.
    PreviewReady {
        /// Preview file location.
        path: PathBuf,
        /// MIME type to announce.
        content_type: &'static str,
    },
    /// The preview file was released; the engine should drop its source.
    PreviewReleased,
}

/// An editing session over one package at a time.
#[derive(Debug)]
pub struct EditorSession<S = ZipPackageStore, P = TagProbe> {
    config: Config,
    model: PackageModel<S>,
    probe: P,
    importer: Importer,
    cursor: LyricsCursor,
    preview: Option<PreviewFile>,
    status: String,
    title: String,
    time_text: String,
    dirty: bool,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl EditorSession {
    /// Create a session using the ZIP container and the tag probe.
    pub fn new(config: Config) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        Self::with_collaborators(config, ZipPackageStore::new(), TagProbe)
    }
}

impl<S: PackageStore, P: PropertyProbe> EditorSession<S, P> {
    /// Create a session with explicit container and probe collaborators.
    pub fn with_collaborators(
        config: Config,
        store: S,
        probe: P,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            config,
            model: PackageModel::with_store(store),
            probe,
            importer: Importer::new(),
            cursor: LyricsCursor::new(),
            preview: None,
            status: STATUS_READY.to_string(),
            title: APP_DISPLAY_NAME.to_string(),
            time_text: String::new(),
            dirty: false,
            events,
        };
        (session, rx)
    }

    /// Read-only view of the package.
    pub const fn model(&self) -> &PackageModel<S> {
        &self.model
    }

    /// Session configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Importer sharing this session's slot gates.
    pub fn importer(&self) -> Importer {
        self.importer.clone()
    }

    /// Current status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current window title.
    pub fn window_title(&self) -> &str {
        &self.title
    }

    /// Whether plain save makes sense right now.
    pub const fn can_save(&self) -> bool {
        self.model.is_dirty()
    }

    /// Preview file for the playback engine, if audio is loaded.
    pub const fn preview(&self) -> Option<&PreviewFile> {
        self.preview.as_ref()
    }

    /// Parsed lyric lines, empty without lyrics.
    pub fn lyric_lines(&self) -> &[LyricLine] {
        self.model.lyrics().map_or(&[][..], LyricsAsset::lines)
    }

    /// Index of the highlighted lyric line.
    pub const fn current_line(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// The highlighted lyric line.
    pub fn current_lyric(&self) -> Option<&LyricLine> {
        self.current_line().and_then(|i| self.lyric_lines().get(i))
    }

    // Package lifecycle

    /// Start a fresh package, discarding the current one.
    pub fn create_new(&mut self) {
        self.release_playback();
        self.model.create_new();
        self.emit_lyrics_parsed();
        self.set_status("New package");
        self.refresh();
    }

    /// Load the package at `path`. On failure the open package is untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.set_status("Loading...");
        if let Err(e) = self.model.load(path) {
            return Err(self.fail(e));
        }

        self.release_playback();
        if let Some(audio) = self.model.audio() {
            let preview = PreviewFile::create(&self.config.preview_dir, audio);
            self.install_preview(preview);
        }
        self.emit_lyrics_parsed();
        self.set_status(format!("Loaded: {}", display_name(path)));
        self.refresh();
        Ok(())
    }

    /// Save to `path` and make it the current file.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.set_status("Saving...");
        if let Err(e) = self.model.save(path) {
            return Err(self.fail(e));
        }
        self.set_status(format!("Saved: {}", display_name(path)));
        self.refresh();
        Ok(())
    }

    /// Save to the current file.
    pub fn save(&mut self) -> Result<PathBuf> {
        self.set_status("Saving...");
        match self.model.save_current() {
            Ok(path) => {
                self.set_status(format!("Saved: {}", display_name(&path)));
                self.refresh();
                Ok(path)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Close the package and release the preview.
    pub fn close(&mut self) {
        self.release_playback();
        self.model.close();
        self.emit_lyrics_parsed();
        self.set_status(STATUS_READY);
        self.refresh();
    }

    // Imports

    /// Import audio handed over as bytes, e.g. from drag-and-drop.
    ///
    /// Probed tags only fill metadata fields that are still empty.
    pub fn import_audio(&mut self, bytes: Vec<u8>, file_name: Option<&str>) -> Result<()> {
        let result = self.try_import_audio(bytes, file_name);
        self.finish_import(result)
    }

    fn try_import_audio(&mut self, bytes: Vec<u8>, file_name: Option<&str>) -> Result<String> {
        self.require_package()?;
        if let Some(name) = file_name {
            check_extension(AssetSlot::Audio, name)?;
        }
        let audio = media::import_audio_named(bytes, file_name, &self.config.default_audio_name)?;

        let props = self.probe.probe_audio(audio.data(), audio.source_filename());
        let mut metadata = self.model.metadata().clone();
        if metadata.fill_missing(&props) {
            self.model.set_metadata(metadata)?;
        }

        self.release_playback();
        let preview = PreviewFile::create(&self.config.preview_dir, &audio);
        self.install_preview(preview);

        let name = audio.source_filename().to_string();
        self.model.set_audio(audio)?;
        Ok(format!("Imported: {name}"))
    }

    /// Import a cover image handed over as bytes.
    pub fn import_cover(&mut self, bytes: Vec<u8>, file_name: &str) -> Result<()> {
        let result = self.try_import_cover(bytes, file_name);
        self.finish_import(result)
    }

    fn try_import_cover(&mut self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        self.require_package()?;
        check_extension(AssetSlot::Cover, file_name)?;

        let props = self.probe.probe_image(&bytes, file_name);
        let cover = media::import_cover(
            bytes,
            file_name,
            props.width.unwrap_or_default(),
            props.height.unwrap_or_default(),
        )?;
        let info = cover.info();
        self.model.set_cover(cover)?;
        Ok(format!("Imported cover: {info}"))
    }

    /// Import lyric text from a `.lrc`, `.srt` or `.ass` file.
    pub fn import_lyrics(&mut self, text: String, file_name: &str) -> Result<()> {
        let result = self.try_import_lyrics(text, file_name);
        self.finish_import(result)
    }

    fn try_import_lyrics(&mut self, text: String, file_name: &str) -> Result<String> {
        self.require_package()?;
        check_extension(AssetSlot::Lyrics, file_name)?;

        let format = LyricFormat::from_file_name(file_name).unwrap_or_default();
        self.model.set_lyrics(LyricsAsset::new(text, format))?;
        self.emit_lyrics_parsed();
        Ok(format!("Imported lyrics: {file_name}"))
    }

    /// Read and import an audio file.
    pub async fn import_audio_file(&mut self, path: &Path) -> Result<()> {
        let file = self.read_for(AssetSlot::Audio, path).await?;
        self.import_audio(file.bytes, Some(&file.file_name))
    }

    /// Read and import a cover image file.
    pub async fn import_cover_file(&mut self, path: &Path) -> Result<()> {
        let file = self.read_for(AssetSlot::Cover, path).await?;
        self.import_cover(file.bytes, &file.file_name)
    }

    /// Read and import a lyrics file.
    pub async fn import_lyrics_file(&mut self, path: &Path) -> Result<()> {
        let file = self.read_for(AssetSlot::Lyrics, path).await?;
        let file_name = file.file_name.clone();
        self.import_lyrics(file.into_text(), &file_name)
    }

    async fn read_for(&mut self, slot: AssetSlot, path: &Path) -> Result<ImportedFile> {
        if let Err(e) = self.require_package() {
            return Err(self.fail(e));
        }
        self.set_status(format!("Importing {slot}..."));
        match self.importer.read_file(slot, path).await {
            Ok(file) => Ok(file),
            Err(e) => Err(self.fail(e)),
        }
    }

    // Edits

    /// Apply a metadata text-box edit.
    pub fn edit_field(&mut self, field: MetadataField, text: &str) -> Result<bool> {
        let changed = self.model.edit_field(field, text)?;
        self.refresh();
        Ok(changed)
    }

    /// Remove the cover.
    pub fn remove_cover(&mut self) -> Result<()> {
        if self.model.clear_cover()? {
            self.set_status("Cover removed");
        }
        self.refresh();
        Ok(())
    }

    /// Remove the audio and release its preview.
    pub fn remove_audio(&mut self) -> Result<()> {
        if self.model.clear_audio()? {
            self.release_playback();
            self.set_status("Audio removed");
        }
        self.refresh();
        Ok(())
    }

    /// Clear the lyric text and format.
    pub fn clear_lyrics(&mut self) -> Result<()> {
        if self.model.clear_lyrics()? {
            self.emit_lyrics_parsed();
        }
        self.refresh();
        Ok(())
    }

    /// Lyric text box changed: reparse synchronously.
    pub fn on_lyrics_text_changed(&mut self, text: &str) -> Result<()> {
        if self.model.set_lyrics_text(text)? {
            self.emit_lyrics_parsed();
        }
        self.refresh();
        Ok(())
    }

    /// Lyric format selector changed: reparse synchronously.
    pub fn set_lyrics_format(&mut self, format: LyricFormat) -> Result<()> {
        if self.model.set_lyrics_format(format)? {
            self.emit_lyrics_parsed();
        }
        self.refresh();
        Ok(())
    }

    // Playback

    /// Resolve the lyric line for `position_ms`, emitting only transitions.
    pub fn tick(&mut self, position_ms: i64) -> CursorUpdate {
        let lines = self.model.lyrics().map_or(&[][..], LyricsAsset::lines);
        let update = self.cursor.update(lines, position_ms);
        if let CursorUpdate::Changed(index) = update {
            self.emit(SessionEvent::CurrentLineChanged(index));
        }
        update
    }

    /// One polling step: refresh the time display and the lyric cursor.
    pub fn poll<C: PlaybackClock + ?Sized>(&mut self, clock: &C) -> CursorUpdate {
        let position = clock.position_ms();
        self.set_time_text(playback_time_text(position, clock.duration_ms()));
        self.tick(position)
    }

    /// Playback was stopped or rewound to the start.
    pub fn stop_playback(&mut self) {
        self.reset_cursor();
    }

    /// React to a playback engine notification.
    pub fn handle_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Opened { duration_ms } => {
                self.set_time_text(playback_time_text(0, duration_ms));
            }
            PlaybackEvent::Ended => self.reset_cursor(),
            PlaybackEvent::Failed(message) => {
                tracing::warn!("Playback failed: {message}");
                self.reset_cursor();
                self.set_status(format!("Playback failed: {message}"));
            }
        }
    }

    // Internals

    fn require_package(&self) -> Result<()> {
        if self.model.has_package() {
            Ok(())
        } else {
            Err(Error::NoPackageOpen)
        }
    }

    fn finish_import(&mut self, result: Result<String>) -> Result<()> {
        match result {
            Ok(status) => {
                self.set_status(status);
                self.refresh();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        tracing::warn!("{error}");
        self.set_status(error.status_text());
        error
    }

    fn emit_lyrics_parsed(&mut self) {
        self.cursor.reset();
        let line_count = self.lyric_lines().len();
        self.emit(SessionEvent::LyricsParsed { line_count });
    }

    fn reset_cursor(&mut self) {
        if self.cursor.reset() {
            self.emit(SessionEvent::LyricsReset);
        }
    }

    fn install_preview(&mut self, preview: Result<PreviewFile>) {
        match preview {
            Ok(preview) => {
                self.emit(SessionEvent::PreviewReady {
                    path: preview.path().to_path_buf(),
                    content_type: preview.content_type(),
                });
                self.preview = Some(preview);
            }
            // Editing stays possible without playback.
            Err(e) => tracing::warn!("Preview unavailable: {e}"),
        }
    }

    fn release_playback(&mut self) {
        self.reset_cursor();
        if self.preview.take().is_some() {
            self.emit(SessionEvent::PreviewReleased);
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        if status != self.status {
            self.status.clone_from(&status);
            self.emit(SessionEvent::StatusChanged(status));
        }
    }

    fn set_time_text(&mut self, text: String) {
        if text != self.time_text {
            self.time_text.clone_from(&text);
            self.emit(SessionEvent::PlaybackTime(text));
        }
    }

    fn refresh(&mut self) {
        let dirty = self.model.is_dirty();
        if dirty != self.dirty {
            self.dirty = dirty;
            self.emit(SessionEvent::DirtyChanged(dirty));
        }

        let title = self.compose_title();
        if title != self.title {
            self.title.clone_from(&title);
            self.emit(SessionEvent::TitleChanged(title));
        }
    }

    fn compose_title(&self) -> String {
        let mut title = APP_DISPLAY_NAME.to_string();
        if let Some(path) = self.model.current_path() {
            title.push_str(" - ");
            title.push_str(&display_name(path));
        } else if self.model.has_package() {
            title.push_str(" - ");
            title.push_str(UNTITLED);
        }
        if self.model.is_dirty() {
            title.push_str(" *");
        }
        title
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Session event dropped: no listener");
        }
    }
}

fn check_extension(slot: AssetSlot, file_name: &str) -> Result<()> {
    if slot.accepts(file_name) {
        Ok(())
    } else {
        Err(Error::UnsupportedFile {
            slot,
            file_name: file_name.to_string(),
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::services::probe::{AudioProperties, ImageProperties};

    const LRC: &str = "[00:01.00]one\n[00:02.00]two\n[00:03.00]three";

    struct FixedProbe;

    impl PropertyProbe for FixedProbe {
        fn probe_audio(&self, _data: &[u8], _file_name: &str) -> AudioProperties {
            AudioProperties {
                title: Some("Probed".to_string()),
                duration_ms: Some(180_000),
                ..Default::default()
            }
        }

        fn probe_image(&self, _data: &[u8], _file_name: &str) -> ImageProperties {
            ImageProperties {
                width: Some(640),
                height: Some(480),
            }
        }
    }

    struct FixedClock(i64);

    impl PlaybackClock for FixedClock {
        fn position_ms(&self) -> i64 {
            self.0
        }

        fn duration_ms(&self) -> u64 {
            4_000
        }
    }

    fn session(
        dir: &Path,
    ) -> (
        EditorSession<ZipPackageStore, FixedProbe>,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let config = Config::default().with_preview_dir(dir.join("preview"));
        EditorSession::with_collaborators(config, ZipPackageStore::new(), FixedProbe)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_title_tracks_path_and_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut rx) = session(dir.path());
        assert_eq!(session.window_title(), APP_DISPLAY_NAME);
        assert!(!session.can_save());

        session.create_new();
        assert_eq!(session.window_title(), "Music Package Creator - Untitled");

        session.edit_field(MetadataField::Title, "Song").unwrap();
        assert_eq!(session.window_title(), "Music Package Creator - Untitled *");
        assert!(session.can_save());

        let path = dir.path().join("song.mpak");
        session.save_as(&path).unwrap();
        assert_eq!(session.window_title(), "Music Package Creator - song.mpak");
        assert!(!session.can_save());
        assert_eq!(session.status(), "Saved: song.mpak");

        let events = drain(&mut rx);
        assert!(events.contains(&SessionEvent::DirtyChanged(true)));
        assert!(events.contains(&SessionEvent::DirtyChanged(false)));
    }

    #[test]
    fn test_import_without_package() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _rx) = session(dir.path());

        let err = session.import_audio(vec![1, 2, 3], Some("a.mp3")).unwrap_err();
        assert!(matches!(err, Error::NoPackageOpen));
        assert_eq!(session.status(), "Create or open a package first");
        assert!(session.save().is_err());
    }

    #[test]
    fn test_import_audio_fills_metadata_and_previews() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut rx) = session(dir.path());
        session.create_new();
        session.edit_field(MetadataField::Artist, "Kept").unwrap();

        session.import_audio(vec![1, 2, 3], Some("track.flac")).unwrap();

        let meta = session.model().metadata();
        assert_eq!(meta.title, "Probed");
        assert_eq!(meta.artist, "Kept");
        assert_eq!(meta.duration_ms, 180_000);
        assert_eq!(session.status(), "Imported: track.flac");

        let preview = session.preview().unwrap();
        assert!(preview.path().exists());
        assert_eq!(preview.content_type(), "audio/flac");
        let preview_path = preview.path().to_path_buf();

        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, SessionEvent::PreviewReady { .. })));

        session.remove_audio().unwrap();
        assert!(session.preview().is_none());
        assert!(!preview_path.exists());
        assert!(drain(&mut rx).contains(&SessionEvent::PreviewReleased));
    }

    #[test]
    fn test_import_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _rx) = session(dir.path());
        session.create_new();

        let err = session.import_cover(vec![1], "cover.gif").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFile { slot: AssetSlot::Cover, .. }));
        assert!(session.model().cover().is_none());
        assert!(!session.can_save());
    }

    #[test]
    fn test_import_cover_uses_measured_size() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _rx) = session(dir.path());
        session.create_new();

        session.import_cover(vec![0; 2048], "art.png").unwrap();
        let cover = session.model().cover().unwrap();
        assert_eq!((cover.width(), cover.height()), (640, 480));
        assert_eq!(session.status(), "Imported cover: 640 × 480 • PNG • 2 KB");

        session.remove_cover().unwrap();
        assert!(session.model().cover().is_none());
        assert_eq!(session.status(), "Cover removed");
    }

    #[test]
    fn test_lyric_cursor_is_edge_triggered() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut rx) = session(dir.path());
        session.create_new();
        session.import_lyrics(LRC.to_string(), "song.lrc").unwrap();
        assert_eq!(
            session.model().lyrics().unwrap().format(),
            LyricFormat::LrcLineByLine
        );
        assert!(drain(&mut rx).contains(&SessionEvent::LyricsParsed { line_count: 3 }));

        assert_eq!(session.tick(500), CursorUpdate::Unchanged);
        assert_eq!(session.tick(1_000), CursorUpdate::Changed(Some(0)));
        assert_eq!(session.tick(1_100), CursorUpdate::Unchanged);
        assert_eq!(session.poll(&FixedClock(2_500)), CursorUpdate::Changed(Some(1)));
        assert_eq!(session.current_lyric().unwrap().text, "two");
        assert_eq!(session.tick(9_000), CursorUpdate::Changed(Some(2)));

        let events = drain(&mut rx);
        let changes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::CurrentLineChanged(_)))
            .collect();
        assert_eq!(changes.len(), 3);
        assert!(events.contains(&SessionEvent::PlaybackTime("00:02 / 00:04".to_string())));

        session.handle_playback_event(PlaybackEvent::Ended);
        assert_eq!(session.current_line(), None);
        assert_eq!(drain(&mut rx), vec![SessionEvent::LyricsReset]);

        // Already reset: nothing further to announce.
        session.stop_playback();
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_playback_time_sent_on_change_only() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut rx) = session(dir.path());
        session.create_new();
        drain(&mut rx);

        session.handle_playback_event(PlaybackEvent::Opened { duration_ms: 4_000 });
        session.poll(&FixedClock(0));
        session.poll(&FixedClock(400));
        session.poll(&FixedClock(1_200));
        session.poll(&FixedClock(1_900));

        let times: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::PlaybackTime(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(times, ["00:00 / 00:04", "00:01 / 00:04"]);
    }

    #[test]
    fn test_lyric_edits_reparse_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut rx) = session(dir.path());
        session.create_new();

        session.on_lyrics_text_changed(LRC).unwrap();
        // Typed text has no format yet, so nothing is timed.
        assert!(session.lyric_lines().is_empty());

        session.set_lyrics_format(LyricFormat::LrcEsLyric).unwrap();
        assert_eq!(session.lyric_lines().len(), 3);
        session.tick(3_000);
        assert_eq!(session.current_line(), Some(2));

        session.on_lyrics_text_changed("[00:05.00]only").unwrap();
        assert_eq!(session.current_line(), None);
        assert_eq!(session.lyric_lines().len(), 1);

        session.clear_lyrics().unwrap();
        assert!(session.lyric_lines().is_empty());
        assert!(drain(&mut rx).contains(&SessionEvent::LyricsParsed { line_count: 0 }));
    }

    #[test]
    fn test_failed_load_keeps_package() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _rx) = session(dir.path());
        session.create_new();
        session.edit_field(MetadataField::Album, "Keep me").unwrap();

        let bogus = dir.path().join("bogus.mpak");
        std::fs::write(&bogus, b"not a zip").unwrap();
        let err = session.load(&bogus).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert_eq!(session.status(), "Load failed");
        assert_eq!(session.model().metadata().album, "Keep me");
        assert!(session.can_save());
    }

    #[test]
    fn test_load_prepares_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.mpak");
        {
            let (mut writer, _rx) = session(dir.path());
            writer.create_new();
            writer.import_audio(vec![9; 16], Some("a.wav")).unwrap();
            writer.save_as(&path).unwrap();
        }

        let (mut reader, mut rx) = session(dir.path());
        reader.load(&path).unwrap();
        assert_eq!(reader.window_title(), "Music Package Creator - full.mpak");
        assert_eq!(reader.model().audio().unwrap().data(), &[9; 16]);
        assert_eq!(reader.preview().unwrap().content_type(), "audio/wav");
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, SessionEvent::PreviewReady { content_type: "audio/wav", .. })));
    }

    #[tokio::test]
    async fn test_import_lyrics_file() {
        let dir = tempfile::tempdir().unwrap();
        let lrc = dir.path().join("song.lrc");
        std::fs::write(&lrc, LRC).unwrap();

        let (mut session, _rx) = session(dir.path());
        assert!(matches!(
            session.import_lyrics_file(&lrc).await,
            Err(Error::NoPackageOpen)
        ));

        session.create_new();
        session.import_lyrics_file(&lrc).await.unwrap();
        assert_eq!(session.lyric_lines().len(), 3);
        assert!(!session.importer().is_busy(AssetSlot::Lyrics));
    }
}
