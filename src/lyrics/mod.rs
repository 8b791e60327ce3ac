//! Lyrics processing module.
//!
//! Holds the lyrics asset of a package, the tolerant LRC parser that projects
//! its raw text into timed lines, and the cursor that follows playback.

pub mod cursor;
pub mod parser;

pub use cursor::{current_index, CursorUpdate, LyricsCursor};
pub use parser::{format_tag, format_time, parse, parse_lrc, LyricLine};

use crate::types::LyricFormat;

/// Lyrics slot of a package: declared format, raw text and the parsed lines.
///
/// The lines are a projection of the text and format. They are recomputed in
/// full on every edit and never stored on their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsAsset {
    format: LyricFormat,
    text: String,
    lines: Vec<LyricLine>,
}

impl LyricsAsset {
    /// Create an asset and parse its text.
    pub fn new(text: impl Into<String>, format: LyricFormat) -> Self {
        let text = text.into();
        let lines = parse(&text, format);
        Self { format, text, lines }
    }

    /// Declared format.
    pub const fn format(&self) -> LyricFormat {
        self.format
    }

    /// Raw text as edited or loaded.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed lines, sorted by time.
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// Check if the text has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the text and reparse. Returns whether anything changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.reparse();
        true
    }

    /// Change the declared format and reparse. Returns whether anything changed.
    pub fn set_format(&mut self, format: LyricFormat) -> bool {
        if format == self.format {
            return false;
        }
        self.format = format;
        self.reparse();
        true
    }

    fn reparse(&mut self) {
        self.lines = parse(&self.text, self.format);
    }
}
