//! Editor services built on top of the package model.
//!
//! These hold everything that is not pure data: file reads, tag probing, the
//! playback boundary and the editing session tying them together.

pub mod import;
pub mod playback;
pub mod probe;
pub mod session;

pub use import::{ImportedFile, Importer, SlotGuard};
pub use playback::{playback_time_text, PlaybackClock, PlaybackEvent, WallClock};
pub use probe::{AudioProperties, ImageProperties, PropertyProbe, TagProbe};
pub use session::{EditorSession, SessionEvent};
