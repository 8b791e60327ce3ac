//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use std::path::PathBuf;

use thiserror::Error;

use crate::package::container::ContainerError;
use crate::types::AssetSlot;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// A zero-length buffer was handed to an import.
    #[error("Nothing to import: the {slot} data is empty")]
    EmptyInput {
        /// Slot the import was aimed at.
        slot: AssetSlot,
    },

    /// A mutation or save was attempted while no package is open.
    #[error("No package is open. Create or load a package first")]
    NoPackageOpen,

    /// The container at `path` could not be opened or parsed.
    #[error("Failed to load package {path:?}: {source}")]
    Load {
        /// Package path that failed to load.
        path: PathBuf,
        /// Underlying container failure.
        source: ContainerError,
    },

    /// The container could not be written to `path`.
    #[error("Failed to save package {path:?}: {source}")]
    Save {
        /// Destination that failed to write.
        path: PathBuf,
        /// Underlying container failure.
        source: ContainerError,
    },

    /// A dropped or picked file has an extension the slot does not accept.
    #[error("Unsupported {slot} file: {file_name}")]
    UnsupportedFile {
        /// Slot the file was offered to.
        slot: AssetSlot,
        /// Offending file name.
        file_name: String,
    },

    /// Another import into the same slot has not finished yet.
    #[error("An import into the {0} slot is already in progress")]
    ImportInFlight(AssetSlot),

    /// Plain save was requested for a package that has never been saved.
    #[error("The package has no file path yet. Use save-as")]
    NoSavePath,

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Short status line suitable for a status bar.
    pub const fn status_text(&self) -> &'static str {
        match self {
            Self::Load { .. } => "Load failed",
            Self::Save { .. } | Self::NoSavePath => "Save failed",
            Self::NoPackageOpen => "Create or open a package first",
            Self::EmptyInput { .. } | Self::UnsupportedFile { .. } | Self::ImportInFlight(_) => {
                "Import failed"
            }
            Self::Io { .. } | Self::Config { .. } | Self::Msg(_) => "Operation failed",
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn empty_input_names_the_slot() {
        let err = Error::EmptyInput { slot: AssetSlot::Cover };
        assert!(err.to_string().contains("cover"));
        assert_eq!(err.status_text(), "Import failed");
    }

    #[test]
    fn load_failure_maps_to_load_status() {
        let err = Error::Load {
            path: PathBuf::from("missing.mpak"),
            source: ContainerError::MissingEntry("manifest.json"),
        };
        assert_eq!(err.status_text(), "Load failed");
        assert!(err.to_string().contains("missing.mpak"));
    }
}
