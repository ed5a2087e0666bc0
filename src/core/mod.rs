use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::services::pulse::PulseError;

/// Top-level failure of a pulselink operation
///
/// Config problems are reported with the file or section they came from.
/// Anything raised while talking to a server is carried as [`PulseError`].
#[derive(Error, Debug)]
pub enum PulselinkError {
    /// A config section is inconsistent as a whole
    #[error("invalid {component}: {details}")]
    ConfigValidation {
        /// Section or file at fault
        component: String,
        /// What is wrong with it
        details: String,
    },

    /// A single config value is missing or out of range
    #[error("{component}: field '{field}' {reason}")]
    InvalidConfigField {
        /// Offending key
        field: String,
        /// Section holding the key
        component: String,
        /// Constraint that was broken
        reason: String,
    },

    /// Filesystem access on a known path failed
    #[error("{}: {details}", path.display())]
    IoError {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error text
        details: String,
    },

    /// Filesystem access without path context
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Config text is not valid TOML for the expected shape
    #[error("cannot parse {location}: {details}")]
    TomlParseError {
        /// File path, or `<inline>` for in-memory text
        location: String,
        /// Parser message
        details: String,
    },

    /// An `imports` entry could not be resolved or read
    #[error("cannot import {}: {details}", path.display())]
    ImportError {
        /// Resolved import path
        path: PathBuf,
        /// Underlying error text
        details: String,
    },

    /// Talking to a PulseAudio server failed
    #[error(transparent)]
    Pulse(#[from] PulseError),
}

/// Result alias used across the crate
pub type Result<T> = result::Result<T, PulselinkError>;

fn resolved(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl PulselinkError {
    /// TOML that failed to deserialize, located by file when known
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = path.map_or_else(
            || String::from("<inline>"),
            |path| resolved(path).display().to_string(),
        );
        Self::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Import entry that could not be read
    pub fn import(error: impl fmt::Display, path: &Path) -> Self {
        Self::ImportError {
            path: resolved(path),
            details: error.to_string(),
        }
    }

    /// Field of a config section rejected during validation
    pub fn invalid_field(
        component: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfigField {
            field: field.into(),
            component: component.into(),
            reason: reason.into(),
        }
    }
}
