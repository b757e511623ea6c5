//! Error types for library binding and native object handles.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors that can occur while resolving and binding the native libraries.
///
/// All of these are fatal: nothing in the crate works without the surface.
#[derive(Error, Debug)]
pub enum BindError {
    /// Every candidate name for a logical library failed to open.
    #[error("failed to load {library} library: {}", attempted.join(" / "))]
    LibraryNotFound {
        library: String,
        attempted: Vec<String>,
    },

    /// A bound library lacks a declared symbol.
    #[error("symbol `{symbol}` not found in {library} library: {reason}")]
    SymbolNotFound {
        library: String,
        symbol: String,
        reason: String,
    },

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] pango_config::ConfigError),
}

/// Non-fatal: an explicit location override could not be opened and the
/// resolver fell back to the candidate search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load {library} library from '{}': {reason}; falling back", location.display())]
pub struct LibraryOpenWarning {
    pub library: String,
    pub location: PathBuf,
    pub reason: String,
}

/// Contract violations on a native object handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// A handle was requested around a null pointer.
    #[error("{operation}: invalid {type_name} object (null pointer)")]
    InvalidObject {
        operation: &'static str,
        type_name: &'static str,
    },

    /// The handle's reference was already released.
    #[error("{operation}: {type_name} used after release")]
    UseAfterRelease {
        operation: &'static str,
        type_name: &'static str,
    },
}
