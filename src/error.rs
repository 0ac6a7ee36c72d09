//! Domain-specific error types for the cubepp engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`ResourceError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! CubeppError
//! ├── Config(ConfigError)     : document parsing and loading
//! ├── Resource(ResourceError) : required project files, file state
//! └── Pattern(regex::Error)   : a text matcher could not be compiled
//! ```

use thiserror::Error;

pub use crate::resources::error::ResourceError;

/// Convenience alias for results carrying a [`CubeppError`].
pub type Result<T> = std::result::Result<T, CubeppError>;

/// Top-level error type for the cubepp engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum CubeppError {
    /// Configuration-related error (parsing, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource operation error (missing required file, unexpected state).
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// A matcher built from configured names or targets failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors that arise from loading the configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document contains a syntax or schema error.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Origin of the document (file path or `<embedded>`).
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
