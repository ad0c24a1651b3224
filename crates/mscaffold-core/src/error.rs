//! Error handling for the mscaffold scaffolding library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::error::{Error, Result};
//!
//! fn might_fail(pool: &str) -> Result<()> {
//!     if pool != "local" {
//!         return Err(Error::invalid_argument("Code pool must be \"community\" or \"local\""));
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail("core").is_err());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for mscaffold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mscaffold operations
#[derive(Debug, Error)]
pub enum Error {
    /// A command-line argument has an unsupported value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A widget parameter string is not a list of `key=value` segments
    #[error("Malformed widget parameter '{input}': segment '{segment}' is not of the form key=value")]
    MalformedParameter { input: String, segment: String },

    /// A directory that must be created by other tooling is absent
    #[error("Invalid {what} - could not find {what} dir {}. Stop.", .path.display())]
    MissingPrerequisite { what: &'static str, path: PathBuf },

    /// Refused to overwrite an existing artifact
    #[error("File already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),

    /// XML document or fragment is not well-formed
    #[error("XML parse error in {origin}: {message}")]
    XmlParse { origin: String, message: String },

    /// Fragment and document have different root elements
    #[error("Cannot merge <{found}> fragment into <{expected}> document")]
    XmlRootMismatch { expected: String, found: String },

    /// Template does not exist in the resolved template source
    #[error("Template not found: {name} (looked in {})", .path.display())]
    TemplateNotFound { name: String, path: PathBuf },

    /// Template references context keys that were never provided
    #[error("Undefined variable(s) for template '{template}': {variables}")]
    UndefinedVariable { template: String, variables: String },

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// I/O error on a known path
    #[error("I/O error on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Attach the offending path to an I/O error
    pub fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error was caused by bad user input rather than the environment
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MalformedParameter { .. }
        )
    }
}
