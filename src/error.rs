//! Error types for the sentimen library.
//!
//! Every fallible operation returns [`Result`], whose error side is
//! [`SentimenError`]. Artifact loading has its own [`LoadError`] because a
//! failed load is not a per-request error: it puts the whole application
//! into degraded mode.
//!
//! # Examples
//!
//! ```
//! use sentimen::error::{Result, SentimenError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SentimenError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for sentimen operations.
#[derive(Error, Debug)]
pub enum SentimenError {
    /// I/O errors (file operations, stdin, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Artifact loading failed; the application is in degraded mode.
    #[error("Artifact error: {0}")]
    Load(#[from] LoadError),

    /// Text analysis errors (char filters, tokenizers, stopword removal, stemming)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Feature encoding errors
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Classifier errors (shape mismatch, unsupported operation)
    #[error("Model error: {0}")]
    Model(String),

    /// The review was blank or whitespace-only.
    #[error("Empty input: nothing to analyze")]
    EmptyInput,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SentimenError.
pub type Result<T> = std::result::Result<T, SentimenError>;

impl SentimenError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SentimenError::Analysis(msg.into())
    }

    /// Create a new encoding error.
    pub fn encoding<S: Into<String>>(msg: S) -> Self {
        SentimenError::Encoding(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        SentimenError::Model(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SentimenError::Config(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SentimenError::SerializationError(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentimenError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SentimenError::Other(format!("Invalid argument: {}", msg.into()))
    }
}

/// Failure to load the artifact bundle.
///
/// Loading is all-or-nothing, so a single value describes the first artifact
/// that could not be loaded. Messages are kept as strings so the error can be
/// cloned out of the process-wide load cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No file for the artifact exists under any accepted extension.
    #[error("artifact '{artifact}' not found (looked for {})", display_paths(.searched))]
    NotFound {
        artifact: String,
        searched: Vec<PathBuf>,
    },

    /// The file exists but could not be read.
    #[error("failed to read artifact '{artifact}' from {}: {message}", .path.display())]
    Read {
        artifact: String,
        path: PathBuf,
        message: String,
    },

    /// The file was read but could not be deserialized.
    #[error("failed to decode artifact '{artifact}' from {}: {message}", .path.display())]
    Decode {
        artifact: String,
        path: PathBuf,
        message: String,
    },

    /// The artifact decoded but its content is inconsistent.
    #[error("artifact '{artifact}' is invalid: {message}")]
    Invalid { artifact: String, message: String },

    /// A classifier was fitted on a different feature space than the vectorizer.
    #[error(
        "artifact '{artifact}' expects {expected} features but the vectorizer produces {actual}"
    )]
    FeatureMismatch {
        artifact: String,
        expected: usize,
        actual: usize,
    },
}

impl LoadError {
    /// Name of the artifact that failed.
    pub fn artifact(&self) -> &str {
        match self {
            LoadError::NotFound { artifact, .. }
            | LoadError::Read { artifact, .. }
            | LoadError::Decode { artifact, .. }
            | LoadError::Invalid { artifact, .. }
            | LoadError::FeatureMismatch { artifact, .. } => artifact,
        }
    }

    pub(crate) fn invalid<A: Into<String>, S: Into<String>>(artifact: A, msg: S) -> Self {
        LoadError::Invalid {
            artifact: artifact.into(),
            message: msg.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
