// WHY: single error surface for the library; the binary wraps these in anyhow at the edges

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring tokenizers or splitting a stream
#[derive(Error, Debug)]
pub enum SplitError {
    /// Tokenizer name outside the supported set
    #[error("unknown tokenizer '{0}' (expected one of: rules, punkt, custom)")]
    UnknownTokenizer(String),

    /// Configuration rejected before any fragment is processed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Backend was never initialized or its initialization failed
    #[error("tokenizer '{tokenizer}' is unavailable: {reason}")]
    TokenizerUnavailable {
        /// Name of the tokenizer backend
        tokenizer: &'static str,
        /// Recorded initialization failure
        reason: String,
    },

    /// No local model data and no permitted way to fetch it
    #[error("no model for language '{language}' at {}", path.display())]
    ModelMissing {
        /// Requested language code
        language: String,
        /// Where the model was expected
        path: PathBuf,
    },

    /// Model file exists but cannot be parsed
    #[error("invalid model file {}: {source}", path.display())]
    InvalidModel {
        /// Offending file
        path: PathBuf,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Model download failed
    #[error("failed to download model from {url}: {source}")]
    Download {
        /// Requested URL
        url: String,
        /// Transport or status failure
        #[source]
        source: reqwest::Error,
    },

    /// Boundary pattern failed to compile
    #[error("failed to build boundary pattern: {0}")]
    Pattern(#[from] regex_automata::meta::BuildError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for library operations
pub type Result<T, E = SplitError> = std::result::Result<T, E>;
