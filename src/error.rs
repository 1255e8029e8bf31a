//! Error types for pointer resolution, schema merging, loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the JSON Pointer engine.
///
/// None of these are fatal: every pointer operation leaves its input untouched
/// when it returns one, so callers can report and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    #[error("invalid JSON pointer: {pointer:?}")]
    Invalid { pointer: String },

    #[error("cannot resolve key {key:?} in {pointer:?}")]
    Unresolved { pointer: String, key: String },

    #[error("{pointer:?} does not lead to a container: found {actual}")]
    NotAContainer { pointer: String, actual: String },

    #[error("invalid array index {key:?} in {pointer:?}")]
    InvalidIndex { pointer: String, key: String },

    #[error("cannot replace or remove the document root")]
    RootWrite,

    #[error("data pointer {pointer:?} is not described by the schema")]
    NotDescribed { pointer: String },

    #[error("schema pointer {pointer:?} has no single data location (crosses {keyword})")]
    Ambiguous { pointer: String, keyword: String },
}

impl PointerError {
    /// Short machine-friendly name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PointerError::Invalid { .. } => "invalid",
            PointerError::Unresolved { .. } => "unresolved",
            PointerError::NotAContainer { .. } => "not_a_container",
            PointerError::InvalidIndex { .. } => "invalid_index",
            PointerError::RootWrite => "root_write",
            PointerError::NotDescribed { .. } => "not_described",
            PointerError::Ambiguous { .. } => "ambiguous",
        }
    }
}

/// Errors during schema merging.
///
/// Unmergeable fragments are not an error: they produce an `allOf` fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("schema fragment {index} is not an object: got {actual}")]
    NotAnObject { index: usize, actual: String },
}

/// Errors while loading JSON documents.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Load(e) => e.exit_code(),
            ValidateError::Merge(_) | ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid value in the instance.
    pub path: String,
    /// JSON Pointer to the keyword in the schema that rejected it.
    pub schema_path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
