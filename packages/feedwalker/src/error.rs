//! Error types for feed walking.
//!
//! A single `FeedError` covers the walk itself and the thin acquisition and
//! output layers around it. [`FeedError::kind`] sorts every variant into an
//! [`ErrorKind`] so callers can tell malformed input apart from transport
//! trouble and from bugs in the walker.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Main error type for the feedwalker library.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The expected tag or event was not found at the cursor position.
    #[error("Expected {expected}, found {found}")]
    Structural { expected: String, found: String },

    /// Malformed markup reported by the tokenizer.
    #[error("Malformed XML: {0}")]
    Tokenizer(#[source] quick_xml::Error),

    /// Tag name or text that is not valid UTF-8.
    #[error("Invalid UTF-8 in feed: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Reading the underlying byte stream failed.
    #[error("Failed to read feed stream: {0}")]
    Transport(#[source] Arc<std::io::Error>),

    /// The walker broke one of its own invariants.
    #[error("Internal walker fault: {0}")]
    Internal(String),

    /// Invalid feed URL.
    #[error("Invalid feed URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidUrl(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download a feed.
    #[error("Failed to download feed from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Transient failures persisted through every retry.
    #[error("Giving up after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Declared response size is above the configured limit.
    #[error("Response from {url} is {size} bytes, above the limit of {limit} bytes")]
    ResponseTooLarge { url: String, size: u64, limit: u64 },

    /// A local feed file could not be opened.
    #[error("Failed to open feed file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error outside the walk (writing output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`FeedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Document structure did not match what the walker expects.
    Structural,
    /// The tokenizer rejected the markup.
    Tokenizer,
    /// The byte stream failed while being read.
    Transport,
    /// A bug in the walker itself.
    Internal,
    /// Obtaining the stream failed (HTTP, file open, configuration).
    Acquisition,
    /// Writing results failed.
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Structural => "structural",
            Self::Tokenizer => "tokenizer",
            Self::Transport => "transport",
            Self::Internal => "internal",
            Self::Acquisition => "acquisition",
            Self::Output => "output",
        };
        f.write_str(name)
    }
}

impl FeedError {
    /// Build a structural error from an expectation and what was found.
    pub fn structural(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Structural {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Structural error for a document that ends inside `tag`.
    pub fn unexpected_end(tag: &str) -> Self {
        Self::structural(format!("end tag </{tag}>"), "end of document")
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural { .. } => ErrorKind::Structural,
            Self::Tokenizer(_) | Self::Encoding(_) => ErrorKind::Tokenizer,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Internal(_) => ErrorKind::Internal,
            Self::InvalidUrl(_)
            | Self::Config(_)
            | Self::Http(_)
            | Self::Download { .. }
            | Self::RetriesExhausted { .. }
            | Self::ResponseTooLarge { .. }
            | Self::Open { .. } => ErrorKind::Acquisition,
            Self::Io(_) | Self::Yaml(_) | Self::Json(_) => ErrorKind::Output,
        }
    }

    /// Whether the error was caused by the document being fed in.
    ///
    /// Internal faults are never bad input, even though they surface from
    /// inside a walk.
    #[must_use]
    pub fn is_bad_input(&self) -> bool {
        matches!(self.kind(), ErrorKind::Structural | ErrorKind::Tokenizer)
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(source) => Self::Transport(source),
            other => Self::Tokenizer(other),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for FeedError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Tokenizer(err.into())
    }
}

/// Result type alias for feedwalker operations.
pub type Result<T> = std::result::Result<T, FeedError>;
