//! Error handling module for DriveCopy

use thiserror::Error;

/// Main error type for DriveCopy operations
#[derive(Error, Debug)]
pub enum CopyError {
    /// Invalid arguments provided
    #[error("Invalid arguments: {0}")]
    BadArgs(String),

    /// Identifier does not resolve to any remote item
    #[error("Item not found: {id}")]
    NotFound { id: String },

    /// Identifier resolves to a file where a folder was required
    #[error("Not a folder: {id}")]
    NotAFolder { id: String },

    /// Caller lacks rights on the remote item
    #[error("Permission denied on {id}: {message}")]
    PermissionDenied { id: String, message: String },

    /// Rate limiting, timeout, or other retryable remote failure
    #[error("Transient remote error: {message}")]
    Transient { message: String },

    /// A transient failure persisted past the retry budget
    #[error("Giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<CopyError>,
    },

    /// Traversal failure annotated with the paths being worked on
    #[error("Copy failed at '{src_path}' (destination '{dst_path}'): {source}")]
    Aborted {
        src_path: String,
        dst_path: String,
        #[source]
        source: Box<CopyError>,
    },

    /// Invariant violation inside the copier itself
    #[error("Internal error: {0}")]
    Internal(String),

    /// Credential or token cache problem
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Remote API returned a response the client does not understand
    #[error("Unexpected API response ({status}): {body}")]
    Api { status: u16, body: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CopyError {
    /// Whether the retry loop should attempt this operation again
    pub fn is_transient(&self) -> bool {
        matches!(self, CopyError::Transient { .. })
    }

    /// Annotate a traversal failure with the source path and the
    /// destination path under construction.
    pub fn at(src_path: &str, dst_path: &str, source: CopyError) -> Self {
        CopyError::Aborted {
            src_path: src_path.to_string(),
            dst_path: dst_path.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for DriveCopy operations
pub type CopyResult<T> = std::result::Result<T, CopyError>;
