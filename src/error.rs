//! Error types for biosource

use thiserror::Error;

/// Result type alias for biosource operations
pub type Result<T> = std::result::Result<T, BiosourceError>;

/// Error types that can occur while resolving and reading a location
#[derive(Debug, Error)]
pub enum BiosourceError {
    /// I/O error (missing or unreadable local path, failed read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote retrieval returned a non-success status
    #[cfg(feature = "network")]
    #[error("HTTP error {status}: {url}")]
    Http {
        /// HTTP status code
        status: u16,
        /// URL that failed
        url: String,
    },

    /// Remote retrieval failed at the transport level
    #[error("Network error: {0}")]
    Network(String),

    /// An inferred transfer encoding has no decompression primitive
    #[error("No decompression primitive for encoding: {0}")]
    UnsupportedEncoding(String),

    /// The archive primitive rejected the byte stream
    #[error("Malformed {kind} archive: {msg}")]
    MalformedArchive {
        /// Archive kind ("zip" or "tar")
        kind: &'static str,
        /// Underlying failure reported by the archive reader
        msg: String,
    },
}

impl From<zip::result::ZipError> for BiosourceError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(err) => BiosourceError::Io(err),
            other => BiosourceError::MalformedArchive {
                kind: "zip",
                msg: other.to_string(),
            },
        }
    }
}
